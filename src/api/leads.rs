use super::ApiClient;
use crate::errors::ApiError;
use crate::leads::{ContactMessage, ProposalRequest, TestimonialSubmission};

impl ApiClient {
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        message.validate()?;
        self.post_unit("/contact/contacts/", message).await
    }

    pub async fn send_proposal(&self, proposal: &ProposalRequest) -> Result<(), ApiError> {
        proposal.validate()?;
        self.post_unit("/proposal/proposals/", proposal).await
    }

    /// Submitted testimonials wait for moderation before they are listed.
    pub async fn submit_testimonial(
        &self,
        testimonial: &TestimonialSubmission,
    ) -> Result<(), ApiError> {
        testimonial.validate()?;
        self.post_unit("/testimonials/testimonials/", testimonial)
            .await
    }
}
