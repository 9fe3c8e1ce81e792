use serde_json::json;

use super::ApiClient;
use crate::errors::ApiError;
use crate::models::{Id, Job, JobApplication, NewJobApplication};

impl ApiClient {
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get_list("/careers/jobs/").await
    }

    pub async fn list_applications(&self) -> Result<Vec<JobApplication>, ApiError> {
        self.get_list("/careers/job-applications/").await
    }

    /// Validates the form before posting it.
    pub async fn submit_application(
        &self,
        application: &NewJobApplication,
    ) -> Result<JobApplication, ApiError> {
        application.validate()?;
        self.post_json("/careers/job-applications/", application)
            .await
    }

    pub async fn approve_application(&self, id: Id) -> Result<(), ApiError> {
        self.post_unit(&format!("/careers/job-applications/{}/approve/", id), &json!({}))
            .await
    }

    pub async fn reject_application(&self, id: Id) -> Result<(), ApiError> {
        self.post_unit(&format!("/careers/job-applications/{}/reject/", id), &json!({}))
            .await
    }
}
