//! Lead capture commands: `contact`, `proposal` and `testimonial`.

use anyhow::Result;

use agency_desk::ApiError;
use agency_desk::leads::{ContactMessage, ProposalRequest, TestimonialSubmission};
use agency_desk::models::Testimonial;
use agency_desk::notify::Toast;
use agency_desk::store::{Mutation, ResourceTag};
use agency_desk::ui::icons::STAR;

use super::super::TestimonialCommands;
use super::{Desk, print_json};

/// Toast the outcome of a form submission; validation failures surface
/// their own message.
async fn submit<F>(desk: &Desk, message: &str, success: &str, fut: F) -> Result<()>
where
    F: std::future::Future<Output = Result<(), ApiError>>,
{
    match desk.fetch(message, fut).await {
        Ok(()) => {
            desk.notifier.notify(Toast::success(success));
            Ok(())
        }
        Err(err) => {
            let text = err
                .downcast_ref::<ApiError>()
                .map(|e| e.toast_message())
                .unwrap_or_else(|| err.to_string());
            desk.notifier.notify(Toast::error(text));
            Err(err)
        }
    }
}

pub async fn cmd_contact(desk: &mut Desk, form: ContactMessage) -> Result<()> {
    submit(
        desk,
        "Sending message...",
        "Message sent. We'll be in touch soon",
        desk.client.send_contact(&form),
    )
    .await
}

pub async fn cmd_proposal(desk: &mut Desk, form: ProposalRequest) -> Result<()> {
    submit(
        desk,
        "Sending proposal request...",
        "Proposal request received",
        desk.client.send_proposal(&form),
    )
    .await
}

fn stars(rating: u8) -> String {
    STAR.to_string().repeat(rating.min(5) as usize)
}

pub async fn cmd_testimonial(desk: &mut Desk, command: TestimonialCommands) -> Result<()> {
    match command {
        TestimonialCommands::Submit {
            name,
            company,
            role,
            rating,
            message,
        } => {
            let form = TestimonialSubmission {
                name,
                company,
                role,
                rating,
                message,
            };
            submit(
                desk,
                "Submitting testimonial...",
                "Thank you! Your testimonial will appear once approved",
                desk.client.submit_testimonial(&form),
            )
            .await?;
            desk.mutated(Mutation::TestimonialSubmitted);
        }
        TestimonialCommands::List => {
            let testimonials = desk
                .fetch("Loading testimonials...", desk.client.list_testimonials())
                .await?;
            let approved: Vec<Testimonial> =
                testimonials.into_iter().filter(|t| t.approved).collect();
            desk.store
                .write(ResourceTag::Testimonials, approved.clone());
            if desk.is_json() {
                return print_json(&approved);
            }
            println!();
            if approved.is_empty() {
                println!("No testimonials yet.");
            }
            for t in &approved {
                let by = match (&t.role, &t.company) {
                    (Some(role), Some(company)) => format!("{}, {} at {}", t.name, role, company),
                    (None, Some(company)) => format!("{}, {}", t.name, company),
                    (Some(role), None) => format!("{}, {}", t.name, role),
                    (None, None) => t.name.clone(),
                };
                println!("  {} {}", stars(t.rating), by);
                println!("    \"{}\"", t.message);
                println!();
            }
        }
    }
    Ok(())
}
