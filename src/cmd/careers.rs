//! Careers commands: `applications` and `jobs list/apply`.

use anyhow::{Result, bail};

use agency_desk::models::{ApplicationStatus, JobApplication, NewJobApplication};
use agency_desk::notify::Toast;
use agency_desk::store::{Mutation, ResourceTag};

use super::super::{ApplicationCommands, JobCommands};
use super::{Desk, print_json, print_page};

fn parse_status(s: &str) -> Result<ApplicationStatus> {
    Ok(match s.trim().to_lowercase().as_str() {
        "pending" => ApplicationStatus::Pending,
        "approved" => ApplicationStatus::Approved,
        "rejected" => ApplicationStatus::Rejected,
        other => bail!("Unknown application status '{}'", other),
    })
}

pub async fn cmd_applications(desk: &mut Desk, command: ApplicationCommands) -> Result<()> {
    desk.require_admin().await?;

    match command {
        ApplicationCommands::List { status, page } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let applications = desk
                .fetch("Loading applications...", desk.client.list_applications())
                .await?;
            desk.store
                .write(ResourceTag::Applications, applications.clone());
            let applications: Vec<JobApplication> = applications
                .into_iter()
                .filter(|a| status.is_none_or(|s| a.status == s))
                .collect();

            if desk.is_json() {
                return print_json(&applications);
            }
            println!();
            if applications.is_empty() {
                println!("No applications.");
                return Ok(());
            }
            print_page(&applications, page, desk.page_size(None), |a| {
                format!(
                    "  #{:<5} {:<28} {:<32} {:<24} {}",
                    a.id,
                    a.full_name,
                    a.email,
                    a.position.as_deref().unwrap_or("-"),
                    a.status.as_str()
                )
            });
            println!();
        }
        ApplicationCommands::Approve { id } => {
            desk.fetch("Approving...", desk.client.approve_application(id))
                .await?;
            desk.mutated(Mutation::ApplicationReviewed);
            desk.notifier
                .notify(Toast::success(format!("Application #{} approved", id)));
        }
        ApplicationCommands::Reject { id } => {
            desk.fetch("Rejecting...", desk.client.reject_application(id))
                .await?;
            desk.mutated(Mutation::ApplicationReviewed);
            desk.notifier
                .notify(Toast::success(format!("Application #{} rejected", id)));
        }
    }
    Ok(())
}

pub async fn cmd_jobs(desk: &mut Desk, command: Option<JobCommands>) -> Result<()> {
    match command {
        None | Some(JobCommands::List) => list_jobs(desk).await,
        Some(JobCommands::Apply {
            job,
            name,
            email,
            cover_letter,
            resume_url,
        }) => {
            let application = NewJobApplication {
                job,
                full_name: name,
                email,
                cover_letter: cover_letter.unwrap_or_default(),
                resume_url,
            };
            let result = desk
                .fetch(
                    "Submitting application...",
                    desk.client.submit_application(&application),
                )
                .await;
            match result {
                Ok(submitted) => {
                    desk.mutated(Mutation::JobApplicationSubmitted);
                    desk.notifier
                        .notify(Toast::success("Application submitted. Good luck!"));
                    if desk.is_json() {
                        print_json(&submitted)?;
                    }
                    Ok(())
                }
                Err(err) => {
                    desk.notifier
                        .notify(Toast::error("Failed to submit application"));
                    Err(err)
                }
            }
        }
    }
}

async fn list_jobs(desk: &mut Desk) -> Result<()> {
    let jobs = desk
        .fetch("Loading positions...", desk.client.list_jobs())
        .await?;
    desk.store.write(ResourceTag::Jobs, jobs.clone());

    if desk.is_json() {
        return print_json(&jobs);
    }
    println!();
    let open: Vec<_> = jobs.iter().filter(|j| j.is_active).collect();
    if open.is_empty() {
        println!("No open positions.");
    }
    for job in open {
        println!(
            "  #{:<5} {:<36} {:<20} {}",
            job.id,
            job.title,
            job.location.as_deref().unwrap_or("-"),
            job.employment_type.as_deref().unwrap_or("")
        );
    }
    println!();
    Ok(())
}
