//! Account commands: `whoami`, `profile update`, `password forgot/reset`.

use anyhow::Result;
use console::style;

use agency_desk::admin::user_is_admin;
use agency_desk::leads::{PasswordResetConfirm, PasswordResetRequest};
use agency_desk::models::ProfileUpdate;
use agency_desk::notify::Toast;
use agency_desk::store::{Mutation, ResourceTag};
use agency_desk::ui::icons::PERSON;

use super::super::{PasswordCommands, ProfileCommands};
use super::{Desk, print_json};

pub async fn cmd_whoami(desk: &mut Desk) -> Result<()> {
    let session = desk.require_login().await?;
    let Some(user) = session.user else {
        anyhow::bail!("Not signed in");
    };
    desk.store.write(ResourceTag::Profile, user.clone());

    if desk.is_json() {
        return print_json(&user);
    }

    println!();
    println!("{}{}", PERSON, style(user.display_name()).bold());
    println!("  username  {}", user.username);
    if !user.email.is_empty() {
        println!("  email     {}", user.email);
    }
    let groups: Vec<&str> = user.groups.iter().filter_map(|g| g.name()).collect();
    if !groups.is_empty() {
        println!("  groups    {}", groups.join(", "));
    }
    println!(
        "  role      {}",
        if user_is_admin(&user) {
            "admin"
        } else if user.is_staff {
            "staff"
        } else {
            "member"
        }
    );
    println!();
    Ok(())
}

pub async fn cmd_profile(desk: &mut Desk, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Update {
            first_name,
            last_name,
            email,
        } => {
            desk.require_login().await?;
            let update = ProfileUpdate {
                first_name,
                last_name,
                email,
            };
            let result = desk
                .fetch("Saving profile...", desk.client.update_profile(&update))
                .await;
            match result {
                Ok(profile) => {
                    desk.mutated(Mutation::ProfileUpdated);
                    desk.notifier.notify(Toast::success("Profile updated"));
                    if desk.is_json() {
                        print_json(&profile)?;
                    }
                    Ok(())
                }
                Err(err) => {
                    desk.notifier.notify(Toast::error("Failed to update profile"));
                    Err(err)
                }
            }
        }
    }
}

pub async fn cmd_password(desk: &mut Desk, command: PasswordCommands) -> Result<()> {
    match command {
        PasswordCommands::Forgot { email } => {
            let request = PasswordResetRequest { email };
            desk.fetch(
                "Requesting reset link...",
                desk.client.request_password_reset(&request),
            )
            .await?;
            desk.notifier.notify(Toast::success(
                "If that address has an account, a reset link is on its way",
            ));
        }
        PasswordCommands::Reset {
            uid,
            token,
            password,
            confirm,
        } => {
            let confirm = PasswordResetConfirm {
                uid,
                token,
                new_password: password,
                confirm_password: confirm,
            };
            desk.fetch(
                "Resetting password...",
                desk.client.confirm_password_reset(&confirm),
            )
            .await?;
            desk.notifier
                .notify(Toast::success("Password reset. You can now log in"));
        }
    }
    Ok(())
}
