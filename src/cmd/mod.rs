//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|-----------------------------------------------------|
//! | `config`        | `Config`                                           |
//! | `account`       | `Whoami`, `Profile`, `Password`                    |
//! | `board`         | `Board`, `List`, `Card`                            |
//! | `tasks`         | `Tasks`, `Reassign`                                |
//! | `documents`     | `Docs`                                             |
//! | `careers`       | `Applications`, `Jobs`                             |
//! | `appointments`  | `Appointments`                                     |
//! | `content`       | `Posts`, `Projects`, `Service`                     |
//! | `leads`         | `Contact`, `Proposal`, `Testimonial`               |
//! | `price`         | `Price`                                            |
//!
//! Everything that talks to the backend goes through [`Desk`], which holds
//! the client, the toast sink and the resource cache for one invocation.

pub mod account;
pub mod appointments;
pub mod board;
pub mod careers;
pub mod config;
pub mod content;
pub mod documents;
pub mod leads;
pub mod price;
pub mod tasks;

pub use account::{cmd_password, cmd_profile, cmd_whoami};
pub use appointments::cmd_appointments;
pub use board::{cmd_board, cmd_card, cmd_list};
pub use careers::{cmd_applications, cmd_jobs};
pub use config::cmd_config;
pub use content::{cmd_posts, cmd_projects, cmd_service};
pub use documents::cmd_docs;
pub use leads::{cmd_contact, cmd_proposal, cmd_testimonial};
pub use price::cmd_price;
pub use tasks::{cmd_reassign, cmd_tasks};

use std::future::Future;
use std::sync::Arc;

use anyhow::{Result, bail};
use serde::Serialize;

use agency_desk::ApiClient;
use agency_desk::admin::{AccessDecision, AdminGate, Session};
use agency_desk::config::DeskConfig;
use agency_desk::errors::ApiError;
use agency_desk::kanban::TaskBackend;
use agency_desk::models::{Board, User};
use agency_desk::notify::{ConsoleNotifier, Notifier};
use agency_desk::pagination::Pagination;
use agency_desk::store::{AppStore, Mutation, ResourceTag};
use agency_desk::ui::OutputMode;
use agency_desk::ui::render::render_pagination;
use agency_desk::ui::spinner::with_spinner;

/// Per-invocation context shared by the backend commands.
pub struct Desk {
    pub config: DeskConfig,
    pub client: Arc<ApiClient>,
    pub notifier: Arc<dyn Notifier>,
    pub store: AppStore,
    pub output: OutputMode,
    pub assume_yes: bool,
}

impl Desk {
    pub fn new(config: DeskConfig, output: &str, assume_yes: bool) -> Result<Self> {
        let client = Arc::new(ApiClient::from_config(&config)?);
        Ok(Self {
            config,
            client,
            notifier: Arc::new(ConsoleNotifier),
            store: AppStore::default(),
            output: OutputMode::parse(output),
            assume_yes,
        })
    }

    /// Run a request with a spinner.
    pub async fn fetch<T, F>(&self, message: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        Ok(with_spinner(message, fut).await?)
    }

    /// Resolve the signed-in user, once per invocation.
    pub async fn require_login(&mut self) -> Result<Session> {
        if !self.store.session().is_authenticated() {
            if !self.client.has_token() {
                return Err(ApiError::NotAuthenticated.into());
            }
            let session = self.fetch("Signing in...", self.client.session()).await?;
            self.store.set_session(session);
        }
        Ok(self.store.session().clone())
    }

    /// Gate for dashboard commands. Re-checks admin status every call.
    pub async fn require_admin(&mut self) -> Result<Session> {
        let session = match self.require_login().await {
            Ok(session) => session,
            Err(err)
                if matches!(
                    err.downcast_ref::<ApiError>(),
                    Some(ApiError::NotAuthenticated)
                ) =>
            {
                Session::anonymous()
            }
            Err(err) => return Err(err),
        };
        let gate = AdminGate::new(self.client.clone(), self.notifier.clone());
        let decision = gate.enforce(&session).await?;
        admit(session, decision)
    }

    pub async fn boards(&mut self) -> Result<Vec<Board>> {
        if let Some(boards) = self.store.read::<Vec<Board>>(ResourceTag::Boards) {
            return Ok(boards.clone());
        }
        let boards = self
            .fetch("Loading boards...", self.client.list_boards())
            .await?;
        self.store.write(ResourceTag::Boards, boards.clone());
        Ok(boards)
    }

    pub async fn users(&mut self) -> Result<Vec<User>> {
        if let Some(users) = self.store.read::<Vec<User>>(ResourceTag::Users) {
            return Ok(users.clone());
        }
        let users = self
            .fetch("Loading users...", self.client.list_users())
            .await?;
        self.store.write(ResourceTag::Users, users.clone());
        Ok(users)
    }

    pub fn mutated(&mut self, mutation: Mutation) {
        self.store.apply(mutation);
    }

    /// Ask before a destructive action unless `--yes` or `force` was given.
    pub fn confirm(&self, prompt: &str, force: bool) -> bool {
        if force || self.assume_yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    pub fn is_json(&self) -> bool {
        self.output == OutputMode::Json
    }

    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or_else(|| self.config.items_per_page())
    }
}

/// Turn the gate's decision into the command outcome.
fn admit(session: Session, decision: AccessDecision) -> Result<Session> {
    match decision {
        AccessDecision::Granted => Ok(session),
        AccessDecision::LoginRequired { redirect_to } => {
            bail!("Login required (see {}). Set AGENCY_API_TOKEN or api.token", redirect_to)
        }
        AccessDecision::Denied { .. } => bail!("Admin access required"),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one page of `items` with `line`, followed by the pager.
pub fn print_page<T>(items: &[T], page: usize, per_page: usize, line: impl Fn(&T) -> String) {
    let mut pagination = Pagination::new(1, items.len(), per_page);
    pagination.go_to(page);
    for item in pagination.slice(items) {
        println!("{}", line(item));
    }
    println!();
    println!("{}", render_pagination(&pagination));
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_desk::admin::{HOME_ROUTE, LOGIN_ROUTE};

    #[test]
    fn test_granted_keeps_the_session() {
        let session = Session::anonymous();
        assert!(admit(session, AccessDecision::Granted).is_ok());
    }

    #[test]
    fn test_login_required_fails_the_command() {
        let decision = AccessDecision::LoginRequired {
            redirect_to: LOGIN_ROUTE.to_string(),
        };
        let err = admit(Session::anonymous(), decision).unwrap_err().to_string();
        assert!(err.starts_with("Login required (see /login)"), "{}", err);
    }

    #[test]
    fn test_denied_fails_the_command() {
        let decision = AccessDecision::Denied {
            redirect_to: HOME_ROUTE.to_string(),
        };
        let err = admit(Session::anonymous(), decision).unwrap_err().to_string();
        assert_eq!(err, "Admin access required");
    }
}
