//! Access gate in front of the admin commands.
//!
//! The check is a UI hint only. A user who passes the gate can still be
//! refused by the backend, and the gate never caches a result: every mount
//! asks `AdminCheck` again.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::models::{Id, User};
use crate::notify::{Notifier, Toast};

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";
pub const ADMIN_GROUP: &str = "Admin";

/// Who is using the client: the API token and the user it resolved to.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn user_id(&self) -> Option<Id> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Answers "is this user an admin?".
#[async_trait]
pub trait AdminCheck: Send + Sync {
    async fn is_admin(&self, user_id: Id) -> Result<bool, ApiError>;
}

/// Admin when the user is a superuser or belongs to the `Admin` group.
pub fn user_is_admin(user: &User) -> bool {
    user.is_superuser || user.in_group(ADMIN_GROUP)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    LoginRequired { redirect_to: String },
    Denied { redirect_to: String },
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Pacing between the denial toast, the redirect toast and the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectDelays {
    pub before_notice: Duration,
    pub before_redirect: Duration,
}

impl Default for RedirectDelays {
    fn default() -> Self {
        Self {
            before_notice: Duration::from_secs(1),
            before_redirect: Duration::from_secs(2),
        }
    }
}

impl RedirectDelays {
    pub fn none() -> Self {
        Self {
            before_notice: Duration::ZERO,
            before_redirect: Duration::ZERO,
        }
    }
}

pub struct AdminGate<C: AdminCheck> {
    check: Arc<C>,
    notifier: Arc<dyn Notifier>,
    delays: RedirectDelays,
}

impl<C: AdminCheck> AdminGate<C> {
    pub fn new(check: Arc<C>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            check,
            notifier,
            delays: RedirectDelays::default(),
        }
    }

    pub fn with_delays(mut self, delays: RedirectDelays) -> Self {
        self.delays = delays;
        self
    }

    pub async fn enforce(&self, session: &Session) -> Result<AccessDecision, ApiError> {
        let Some(user_id) = session.user_id().filter(|_| session.is_authenticated()) else {
            self.notifier
                .notify(Toast::warning("Please log in to access the dashboard"));
            return Ok(AccessDecision::LoginRequired {
                redirect_to: LOGIN_ROUTE.to_string(),
            });
        };

        let is_admin = match self.check.is_admin(user_id).await {
            Ok(is_admin) => is_admin,
            Err(err) => {
                self.notifier.notify(Toast::error(format!(
                    "Error checking permissions: {}",
                    err.toast_message()
                )));
                return Err(err);
            }
        };

        if is_admin {
            debug!(user = user_id, "admin access granted");
            return Ok(AccessDecision::Granted);
        }

        info!(user = user_id, "admin access denied");
        self.notifier
            .notify(Toast::warning("You do not have permission to access this page"));
        tokio::time::sleep(self.delays.before_notice).await;
        self.notifier.notify(Toast::info("Redirecting to the home page..."));
        tokio::time::sleep(self.delays.before_redirect).await;

        Ok(AccessDecision::Denied {
            redirect_to: HOME_ROUTE.to_string(),
        })
    }
}
