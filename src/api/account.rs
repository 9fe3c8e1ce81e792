use async_trait::async_trait;

use super::ApiClient;
use crate::admin::{AdminCheck, Session, user_is_admin};
use crate::errors::{ApiError, ValidationError};
use crate::leads::{PasswordResetConfirm, PasswordResetRequest, is_valid_email};
use crate::models::{Id, Profile, ProfileUpdate, User};

const PROFILE: &str = "/account/profile/me/";

impl ApiClient {
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        if !self.has_token() {
            return Err(ApiError::NotAuthenticated);
        }
        self.get_json(PROFILE).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        if update.is_empty() {
            return Err(ValidationError::new("profile", "Nothing to update").into());
        }
        if let Some(email) = &update.email {
            if !is_valid_email(email) {
                return Err(
                    ValidationError::new("email", "Please enter a valid email address").into(),
                );
            }
        }
        self.patch_json(PROFILE, update).await
    }

    pub async fn get_user(&self, id: Id) -> Result<User, ApiError> {
        self.get_json(&format!("/account/users/{}/", id)).await
    }

    /// Resolve the token into a session. Without a token the session is
    /// anonymous and no request is made.
    pub async fn session(&self) -> Result<Session, ApiError> {
        let Some(token) = self.token.clone() else {
            return Ok(Session::anonymous());
        };
        let user = self.profile().await?;
        Ok(Session::new(token, user))
    }

    pub async fn request_password_reset(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<(), ApiError> {
        request.validate()?;
        self.post_unit("/account/password-reset/", request).await
    }

    pub async fn confirm_password_reset(
        &self,
        confirm: &PasswordResetConfirm,
    ) -> Result<(), ApiError> {
        confirm.validate()?;
        self.post_unit("/account/password-reset/confirm/", confirm)
            .await
    }
}

#[async_trait]
impl AdminCheck for ApiClient {
    async fn is_admin(&self, user_id: Id) -> Result<bool, ApiError> {
        let user = self.get_user(user_id).await?;
        Ok(user_is_admin(&user))
    }
}
