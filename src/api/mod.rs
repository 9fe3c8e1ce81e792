//! HTTP client for the agency REST backend.
//!
//! ## Overview
//!
//! `ApiClient` wraps a `reqwest::Client` with the one base URL and the one
//! auth scheme (`Authorization: Token <token>`) every call uses. Resource
//! groups live in submodules that extend `ApiClient` with typed methods:
//!
//! | Module         | Paths                                             |
//! |----------------|---------------------------------------------------|
//! | `tasks`        | `/task/boards/`, `/task/lists/`, `/task/cards/`, `/task/users/` |
//! | `documents`    | `/task/staff-documents/`                          |
//! | `careers`      | `/careers/jobs/`, `/careers/job-applications/`    |
//! | `appointments` | `/appointments/appointments/`                     |
//! | `content`      | `/blog/blogs/`, `/project/projects/`, `/services/`, `/testimonials/` |
//! | `leads`        | `/contact/contacts/`, `/proposal/proposals/`      |
//! | `account`      | `/account/profile/me/`, `/account/users/`, `/account/password-reset/` |
//!
//! Nothing here retries. A failure is returned to the caller, which shows an
//! error toast and leaves its state as it was.

pub mod account;
pub mod appointments;
pub mod careers;
pub mod content;
pub mod documents;
pub mod leads;
pub mod tasks;

use std::time::Duration;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DeskConfig;
use crate::errors::{ApiError, extract_server_message};

const USER_AGENT: &str = concat!("agency-desk/", env!("CARGO_PKG_VERSION"));

/// A collection response is either a bare JSON array or a DRF page object
/// with the items under `results`. Decoding the items on their own keeps the
/// serde error pointing at the offending value.
fn listing_items<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    let items = match value {
        Value::Object(mut page) => page.remove("results").unwrap_or(Value::Object(page)),
        other => other,
    };
    serde_json::from_value(items)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ApiError::Transport {
                path: base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn from_config(config: &DeskConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.token.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        debug!(method = %method, path, "request");

        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| {
            warn!(method = %method, path, error = %source, "transport failure");
            if source.is_timeout() {
                ApiError::Timeout {
                    path: path.to_string(),
                }
            } else {
                ApiError::Transport {
                    path: path.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_server_message(&body);
        warn!(method = %method, path, status = status.as_u16(), %message, "backend error");
        Err(ApiError::Http {
            status: status.as_u16(),
            path: path.to_string(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        let text = response.text().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::decode(path, response).await
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ApiError> {
        let value: Value = self.get_json(path).await?;
        listing_items(value).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(path, response).await
    }

    /// POST where the response body is not needed (actions, lead forms).
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(Method::POST, path, Some(body)).await.map(drop)
    }

    pub(crate) async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        Self::decode(path, response).await
    }

    pub(crate) async fn patch_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(Method::PATCH, path, Some(body)).await.map(drop)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, None).await.map(drop)
    }
}
