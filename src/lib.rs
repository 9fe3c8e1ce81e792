pub mod admin;
pub mod api;
pub mod config;
pub mod currency;
pub mod documents;
pub mod errors;
pub mod kanban;
pub mod leads;
pub mod logging;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod store;
pub mod ui;

pub use api::ApiClient;
pub use errors::{ApiError, ValidationError};
