use thiserror::Error;

mod colors;
mod domain_types;
mod ids;
mod rich_text;

pub use colors::*;
pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid Google access token: {reason}")]
    InvalidAccessToken { reason: String },

    #[error("Invalid Google document ID: {id} - {reason}")]
    InvalidDocumentId { id: String, reason: String },
}
