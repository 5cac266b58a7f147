// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// API key for Notion API authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        // Validate API key format
        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact API key in display
        write!(f, "{}...", &self.0[..10])
    }
}

/// OAuth bearer token for the Google Docs API.
///
/// Obtaining and refreshing the token is left to the caller
/// (`gcloud auth print-access-token` or any OAuth helper).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into().trim().to_string();

        if token.is_empty() {
            return Err(ValidationError::InvalidAccessToken {
                reason: "token cannot be empty".to_string(),
            });
        }

        if token.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidAccessToken {
                reason: "token must not contain whitespace".to_string(),
            });
        }

        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

/// Identifier of a Google Docs document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    const MIN_LEN: usize = 20;

    /// Accepts a bare document ID or a `docs.google.com/document/d/<id>/...` URL.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();

        let candidate = if input.starts_with("http://") || input.starts_with("https://") {
            Self::extract_from_url(input)?
        } else {
            input.to_string()
        };

        if candidate.len() < Self::MIN_LEN {
            return Err(ValidationError::InvalidDocumentId {
                id: candidate,
                reason: format!("expected at least {} characters", Self::MIN_LEN),
            });
        }

        if !candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidDocumentId {
                id: candidate,
                reason: "only letters, digits, '-' and '_' are allowed".to_string(),
            });
        }

        Ok(Self(candidate))
    }

    fn extract_from_url(input: &str) -> Result<String, ValidationError> {
        let url = Url::parse(input).map_err(|e| ValidationError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        let mut segments = url.path_segments().into_iter().flatten();
        while let Some(segment) = segments.next() {
            if segment == "d" {
                if let Some(id) = segments.next() {
                    return Ok(id.to_string());
                }
            }
        }

        Err(ValidationError::InvalidUrl {
            url: input.to_string(),
            reason: "no /d/<document id> segment".to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a property on a Notion page or database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyName(String);

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
