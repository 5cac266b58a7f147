// src/docs/client.rs
//! HTTP client for the Google Docs REST API.
//!
//! Two calls are needed: `documents.get` for placement and
//! `documents.batchUpdate` to apply compiled operations.

use super::operation::{batch_update_body, Operation};
use super::snapshot::DocumentSnapshot;
use super::{DocumentStore, SubmitReceipt};
use crate::constants::{DOCS_API_BASE_URL, ERROR_BODY_PREVIEW_LENGTH};
use crate::error::AppError;
use crate::types::{AccessToken, DocumentId};
use reqwest::{header, Client, Response};
use serde::Deserialize;

/// A thin wrapper around reqwest Client for Google Docs requests.
#[derive(Clone)]
pub struct DocsHttpClient {
    client: Client,
    base_url: String,
}

impl DocsHttpClient {
    /// Creates a new HTTP client authenticated with a bearer token.
    pub fn new(token: &AccessToken) -> Result<Self, AppError> {
        Self::with_base_url(token, DOCS_API_BASE_URL)
    }

    /// Same as [`DocsHttpClient::new`] against another endpoint, e.g. a local emulator.
    pub fn with_base_url(token: &AccessToken, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(token)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_headers(token: &AccessToken) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", token.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid access token format: {}", e))
            })?,
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn document_url(&self, document: &DocumentId) -> String {
        format!("{}/{}", self.base_url, document.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    write_control: Option<WriteControl>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteControl {
    required_revision_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turns a non-success response into `AppError::DocsService`.
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect(),
    };
    Err(AppError::DocsService {
        status: status.as_u16(),
        message,
    })
}

#[async_trait::async_trait]
impl DocumentStore for DocsHttpClient {
    async fn snapshot(&self, document: &DocumentId) -> Result<DocumentSnapshot, AppError> {
        let url = self.document_url(document);
        log::debug!("GET {}", url);

        let response = check_status(self.client.get(url).send().await?).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to parse document {}: {}", document, e);
            AppError::MalformedResponse(format!("document {}: {}", document, e))
        })
    }

    async fn submit(
        &self,
        document: &DocumentId,
        operations: &[Operation],
    ) -> Result<SubmitReceipt, AppError> {
        let url = format!("{}:batchUpdate", self.document_url(document));
        log::debug!("POST {} ({} requests)", url, operations.len());

        let body = batch_update_body(operations);
        let response = check_status(self.client.post(url).json(&body).send().await?).await?;
        let text = response.text().await?;
        let parsed: BatchUpdateResponse = serde_json::from_str(&text)?;

        Ok(SubmitReceipt {
            revision_id: parsed
                .write_control
                .and_then(|control| control.required_revision_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url_trims_trailing_slash() {
        let token = AccessToken::new("ya29.test-token").unwrap();
        let client = DocsHttpClient::with_base_url(&token, "http://localhost:8080/v1/documents/")
            .unwrap();
        let document = DocumentId::parse("1AbCdEfGhIjKlMnOpQrStUvWxYz").unwrap();
        assert_eq!(
            client.document_url(&document),
            "http://localhost:8080/v1/documents/1AbCdEfGhIjKlMnOpQrStUvWxYz"
        );
    }

    #[test]
    fn test_write_control_revision_is_read() {
        let parsed: BatchUpdateResponse = serde_json::from_str(
            r#"{"documentId":"d","replies":[{}],"writeControl":{"requiredRevisionId":"ALm3"}}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.write_control.and_then(|c| c.required_revision_id),
            Some("ALm3".to_string())
        );
    }
}
