// src/api/client.rs
//! Thin HTTP wrapper for the Notion API.
//!
//! Handles authentication and raw requests; parsing lives in `parser`.

use super::simple_pagination::fetch_all_pages_simple;
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{ApiKey, NotionId};
use reqwest::{header, Client, Response};
use serde::Serialize;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A reqwest client carrying the Notion authentication headers.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
}

impl NotionHttpClient {
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self { client })
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );
        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// GET `endpoint` (relative to the API base), with optional query pairs.
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", API_BASE_URL, endpoint);
        log::debug!("GET {} {:?}", url, query);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// POST a JSON body to `endpoint`.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", API_BASE_URL, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

/// Query pairs for one page of a GET list endpoint.
pub(super) fn page_query(page_size: u32, cursor: Option<String>) -> Vec<(&'static str, String)> {
    let mut query = vec![("page_size", page_size.to_string())];
    if let Some(cursor) = cursor {
        query.push(("start_cursor", cursor));
    }
    query
}

/// JSON body for one page of a database query.
pub(super) fn query_body(page_size: u32, cursor: Option<String>) -> serde_json::Value {
    let mut body = serde_json::json!({ "page_size": page_size });
    if let Some(cursor) = cursor {
        body["start_cursor"] = serde_json::json!(cursor);
    }
    body
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let endpoint = format!("pages/{}", id.to_hyphenated());
        let response = self.get(&endpoint, &[]).await?;
        let result = extract_response_text(response).await?;
        super::parser::parse_page_response(result)
    }

    async fn retrieve_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        fetch_all_pages_simple(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let response = self.get(&endpoint, &page_query(page_size, cursor)).await?;
                    let result = extract_response_text(response).await?;
                    super::parser::parse_blocks_pagination(result)
                }
            },
            None,
        )
        .await
    }

    async fn query_rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let mut pages = fetch_all_pages_simple(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let response = self.post(&endpoint, &query_body(page_size, cursor)).await?;
                    let result = extract_response_text(response).await?;
                    super::parser::parse_pages_pagination(result)
                }
            },
            None,
        )
        .await?;
        Page::sort_by_last_edited(&mut pages);
        Ok(pages)
    }
}

/// Response body with the status and URL it came from.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Reads the body of `response` as text, keeping status and URL.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
