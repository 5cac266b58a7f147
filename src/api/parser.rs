// src/api/parser.rs
//! Turns raw response text into domain values.
//!
//! Successful bodies go through notion-client's serde types; error bodies
//! become `NotionClientError::NotionApi` when Notion sent its error object,
//! and `AppError::NotionService` otherwise.

use super::client::ApiResponse;
use super::responses::{
    NotionError, NotionPage, PaginatedResponse, QueryDatabaseResponse,
    RetrieveBlockChildrenResponse, ToDomain,
};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionClientError, NotionErrorCode};
use crate::model::{Block, Page};
use reqwest::StatusCode;

/// Parse any Notion API response
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        parse_error(&result.data, result.status, &result.url)
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        NotionClientError::Deserialization {
            source: e,
            body: preview(body),
        }
        .into()
    })
}

fn parse_error<T>(body: &str, status: StatusCode, url: &str) -> Result<T, AppError> {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return Err(NotionClientError::NotionApi {
            status: notion_error.status,
            code: notion_error.code,
            message: notion_error.message,
            request_id: notion_error.request_id,
        }
        .into());
    }

    Err(AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    })
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

pub fn parse_page_response(result: ApiResponse<String>) -> Result<Page, AppError> {
    let notion_page: NotionPage = parse_api_response(result)?;
    notion_page.to_domain()
}

/// One page of database rows.
pub fn parse_pages_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Page>, AppError> {
    let response: QueryDatabaseResponse = parse_api_response(result)?;
    response.try_map(ToDomain::to_domain)
}

/// One page of block children.
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    response.try_map(ToDomain::to_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.notion.com/v1/pages/abc".to_string(),
        }
    }

    #[test]
    fn test_notion_error_body_is_kept() {
        let body = r#"{
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find page with ID: abc123",
            "request_id": "req_123"
        }"#;

        let result = parse_page_response(response(StatusCode::NOT_FOUND, body));
        match result {
            Err(AppError::NotionClient(NotionClientError::NotionApi { code, status, .. })) => {
                assert_eq!(code, "object_not_found");
                assert_eq!(status, 404);
            }
            other => panic!("Expected NotionApi error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_error_body_maps_status() {
        let result = parse_page_response(response(StatusCode::BAD_GATEWAY, "<html>bad</html>"));
        match result {
            Err(error @ AppError::NotionService { .. }) => assert!(error.is_retryable()),
            other => panic!("Expected NotionService error, got {:?}", other),
        }
    }

    #[test]
    fn test_block_children_page() {
        let body = r#"{
            "object": "list",
            "results": [
                {
                    "object": "block",
                    "id": "c02fc1d3-db8b-45c5-a222-27595b15aea7",
                    "type": "divider",
                    "divider": {},
                    "has_children": false,
                    "archived": false
                }
            ],
            "next_cursor": "cursor-2",
            "has_more": true,
            "type": "block",
            "block": {}
        }"#;

        let page = parse_blocks_pagination(response(StatusCode::OK, body)).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].block_type(), "divider");
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
        assert!(page.has_more);
    }
}
