// tests/api_parsing.rs
//! Raw API bodies through the parsers into the domain model.

use notion2gdocs::api::client::ApiResponse;
use notion2gdocs::{parse_blocks_pagination, AppError, Block, NotionClientError};
use reqwest::StatusCode;

fn ok(body: &str) -> ApiResponse<String> {
    ApiResponse {
        data: body.to_string(),
        status: StatusCode::OK,
        url: "https://api.notion.com/v1/blocks/abc/children".to_string(),
    }
}

const ANNOTATIONS_PLAIN: &str = r#"{"bold": false, "italic": false, "strikethrough": false, "underline": false, "code": false, "color": "default"}"#;
const ANNOTATIONS_BOLD: &str = r#"{"bold": true, "italic": false, "strikethrough": false, "underline": false, "code": false, "color": "default"}"#;

fn text_item(content: &str, annotations: &str) -> String {
    format!(
        r#"{{
            "type": "text",
            "text": {{"content": "{content}", "link": null}},
            "annotations": {annotations},
            "plain_text": "{content}",
            "href": null
        }}"#
    )
}

#[test]
fn test_mixed_children_page() {
    let body = format!(
        r#"{{
            "object": "list",
            "results": [
                {{
                    "object": "block",
                    "id": "216cd412-8533-8087-a989-cf37889137c3",
                    "type": "paragraph",
                    "paragraph": {{"rich_text": [{}, {}], "color": "default"}},
                    "has_children": true,
                    "archived": false
                }},
                {{
                    "object": "block",
                    "id": "316cd412-8533-8087-a989-cf37889137c4",
                    "type": "to_do",
                    "to_do": {{"rich_text": [{}], "checked": true, "color": "default"}},
                    "has_children": false,
                    "archived": false
                }},
                {{
                    "object": "block",
                    "id": "416cd412-8533-8087-a989-cf37889137c5",
                    "type": "breadcrumb",
                    "breadcrumb": {{}},
                    "has_children": false,
                    "archived": false
                }}
            ],
            "next_cursor": null,
            "has_more": false,
            "type": "block",
            "block": {{}}
        }}"#,
        text_item("Ship the ", ANNOTATIONS_PLAIN),
        text_item("importer", ANNOTATIONS_BOLD),
        text_item("Write docs", ANNOTATIONS_PLAIN),
    );

    let page = parse_blocks_pagination(ok(&body)).unwrap();
    assert!(!page.has_more);
    assert_eq!(page.results.len(), 3);

    match &page.results[0] {
        Block::Paragraph(paragraph) => {
            let spans = &paragraph.content.rich_text;
            assert_eq!(spans.len(), 2);
            assert_eq!(spans[0].plain_text, "Ship the ");
            assert!(spans[1].annotations.bold);
            assert!(paragraph.common.has_children);
            assert_eq!(
                paragraph.common.id.as_str(),
                "216cd41285338087a989cf37889137c3"
            );
        }
        other => panic!("Expected paragraph, got {:?}", other),
    }

    match &page.results[1] {
        Block::ToDo(todo) => assert!(todo.checked),
        other => panic!("Expected to_do, got {:?}", other),
    }

    assert!(matches!(page.results[2], Block::Unsupported(_)));
    assert_eq!(page.results[2].block_type(), "breadcrumb");
}

#[test]
fn test_rate_limit_is_retryable() {
    let body = r#"{
        "object": "error",
        "status": 429,
        "code": "rate_limited",
        "message": "You have been rate limited.",
        "request_id": "req_429"
    }"#;
    let response = ApiResponse {
        data: body.to_string(),
        status: StatusCode::TOO_MANY_REQUESTS,
        url: "https://api.notion.com/v1/blocks/abc/children".to_string(),
    };

    match parse_blocks_pagination(response) {
        Err(error @ AppError::NotionClient(NotionClientError::NotionApi { .. })) => {
            assert!(error.is_retryable())
        }
        other => panic!("Expected NotionApi error, got {:?}", other),
    }
}

#[test]
fn test_malformed_body_keeps_a_preview() {
    match parse_blocks_pagination(ok("{\"object\": \"list\", \"results\": 7}")) {
        Err(AppError::NotionClient(NotionClientError::Deserialization { body, .. })) => {
            assert!(body.contains("\"results\": 7"))
        }
        other => panic!("Expected deserialization error, got {:?}", other),
    }
}
