// src/api/simple_pagination.rs
//! Cursor pagination over an async page-fetching closure.

use super::responses::PaginatedResponse;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Calls `fetch_fn` with the page size and cursor until the API reports no
/// more results, or until `max_pages` pages were read.
pub async fn fetch_all_pages_simple<T, F, Fut>(
    mut fetch_fn: F,
    max_pages: Option<u32>,
) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(NOTION_API_PAGE_SIZE as u32, cursor).await?;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);
        pages_fetched += 1;

        if !has_more || cursor.is_none() {
            break;
        }
    }

    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(results: Vec<u32>, next: Option<&str>) -> PaginatedResponse<u32> {
        PaginatedResponse {
            object: "list".to_string(),
            results,
            next_cursor: next.map(String::from),
            has_more: next.is_some(),
        }
    }

    #[tokio::test]
    async fn test_follows_cursor_until_exhausted() {
        let mut seen = Vec::new();
        let items = fetch_all_pages_simple(
            |_, cursor| {
                seen.push(cursor.clone());
                let response = match cursor.as_deref() {
                    None => page(vec![1, 2], Some("b")),
                    Some("b") => page(vec![3], None),
                    Some(other) => panic!("unexpected cursor {}", other),
                };
                async move { Ok(response) }
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(seen, vec![None, Some("b".to_string())]);
    }

    #[tokio::test]
    async fn test_page_limit() {
        let items = fetch_all_pages_simple(
            |_, _| async { Ok(page(vec![7], Some("again"))) },
            Some(2),
        )
        .await
        .unwrap();
        assert_eq!(items, vec![7, 7]);
    }
}
