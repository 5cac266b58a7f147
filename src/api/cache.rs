// src/api/cache.rs
//! Disk cache for Notion API responses.
//!
//! Raw response bodies are stored per request with a TTL. A hit is parsed
//! by the same parsers as a live response, so the domain model itself is
//! never written to disk.

use super::client::{extract_response_text, page_query, query_body, ApiResponse, NotionHttpClient};
use super::parser;
use super::responses::PaginatedResponse;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::NotionId;
use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Disk cache
// ---------------------------------------------------------------------------

/// TTL-based file cache for raw API response strings.
///
/// Read and write failures count as misses.
pub struct DiskCache {
    cache_dir: PathBuf,
    ttl_secs: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    data: String,
    cached_at: u64,
}

impl DiskCache {
    /// Opens the cache in `$XDG_CACHE_HOME/notion2gdocs` (or `~/.cache/notion2gdocs`).
    ///
    /// Expired entries are purged on open.
    pub async fn new(ttl_secs: u64) -> Result<Self, std::io::Error> {
        Self::in_dir(Self::default_cache_dir(), ttl_secs).await
    }

    /// Opens a cache rooted at `cache_dir`.
    pub async fn in_dir(cache_dir: impl Into<PathBuf>, ttl_secs: u64) -> Result<Self, std::io::Error> {
        let cache_dir = cache_dir.into();
        tokio::fs::create_dir_all(&cache_dir).await?;
        let cache = Self {
            cache_dir,
            ttl_secs,
        };
        cache.purge_expired().await;
        Ok(cache)
    }

    fn default_cache_dir() -> PathBuf {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".cache")
            })
            .join("notion2gdocs")
    }

    /// Returns cached data if the entry exists and has not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let path = self.key_to_path(key);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        if now.saturating_sub(entry.cached_at) > self.ttl_secs {
            let _ = tokio::fs::remove_file(&path).await;
            return None;
        }
        Some(entry.data)
    }

    /// Stores data in the cache. Write errors are ignored.
    pub async fn set(&self, key: &str, data: &str) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let entry = CacheEntry {
            data: data.to_string(),
            cached_at: now,
        };
        if let Ok(json) = serde_json::to_string(&entry) {
            let _ = tokio::fs::write(self.key_to_path(key), json).await;
        }
    }

    /// Removes expired entries; failures leave the entry in place.
    async fn purge_expired(&self) {
        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs(),
            Err(_) => return,
        };

        let mut dir = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(d) => d,
            Err(_) => return,
        };

        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Ok(content) = tokio::fs::read_to_string(&path).await {
                if let Ok(cached) = serde_json::from_str::<CacheEntry>(&content) {
                    if now.saturating_sub(cached.cached_at) > self.ttl_secs {
                        let _ = tokio::fs::remove_file(&path).await;
                    }
                }
            }
        }
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.cache_dir
            .join(format!("{:016x}.json", hasher.finish()))
    }
}

// ---------------------------------------------------------------------------
// Cached Notion client
// ---------------------------------------------------------------------------

/// A [`NotionRepository`](super::NotionRepository) that answers from the
/// disk cache when it can and fills it otherwise.
pub struct CachedNotionClient {
    inner: NotionHttpClient,
    cache: DiskCache,
}

impl CachedNotionClient {
    pub fn new(inner: NotionHttpClient, cache: DiskCache) -> Self {
        Self { inner, cache }
    }

    /// Wraps `inner` with the default cache directory.
    pub async fn with_default_cache(
        inner: NotionHttpClient,
        ttl_secs: u64,
    ) -> Result<Self, AppError> {
        let cache = DiskCache::new(ttl_secs)
            .await
            .map_err(|e| AppError::InternalError {
                message: format!("Failed to initialize disk cache: {}", e),
                source: Some(Box::new(e)),
            })?;
        Ok(Self::new(inner, cache))
    }

    async fn cached_get(
        &self,
        cache_key: &str,
        endpoint: &str,
    ) -> Result<ApiResponse<String>, AppError> {
        if let Some(cached) = self.cache.get(cache_key).await {
            log::debug!("Cache hit: {}", cache_key);
            return Ok(cached_response(cached, cache_key));
        }

        log::debug!("Cache miss: {}", cache_key);
        let response = self.inner.get(endpoint, &[]).await?;
        let api_response = extract_response_text(response).await?;
        if api_response.status.is_success() {
            self.cache.set(cache_key, &api_response.data).await;
        }
        Ok(api_response)
    }

    /// Reads every page of a list endpoint, caching the raw page bodies
    /// together under `cache_key`.
    async fn cached_paginated<T, F, Fut>(
        &self,
        cache_key: &str,
        mut fetch_page: F,
    ) -> Result<Vec<T>, AppError>
    where
        F: FnMut(u32, Option<String>) -> Fut,
        Fut: Future<Output = Result<ApiResponse<String>, AppError>>,
        ApiResponse<String>: IntoPage<T>,
    {
        if let Some(cached) = self.cache.get(cache_key).await {
            log::debug!("Cache hit: {}", cache_key);
            let raw_pages: Vec<String> = serde_json::from_str(&cached)?;
            let mut items = Vec::new();
            for raw in raw_pages {
                items.extend(cached_response(raw, cache_key).into_page()?.results);
            }
            return Ok(items);
        }

        log::debug!("Cache miss: {}", cache_key);
        let mut items = Vec::new();
        let mut raw_pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let response = fetch_page(NOTION_API_PAGE_SIZE as u32, cursor).await?;
            let body = response.data.clone();
            let page = response.into_page()?;
            raw_pages.push(body);

            cursor = page.next_cursor;
            items.extend(page.results);
            if !page.has_more || cursor.is_none() {
                break;
            }
        }

        if let Ok(cache_data) = serde_json::to_string(&raw_pages) {
            self.cache.set(cache_key, &cache_data).await;
        }
        Ok(items)
    }
}

fn cached_response(data: String, cache_key: &str) -> ApiResponse<String> {
    ApiResponse {
        data,
        status: reqwest::StatusCode::OK,
        url: format!("cache://{}", cache_key),
    }
}

/// Parses one page of a list endpoint into domain values.
trait IntoPage<T> {
    fn into_page(self) -> Result<PaginatedResponse<T>, AppError>;
}

impl IntoPage<Block> for ApiResponse<String> {
    fn into_page(self) -> Result<PaginatedResponse<Block>, AppError> {
        parser::parse_blocks_pagination(self)
    }
}

impl IntoPage<Page> for ApiResponse<String> {
    fn into_page(self) -> Result<PaginatedResponse<Page>, AppError> {
        parser::parse_pages_pagination(self)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for CachedNotionClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let cache_key = format!("page_{}", id.as_str());
        let endpoint = format!("pages/{}", id.to_hyphenated());
        let result = self.cached_get(&cache_key, &endpoint).await?;
        parser::parse_page_response(result)
    }

    async fn retrieve_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError> {
        let cache_key = format!("children_{}", parent.as_str());
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        self.cached_paginated(&cache_key, |page_size, cursor| {
            let endpoint = endpoint.clone();
            async move {
                let response = self
                    .inner
                    .get(&endpoint, &page_query(page_size, cursor))
                    .await?;
                extract_response_text(response).await
            }
        })
        .await
    }

    async fn query_rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError> {
        let cache_key = format!("rows_{}", database.as_str());
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let mut pages: Vec<Page> = self
            .cached_paginated(&cache_key, |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let response = self
                        .inner
                        .post(&endpoint, &query_body(page_size, cursor))
                        .await?;
                    extract_response_text(response).await
                }
            })
            .await?;
        Page::sort_by_last_edited(&mut pages);
        Ok(pages)
    }
}
