use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

lazy_static::lazy_static! {
    /// A 32-digit or dashed UUID closing a URL path segment (`Title-<id>` or `/<id>`).
    static ref URL_ID: Regex = Regex::new(
        r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
    ).expect("URL id pattern is valid");
}

/// Reduces a raw ID, dashed UUID or notion.so URL to 32 lowercase hex digits.
fn normalize(input: &str) -> Result<String, ValidationError> {
    let cleaned = input.trim().trim_end_matches('/');
    if cleaned.is_empty() {
        return Err(ValidationError::InvalidId("empty ID".to_string()));
    }

    if let Ok(uuid) = Uuid::try_parse(cleaned) {
        return Ok(uuid.as_simple().to_string());
    }

    if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
        let path = cleaned.split(['?', '#']).next().unwrap_or(cleaned);
        return URL_ID
            .captures(path)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().replace('-', "").to_lowercase())
            .ok_or_else(|| ValidationError::InvalidId(format!("No Notion ID in URL: {}", input)));
    }

    Err(ValidationError::InvalidId(format!(
        "Expected 32 hex digits, a UUID or a Notion URL, got: {}",
        input
    )))
}

/// 8-4-4-4-12 form of a normalized ID.
fn hyphenate(hex: &str) -> String {
    if hex.len() != 32 {
        return hex.to_string();
    }
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// An ID tagged with the kind of object it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _kind: PhantomData<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockMarker;

pub type PageId = Id<PageMarker>;
pub type BlockId = Id<BlockMarker>;

impl<T> Id<T> {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        normalize(input).map(Self::wrap)
    }

    fn wrap(value: String) -> Self {
        Self {
            value,
            _kind: PhantomData,
        }
    }

    /// A fresh random ID, for blocks built locally rather than fetched.
    pub fn new_v4() -> Self {
        Self::wrap(Uuid::new_v4().as_simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The dashed form Notion shows to users, and the form page markers carry.
    pub fn to_dashed(&self) -> String {
        hyphenate(&self.value)
    }

    pub fn notion_url(&self) -> String {
        format!("https://www.notion.so/{}", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// An ID whose object kind is not known, or does not matter, to the caller.
///
/// Repository calls take these: a block ID doubles as the parent of its
/// children and a child database block shares its ID with the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotionId(String);

impl NotionId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        normalize(input).map(NotionId)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dashed form expected in API paths.
    pub fn to_hyphenated(&self) -> String {
        hyphenate(&self.0)
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NotionId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl<T> From<Id<T>> for NotionId {
    fn from(id: Id<T>) -> Self {
        NotionId(id.value)
    }
}

impl<T> From<&Id<T>> for NotionId {
    fn from(id: &Id<T>) -> Self {
        NotionId(id.value.clone())
    }
}
