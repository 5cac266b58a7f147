// src/config.rs
use crate::error::AppError;
use crate::transfer::{SubmissionPolicy, TransferOptions};
use crate::types::{AccessToken, ApiKey, DocumentId, NotionId, PageId};
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_LEDGER_PATH: &str = "notion2gdocs-ledger.json";

/// Parsed command-line input.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion page URLs or IDs to transfer
    pub pages: Vec<String>,

    /// Transfer every row of this database (falls back to NOTION_DATABASE_ID)
    #[arg(long)]
    pub database: Option<String>,

    /// Print the rows of the database and exit
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Destination Google Docs document ID or URL (overrides GOOGLE_DOC_ID)
    #[arg(long)]
    pub document: Option<String>,

    /// Submit one batchUpdate per top-level block instead of one per page
    #[arg(long, default_value_t = false)]
    pub per_block: bool,

    /// Also transfer the row pages of linked databases found on each page
    #[arg(long, default_value_t = false)]
    pub follow_child_databases: bool,

    /// List linked-database rows under the database title
    #[arg(long, default_value_t = false)]
    pub database_rows: bool,

    /// Leave tables out instead of writing document tables
    #[arg(long = "no-tables", default_value_t = false)]
    pub no_tables: bool,

    /// Compile without touching Google Docs and print the batchUpdate JSON
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// File for the --dry-run output (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Disable response caching (always fetch fresh data)
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Cache TTL in seconds
    #[arg(long, default_value_t = 300)]
    pub cache_ttl: u64,

    /// Where page positions are remembered between runs
    #[arg(long)]
    pub ledger: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// What the run does once configured.
#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    Transfer,
    /// Compile only; write operations to `output` or stdout.
    DryRun { output: Option<PathBuf> },
    /// Print the rows of the database.
    List,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub api_key: ApiKey,
    /// Absent only for dry runs and listings.
    pub access_token: Option<AccessToken>,
    /// Absent only for dry runs and listings.
    pub document: Option<DocumentId>,
    pub pages: Vec<PageId>,
    pub database: Option<NotionId>,
    pub mode: RunMode,
    pub options: TransferOptions,
    pub no_cache: bool,
    pub cache_ttl: u64,
    pub ledger_path: PathBuf,
    pub verbose: bool,
}

impl TransferConfig {
    /// Resolves the configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves against an arbitrary variable lookup.
    pub fn resolve_with(
        cli: CommandLineInput,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let require = |name: &str| {
            env(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    AppError::MissingConfiguration(format!(
                        "{} environment variable not set",
                        name
                    ))
                })
        };

        let mode = if cli.list {
            RunMode::List
        } else if cli.dry_run {
            RunMode::DryRun {
                output: cli.output.map(PathBuf::from),
            }
        } else {
            RunMode::Transfer
        };

        let api_key = ApiKey::new(require("NOTION_API_KEY")?)?;

        let database = cli
            .database
            .or_else(|| env("NOTION_DATABASE_ID").filter(|value| !value.trim().is_empty()))
            .map(|raw| NotionId::parse(&raw))
            .transpose()?;

        let pages = cli
            .pages
            .iter()
            .map(|raw| PageId::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        match mode {
            RunMode::List if database.is_none() => {
                return Err(AppError::MissingConfiguration(
                    "--list needs --database or NOTION_DATABASE_ID".to_string(),
                ))
            }
            RunMode::Transfer | RunMode::DryRun { .. } if pages.is_empty() && database.is_none() => {
                return Err(AppError::MissingConfiguration(
                    "Nothing to transfer: pass page IDs or --database".to_string(),
                ))
            }
            _ => {}
        }

        let (access_token, document) = if mode == RunMode::Transfer {
            let token = AccessToken::new(require("GOOGLE_ACCESS_TOKEN")?)?;
            let raw_document = match cli.document {
                Some(document) => document,
                None => require("GOOGLE_DOC_ID")?,
            };
            (Some(token), Some(DocumentId::parse(&raw_document)?))
        } else {
            (None, None)
        };

        let policy = if cli.per_block {
            SubmissionPolicy::PerBlock
        } else {
            SubmissionPolicy::Batched
        };

        Ok(TransferConfig {
            api_key,
            access_token,
            document,
            pages,
            database,
            mode,
            options: TransferOptions {
                policy,
                follow_child_databases: cli.follow_child_databases,
                structural_tables: !cli.no_tables,
                // Following rows needs them fetched.
                include_database_rows: cli.database_rows || cli.follow_child_databases,
            },
            no_cache: cli.no_cache,
            cache_ttl: cli.cache_ttl,
            ledger_path: cli
                .ledger
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH)),
            verbose: cli.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const PAGE: &str = "https://www.notion.so/Plan-1234567890abcdef1234567890abcdef";

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn full_env() -> impl Fn(&str) -> Option<String> {
        env(&[
            ("NOTION_API_KEY", "secret_abcdefghijklmnopqrstuvwxyz"),
            ("GOOGLE_ACCESS_TOKEN", "ya29.token"),
            ("GOOGLE_DOC_ID", "1AbCdEfGhIjKlMnOpQrStUvWxYz"),
        ])
    }

    fn cli_with_page() -> CommandLineInput {
        CommandLineInput {
            pages: vec![PAGE.to_string()],
            cache_ttl: 300,
            ..CommandLineInput::default()
        }
    }

    #[test]
    fn test_transfer_resolves_everything() {
        let config = TransferConfig::resolve_with(cli_with_page(), full_env()).unwrap();

        assert_eq!(config.mode, RunMode::Transfer);
        assert_eq!(config.pages[0].as_str(), "1234567890abcdef1234567890abcdef");
        assert_eq!(
            config.document.unwrap().as_str(),
            "1AbCdEfGhIjKlMnOpQrStUvWxYz"
        );
        assert!(config.options.structural_tables);
        assert_eq!(config.options.policy, SubmissionPolicy::Batched);
        assert_eq!(config.ledger_path, PathBuf::from(DEFAULT_LEDGER_PATH));
    }

    #[test]
    fn test_missing_token_is_reported() {
        let result = TransferConfig::resolve_with(
            cli_with_page(),
            env(&[("NOTION_API_KEY", "secret_abcdefghijklmnopqrstuvwxyz")]),
        );
        match result {
            Err(AppError::MissingConfiguration(message)) => {
                assert!(message.contains("GOOGLE_ACCESS_TOKEN"))
            }
            other => panic!("Expected MissingConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_dry_run_needs_no_google_settings() {
        let cli = CommandLineInput {
            dry_run: true,
            no_tables: true,
            ..cli_with_page()
        };
        let config = TransferConfig::resolve_with(
            cli,
            env(&[("NOTION_API_KEY", "secret_abcdefghijklmnopqrstuvwxyz")]),
        )
        .unwrap();

        assert_eq!(config.mode, RunMode::DryRun { output: None });
        assert!(config.document.is_none());
        assert!(!config.options.structural_tables);
    }

    #[test]
    fn test_document_flag_overrides_env() {
        let cli = CommandLineInput {
            document: Some("https://docs.google.com/document/d/1ZyXwVuTsRqPoNmLkJiHgFeDcBa/edit".to_string()),
            ..cli_with_page()
        };
        let config = TransferConfig::resolve_with(cli, full_env()).unwrap();
        assert_eq!(
            config.document.unwrap().as_str(),
            "1ZyXwVuTsRqPoNmLkJiHgFeDcBa"
        );
    }

    #[test]
    fn test_list_needs_database() {
        let cli = CommandLineInput {
            list: true,
            ..CommandLineInput::default()
        };
        assert!(TransferConfig::resolve_with(cli, full_env()).is_err());
    }

    #[test]
    fn test_following_rows_fetches_them() {
        let cli = CommandLineInput {
            follow_child_databases: true,
            per_block: true,
            ..cli_with_page()
        };
        let config = TransferConfig::resolve_with(cli, full_env()).unwrap();
        assert!(config.options.include_database_rows);
        assert_eq!(config.options.policy, SubmissionPolicy::PerBlock);
    }
}
