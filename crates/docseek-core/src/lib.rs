// Public fallible APIs share one error type (`DocseekError`); per-function
// `# Errors` sections would only repeat it.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type"
)]

pub mod cancel;
pub mod client;
pub mod config;
pub mod embedding;
pub mod error;
pub mod expansion;
pub mod importer;
pub mod indexer;
pub mod intent;
pub(crate) mod llm_io;
pub mod models;
pub mod provider;
pub mod ranking;
pub mod snippet;
pub mod store;
pub(crate) mod text;

pub use cancel::CancellationToken;
pub use client::DocSeek;
pub use config::AppConfig;
pub use error::{DocseekError, Result};
pub use models::{FileSearchResult, IndexReport, IndexedDocument, QueryIntent, StoreStatus};
