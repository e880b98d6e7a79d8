//! servicedesk-history — audit-history resolution and rendering pipeline.
//!
//! Given a list of historical entity snapshots with an unknown, possibly
//! per-record-varying schema and embedded foreign-key references, the
//! pipeline discovers the table schema, resolves every reference to a
//! human-readable label while tolerating deleted targets, and produces a
//! render-ready table.
//!
//! ## Pipeline
//!
//! `RecordSource::fetch` → records → {schema analysis, reference
//! collection} → concurrent reference resolution → formatting →
//! [`RenderModel`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use servicedesk_history::{HistoryConfig, HistoryPipeline, HistoryView};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = HistoryConfig::from_env();
//! let pipeline = HistoryPipeline::from_config(&config)?;
//!
//! match pipeline.run("devices/42/history").await? {
//!     HistoryView::Table(model) => println!("{} rows", model.rows.len()),
//!     HistoryView::NoData => println!("no history entries"),
//! }
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Data model: records, identifiers, render output
pub mod record;

// Schema discovery over record lists
pub mod schema;

// Reference configuration, collection, and resolution
pub mod reference;

// Record retrieval from the REST backend
pub mod source;

// Table formatting and label derivation
pub mod format;

// Orchestration and supersession
pub mod pipeline;

// Viewer configuration
pub mod config;

pub use config::HistoryConfig;
pub use error::{ConfigError, LookupError, RetrievalError};
pub use format::label::derive_label;
pub use format::{FormatRules, RecordFormatter};
pub use pipeline::{HistoryPipeline, SessionOutcome, ViewSession};
pub use record::{Header, HistoricalRecord, HistoryView, ReferenceId, RenderModel};
pub use reference::collector::{collect, CollectedReferences};
pub use reference::http::HttpReferenceLookup;
pub use reference::resolver::{ReferenceLookup, ReferenceResolver, ResolvedReferences};
pub use reference::{ReferenceTypeDescriptor, REFERENCE_TYPES};
pub use schema::{analyze, TableSchema};
pub use source::{HttpRecordSource, RecordSource};
