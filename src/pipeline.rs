//! Pipeline orchestration.
//!
//! One execution per render request: fetch the records, derive the schema
//! and collect references in read-only passes, resolve every identifier
//! under the concurrency bound, then project the table. The whole model is
//! recomputed from nothing on every run; no state survives between runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, info_span, Instrument};
use url::Url;
use uuid::Uuid;

use crate::config::HistoryConfig;
use crate::error::RetrievalError;
use crate::format::{FormatRules, RecordFormatter};
use crate::record::HistoryView;
use crate::reference::http::HttpReferenceLookup;
use crate::reference::resolver::ReferenceResolver;
use crate::reference::{collector, ReferenceTypeDescriptor, REFERENCE_TYPES};
use crate::schema;
use crate::source::{HttpRecordSource, RecordSource};

/// The audit-history resolution and rendering pipeline.
pub struct HistoryPipeline {
    source: Arc<dyn RecordSource>,
    resolver: ReferenceResolver,
    descriptors: &'static [ReferenceTypeDescriptor],
    rules: FormatRules,
}

impl HistoryPipeline {
    pub fn new(source: Arc<dyn RecordSource>, resolver: ReferenceResolver, rules: FormatRules) -> Self {
        Self {
            source,
            resolver,
            descriptors: REFERENCE_TYPES,
            rules,
        }
    }

    /// Wire the pipeline against the configured REST backend: one shared
    /// HTTP client, a record source, and one lookup per configured type.
    pub fn from_config(config: &HistoryConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("invalid base url '{}'", config.base_url))?;

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to create HTTP client")?;

        let source = Arc::new(HttpRecordSource::new(http.clone(), base.clone()));

        let mut resolver = ReferenceResolver::new(config.lookup_concurrency);
        for descriptor in REFERENCE_TYPES {
            let Some(path) = config.lookup_paths.get(descriptor.name) else {
                // The resolver degrades an unregistered type to placeholders.
                continue;
            };
            resolver = resolver.with_lookup(
                descriptor.name,
                Arc::new(HttpReferenceLookup::new(
                    http.clone(),
                    base.clone(),
                    path.clone(),
                )),
            );
        }

        Ok(Self::new(source, resolver, config.format_rules()))
    }

    /// Run the pipeline for one endpoint.
    ///
    /// Returns `NoData` for an empty record list; only a failed record
    /// fetch surfaces as an error. Individual reference faults have already
    /// been absorbed into placeholders by the time the table exists.
    pub async fn run(&self, endpoint: &str) -> Result<HistoryView, RetrievalError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("history_run", %run_id, endpoint);

        async {
            let records = self.source.fetch(endpoint).await?;
            if records.is_empty() {
                info!("endpoint returned no records");
                return Ok(HistoryView::NoData);
            }

            let table_schema = schema::analyze(&records);
            let collected = collector::collect(&records, self.descriptors);
            let resolved = self.resolver.resolve_all(self.descriptors, &collected).await;

            let formatter = RecordFormatter::new(self.descriptors, &self.rules);
            let model = formatter.render(&records, &table_schema, &resolved);

            info!(
                rows = model.rows.len(),
                columns = model.headers.len(),
                reference_types = resolved.len(),
                "rendered history table"
            );
            Ok(HistoryView::Table(model))
        }
        .instrument(span)
        .await
    }
}

/// Outcome of a render request issued through a [`ViewSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// A newer render started before this one finished; its output was
    /// discarded without being applied.
    Superseded,
    Rendered(HistoryView),
}

/// Serializes renders for one view surface.
///
/// Navigating to a different endpoint starts a newer run; an older run that
/// completes afterwards is reported as superseded so its table is never
/// applied over the newer view.
pub struct ViewSession {
    pipeline: Arc<HistoryPipeline>,
    generation: AtomicU64,
}

impl ViewSession {
    pub fn new(pipeline: Arc<HistoryPipeline>) -> Self {
        Self {
            pipeline,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn render(&self, endpoint: &str) -> Result<SessionOutcome, RetrievalError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.pipeline.run(endpoint).await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            info!(endpoint, "render superseded; discarding result");
            return Ok(SessionOutcome::Superseded);
        }

        result.map(SessionOutcome::Rendered)
    }
}
