//! Concurrent reference resolution.
//!
//! The resolver issues exactly one lookup per unique identifier per type,
//! fanned out under a bounded concurrency limit. Every per-identifier fault
//! degrades that entry alone to its placeholder; the resolver itself never
//! errors, and its output covers every collected identifier exactly once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::LookupError;
use crate::record::ReferenceId;

use super::collector::CollectedReferences;
use super::ReferenceTypeDescriptor;

/// Point lookup for one reference type.
///
/// `Ok(None)` means the target entity no longer exists. Lookups are
/// read-only and idempotent from the pipeline's perspective.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn resolve(&self, id: &ReferenceId) -> Result<Option<Value>, LookupError>;
}

/// Display strings keyed by identifier, one map per reference type.
pub type ResolvedReferences = HashMap<&'static str, HashMap<ReferenceId, String>>;

/// Fan-out/fan-in resolver over the registered lookup collaborators.
pub struct ReferenceResolver {
    lookups: HashMap<&'static str, Arc<dyn ReferenceLookup>>,
    concurrency: usize,
}

impl ReferenceResolver {
    /// `concurrency` bounds in-flight lookups per type; clamped to at least 1.
    pub fn new(concurrency: usize) -> Self {
        Self {
            lookups: HashMap::new(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_lookup(mut self, kind: &'static str, lookup: Arc<dyn ReferenceLookup>) -> Self {
        self.lookups.insert(kind, lookup);
        self
    }

    /// Resolve every collected identifier to a display string.
    ///
    /// A type whose lookup collaborator is unregistered or entirely
    /// unavailable still yields a complete map of placeholders.
    pub async fn resolve_all(
        &self,
        descriptors: &'static [ReferenceTypeDescriptor],
        collected: &CollectedReferences,
    ) -> ResolvedReferences {
        let mut resolved = ResolvedReferences::new();

        for descriptor in descriptors {
            let Some(ids) = collected.get(descriptor.name) else {
                continue;
            };
            if ids.is_empty() {
                continue;
            }

            let map = match self.lookups.get(descriptor.name) {
                Some(lookup) => self.resolve_type(descriptor, lookup, ids).await,
                None => {
                    warn!(
                        kind = descriptor.name,
                        count = ids.len(),
                        "no lookup collaborator registered; rendering placeholders"
                    );
                    ids.iter()
                        .map(|id| (id.clone(), descriptor.placeholder(id)))
                        .collect()
                }
            };
            resolved.insert(descriptor.name, map);
        }

        resolved
    }

    async fn resolve_type(
        &self,
        descriptor: &'static ReferenceTypeDescriptor,
        lookup: &Arc<dyn ReferenceLookup>,
        ids: &HashSet<ReferenceId>,
    ) -> HashMap<ReferenceId, String> {
        let limit = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for id in ids {
            let id = id.clone();
            let lookup = Arc::clone(lookup);
            let limit = Arc::clone(&limit);
            tasks.spawn(async move {
                // The semaphore is never closed; a failed acquire only skips
                // throttling.
                let _permit = limit.acquire_owned().await.ok();
                let display = resolve_one(descriptor, &*lookup, &id).await;
                (id, display)
            });
        }

        let mut map = HashMap::with_capacity(ids.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, display)) => {
                    map.insert(id, display);
                }
                Err(err) => {
                    warn!(kind = descriptor.name, error = %err, "lookup task failed");
                }
            }
        }

        // A panicked task still owes its identifier a placeholder.
        for id in ids {
            map.entry(id.clone())
                .or_insert_with(|| descriptor.placeholder(id));
        }

        map
    }
}

async fn resolve_one(
    descriptor: &ReferenceTypeDescriptor,
    lookup: &dyn ReferenceLookup,
    id: &ReferenceId,
) -> String {
    match lookup.resolve(id).await {
        Ok(Some(entity)) => match (descriptor.display)(&entity) {
            Some(display) => display,
            None => {
                warn!(kind = descriptor.name, %id, "resolved entity lacks its display field");
                descriptor.placeholder(id)
            }
        },
        Ok(None) => {
            debug!(kind = descriptor.name, %id, "referenced entity no longer exists");
            descriptor.placeholder(id)
        }
        Err(err) => {
            warn!(kind = descriptor.name, %id, error = %err, "lookup failed");
            descriptor.placeholder(id)
        }
    }
}
