//! HTTP lookup collaborators over the REST backend.
//!
//! Each reference type gets one lookup resolving point requests against
//! `<base>/<path>/<id>`. A 404 is the not-found signal, not an error.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::LookupError;
use crate::record::ReferenceId;

use super::resolver::ReferenceLookup;

/// Resolves identifiers of one entity type via GET point requests.
pub struct HttpReferenceLookup {
    http: Client,
    base: Url,
    path: String,
}

impl HttpReferenceLookup {
    pub fn new(http: Client, base: Url, path: impl Into<String>) -> Self {
        Self {
            http,
            base,
            path: path.into(),
        }
    }

    fn entity_url(&self, id: &ReferenceId) -> String {
        format!(
            "{}/{}/{}",
            self.base.as_str().trim_end_matches('/'),
            self.path.trim_matches('/'),
            id
        )
    }
}

#[async_trait]
impl ReferenceLookup for HttpReferenceLookup {
    async fn resolve(&self, id: &ReferenceId) -> Result<Option<Value>, LookupError> {
        let url = self.entity_url(id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                id: id.to_string(),
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Api {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let entity = response
            .json()
            .await
            .map_err(|source| LookupError::Decode {
                id: id.to_string(),
                source,
            })?;

        Ok(Some(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_url_joins_base_path_and_id() {
        let lookup = HttpReferenceLookup::new(
            Client::new(),
            Url::parse("http://localhost:8080/api/").expect("static url"),
            "/clients/",
        );
        assert_eq!(
            lookup.entity_url(&ReferenceId::from(12)),
            "http://localhost:8080/api/clients/12"
        );
    }
}
