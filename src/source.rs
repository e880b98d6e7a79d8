//! Record retrieval.
//!
//! The history endpoint returns already-structured snapshot lists. Fetch
//! failure is the one fatal fault in the pipeline.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::RetrievalError;
use crate::record::HistoricalRecord;

/// Fetches the record list for one history endpoint.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<HistoricalRecord>, RetrievalError>;
}

/// Record source over the REST backend.
pub struct HttpRecordSource {
    http: Client,
    base: Url,
}

impl HttpRecordSource {
    pub fn new(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<HistoricalRecord>, RetrievalError> {
        let url = self.endpoint_url(endpoint);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| RetrievalError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let payload: Value =
            response
                .json()
                .await
                .map_err(|source| RetrievalError::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                })?;

        let Value::Array(items) = payload else {
            return Err(RetrievalError::Shape {
                endpoint: endpoint.to_string(),
            });
        };

        items
            .into_iter()
            .map(|item| {
                HistoricalRecord::from_value(item).ok_or_else(|| RetrievalError::Shape {
                    endpoint: endpoint.to_string(),
                })
            })
            .collect()
    }
}
