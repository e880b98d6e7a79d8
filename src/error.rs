//! Error taxonomy for the history pipeline.
//!
//! Two tiers: failing to retrieve the record list at all is fatal and
//! surfaces to the caller, while individual reference lookup faults are
//! absorbed by the resolver and rendered as placeholders. Only
//! [`RetrievalError`] ever crosses the pipeline boundary.

use thiserror::Error;

/// The record fetch itself failed. Halts the pipeline.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("history endpoint '{endpoint}' returned HTTP {status}")]
    Api { endpoint: String, status: u16 },

    #[error("failed to reach history endpoint '{endpoint}': {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode history payload from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("history endpoint '{endpoint}' returned a non-list payload")]
    Shape { endpoint: String },
}

/// A single reference lookup failed.
///
/// These never leave the resolver; the affected identifier renders as its
/// placeholder and every other lookup proceeds untouched.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("lookup returned HTTP {status} for id {id}")]
    Api { id: String, status: u16 },

    #[error("lookup transport failure for id {id}: {source}")]
    Transport {
        id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("lookup payload for id {id} could not be decoded: {source}")]
    Decode {
        id: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Viewer configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
