//! Core traits for the metadata resolution chain.
//!
//! Every tier of the chain (local index, OMDb, TMDb) implements
//! `MetadataProvider`, so the resolver can try them in order and each tier
//! can be tested on its own.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::MovieRecord;

/// Failures inside a single provider.
///
/// These never reach the resolver's caller: the resolver logs them and moves
/// on to the next tier.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} returned a malformed body: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },

    #[error("Local index error: {0}")]
    Index(String),
}

impl ProviderError {
    pub(crate) fn from_reqwest(provider: &'static str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout { provider }
        } else if error.is_decode() {
            ProviderError::Malformed {
                provider,
                message: error.to_string(),
            }
        } else {
            ProviderError::Transport {
                provider,
                message: error.to_string(),
            }
        }
    }
}

/// One tier of the resolution chain.
///
/// ## Design Note
/// - `Ok(None)` means "this provider doesn't know the title", so the next
///   tier should be tried
/// - `Err` means the provider failed; the resolver treats it the same way
///   but logs it
/// - `Send + Sync` lets the chain live inside shared server state
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Name of this provider (for logging/debugging)
    fn name(&self) -> &str;

    /// Try to resolve a title into a full record
    async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>, ProviderError>;
}
