//! Error types for rate fetching and conversion

use std::time::Duration;
use thiserror::Error;

/// Failures raised while fetching a rate table from a provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured bound.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network failure or a non-success HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a body we could not understand.
    #[error("Malformed provider response: {0}")]
    Protocol(String),

    /// The requested currency is missing from the provider's table.
    #[error("Currency {0} is not supported by the rate provider")]
    UnsupportedCurrency(String),
}

/// Errors surfaced to callers of the conversion engine.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{0}")]
    Validation(String),

    #[error("Currency {0} is not supported by the rate provider")]
    UnsupportedCurrency(String),

    /// Generic signal for timeout, transport and protocol failures. Details are
    /// kept in the application error log.
    #[error("Conversion failed, please try again")]
    Failed,
}

pub type FetchResult<T> = Result<T, FetchError>;
pub type ConvertResult<T> = Result<T, ConvertError>;
