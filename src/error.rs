//! Error type for the fallible parts of the public API.
//!
//! Billing and distance computations are total and never fail; errors only
//! come from parsing clock times and validating configuration.

use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "ffi", derive(uniffi::Error))]
#[cfg_attr(feature = "ffi", uniffi(flat_error))]
pub enum Error {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("time out of range: {hour:02}:{minute:02}")]
    TimeOutOfRange { hour: u32, minute: u32 },

    #[error("timestamp {0} ms cannot be placed on a calendar day")]
    InvalidTimestamp(i64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
