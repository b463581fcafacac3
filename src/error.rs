use thiserror::Error;

/// Errors that abort a token report.
///
/// Tolerated conditions (missing `owner()`, creation transaction outside the
/// scanned window) never surface here; they are rendered as explicit values
/// in the report instead.
#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("RPC call {method} failed: {message}")]
    Rpc {
        method: &'static str,
        message: String,
    },

    #[error("Could not decode {method} result: {message}")]
    Decode {
        method: &'static str,
        message: String,
    },

    #[error("Invalid configuration {key}: {message}")]
    Config { key: &'static str, message: String },
}

impl InspectorError {
    pub fn rpc(method: &'static str, err: impl std::fmt::Display) -> Self {
        InspectorError::Rpc {
            method,
            message: err.to_string(),
        }
    }

    pub fn decode(method: &'static str, err: impl std::fmt::Display) -> Self {
        InspectorError::Decode {
            method,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InspectorError>;
