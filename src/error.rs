// Query and resource errors surfaced to the host

use thiserror::Error;

use crate::astarte::ApiError;

/// Why a single query produced no series.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed or incomplete query payload; no remote call was made.
    #[error("invalid query: {0}")]
    Validation(String),

    /// The client or a datastream page failed.
    #[error(transparent)]
    Remote(#[from] ApiError),

    /// A sample's value is not numeric at all (the interface is not numeric).
    #[error(
        "Device {device} has data of non-numeric type ({kind}) on interface {interface}, path {path}"
    )]
    NonNumeric {
        device: String,
        interface: String,
        path: String,
        kind: &'static str,
    },

    #[error("query cancelled")]
    Cancelled,
}

impl QueryError {
    /// Short category for the wire `errorKind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Validation(_) => "validation",
            QueryError::Remote(_) => "remote",
            QueryError::NonNumeric { .. } => "data",
            QueryError::Cancelled => "cancelled",
        }
    }
}

/// Why a resource call was rejected. Every variant maps to HTTP 400.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unexpected request")]
    Unrecognized,

    #[error("{0}")]
    InvalidParameter(String),

    #[error("{0}")]
    Remote(#[from] ApiError),
}
