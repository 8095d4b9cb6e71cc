//! Error types for the tracking session.

use orbview_common::NoradId;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single remote round trip.
///
/// Carries text instead of the underlying transport error so that records can
/// hold on to it and test doubles can replay it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Lookup answered 404: the registry has no record of this satellite
    #[error("satellite {0} is not registered with the tracking service")]
    NotRegistered(NoradId),

    /// Non-success HTTP status
    #[error("{operation} failed with HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Connection or protocol failure
    #[error("{operation} transport error: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// No answer within the bounded wait
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Response arrived but could not be understood
    #[error("{operation} returned a malformed response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
}

impl ClientError {
    pub fn is_not_registered(&self) -> bool {
        matches!(self, ClientError::NotRegistered(_))
    }
}

/// Which side of the session a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::A => write!(f, "A"),
            Slot::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Rejected before any remote call
    #[error("satellite {slot}: {input:?} is not a catalog number")]
    InvalidInput { slot: Slot, input: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("scene engine rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
}

pub type ClientResult<T> = Result<T, ClientError>;
