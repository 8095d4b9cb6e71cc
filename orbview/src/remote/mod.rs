//! Remote satellite-data service: lookup, fetch-and-save, trajectory, visibility.

pub mod client;

use async_trait::async_trait;
use orbview_common::{LookupPayload, NoradId, Registration, TrajectoryDocument, Visibility};

use std::future::Future;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

pub use client::HttpSatelliteClient;

/// Typed request/response contract of the satellite-data service.
///
/// Each call is a single round trip; recovery policy lives with the caller.
#[async_trait]
pub trait RemoteSatelliteClient: Send + Sync {
    /// Registered satellite's element text and current position.
    /// A 404 surfaces as [`ClientError::NotRegistered`](crate::ClientError::NotRegistered).
    async fn lookup(&self, id: NoradId) -> ClientResult<LookupPayload>;

    /// Ask the service to fetch the satellite upstream and persist it.
    async fn register_and_lookup(&self, id: NoradId) -> ClientResult<Registration>;

    async fn trajectory(&self, id: NoradId) -> ClientResult<TrajectoryDocument>;

    async fn check_visibility(&self, a: NoradId, b: NoradId) -> ClientResult<Visibility>;
}

/// Bound a remote call so it fails closed instead of hanging the session.
pub async fn bounded<T>(
    timeout: Duration,
    operation: &'static str,
    call: impl Future<Output = ClientResult<T>>,
) -> ClientResult<T> {
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| {
            Err(ClientError::Timeout {
                operation,
                after: timeout,
            })
        })
}
