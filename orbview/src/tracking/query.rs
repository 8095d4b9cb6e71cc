//! Per-satellite fetch pipeline
//!
//! Pending -> Ready
//! Pending -> NotFound -> (fetch-and-save, lookup) -> Ready | Failed
//! Pending -> Failed
use crate::error::ClientError;
use crate::remote::{bounded, RemoteSatelliteClient};
use orbview_common::{parse_current_lla, LookupPayload, NoradId, Registration};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::record::{RecordStatus, SatelliteRecord};

pub const RECOVERY_FAILED_MESSAGE: &str = "object does not exist or is not currently in orbit";
pub const NOT_REGISTERED_MESSAGE: &str = "not registered with the tracking service";

#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Bound on each individual remote call
    pub timeout: Duration,
    /// Attempt one fetch-and-save when the registry answers 404
    pub recover_unregistered: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            recover_unregistered: true,
        }
    }
}

pub struct TrackedObjectQuery<'a, C: ?Sized> {
    client: &'a C,
    options: QueryOptions,
    record: SatelliteRecord,
    recovery_attempted: bool,
}

impl<'a, C> TrackedObjectQuery<'a, C>
where
    C: RemoteSatelliteClient + ?Sized,
{
    pub fn new(client: &'a C, id: NoradId, options: QueryOptions) -> Self {
        Self {
            client,
            options,
            record: SatelliteRecord::pending(id),
            recovery_attempted: false,
        }
    }

    pub fn record(&self) -> &SatelliteRecord {
        &self.record
    }

    /// Drive the query to a terminal state.
    pub async fn run(mut self) -> SatelliteRecord {
        while self.step().await {}
        self.record
    }

    /// Perform one transition. Returns `false` once the record is terminal.
    pub async fn step(&mut self) -> bool {
        match self.record.status {
            RecordStatus::Pending => {
                self.lookup().await;
                true
            }
            RecordStatus::NotFound
                if self.options.recover_unregistered && !self.recovery_attempted =>
            {
                self.recover().await;
                true
            }
            _ => false,
        }
    }

    async fn lookup(&mut self) {
        let id = self.record.id;
        match bounded(self.options.timeout, "lookup", self.client.lookup(id)).await {
            Ok(payload) => self.accept(payload),
            Err(e) if e.is_not_registered() => {
                info!(norad_id = %id, "Satellite not registered");
                self.record.mark_not_found(NOT_REGISTERED_MESSAGE);
            }
            Err(e) => {
                warn!(norad_id = %id, "Lookup failed: {}", e);
                self.record.mark_failed(e.to_string());
            }
        }
    }

    /// The single recovery attempt: register upstream, then look up again.
    async fn recover(&mut self) {
        self.recovery_attempted = true;
        let id = self.record.id;
        info!(norad_id = %id, "Registering satellite with the tracking service");

        match self.register_then_lookup(id).await {
            Ok((registration, payload)) => {
                self.record.name = registration.satname;
                self.accept(payload);
            }
            Err(e) => {
                warn!(norad_id = %id, "Recovery failed: {}", e);
                self.record.mark_failed(RECOVERY_FAILED_MESSAGE);
            }
        }
    }

    async fn register_then_lookup(
        &self,
        id: NoradId,
    ) -> Result<(Registration, LookupPayload), ClientError> {
        let timeout = self.options.timeout;
        let registration =
            bounded(timeout, "fetch-and-save", self.client.register_and_lookup(id)).await?;
        let payload = bounded(timeout, "lookup", self.client.lookup(id)).await?;
        Ok((registration, payload))
    }

    fn accept(&mut self, payload: LookupPayload) {
        let position = parse_current_lla(&payload.current_lla).map_err(|e| {
            debug!(norad_id = %self.record.id, "Position unavailable: {}", e);
            e.to_string()
        });
        self.record.mark_ready(payload.tle, position);
    }
}
