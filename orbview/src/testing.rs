//! Scripted test double for the satellite-data service.
//!
//! Replies are queued per satellite; the last queued lookup reply sticks so a
//! test only has to script the transitions it cares about. Every call is
//! recorded for later assertions.

use crate::error::{ClientError, ClientResult};
use crate::remote::RemoteSatelliteClient;
use async_trait::async_trait;
use orbview_common::{LookupPayload, NoradId, Registration, TrajectoryDocument, Visibility};
use serde_json::json;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Lookup(NoradId),
    Register(NoradId),
    Trajectory(NoradId),
    Visibility(NoradId, NoradId),
}

pub fn ready_payload(tle: &str, lla: [f64; 3]) -> LookupPayload {
    LookupPayload {
        tle: tle.to_string(),
        current_lla: json!([lla]),
    }
}

pub fn czml_for(id: NoradId) -> TrajectoryDocument {
    TrajectoryDocument(json!([
        {"id": "document", "version": "1.0"},
        {"id": format!("Satellite {}", id)},
    ]))
}

pub fn server_error(operation: &'static str) -> ClientError {
    ClientError::Status {
        operation,
        status: 500,
        body: "Internal Server Error".to_string(),
    }
}

#[derive(Default)]
pub struct MockClient {
    lookups: Mutex<HashMap<NoradId, VecDeque<ClientResult<LookupPayload>>>>,
    registrations: Mutex<HashMap<NoradId, ClientResult<Registration>>>,
    trajectories: Mutex<HashMap<NoradId, ClientResult<TrajectoryDocument>>>,
    visibility: Mutex<Option<ClientResult<Visibility>>>,
    gates: Mutex<HashMap<NoradId, Arc<Notify>>>,
    hanging: Mutex<HashSet<NoradId>>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a lookup reply for `id`
    pub fn with_lookup(self, id: u32, reply: ClientResult<LookupPayload>) -> Self {
        self.lookups
            .lock()
            .unwrap()
            .entry(NoradId(id))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn with_registration(self, id: u32, reply: ClientResult<Registration>) -> Self {
        self.registrations.lock().unwrap().insert(NoradId(id), reply);
        self
    }

    pub fn with_trajectory(self, id: u32, reply: ClientResult<TrajectoryDocument>) -> Self {
        self.trajectories.lock().unwrap().insert(NoradId(id), reply);
        self
    }

    pub fn with_visibility(self, reply: ClientResult<Visibility>) -> Self {
        *self.visibility.lock().unwrap() = Some(reply);
        self
    }

    /// Hold lookups of `id` until the returned gate is notified
    pub fn gate_lookup(&self, id: u32) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(NoradId(id), gate.clone());
        gate
    }

    /// Lookups of `id` never resolve
    pub fn hang_lookup(self, id: u32) -> Self {
        self.hanging.lock().unwrap().insert(NoradId(id));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: Call) -> usize {
        self.calls().into_iter().filter(|c| *c == wanted).count()
    }

    pub fn visibility_calls(&self) -> usize {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Visibility(..)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_lookup(&self, id: NoradId) -> ClientResult<LookupPayload> {
        let mut lookups = self.lookups.lock().unwrap();
        match lookups.get_mut(&id) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(ClientError::NotRegistered(id)),
        }
    }
}

#[async_trait]
impl RemoteSatelliteClient for MockClient {
    async fn lookup(&self, id: NoradId) -> ClientResult<LookupPayload> {
        self.record(Call::Lookup(id));

        if self.hanging.lock().unwrap().contains(&id) {
            std::future::pending::<()>().await;
        }
        let gate = self.gates.lock().unwrap().get(&id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.next_lookup(id)
    }

    async fn register_and_lookup(&self, id: NoradId) -> ClientResult<Registration> {
        self.record(Call::Register(id));
        self.registrations
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| {
                Err(ClientError::Status {
                    operation: "fetch-and-save",
                    status: 404,
                    body: String::new(),
                })
            })
    }

    async fn trajectory(&self, id: NoradId) -> ClientResult<TrajectoryDocument> {
        self.record(Call::Trajectory(id));
        self.trajectories
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Ok(czml_for(id)))
    }

    async fn check_visibility(&self, a: NoradId, b: NoradId) -> ClientResult<Visibility> {
        self.record(Call::Visibility(a, b));
        self.visibility
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Ok(Visibility::Visible))
    }
}
