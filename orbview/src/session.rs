//! Dual-satellite session coordinator
//!
//! A submission runs both tracking queries concurrently, loads their
//! trajectories into the scene, asks for a visibility verdict and publishes
//! the result as one snapshot. Every submission gets a generation number;
//! work belonging to a superseded generation never touches the scene or the
//! published state.
use chrono::{DateTime, Utc};
use futures::future;
use orbview_common::{NoradId, TrajectoryDocument, Visibility};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ClientResult, SceneError, SessionError, Slot};
use crate::remote::{bounded, RemoteSatelliteClient};
use crate::scene::{SceneEngine, SceneSynchronizer};
use crate::tracking::{QueryOptions, SatelliteRecord, TrackedObjectQuery, TrajectoryStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VisibilityVerdict {
    /// Nothing has been submitted yet
    #[default]
    Unknown,
    Visible,
    NotVisible,
    /// A participant is not ready, or the check itself failed
    Indeterminate,
}

/// Consolidated state handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub generation: u64,
    pub a: Option<SatelliteRecord>,
    pub b: Option<SatelliteRecord>,
    pub submitted: bool,
    pub verdict: VisibilityVerdict,
    /// Why the verdict is `Indeterminate`
    pub verdict_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    fn initial() -> Self {
        Self {
            id: Uuid::now_v7(),
            generation: 0,
            a: None,
            b: None,
            submitted: false,
            verdict: VisibilityVerdict::Unknown,
            verdict_message: None,
            completed_at: None,
        }
    }

    pub fn record(&self, slot: Slot) -> Option<&SatelliteRecord> {
        match slot {
            Slot::A => self.a.as_ref(),
            Slot::B => self.b.as_ref(),
        }
    }
}

fn parse_slot(slot: Slot, input: &str) -> Result<NoradId, SessionError> {
    input.parse::<NoradId>().map_err(|_| SessionError::InvalidInput {
        slot,
        input: input.to_string(),
    })
}

pub struct VisibilitySession<C, S> {
    client: Arc<C>,
    /// Serializes every scene mutation; generation checks happen under it
    scene: Mutex<SceneSynchronizer<S>>,
    options: QueryOptions,
    generation: AtomicU64,
    published: watch::Sender<SessionSnapshot>,
}

impl<C, S> VisibilitySession<C, S>
where
    C: RemoteSatelliteClient,
    S: SceneEngine,
{
    pub fn new(client: Arc<C>, scene: SceneSynchronizer<S>, options: QueryOptions) -> Self {
        let (published, _) = watch::channel(SessionSnapshot::initial());
        Self {
            client,
            scene: Mutex::new(scene),
            options,
            generation: AtomicU64::new(0),
            published,
        }
    }

    pub fn from_config(client: Arc<C>, engine: S, config: &AppConfig) -> Self {
        let options = QueryOptions {
            timeout: config.service.request_timeout(),
            recover_unregistered: config.service.recover_unregistered,
        };
        Self::new(
            client,
            SceneSynchronizer::new(engine, config.scene.camera_standoff_km),
            options,
        )
    }

    /// Read-only feed of published sessions
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.published.subscribe()
    }

    pub fn current(&self) -> SessionSnapshot {
        self.published.borrow().clone()
    }

    /// Generation of the newest accepted submission
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    fn still_current(&self, generation: u64, stage: &str) -> bool {
        if self.is_current(generation) {
            return true;
        }
        debug!(
            generation,
            latest = self.latest_generation(),
            "Submission superseded after {}, discarding",
            stage
        );
        false
    }

    /// Start a new session for two catalog numbers.
    ///
    /// Malformed input is rejected before anything changes. Returns the
    /// published snapshot, or `None` when a newer submission took over first.
    pub async fn submit(
        &self,
        input_a: &str,
        input_b: &str,
    ) -> Result<Option<SessionSnapshot>, SessionError> {
        let id_a = parse_slot(Slot::A, input_a)?;
        let id_b = parse_slot(Slot::B, input_b)?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, a = %id_a, b = %id_b, "Session submitted");

        let mut scene_cleared = true;
        {
            let scene = self.scene.lock().await;
            if !self.still_current(generation, "submission") {
                return Ok(None);
            }
            if let Err(e) = scene.reset().await {
                warn!(generation, "Scene reset failed, retrying before load: {}", e);
                scene_cleared = false;
            }
        }

        let client = self.client.as_ref();
        let (mut record_a, mut record_b) = tokio::join!(
            TrackedObjectQuery::new(client, id_a, self.options).run(),
            TrackedObjectQuery::new(client, id_b, self.options).run(),
        );
        if !self.still_current(generation, "lookups") {
            return Ok(None);
        }

        let (trajectory_a, trajectory_b) =
            future::join(self.fetch_trajectory(id_a), self.fetch_trajectory(id_b)).await;
        {
            let scene = self.scene.lock().await;
            if !self.still_current(generation, "trajectory fetch") {
                return Ok(None);
            }
            // Loading on top of a previous session's sources is never allowed
            let cleared = if scene_cleared {
                Ok(())
            } else {
                scene.reset().await
            };
            match cleared {
                Ok(()) => {
                    record_a.trajectory = Self::load_trajectory(&scene, id_a, trajectory_a).await;
                    record_b.trajectory = Self::load_trajectory(&scene, id_b, trajectory_b).await;
                }
                Err(e) => {
                    warn!(generation, "Scene reset failed again, skipping trajectory loads: {}", e);
                    let status = TrajectoryStatus::Unavailable(format!("scene reset failed: {}", e));
                    record_a.trajectory = status.clone();
                    record_b.trajectory = status;
                }
            }
        }

        let (verdict, verdict_message) = self.decide_verdict(&record_a, &record_b).await;
        info!(generation, ?verdict, "Visibility verdict");

        let snapshot = SessionSnapshot {
            id: Uuid::now_v7(),
            generation,
            a: Some(record_a),
            b: Some(record_b),
            submitted: true,
            verdict,
            verdict_message,
            completed_at: Some(Utc::now()),
        };

        let published = self.published.send_if_modified(|current| {
            if !self.is_current(generation) {
                return false;
            }
            *current = snapshot.clone();
            true
        });

        if published {
            info!(generation, session = %snapshot.id, "Session published");
            Ok(Some(snapshot))
        } else {
            self.still_current(generation, "verdict");
            Ok(None)
        }
    }

    /// Fly the camera to the current session's satellite in `slot`.
    /// `Ok(false)` when that satellite has no valid position.
    pub async fn focus(&self, slot: Slot) -> Result<bool, SceneError> {
        let position = {
            let snapshot = self.published.borrow();
            snapshot.record(slot).and_then(|record| record.position)
        };

        let scene = self.scene.lock().await;
        scene.focus(position.as_ref()).await
    }

    async fn fetch_trajectory(&self, id: NoradId) -> ClientResult<TrajectoryDocument> {
        bounded(self.options.timeout, "trajectory", self.client.trajectory(id)).await
    }

    async fn load_trajectory(
        scene: &SceneSynchronizer<S>,
        id: NoradId,
        fetched: ClientResult<TrajectoryDocument>,
    ) -> TrajectoryStatus {
        let document = match fetched {
            Ok(document) => document,
            Err(e) => {
                warn!(norad_id = %id, "Trajectory unavailable: {}", e);
                return TrajectoryStatus::Unavailable(e.to_string());
            }
        };

        match scene.load(id, &document).await {
            Ok(()) => TrajectoryStatus::Loaded,
            Err(e) => {
                warn!(norad_id = %id, "Trajectory not loaded into scene: {}", e);
                TrajectoryStatus::Unavailable(e.to_string())
            }
        }
    }

    async fn decide_verdict(
        &self,
        a: &SatelliteRecord,
        b: &SatelliteRecord,
    ) -> (VisibilityVerdict, Option<String>) {
        let not_ready: Vec<String> = [(Slot::A, a), (Slot::B, b)]
            .iter()
            .filter(|(_, record)| !record.is_ready())
            .map(|(slot, record)| format!("satellite {} ({}) is {}", slot, record.id, record.status))
            .collect();

        if !not_ready.is_empty() {
            return (
                VisibilityVerdict::Indeterminate,
                Some(format!("cannot be determined: {}", not_ready.join(", "))),
            );
        }

        let check = self.client.check_visibility(a.id, b.id);
        match bounded(self.options.timeout, "visible-check", check).await {
            Ok(Visibility::Visible) => (VisibilityVerdict::Visible, None),
            Ok(Visibility::NotVisible) => (VisibilityVerdict::NotVisible, None),
            Err(e) => {
                warn!(a = %a.id, b = %b.id, "Visibility check failed: {}", e);
                (
                    VisibilityVerdict::Indeterminate,
                    Some(format!("cannot be determined: {}", e)),
                )
            }
        }
    }
}
