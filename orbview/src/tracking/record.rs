use chrono::{DateTime, Utc};
use orbview_common::{GeodeticPosition, NoradId};
use serde::{Deserialize, Serialize};

/// Lifecycle of one tracked satellite within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RecordStatus {
    /// Query in flight
    #[default]
    Pending,
    /// Element text obtained
    Ready,
    /// Registry has no record of the satellite
    NotFound,
    /// Transport/server failure, or failed recovery
    Failed,
}

impl RecordStatus {
    /// `Pending -> {Ready, NotFound, Failed}`, `NotFound -> {Ready, Failed}`
    pub fn can_transition_to(self, next: RecordStatus) -> bool {
        use RecordStatus::*;
        matches!(
            (self, next),
            (Pending, Ready) | (Pending, NotFound) | (Pending, Failed) | (NotFound, Ready) | (NotFound, Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Ready => "ready",
            RecordStatus::NotFound => "not found",
            RecordStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the satellite's trajectory made it into the scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrajectoryStatus {
    #[default]
    NotRequested,
    Loaded,
    Unavailable(String),
}

/// Everything known about one satellite in the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteRecord {
    pub id: NoradId,

    pub status: RecordStatus,

    /// Name echoed by the registry after a fetch-and-save
    pub name: Option<String>,

    /// Tracking element text
    pub tle: Option<String>,

    /// Only present when the payload had a valid `[lat, lon, alt]` sample
    pub position: Option<GeodeticPosition>,

    /// Why `position` is absent on an otherwise ready record
    pub position_note: Option<String>,

    /// Human-readable text for `NotFound` and `Failed`
    pub message: Option<String>,

    pub trajectory: TrajectoryStatus,

    pub updated_at: DateTime<Utc>,
}

impl SatelliteRecord {
    pub fn pending(id: NoradId) -> Self {
        Self {
            id,
            status: RecordStatus::Pending,
            name: None,
            tle: None,
            position: None,
            position_note: None,
            message: None,
            trajectory: TrajectoryStatus::NotRequested,
            updated_at: Utc::now(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == RecordStatus::Ready
    }

    /// Apply a status change; refused (and logged) if the lifecycle forbids it.
    fn transition(&mut self, next: RecordStatus) -> bool {
        if !self.status.can_transition_to(next) {
            tracing::warn!(
                norad_id = %self.id,
                "Refusing record transition {} -> {}",
                self.status,
                next
            );
            return false;
        }
        self.status = next;
        self.updated_at = Utc::now();
        true
    }

    pub fn mark_ready(
        &mut self,
        tle: String,
        position: Result<GeodeticPosition, String>,
    ) -> bool {
        if !self.transition(RecordStatus::Ready) {
            return false;
        }
        self.tle = Some(tle);
        self.message = None;
        match position {
            Ok(position) => {
                self.position = Some(position);
                self.position_note = None;
            }
            Err(note) => {
                self.position = None;
                self.position_note = Some(note);
            }
        }
        true
    }

    pub fn mark_not_found(&mut self, message: impl Into<String>) -> bool {
        if !self.transition(RecordStatus::NotFound) {
            return false;
        }
        self.message = Some(message.into());
        true
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) -> bool {
        if !self.transition(RecordStatus::Failed) {
            return false;
        }
        self.message = Some(message.into());
        true
    }
}
