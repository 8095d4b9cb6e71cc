//! Text presentation of a published session
use std::fmt::Write;

use crate::error::Slot;
use crate::session::{SessionSnapshot, VisibilityVerdict};
use crate::tracking::{RecordStatus, SatelliteRecord, TrajectoryStatus};

pub struct SessionView;

impl SessionView {
    /// Two satellite panels followed by the visibility panel.
    ///
    /// Published snapshots only carry records that finished their query, so
    /// every panel shows either data or an error.
    pub fn render(snapshot: &SessionSnapshot) -> String {
        let mut out = String::new();

        for slot in [Slot::A, Slot::B] {
            match snapshot.record(slot) {
                Some(record) => Self::render_record(&mut out, slot, record),
                None => {
                    let _ = writeln!(out, "── Satellite {} ──\n  (none)", slot);
                }
            }
        }

        let _ = writeln!(out, "── Visibility ──");
        let _ = writeln!(out, "  {}", Self::verdict_line(snapshot));
        out
    }

    pub fn verdict_line(snapshot: &SessionSnapshot) -> String {
        match snapshot.verdict {
            VisibilityVerdict::Unknown => "no session submitted".to_string(),
            VisibilityVerdict::Visible => "the satellites can see each other".to_string(),
            VisibilityVerdict::NotVisible => "the satellites cannot see each other".to_string(),
            VisibilityVerdict::Indeterminate => snapshot
                .verdict_message
                .clone()
                .unwrap_or_else(|| "cannot be determined".to_string()),
        }
    }

    fn render_record(out: &mut String, slot: Slot, record: &SatelliteRecord) {
        let title = match &record.name {
            Some(name) => format!("{} ({})", record.id, name),
            None => record.id.to_string(),
        };
        let _ = writeln!(out, "── Satellite {}: {} ──", slot, title);
        let _ = writeln!(out, "  status: {}", record.status);

        match record.status {
            RecordStatus::Ready => {
                if let Some(tle) = &record.tle {
                    let _ = writeln!(out, "  TLE:");
                    for line in tle.lines() {
                        let _ = writeln!(out, "    {}", line);
                    }
                }
                match (&record.position, &record.position_note) {
                    (Some(position), _) => {
                        let _ = writeln!(out, "  position: {}", position);
                    }
                    (None, Some(note)) => {
                        let _ = writeln!(out, "  position unavailable: {}", note);
                    }
                    (None, None) => {
                        let _ = writeln!(out, "  position unavailable");
                    }
                }
            }
            RecordStatus::Pending | RecordStatus::NotFound | RecordStatus::Failed => {
                let message = record.message.as_deref().unwrap_or("no result");
                let _ = writeln!(out, "  error: {}", message);
            }
        }

        match &record.trajectory {
            TrajectoryStatus::NotRequested => {}
            TrajectoryStatus::Loaded => {
                let _ = writeln!(out, "  trajectory: shown on globe");
            }
            TrajectoryStatus::Unavailable(reason) => {
                let _ = writeln!(out, "  trajectory unavailable: {}", reason);
            }
        }
    }
}
