pub mod query;
pub mod record;

pub use query::{QueryOptions, TrackedObjectQuery, NOT_REGISTERED_MESSAGE, RECOVERY_FAILED_MESSAGE};
pub use record::{RecordStatus, SatelliteRecord, TrajectoryStatus};
