pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod remote;
pub mod scene;
pub mod session;
pub mod tracking;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ClientError, SceneError, SessionError, Slot};
pub use remote::{HttpSatelliteClient, RemoteSatelliteClient};
pub use scene::{HeadlessScene, SceneEngine, SceneSynchronizer};
pub use session::{SessionSnapshot, VisibilitySession, VisibilityVerdict};
pub use tracking::{QueryOptions, RecordStatus, SatelliteRecord, TrackedObjectQuery};
pub use view::SessionView;
