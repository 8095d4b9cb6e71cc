//! 3D scene plumbing: the engine seam and the session-facing synchronizer.

pub mod headless;

use async_trait::async_trait;
use orbview_common::{GeodeticPosition, NoradId, TrajectoryDocument};
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

pub use headless::HeadlessScene;

/// Where the camera should end up after a fly-to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub latitude: f64,
    pub longitude: f64,
    pub height_km: f64,
}

/// Scene-mutation interface of a globe renderer.
#[async_trait]
pub trait SceneEngine: Send + Sync {
    async fn add_data_source(&self, name: &str, document: &TrajectoryDocument) -> Result<(), SceneError>;

    async fn remove_all_data_sources(&self) -> Result<(), SceneError>;

    async fn fly_to(&self, target: CameraTarget) -> Result<(), SceneError>;
}

/// Name under which a satellite's trajectory is added to the scene
pub fn source_name(id: NoradId) -> String {
    format!("satellite-{}", id)
}

/// Keeps the scene's data sources in step with the current session.
///
/// Holds nothing but the engine handle; callers serialize access.
pub struct SceneSynchronizer<S> {
    engine: S,
    camera_standoff_km: f64,
}

impl<S: SceneEngine> SceneSynchronizer<S> {
    pub fn new(engine: S, camera_standoff_km: f64) -> Self {
        Self {
            engine,
            camera_standoff_km,
        }
    }

    pub fn engine(&self) -> &S {
        &self.engine
    }

    /// Remove every data source. Safe on an empty scene.
    pub async fn reset(&self) -> Result<(), SceneError> {
        self.engine.remove_all_data_sources().await
    }

    /// Add one trajectory; sources accumulate until the next reset.
    pub async fn load(&self, id: NoradId, document: &TrajectoryDocument) -> Result<(), SceneError> {
        tracing::debug!(norad_id = %id, packets = document.packet_count(), "Loading trajectory");
        self.engine.add_data_source(&source_name(id), document).await
    }

    /// Fly the camera over `position`. Returns `Ok(false)` without touching
    /// the engine when there is no valid position.
    pub async fn focus(&self, position: Option<&GeodeticPosition>) -> Result<bool, SceneError> {
        let Some(position) = position else {
            return Ok(false);
        };

        let target = CameraTarget {
            latitude: position.latitude,
            longitude: position.longitude,
            height_km: position.altitude + self.camera_standoff_km,
        };
        self.engine.fly_to(target).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use serde_json::json;

    fn synchronizer() -> SceneSynchronizer<HeadlessScene> {
        SceneSynchronizer::new(HeadlessScene::new(&SceneConfig::default()), 1000.0)
    }

    #[tokio::test]
    async fn test_reset_on_empty_scene() {
        let sync = synchronizer();
        sync.reset().await.unwrap();
        sync.reset().await.unwrap();
        assert!(sync.engine().source_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_loads_accumulate_until_reset() {
        let sync = synchronizer();
        let document = TrajectoryDocument(json!([{"id": "document"}]));

        sync.load(NoradId(1), &document).await.unwrap();
        sync.load(NoradId(2), &document).await.unwrap();
        assert_eq!(
            sync.engine().source_names().await,
            vec!["satellite-1".to_string(), "satellite-2".to_string()]
        );

        sync.reset().await.unwrap();
        assert!(sync.engine().source_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_focus_adds_standoff() {
        let sync = synchronizer();
        let position = GeodeticPosition::new(51.5, -0.1, 420.0);

        assert!(sync.focus(Some(&position)).await.unwrap());
        assert_eq!(
            sync.engine().camera().await,
            Some(CameraTarget {
                latitude: 51.5,
                longitude: -0.1,
                height_km: 1420.0,
            })
        );
    }

    #[tokio::test]
    async fn test_focus_without_position_is_noop() {
        let sync = synchronizer();
        assert!(!sync.focus(None).await.unwrap());
        assert_eq!(sync.engine().camera().await, None);
    }
}
