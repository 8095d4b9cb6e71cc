use async_trait::async_trait;
use orbview_common::TrajectoryDocument;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CameraTarget, SceneEngine};
use crate::config::SceneConfig;
use crate::error::SceneError;

#[derive(Debug, Default)]
struct SceneState {
    sources: Vec<String>,
    camera: Option<CameraTarget>,
    resets: usize,
    reject_loads: bool,
    /// Number of upcoming resets to refuse
    rejected_resets: usize,
}

/// In-memory globe: keeps the data sources and camera a renderer would show.
///
/// Clones share the same scene.
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    state: Arc<RwLock<SceneState>>,
}

impl HeadlessScene {
    /// Engine initialization; the access token arrives here and nowhere else.
    pub fn new(config: &SceneConfig) -> Self {
        if config.access_token.is_empty() {
            tracing::info!("Scene engine initialized without an access token (default imagery)");
        } else {
            tracing::info!("Scene engine initialized with configured access token");
        }

        Self {
            state: Arc::new(RwLock::new(SceneState::default())),
        }
    }

    pub async fn source_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.sources.clone()
    }

    pub async fn camera(&self) -> Option<CameraTarget> {
        self.state.read().await.camera
    }

    pub async fn reset_count(&self) -> usize {
        self.state.read().await.resets
    }

    /// Make subsequent `add_data_source` calls fail, as a renderer rejecting a document would
    pub async fn set_reject_loads(&self, reject: bool) {
        self.state.write().await.reject_loads = reject;
    }

    /// Refuse the next `count` calls to `remove_all_data_sources`, leaving sources in place
    pub async fn reject_next_resets(&self, count: usize) {
        self.state.write().await.rejected_resets = count;
    }
}

#[async_trait]
impl SceneEngine for HeadlessScene {
    async fn add_data_source(&self, name: &str, document: &TrajectoryDocument) -> Result<(), SceneError> {
        let mut state = self.state.write().await;
        if state.reject_loads {
            return Err(SceneError::Rejected {
                operation: "add data source",
                message: format!("{} could not be loaded", name),
            });
        }
        tracing::debug!(packets = document.packet_count(), "Adding data source {}", name);
        state.sources.push(name.to_string());
        Ok(())
    }

    async fn remove_all_data_sources(&self) -> Result<(), SceneError> {
        let mut state = self.state.write().await;
        if state.rejected_resets > 0 {
            state.rejected_resets -= 1;
            return Err(SceneError::Rejected {
                operation: "remove data sources",
                message: "engine busy".to_string(),
            });
        }
        state.sources.clear();
        state.resets += 1;
        Ok(())
    }

    async fn fly_to(&self, target: CameraTarget) -> Result<(), SceneError> {
        tracing::debug!(
            "Camera flying to lat {:.4}, lon {:.4}, height {:.0} km",
            target.latitude,
            target.longitude,
            target.height_km
        );
        self.state.write().await.camera = Some(target);
        Ok(())
    }
}
