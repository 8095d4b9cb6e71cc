use orbview_common::NoradId;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::config::{SatelliteFixture, StubConfig};

/// In-memory stand-in for the satellite registry and its upstream TLE source
pub struct Catalog {
    /// Everything fetch-and-save can find
    upstream: HashMap<NoradId, SatelliteFixture>,

    /// What lookups can see
    registered: RwLock<HashSet<NoradId>>,

    /// Normalized so the smaller id comes first
    visible_pairs: HashSet<(NoradId, NoradId)>,
}

fn normalize(a: NoradId, b: NoradId) -> (NoradId, NoradId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Catalog {
    pub fn from_config(config: &StubConfig) -> Self {
        let upstream: HashMap<NoradId, SatelliteFixture> = config
            .satellites
            .iter()
            .map(|fixture| (fixture.norad_id, fixture.clone()))
            .collect();

        let registered = config
            .satellites
            .iter()
            .filter(|fixture| fixture.registered)
            .map(|fixture| fixture.norad_id)
            .collect();

        let visible_pairs = config
            .visible_pairs
            .iter()
            .map(|[a, b]| normalize(*a, *b))
            .collect();

        Self {
            upstream,
            registered: RwLock::new(registered),
            visible_pairs,
        }
    }

    /// Fixture for `id` if it is in the registry
    pub async fn registered(&self, id: NoradId) -> Option<&SatelliteFixture> {
        if self.registered.read().await.contains(&id) {
            self.upstream.get(&id)
        } else {
            None
        }
    }

    /// Fetch-and-save: registers `id` if the upstream source knows it
    pub async fn register(&self, id: NoradId) -> Option<&SatelliteFixture> {
        let fixture = self.upstream.get(&id)?;
        if self.registered.write().await.insert(id) {
            tracing::info!(norad_id = %id, "Registered {}", fixture.name);
        }
        Some(fixture)
    }

    pub fn is_visible(&self, a: NoradId, b: NoradId) -> bool {
        self.visible_pairs.contains(&normalize(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registration_flow() {
        let catalog = Catalog::from_config(&StubConfig::default());

        assert!(catalog.registered(NoradId(25544)).await.is_some());
        assert!(catalog.registered(NoradId(48274)).await.is_none());

        assert!(catalog.register(NoradId(48274)).await.is_some());
        assert!(catalog.registered(NoradId(48274)).await.is_some());

        assert!(catalog.register(NoradId(99999)).await.is_none());
        assert!(catalog.registered(NoradId(99999)).await.is_none());
    }

    #[test]
    fn test_visibility_is_symmetric() {
        let catalog = Catalog::from_config(&StubConfig::default());
        assert!(catalog.is_visible(NoradId(25544), NoradId(48274)));
        assert!(catalog.is_visible(NoradId(48274), NoradId(25544)));
        assert!(!catalog.is_visible(NoradId(25544), NoradId(1)));
    }
}
