use orbview_common::{GeodeticPosition, NoradId};
use serde::{Deserialize, Serialize};
use std::fs;

/// One satellite the stub knows about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteFixture {
    pub norad_id: NoradId,

    pub name: String,

    /// Element text, lines separated by `\n`
    pub tle: String,

    pub latitude: f64,
    pub longitude: f64,
    /// Kilometers
    pub altitude: f64,

    /// Already in the registry at startup; otherwise only reachable via fetch-and-save
    #[serde(default)]
    pub registered: bool,
}

impl SatelliteFixture {
    pub fn position(&self) -> GeodeticPosition {
        GeodeticPosition::new(self.latitude, self.longitude, self.altitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubConfig {
    /// Port to bind the server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to bind to all interfaces (0.0.0.0) or just localhost
    #[serde(default = "default_bind_all")]
    pub bind_all: bool,

    /// Enable CORS for cross-origin requests
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    #[serde(default = "default_satellites")]
    pub satellites: Vec<SatelliteFixture>,

    /// Pairs that have line of sight; order does not matter
    #[serde(default = "default_visible_pairs")]
    pub visible_pairs: Vec<[NoradId; 2]>,
}

fn default_port() -> u16 {
    8080
}

fn default_bind_all() -> bool {
    false
}

fn default_enable_cors() -> bool {
    true
}

fn default_satellites() -> Vec<SatelliteFixture> {
    vec![
        SatelliteFixture {
            norad_id: NoradId(25544),
            name: "ISS (ZARYA)".to_string(),
            tle: "1 25544U 98067A   23235.51284918  .00014007  00000-0  25659-3 0  9995\n2 25544  51.6426 355.0105 0003727 342.0009 113.8232 15.49590945412235".to_string(),
            latitude: 51.5,
            longitude: -0.1,
            altitude: 420.0,
            registered: true,
        },
        SatelliteFixture {
            norad_id: NoradId(48274),
            name: "CSS (TIANHE)".to_string(),
            tle: "1 48274U 21035A   23235.50000000  .00020000  00000-0  22000-3 0  9993\n2 48274  41.4740 100.0000 0005000  90.0000 270.0000 15.62000000130000".to_string(),
            latitude: 40.7,
            longitude: -74.0,
            altitude: 550.0,
            registered: false,
        },
    ]
}

fn default_visible_pairs() -> Vec<[NoradId; 2]> {
    vec![[NoradId(25544), NoradId(48274)]]
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_all: default_bind_all(),
            enable_cors: default_enable_cors(),
            satellites: default_satellites(),
            visible_pairs: default_visible_pairs(),
        }
    }
}

impl StubConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;

        let config: StubConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_table() {
        let config: StubConfig = toml::from_str(
            r#"
port = 9000
visible_pairs = [[1, 2]]

[[satellites]]
norad_id = 1
name = "ONE"
tle = "1 00001U"
latitude = 1.0
longitude = 2.0
altitude = 300.0
registered = true
"#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert!(config.enable_cors);
        assert_eq!(config.satellites.len(), 1);
        assert_eq!(config.satellites[0].norad_id, NoradId(1));
        assert_eq!(config.satellites[0].position(), GeodeticPosition::new(1.0, 2.0, 300.0));
        assert_eq!(config.visible_pairs, vec![[NoradId(1), NoradId(2)]]);
    }

    #[test]
    fn test_defaults_include_demo_pair() {
        let config: StubConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.satellites.len(), 2);
        assert_eq!(config.visible_pairs.len(), 1);
    }
}
