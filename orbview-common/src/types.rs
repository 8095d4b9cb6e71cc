use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Satellite catalog (NORAD) number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoradId(pub u32);

impl std::fmt::Display for NoradId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoradId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(NoradId)
            .map_err(|_| format!("Not a catalog number: {:?}", s))
    }
}

impl From<u32> for NoradId {
    fn from(value: u32) -> Self {
        NoradId(value)
    }
}

/// Latitude/longitude in degrees, altitude in kilometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeodeticPosition {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Wire form used in `currentLLA`
    pub fn to_triple(&self) -> [f64; 3] {
        [self.latitude, self.longitude, self.altitude]
    }
}

impl std::fmt::Display for GeodeticPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat {:.4}°, lon {:.4}°, alt {:.1} km",
            self.latitude, self.longitude, self.altitude
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("position payload is not an array of [lat, lon, alt] triples")]
    NotAnArray,
    #[error("position payload contains no samples")]
    Empty,
    #[error("position sample has {0} components, expected 3")]
    WrongArity(usize),
    #[error("position component {0} is not a number")]
    NonNumeric(usize),
}

/// Validate a `currentLLA` payload.
///
/// The canonical shape is an array of `[lat, lon, alt]` triples; only the first
/// sample is used. A flat triple, an empty array, or a sample whose length is
/// not exactly 3 is rejected rather than guessed at.
pub fn parse_current_lla(payload: &Value) -> Result<GeodeticPosition, PositionError> {
    let samples = payload.as_array().ok_or(PositionError::NotAnArray)?;
    let first = samples.first().ok_or(PositionError::Empty)?;
    let components = first.as_array().ok_or(PositionError::NotAnArray)?;

    if components.len() != 3 {
        return Err(PositionError::WrongArity(components.len()));
    }

    let mut values = [0.0_f64; 3];
    for (index, component) in components.iter().enumerate() {
        values[index] = component
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or(PositionError::NonNumeric(index))?;
    }

    Ok(GeodeticPosition::new(values[0], values[1], values[2]))
}

/// Body of `GET /satellite/{id}/tle`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupPayload {
    pub tle: String,

    /// Kept raw; shape is validated by [`parse_current_lla`]
    #[serde(rename = "currentLLA", default)]
    pub current_lla: Value,
}

/// Echo returned by the registry after fetch-and-save
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub satid: Option<NoradId>,
    #[serde(default)]
    pub satname: Option<String>,
    #[serde(default)]
    pub tle: Option<String>,
}

/// Opaque timed-position document (CZML)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrajectoryDocument(pub Value);

impl TrajectoryDocument {
    /// Number of CZML packets, when the document is a packet array
    pub fn packet_count(&self) -> usize {
        self.0.as_array().map(Vec::len).unwrap_or(0)
    }
}

/// Mutual line-of-sight answer from the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    NotVisible,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("unrecognized visibility reply: {0:?}")]
pub struct VisibilityParseError(pub String);

fn visibility_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*visibility\s*:\s*(true|false)\s*$").expect("static regex")
    })
}

impl Visibility {
    pub fn from_reply(text: &str) -> Result<Self, VisibilityParseError> {
        let captures = visibility_pattern()
            .captures(text)
            .ok_or_else(|| VisibilityParseError(text.to_string()))?;

        if captures[1].eq_ignore_ascii_case("true") {
            Ok(Visibility::Visible)
        } else {
            Ok(Visibility::NotVisible)
        }
    }

    pub fn to_reply(&self) -> String {
        format!("Visibility: {}", matches!(self, Visibility::Visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_norad_id_parsing() {
        assert_eq!("25544".parse::<NoradId>(), Ok(NoradId(25544)));
        assert_eq!(" 48274 ".parse::<NoradId>(), Ok(NoradId(48274)));
        assert!("ISS".parse::<NoradId>().is_err());
        assert!("".parse::<NoradId>().is_err());
        assert!("25544.5".parse::<NoradId>().is_err());
    }

    #[test]
    fn test_current_lla_array_of_triples() {
        let position = parse_current_lla(&json!([[51.5, -0.1, 420.0], [51.6, 0.2, 421.0]])).unwrap();
        assert_eq!(position, GeodeticPosition::new(51.5, -0.1, 420.0));
    }

    #[test]
    fn test_current_lla_integer_components() {
        let position = parse_current_lla(&json!([[40, -74, 550]])).unwrap();
        assert_eq!(position, GeodeticPosition::new(40.0, -74.0, 550.0));
    }

    #[test]
    fn test_current_lla_rejects_other_shapes() {
        assert_eq!(
            parse_current_lla(&json!([51.5, -0.1, 420.0])),
            Err(PositionError::NotAnArray)
        );
        assert_eq!(parse_current_lla(&json!([])), Err(PositionError::Empty));
        assert_eq!(
            parse_current_lla(&json!([[51.5, -0.1]])),
            Err(PositionError::WrongArity(2))
        );
        assert_eq!(
            parse_current_lla(&json!([[51.5, -0.1, 420.0, 0.0]])),
            Err(PositionError::WrongArity(4))
        );
        assert_eq!(
            parse_current_lla(&json!([[51.5, null, 420.0]])),
            Err(PositionError::NonNumeric(1))
        );
        assert_eq!(parse_current_lla(&Value::Null), Err(PositionError::NotAnArray));
    }

    #[test]
    fn test_lookup_payload_without_position() {
        let payload: LookupPayload = serde_json::from_str(r#"{"tle":"1 25544U"}"#).unwrap();
        assert_eq!(payload.tle, "1 25544U");
        assert!(payload.current_lla.is_null());
    }

    #[test]
    fn test_visibility_reply() {
        assert_eq!(Visibility::from_reply("Visibility: true"), Ok(Visibility::Visible));
        assert_eq!(Visibility::from_reply("Visibility: false"), Ok(Visibility::NotVisible));
        assert_eq!(Visibility::from_reply("  visibility:TRUE\n"), Ok(Visibility::Visible));
        assert!(Visibility::from_reply("Visible").is_err());
        assert!(Visibility::from_reply("Visibility: maybe").is_err());
        assert_eq!(Visibility::NotVisible.to_reply(), "Visibility: false");
    }
}
