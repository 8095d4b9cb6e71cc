//! Domain and wire types shared by the tracking client and the stub service.

pub mod types;

pub use types::{
    parse_current_lla, GeodeticPosition, LookupPayload, NoradId, PositionError, Registration,
    TrajectoryDocument, Visibility, VisibilityParseError,
};
