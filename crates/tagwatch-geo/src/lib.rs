pub mod boundary;
pub mod doctor;
pub mod error;
pub mod poly;
pub mod zones;

pub use boundary::{Boundaries, Boundary, BoundaryCfg, LatLon};
pub use error::{KmlError, ZoneError};
pub use poly::{contains, Point};
pub use zones::{Zone, ZoneCatalog, ZoneCatalogHandle, NOT_IN_ANY_ZONE, NO_ZONES_LOADED};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ZonesCfg {
    /// Directory of `*.kml` files.
    pub dir: std::path::PathBuf,
}
