use serde::{Deserialize, Serialize};

use crate::poly::{self, Point};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<LatLon> for Point {
    fn from(v: LatLon) -> Self {
        Point::from_lat_lon(v.lat, v.lon)
    }
}

/// `[boundaries]` section: the two fixed geofences, as lat/lon vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryCfg {
    pub property: Vec<LatLon>,
    pub safe_zone: Vec<LatLon>,
}

/// An unnamed polygon used only for inside/outside alerting.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    ring: Vec<Point>,
}

impl Boundary {
    pub fn new(vertices: &[LatLon]) -> Self {
        Self { ring: vertices.iter().copied().map(Point::from).collect() }
    }

    pub fn contains(&self, point: Point) -> bool {
        poly::contains(&self.ring, point)
    }

    pub fn ring(&self) -> &[Point] {
        &self.ring
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    pub property: Boundary,
    pub safe_zone: Boundary,
}

impl From<&BoundaryCfg> for Boundaries {
    fn from(cfg: &BoundaryCfg) -> Self {
        Self {
            property: Boundary::new(&cfg.property),
            safe_zone: Boundary::new(&cfg.safe_zone),
        }
    }
}
