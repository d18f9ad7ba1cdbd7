//! Named zones loaded from a directory of KML files.
//!
//! Each file holds one `Document > Placemark` with a name and a polygon outer
//! boundary, the shape Google Earth / My Maps exports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{KmlError, ZoneError};
use crate::poly::{self, Point};

pub const NOT_IN_ANY_ZONE: &str = "Not in any known zone.";
pub const NO_ZONES_LOADED: &str = "<No zones loaded>";

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub name: String,
    /// Ring vertices, `x` = longitude, `y` = latitude. Altitude is dropped.
    pub ring: Vec<Point>,
}

impl Zone {
    pub fn from_kml(text: &str) -> Result<Zone, KmlError> {
        let doc: Kml = quick_xml::de::from_str(text)?;
        let placemark = doc
            .document
            .placemarks
            .into_iter()
            .next()
            .ok_or(KmlError::NoPlacemark)?;
        let ring = parse_coordinates(&placemark.polygon.outer.ring.coordinates)?;
        Ok(Zone { name: placemark.name.trim().to_string(), ring })
    }

    pub fn contains(&self, point: Point) -> bool {
        poly::contains(&self.ring, point)
    }
}

#[derive(Deserialize)]
struct Kml {
    #[serde(rename = "Document")]
    document: KmlDocument,
}

#[derive(Deserialize)]
struct KmlDocument {
    #[serde(rename = "Placemark", default)]
    placemarks: Vec<KmlPlacemark>,
}

#[derive(Deserialize)]
struct KmlPlacemark {
    name: String,
    #[serde(rename = "Polygon")]
    polygon: KmlPolygon,
}

#[derive(Deserialize)]
struct KmlPolygon {
    #[serde(rename = "outerBoundaryIs")]
    outer: KmlOuterBoundary,
}

#[derive(Deserialize)]
struct KmlOuterBoundary {
    #[serde(rename = "LinearRing")]
    ring: KmlLinearRing,
}

#[derive(Deserialize)]
struct KmlLinearRing {
    coordinates: String,
}

/// Whitespace separated `lon,lat[,alt]` tuples.
fn parse_coordinates(text: &str) -> Result<Vec<Point>, KmlError> {
    text.split_whitespace()
        .map(|tuple| {
            let bad = || KmlError::Coordinate(tuple.to_string());
            let mut parts = tuple.split(',');
            let lon: f64 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
            let lat: f64 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
            if let Some(alt) = parts.next() {
                alt.parse::<f64>().map_err(|_| bad())?;
            }
            if parts.next().is_some() {
                return Err(bad());
            }
            Ok(Point::from_lat_lon(lat, lon))
        })
        .collect()
}

/// Zones in load order. Overlaps resolve to the first match.
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Loads every `*.kml` in `dir`, sorted by file name. One bad file fails
    /// the whole catalog.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ZoneError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| ZoneError::Dir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ZoneError::Dir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "kml") {
                files.push(path);
            }
        }
        files.sort();

        let mut zones = Vec::with_capacity(files.len());
        for path in files {
            let text = std::fs::read_to_string(&path).map_err(|source| ZoneError::Read {
                path: path.clone(),
                source,
            })?;
            let zone = Zone::from_kml(&text).map_err(|source| ZoneError::Kml {
                path: path.clone(),
                source,
            })?;
            if zone.ring.len() < 3 {
                warn!("zones: {} has {} vertices and will never match", path.display(), zone.ring.len());
            }
            debug!("zones: loaded {:?} from {}", zone.name, path.display());
            zones.push(zone);
        }
        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// First zone containing `point`, in load order.
    pub fn find(&self, point: Point) -> Option<&Zone> {
        self.zones.iter().find(|z| z.contains(point))
    }

    /// Name of the first containing zone, or "Not in any known zone."
    pub fn locate(&self, point: Point) -> &str {
        self.find(point).map_or(NOT_IN_ANY_ZONE, |z| z.name.as_str())
    }
}

/// Shared, swappable catalog. `None` inside means nothing is loaded; readers
/// always see either the old catalog or the new one, never a mix.
#[derive(Debug, Default)]
pub struct ZoneCatalogHandle {
    current: ArcSwapOption<ZoneCatalog>,
}

impl ZoneCatalogHandle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: ZoneCatalog) -> Self {
        Self { current: ArcSwapOption::from_pointee(catalog) }
    }

    /// Loads `dir` at startup. A failure is logged and leaves the handle
    /// empty; the service carries on without zone names.
    pub fn load_or_empty(dir: impl AsRef<Path>) -> Self {
        let handle = Self::empty();
        if let Err(e) = handle.reload(dir) {
            warn!("zones: {e}; continuing with no zones loaded");
        }
        handle
    }

    /// Replaces the whole catalog. On error the previous one stays in place.
    pub fn reload(&self, dir: impl AsRef<Path>) -> Result<usize, ZoneError> {
        let dir = dir.as_ref();
        let catalog = ZoneCatalog::load_dir(dir)?;
        let n = catalog.len();
        self.current.store(Some(Arc::new(catalog)));
        info!("zones: loaded {} zone(s) from {}", n, dir.display());
        Ok(n)
    }

    pub fn snapshot(&self) -> Option<Arc<ZoneCatalog>> {
        self.current.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Text used in alerts and logs for where `point` is.
    pub fn describe(&self, point: Point) -> String {
        match self.current.load().as_deref() {
            Some(catalog) => format!("Last seen {}", catalog.locate(point)),
            None => NO_ZONES_LOADED.to_string(),
        }
    }

    /// Bare zone name for `point`, or the no-zones placeholder.
    pub fn name_for(&self, point: Point) -> String {
        match self.current.load().as_deref() {
            Some(catalog) => catalog.locate(point).to_string(),
            None => NO_ZONES_LOADED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kml(name: &str, coords: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>{name} export</name>
    <Placemark>
      <name>{name}</name>
      <styleUrl>#poly-000000</styleUrl>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <tessellate>1</tessellate>
            <coordinates>
              {coords}
            </coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#
        )
    }

    #[test]
    fn parses_placemark() {
        let zone = Zone::from_kml(&kml(
            "Top paddock",
            "152.641,-31.457,0 152.643,-31.457,0 152.643,-31.459,0 152.641,-31.459,0 152.641,-31.457,0",
        ))
        .unwrap();
        assert_eq!(zone.name, "Top paddock");
        assert_eq!(zone.ring.len(), 5);
        assert_eq!(zone.ring[0], Point { x: 152.641, y: -31.457 });
        assert!(zone.contains(Point::from_lat_lon(-31.458, 152.642)));
        assert!(!zone.contains(Point::from_lat_lon(-31.458, 152.650)));
    }

    #[test]
    fn altitude_is_optional() {
        let zone = Zone::from_kml(&kml("Flat", "1,1 2,1 2,2")).unwrap();
        assert_eq!(zone.ring, vec![Point::new(1.0, 1.0), Point::new(2.0, 1.0), Point::new(2.0, 2.0)]);
    }

    #[test]
    fn bad_tuple_is_an_error() {
        let err = Zone::from_kml(&kml("Bad", "1,1,0 banana 2,2,0")).unwrap_err();
        assert!(matches!(err, KmlError::Coordinate(ref t) if t == "banana"));
    }

    #[test]
    fn missing_placemark_is_an_error() {
        let err = Zone::from_kml("<kml><Document><name>x</name></Document></kml>").unwrap_err();
        assert!(matches!(err, KmlError::NoPlacemark));
    }

    #[test]
    fn locate_is_first_match() {
        let big = Zone {
            name: "Big".into(),
            ring: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)],
        };
        let small = Zone {
            name: "Small".into(),
            ring: vec![Point::new(4.0, 4.0), Point::new(6.0, 4.0), Point::new(6.0, 6.0), Point::new(4.0, 6.0)],
        };
        let catalog = ZoneCatalog::new(vec![big.clone(), small.clone()]);
        assert_eq!(catalog.locate(Point::new(5.0, 5.0)), "Big");
        let catalog = ZoneCatalog::new(vec![small, big]);
        assert_eq!(catalog.locate(Point::new(5.0, 5.0)), "Small");
        assert_eq!(catalog.locate(Point::new(50.0, 5.0)), NOT_IN_ANY_ZONE);
    }

    #[test]
    fn empty_handle_uses_placeholder() {
        let handle = ZoneCatalogHandle::empty();
        assert!(!handle.is_loaded());
        assert_eq!(handle.describe(Point::new(1.0, 1.0)), NO_ZONES_LOADED);
    }

    #[test]
    fn loaded_handle_describes_location() {
        let handle = ZoneCatalogHandle::with_catalog(ZoneCatalog::new(vec![]));
        assert_eq!(handle.describe(Point::new(1.0, 1.0)), "Last seen Not in any known zone.");
    }
}
