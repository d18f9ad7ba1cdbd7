use std::path::Path;

use anyhow::{Context, Result};

use crate::boundary::{BoundaryCfg, LatLon};
use crate::zones::ZoneCatalog;

pub fn check_boundary(name: &str, vertices: &[LatLon]) -> Result<()> {
    anyhow::ensure!(vertices.len() >= 3, "boundaries.{name} must have >= 3 points");
    for (i, v) in vertices.iter().enumerate() {
        anyhow::ensure!(
            v.lat.is_finite() && v.lon.is_finite() && v.lat.abs() <= 90.0 && v.lon.abs() <= 180.0,
            "boundaries.{name}[{i}] coordinates invalid ({}, {})",
            v.lat,
            v.lon
        );
    }
    Ok(())
}

pub fn check_boundaries(cfg: &BoundaryCfg) -> Result<()> {
    check_boundary("property", &cfg.property)?;
    check_boundary("safe_zone", &cfg.safe_zone)?;
    Ok(())
}

/// Loads the zone directory the same way the service will. Returns the zone count.
pub fn check_zone_dir(dir: &Path) -> Result<usize> {
    anyhow::ensure!(dir.is_dir(), "zones.dir is not a dir: {}", dir.display());
    let catalog = ZoneCatalog::load_dir(dir).context("load zone catalog")?;
    Ok(catalog.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ll(lat: f64, lon: f64) -> LatLon {
        LatLon { lat, lon }
    }

    #[test]
    fn too_few_points() {
        let err = check_boundary("property", &[ll(0.0, 0.0), ll(1.0, 1.0)]).unwrap_err();
        assert!(err.to_string().contains("boundaries.property"));
    }

    #[test]
    fn out_of_range_coordinates() {
        assert!(check_boundary("safe_zone", &[ll(0.0, 0.0), ll(91.0, 1.0), ll(1.0, 1.0)]).is_err());
        assert!(check_boundary("safe_zone", &[ll(0.0, 0.0), ll(f64::NAN, 1.0), ll(1.0, 1.0)]).is_err());
    }

    #[test]
    fn good_boundary() {
        assert!(check_boundary("property", &[ll(-31.45, 152.64), ll(-31.46, 152.64), ll(-31.46, 152.65)]).is_ok());
    }

    #[test]
    fn missing_zone_dir() {
        assert!(check_zone_dir(Path::new("/definitely/not/here")).is_err());
    }
}
