use std::path::PathBuf;

use thiserror::Error;

/// Problems with one KML document, independent of where it came from.
#[derive(Debug, Error)]
pub enum KmlError {
    #[error("not a KML placemark document: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("Document has no Placemark")]
    NoPlacemark,
    #[error("bad coordinate tuple {0:?}, want lon,lat[,alt]")]
    Coordinate(String),
}

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("reading zone directory {}: {source}", path.display())]
    Dir { path: PathBuf, source: std::io::Error },
    #[error("reading {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{}: {source}", path.display())]
    Kml { path: PathBuf, source: KmlError },
}
