use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tagwatch_geo::{Point, ZoneCatalog, ZoneCatalogHandle, ZoneError, NO_ZONES_LOADED};

fn placemark(name: &str, ring: &[(f64, f64)]) -> String {
    let coords: Vec<String> = ring.iter().map(|(lon, lat)| format!("{lon},{lat},0")).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <kml xmlns=\"http://www.opengis.net/kml/2.2\"><Document><Placemark>\
         <name>{name}</name><Polygon><outerBoundaryIs><LinearRing>\
         <coordinates>{}</coordinates>\
         </LinearRing></outerBoundaryIs></Polygon></Placemark></Document></kml>",
        coords.join(" ")
    )
}

fn square(x0: f64, y0: f64, size: f64) -> Vec<(f64, f64)> {
    vec![(x0, y0), (x0 + size, y0), (x0 + size, y0 + size), (x0, y0 + size), (x0, y0)]
}

fn write(dir: &Path, file: &str, body: &str) {
    fs::write(dir.join(file), body).unwrap();
}

#[test]
fn loads_sorted_by_file_name_and_skips_other_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b_house.kml", &placemark("House", &square(4.0, 4.0, 2.0)));
    write(dir.path(), "a_paddock.kml", &placemark("Paddock", &square(0.0, 0.0, 10.0)));
    write(dir.path(), "notes.txt", "not a zone");

    let catalog = ZoneCatalog::load_dir(dir.path()).unwrap();
    let names: Vec<_> = catalog.zones().iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["Paddock", "House"]);
    // Overlap resolves to load order, not the smaller zone.
    assert_eq!(catalog.locate(Point::new(5.0, 5.0)), "Paddock");
    assert_eq!(catalog.locate(Point::new(1.0, 1.0)), "Paddock");
    assert_eq!(catalog.locate(Point::new(20.0, 1.0)), "Not in any known zone.");
}

#[test]
fn one_bad_file_fails_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.kml", &placemark("Good", &square(0.0, 0.0, 1.0)));
    write(dir.path(), "b.kml", "<kml><Document><Placemark><name>x</name></Placemark></Document></kml>");

    match ZoneCatalog::load_dir(dir.path()) {
        Err(ZoneError::Kml { path, .. }) => assert!(path.ends_with("b.kml")),
        other => panic!("expected Kml error, got {other:?}"),
    }
}

#[test]
fn missing_directory_leaves_handle_empty() {
    let handle = ZoneCatalogHandle::load_or_empty("/no/such/zone/dir");
    assert!(!handle.is_loaded());
    assert_eq!(handle.describe(Point::new(0.0, 0.0)), NO_ZONES_LOADED);
}

#[test]
fn reload_swaps_and_failed_reload_keeps_previous() {
    let good = tempfile::tempdir().unwrap();
    write(good.path(), "zone.kml", &placemark("Yard", &square(0.0, 0.0, 10.0)));
    let bad = tempfile::tempdir().unwrap();
    write(bad.path(), "zone.kml", "<<<");

    let handle = ZoneCatalogHandle::empty();
    assert_eq!(handle.reload(good.path()).unwrap(), 1);
    assert_eq!(handle.describe(Point::new(5.0, 5.0)), "Last seen Yard");

    assert!(handle.reload(bad.path()).is_err());
    assert_eq!(handle.describe(Point::new(5.0, 5.0)), "Last seen Yard");
}

#[test]
fn readers_see_whole_catalogs_during_reload() {
    let a = tempfile::tempdir().unwrap();
    write(a.path(), "1.kml", &placemark("A1", &square(0.0, 0.0, 10.0)));
    write(a.path(), "2.kml", &placemark("A2", &square(20.0, 0.0, 10.0)));
    let b = tempfile::tempdir().unwrap();
    write(b.path(), "1.kml", &placemark("B1", &square(0.0, 0.0, 10.0)));
    write(b.path(), "2.kml", &placemark("B2", &square(20.0, 0.0, 10.0)));

    let handle = Arc::new(ZoneCatalogHandle::empty());
    handle.reload(a.path()).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = Arc::clone(&handle);
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let snap = handle.snapshot().unwrap();
                    let left = snap.locate(Point::new(5.0, 5.0)).to_string();
                    let right = snap.locate(Point::new(25.0, 5.0)).to_string();
                    assert_eq!(left[..1], right[..1], "mixed catalogs: {left} / {right}");
                }
            })
        })
        .collect();

    for i in 0..50 {
        let dir = if i % 2 == 0 { b.path() } else { a.path() };
        handle.reload(dir).unwrap();
    }
    for r in readers {
        r.join().unwrap();
    }
}
