use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tagwatch_alert::{doctor as alert_doctor, BatteryCfg};
use tagwatch_geo::{doctor as geo_doctor, Boundaries, BoundaryCfg, Point, ZoneCatalog, ZoneCatalogHandle, ZonesCfg};
use tagwatch_ingest::{Ingestor, MemoryStore, SubjectDirectory};
use tagwatch_notify::{doctor as notify_doctor, Notifier, NotifyCfg, TEST_MESSAGE, TEST_TITLE};

#[derive(Debug, Parser)]
#[command(name = "tagwatch", version, about = "tagwatch - GPS collar telemetry and alerts")]
struct Cli {
    #[arg(long)]
    config: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Doctor,
    /// Feed recorded uploads through decode, storage and alerting.
    Replay {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Where is this point: zone name, property and safe zone.
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// List the zones in the zone directory.
    Zones,
    TestNotify,
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    zones: ZonesCfg,
    boundaries: BoundaryCfg,
    #[serde(default)]
    battery: BatteryCfg,
    #[serde(default)]
    notify: NotifyCfg,
    #[serde(default)]
    subjects: BTreeMap<String, String>,
}

fn load_config(path: &str) -> Result<Config> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
    toml::from_str(&s).context("parse config toml")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.cmd {
        Command::Doctor => doctor(&cfg)?,
        Command::Replay { files } => replay(&cfg, &files).await?,
        Command::Locate { lat, lon } => locate(&cfg, lat, lon),
        Command::Zones => zones(&cfg)?,
        Command::TestNotify => test_notify(&cfg).await?,
    }
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");

    geo_doctor::check_boundaries(&cfg.boundaries)?;
    alert_doctor::check_battery(&cfg.battery)?;
    notify_doctor::check_notify(&cfg.notify)?;
    let subjects = SubjectDirectory::from_cfg(&cfg.subjects)?;
    if subjects.is_empty() {
        warn!("doctor: no [subjects]; every collar will alert as UNKNOWN TAG");
    }

    match geo_doctor::check_zone_dir(&cfg.zones.dir) {
        Ok(n) => info!("doctor: {} zone(s) in {}", n, cfg.zones.dir.display()),
        Err(e) => warn!("doctor: zones unusable, alerts will say \"no zones loaded\": {:#}", e),
    }

    info!("doctor: OK");
    Ok(())
}

async fn replay(cfg: &Config, files: &[PathBuf]) -> Result<()> {
    let subjects = SubjectDirectory::from_cfg(&cfg.subjects)?;
    let notifier = cfg.notify.build()?;
    let store = Arc::new(MemoryStore::new());
    let ingestor = Ingestor::new(
        store.clone(),
        notifier,
        Arc::new(ZoneCatalogHandle::load_or_empty(&cfg.zones.dir)),
        Boundaries::from(&cfg.boundaries),
        cfg.battery.clone(),
        subjects,
        cfg.notify.timeout(),
    );

    let mut rejected = 0;
    for file in files {
        let raw = tokio::fs::read(file).await.with_context(|| format!("read {}", file.display()))?;
        match ingestor.ingest(&raw).await {
            Ok(outcome) => {
                let failed = outcome.alert_failures().count();
                if failed > 0 {
                    println!("{}: {} ({} alert(s) not delivered)", file.display(), outcome.id, failed);
                } else {
                    println!("{}: {}", file.display(), outcome.id);
                }
            }
            Err(e) => {
                rejected += 1;
                println!("{}: rejected: {}", file.display(), e);
            }
        }
    }
    info!("replay: {} stored, {} rejected", store.len().await, rejected);
    anyhow::ensure!(rejected == 0, "{} of {} file(s) rejected", rejected, files.len());
    Ok(())
}

fn locate(cfg: &Config, lat: f64, lon: f64) {
    let zones = ZoneCatalogHandle::load_or_empty(&cfg.zones.dir);
    let boundaries = Boundaries::from(&cfg.boundaries);
    let here = Point::from_lat_lon(lat, lon);
    println!("{}", zones.describe(here));
    println!("on property: {}", boundaries.property.contains(here));
    println!("in safe zone: {}", boundaries.safe_zone.contains(here));
}

fn zones(cfg: &Config) -> Result<()> {
    let dir: &Path = &cfg.zones.dir;
    let catalog = ZoneCatalog::load_dir(dir).with_context(|| format!("load zones from {}", dir.display()))?;
    for zone in catalog.zones() {
        println!("{} ({} vertices)", zone.name, zone.ring.len());
    }
    Ok(())
}

async fn test_notify(cfg: &Config) -> Result<()> {
    let notifier = cfg.notify.build()?;
    notifier.notify(TEST_TITLE, TEST_MESSAGE).await.context("send test notification")?;
    info!("notify: test notification sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn example_config_parses_and_passes_doctor_checks() {
        let cfg: Config = toml::from_str(include_str!("../../../tagwatch.example.toml")).unwrap();
        assert_eq!(cfg.boundaries.property.len(), 6);
        assert_eq!(cfg.battery.utc_offset_hours, 10);
        assert_eq!(SubjectDirectory::from_cfg(&cfg.subjects).unwrap().name(810095), Some("rueger"));
        geo_doctor::check_boundaries(&cfg.boundaries).unwrap();
        alert_doctor::check_battery(&cfg.battery).unwrap();
        notify_doctor::check_notify(&cfg.notify).unwrap();
    }

    #[test]
    fn optional_sections_default() {
        let cfg: Config = toml::from_str(
            r#"
            [zones]
            dir = "named_zones"
            [boundaries]
            property = []
            safe_zone = []
            "#,
        )
        .unwrap();
        assert!(cfg.subjects.is_empty());
        assert_eq!(cfg.battery.low_v, 4.0);
        assert_eq!(cfg.notify.timeout_ms, 20_000);
    }
}
