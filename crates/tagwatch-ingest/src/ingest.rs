//! Upload handling: decode, persist, then alert.
//!
//! A transmission that fails to decode is refused whole and nothing is
//! stored. Once stored, the upload is a success whatever happens to the
//! alerts; a failed notification leaves its condition where it was and is
//! tried again on the next upload.

use std::sync::Arc;
use std::time::Duration;

use tagwatch_alert::{
    evaluate_battery, evaluate_geofence, latest_analog, latest_location, BatteryCfg, Evaluation,
    OneShot, Subject,
};
use tagwatch_geo::{Boundaries, Point, ZoneCatalogHandle};
use tagwatch_notify::Notifier;
use tagwatch_proto::{decode, Transmission};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::directory::SubjectDirectory;
use crate::error::IngestError;
use crate::store::TxStore;
use crate::txlog;

/// What happened to one accepted upload.
#[derive(Debug)]
pub struct IngestOutcome {
    pub id: String,
    pub subject: Subject,
    pub transmission: Transmission,
    /// Battery conditions first, then geofence. Empty for a kind the upload
    /// did not carry.
    pub evaluations: Vec<Evaluation>,
}

impl IngestOutcome {
    pub fn alert_failures(&self) -> impl Iterator<Item = &tagwatch_alert::AlertError> {
        self.evaluations.iter().filter_map(|e| e.result.as_ref().err())
    }
}

pub struct Ingestor {
    store: Arc<dyn TxStore>,
    notifier: Arc<dyn Notifier>,
    zones: Arc<ZoneCatalogHandle>,
    boundaries: Boundaries,
    battery: BatteryCfg,
    subjects: SubjectDirectory,
    engine: OneShot,
    clock: Arc<dyn Clock>,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn TxStore>,
        notifier: Arc<dyn Notifier>,
        zones: Arc<ZoneCatalogHandle>,
        boundaries: Boundaries,
        battery: BatteryCfg,
        subjects: SubjectDirectory,
        callback_timeout: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            zones,
            boundaries,
            battery,
            subjects,
            engine: OneShot::new(callback_timeout),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &OneShot {
        &self.engine
    }

    pub fn zones(&self) -> &ZoneCatalogHandle {
        &self.zones
    }

    pub async fn ingest(&self, raw: &[u8]) -> Result<IngestOutcome, IngestError> {
        let mut tx = decode(raw).map_err(|e| {
            warn!("ingest: {}", e);
            e
        })?;
        let subject = self.subjects.subject(tx.serial_number);
        if self.subjects.name(tx.serial_number).is_none() {
            warn!("ingest: unknown serial {}", tx.serial_number);
        }
        let now = self.clock.now();
        txlog::log_records(&subject, &tx.records, &self.zones, now);

        let id = self
            .store
            .write_tx(&tx)
            .await
            .map_err(|source| IngestError::Store { serial: tx.serial_number, source })?;
        tx.id = Some(id.clone());
        debug!("ingest: stored {} for {}", id, subject.shout());

        let mut evaluations = Vec::with_capacity(4);
        match latest_analog(&tx) {
            Some((record, block)) => {
                debug!("ingest: battery from seq {}", record.sequence_number);
                let results =
                    evaluate_battery(&self.engine, &*self.notifier, &self.battery, &subject, block, now).await;
                evaluations.extend(results);
            }
            None => debug!("ingest: no analogue block from {}", subject.shout()),
        }
        match latest_location(&tx) {
            Some((record, fix)) => {
                debug!("ingest: position from seq {}", record.sequence_number);
                let zone_text = self.zones.describe(Point::from_lat_lon(fix.latitude, fix.longitude));
                let results = evaluate_geofence(
                    &self.engine,
                    &*self.notifier,
                    &self.boundaries,
                    &subject,
                    fix,
                    &zone_text,
                )
                .await;
                evaluations.extend(results);
            }
            None => debug!("ingest: no usable fix from {}", subject.shout()),
        }

        let outcome = IngestOutcome { id, subject, transmission: tx, evaluations };
        for err in outcome.alert_failures() {
            warn!("ingest: alert not delivered, will retry: {}", err);
        }
        info!(
            "ingest: accepted {} from {} ({} records)",
            outcome.id,
            outcome.subject.shout(),
            outcome.transmission.records.len()
        );
        Ok(outcome)
    }
}
