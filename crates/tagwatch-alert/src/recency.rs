//! Which reading of a transmission feeds each alert.
//!
//! Records arrive in any order, so recency is the sequence number, not the
//! array position. Each reading kind is picked on its own: the newest record
//! *carrying that kind* wins, records without it don't take part. Equal
//! sequence numbers keep the earlier record.

use tagwatch_proto::{AnalogBlock, LocationFix, Record, Transmission};
use tracing::warn;

fn latest_by<'r, T: 'r>(
    records: &'r [Record],
    pick: impl Fn(&'r Record) -> Option<&'r T>,
) -> Option<(&'r Record, &'r T)> {
    let mut best: Option<(&'r Record, &'r T)> = None;
    for record in records {
        let Some(reading) = pick(record) else { continue };
        match best {
            Some((b, _)) if b.sequence_number >= record.sequence_number => {}
            _ => best = Some((record, reading)),
        }
    }
    best
}

/// Newest analogue block, for battery checks.
pub fn latest_analog(tx: &Transmission) -> Option<(&Record, &AnalogBlock)> {
    latest_by(&tx.records, Record::analog)
}

/// Newest usable fix, for geofence checks. Fixes with a zero coordinate are
/// skipped.
pub fn latest_location(tx: &Transmission) -> Option<(&Record, &LocationFix)> {
    latest_by(&tx.records, |record| {
        let fix = record.location()?;
        if fix.is_bogus() {
            warn!(
                "recency: serial {} seq {} has bogus fix {},{}; skipped",
                tx.serial_number, record.sequence_number, fix.latitude, fix.longitude
            );
            return None;
        }
        Some(fix)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagwatch_proto::Reading;
    use time::macros::datetime;

    fn analog(mv: i64) -> Reading {
        Reading::Analog(AnalogBlock {
            internal_battery_mv: mv,
            temperature: 0,
            last_signal_quality: 0,
            loaded_voltage_mv: 0,
        })
    }

    fn fix(lat: f64, lon: f64) -> Reading {
        Reading::Location(LocationFix {
            speed: 0,
            speed_accuracy: 0,
            heading: 0,
            fix_status: 7,
            fix_time: datetime!(2024-03-01 10:00:00 UTC),
            latitude: lat,
            longitude: lon,
            altitude: 0,
            position_accuracy: 0,
            pdop: 0,
        })
    }

    fn record(seq: i64, readings: Vec<Reading>) -> Record {
        Record {
            sequence_number: seq,
            reason_code: 11,
            device_time: datetime!(2024-03-01 10:00:00 UTC),
            readings,
        }
    }

    fn tx(records: Vec<Record>) -> Transmission {
        Transmission {
            id: None,
            serial_number: 810095,
            imei: String::new(),
            iccid: String::new(),
            product_id: 97,
            firmware: String::new(),
            records,
        }
    }

    #[test]
    fn highest_sequence_among_records_with_the_kind() {
        let t = tx(vec![
            record(5, vec![analog(4100)]),
            record(9, vec![fix(-31.0, 152.0)]),
            record(7, vec![analog(3900)]),
        ]);
        let (rec, block) = latest_analog(&t).unwrap();
        assert_eq!(rec.sequence_number, 7);
        assert_eq!(block.internal_battery_mv, 3900);

        let (rec, _) = latest_location(&t).unwrap();
        assert_eq!(rec.sequence_number, 9);
    }

    #[test]
    fn none_when_kind_absent() {
        let t = tx(vec![record(1, vec![]), record(2, vec![fix(-31.0, 152.0)])]);
        assert!(latest_analog(&t).is_none());
    }

    #[test]
    fn zero_sequence_still_counts() {
        let t = tx(vec![record(0, vec![analog(4000)])]);
        assert_eq!(latest_analog(&t).map(|(r, _)| r.sequence_number), Some(0));
    }

    #[test]
    fn ties_keep_the_first() {
        let t = tx(vec![record(4, vec![analog(1)]), record(4, vec![analog(2)])]);
        assert_eq!(latest_analog(&t).map(|(_, b)| b.internal_battery_mv), Some(1));
    }

    #[test]
    fn bogus_fixes_are_skipped() {
        let t = tx(vec![
            record(3, vec![fix(-31.0, 152.0)]),
            record(8, vec![fix(0.0, 0.0)]),
            record(6, vec![fix(-31.5, 0.0)]),
        ]);
        let (rec, f) = latest_location(&t).unwrap();
        assert_eq!(rec.sequence_number, 3);
        assert_eq!(f.latitude, -31.0);
    }
}
