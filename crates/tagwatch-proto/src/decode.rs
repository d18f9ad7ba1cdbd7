//! Wire JSON -> [`Transmission`].
//!
//! Each entry of a record's `Fields` array is one of four shapes, chosen by its
//! `FType`. The shape can't be known until `FType` has been read, so every
//! entry is held as a raw `serde_json::Value`, probed for the discriminant, and
//! then deserialized a second time into the matching wire struct.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analog::map_channels;
use crate::error::DecodeError;
use crate::lenient::{int, LenientInt};
use crate::model::{
    DigitalIo, LocationFix, Reading, ReadingKind, Record, Transmission, TripSummary,
};
use crate::reason::ReasonCode;
use crate::timestamp::parse_device_time;

#[derive(Deserialize)]
struct WireTransmission {
    #[serde(rename = "SerNo", deserialize_with = "int")]
    serial_number: i64,
    #[serde(rename = "IMEI", default)]
    imei: String,
    #[serde(rename = "ICCID", default)]
    iccid: String,
    #[serde(rename = "ProdId", default, deserialize_with = "int")]
    product_id: i64,
    #[serde(rename = "FW", default)]
    firmware: String,
    #[serde(rename = "Records")]
    records: Vec<Value>,
}

#[derive(Deserialize)]
struct WireRecord {
    #[serde(rename = "SeqNo", deserialize_with = "int")]
    sequence_number: i64,
    #[serde(rename = "Reason", deserialize_with = "int")]
    reason_code: i64,
    #[serde(rename = "DateUTC")]
    device_time: String,
    #[serde(rename = "Fields", default)]
    fields: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct Discriminant {
    #[serde(rename = "FType", deserialize_with = "int")]
    kind: i64,
}

#[derive(Deserialize)]
struct WireLocation {
    #[serde(rename = "Spd", deserialize_with = "int")]
    speed: i64,
    #[serde(rename = "SpdAcc", deserialize_with = "int")]
    speed_accuracy: i64,
    #[serde(rename = "Head", deserialize_with = "int")]
    heading: i64,
    #[serde(rename = "GpsStat", deserialize_with = "int")]
    fix_status: i64,
    #[serde(rename = "GpsUTC")]
    fix_time: String,
    #[serde(rename = "Lat")]
    latitude: f64,
    #[serde(rename = "Long")]
    longitude: f64,
    #[serde(rename = "Alt", deserialize_with = "int")]
    altitude: i64,
    #[serde(rename = "PosAcc", deserialize_with = "int")]
    position_accuracy: i64,
    #[serde(rename = "PDOP", deserialize_with = "int")]
    pdop: i64,
}

#[derive(Deserialize)]
struct WireDigitalIo {
    #[serde(rename = "DIn", deserialize_with = "int")]
    inputs: i64,
    #[serde(rename = "DOut", deserialize_with = "int")]
    outputs: i64,
    #[serde(rename = "DevStat", deserialize_with = "int")]
    device_status: i64,
}

#[derive(Deserialize)]
struct WireAnalog {
    #[serde(rename = "AnalogueData")]
    channels: BTreeMap<String, LenientInt>,
}

#[derive(Deserialize)]
struct WireTrip {
    #[serde(rename = "TT", deserialize_with = "int")]
    trip_type: i64,
    #[serde(rename = "Trim", deserialize_with = "int")]
    trim: i64,
}

/// Decodes one uploaded transmission. Any failure rejects the whole thing.
pub fn decode(raw: &[u8]) -> Result<Transmission, DecodeError> {
    let wire: WireTransmission =
        serde_json::from_slice(raw).map_err(|source| DecodeError::Envelope { source })?;

    let records = wire
        .records
        .iter()
        .enumerate()
        .map(|(idx, value)| decode_record(idx, value))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "decode: serial {} carried {} record(s)",
        wire.serial_number,
        records.len()
    );

    Ok(Transmission {
        id: None,
        serial_number: wire.serial_number,
        imei: wire.imei,
        iccid: wire.iccid,
        product_id: wire.product_id,
        firmware: wire.firmware,
        records,
    })
}

fn decode_record(record: usize, value: &Value) -> Result<Record, DecodeError> {
    let wire = WireRecord::deserialize(value).map_err(|source| DecodeError::Record { record, source })?;

    let device_time = parse_device_time(&wire.device_time).map_err(|source| DecodeError::DeviceTime {
        record,
        value: wire.device_time.clone(),
        source,
    })?;

    if ReasonCode::from_code(wire.reason_code).is_none() {
        warn!(
            "decode: record {} (seq {}) has unknown reason code {}",
            record, wire.sequence_number, wire.reason_code
        );
    }

    let fields = wire.fields.unwrap_or_default();
    let mut readings = Vec::with_capacity(fields.len());
    for (reading, field) in fields.iter().enumerate() {
        let decoded = decode_reading(record, reading, field)?;
        if readings.iter().any(|r: &Reading| r.kind() == decoded.kind()) {
            warn!(
                "decode: record {} (seq {}) repeats {:?}; the first one wins",
                record,
                wire.sequence_number,
                decoded.kind()
            );
        }
        readings.push(decoded);
    }

    Ok(Record {
        sequence_number: wire.sequence_number,
        reason_code: wire.reason_code,
        device_time,
        readings,
    })
}

fn decode_reading(record: usize, reading: usize, value: &Value) -> Result<Reading, DecodeError> {
    let tag = Discriminant::deserialize(value).map_err(|source| DecodeError::Discriminant {
        record,
        reading,
        source,
    })?;
    let kind = ReadingKind::from_discriminant(tag.kind).ok_or(DecodeError::UnknownKind {
        record,
        reading,
        kind: tag.kind,
    })?;
    let shape = |source| DecodeError::Reading { record, reading, kind, source };

    let decoded = match kind {
        ReadingKind::Location => {
            let w = WireLocation::deserialize(value).map_err(shape)?;
            let fix_time = parse_device_time(&w.fix_time).map_err(|source| DecodeError::FixTime {
                record,
                reading,
                value: w.fix_time.clone(),
                source,
            })?;
            Reading::Location(LocationFix {
                speed: w.speed,
                speed_accuracy: w.speed_accuracy,
                heading: w.heading,
                fix_status: w.fix_status,
                fix_time,
                latitude: w.latitude,
                longitude: w.longitude,
                altitude: w.altitude,
                position_accuracy: w.position_accuracy,
                pdop: w.pdop,
            })
        }
        ReadingKind::DigitalIo => {
            let w = WireDigitalIo::deserialize(value).map_err(shape)?;
            Reading::DigitalIo(DigitalIo {
                inputs: w.inputs,
                outputs: w.outputs,
                device_status: w.device_status,
            })
        }
        ReadingKind::Analog => {
            let w = WireAnalog::deserialize(value).map_err(shape)?;
            let block = map_channels(&w.channels).map_err(|channel| DecodeError::MissingChannel {
                record,
                reading,
                channel,
            })?;
            Reading::Analog(block)
        }
        ReadingKind::Trip => {
            let w = WireTrip::deserialize(value).map_err(shape)?;
            Reading::Trip(TripSummary {
                trip_type: w.trip_type,
                trim: w.trim,
            })
        }
    };
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn one_record(fields: Value) -> Vec<u8> {
        json!({
            "SerNo": 810095,
            "Records": [{
                "SeqNo": 1,
                "Reason": 11,
                "DateUTC": "2023-10-21 23:21:42",
                "Fields": fields
            }]
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn optional_envelope_fields_default() {
        let tx = decode(&one_record(json!([]))).unwrap();
        assert_eq!(tx.imei, "");
        assert_eq!(tx.product_id, 0);
        assert_eq!(tx.records[0].readings.len(), 0);
    }

    #[test]
    fn missing_fields_array_is_empty() {
        let raw = br#"{"SerNo":1,"Records":[{"SeqNo":3,"Reason":2,"DateUTC":"2023-10-21 23:21:42"}]}"#;
        let tx = decode(raw).unwrap();
        assert!(tx.records[0].readings.is_empty());
    }

    #[test]
    fn missing_discriminant_is_reported() {
        let err = decode(&one_record(json!([{ "DIn": 1, "DOut": 0, "DevStat": 1 }]))).unwrap_err();
        assert!(matches!(err, DecodeError::Discriminant { record: 0, reading: 0, .. }));
    }

    #[test]
    fn missing_variant_field_is_reported() {
        let err = decode(&one_record(json!([{ "TT": 2, "FType": 15 }]))).unwrap_err();
        match err {
            DecodeError::Reading { kind, reading, .. } => {
                assert_eq!(kind, ReadingKind::Trip);
                assert_eq!(reading, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_analog_channel_is_reported() {
        let err = decode(&one_record(json!([
            { "AnalogueData": { "1": 4100, "3": 3500, "5": 4500 }, "FType": 6 }
        ])))
        .unwrap_err();
        assert!(matches!(err, DecodeError::MissingChannel { channel: "4", .. }));
    }

    #[test]
    fn duplicate_kinds_are_kept_in_order() {
        let tx = decode(&one_record(json!([
            { "TT": 1, "Trim": 10, "FType": 15 },
            { "TT": 2, "Trim": 20, "FType": 15 }
        ])))
        .unwrap();
        let record = &tx.records[0];
        assert_eq!(record.readings.len(), 2);
        assert_eq!(record.trip(), Some(&TripSummary { trip_type: 1, trim: 10 }));
    }

    #[test]
    fn unknown_reason_is_soft() {
        let raw = br#"{"SerNo":1,"Records":[{"SeqNo":3,"Reason":77,"DateUTC":"2023-10-21 23:21:42","Fields":[]}]}"#;
        let tx = decode(raw).unwrap();
        assert_eq!(tx.records[0].reason_code, 77);
        assert_eq!(tx.records[0].reason(), None);
    }

    #[test]
    fn error_positions() {
        let err = decode(&one_record(json!([
            { "DIn": 1, "DOut": 0, "DevStat": 1, "FType": 2 },
            { "FType": 3 }
        ])))
        .unwrap_err();
        assert_eq!(err.record(), Some(0));
        assert_eq!(err.reading(), Some(1));
    }
}
