use thiserror::Error;

use crate::model::ReadingKind;

/// Why a transmission was rejected. Indexes are positions in the wire arrays,
/// starting at 0.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("transmission envelope: {source}")]
    Envelope { source: serde_json::Error },

    #[error("record {record}: {source}")]
    Record { record: usize, source: serde_json::Error },

    #[error("record {record}: bad DateUTC {value:?}: {source}")]
    DeviceTime {
        record: usize,
        value: String,
        source: time::error::Parse,
    },

    #[error("record {record} reading {reading}: bad GpsUTC {value:?}: {source}")]
    FixTime {
        record: usize,
        reading: usize,
        value: String,
        source: time::error::Parse,
    },

    #[error("record {record} reading {reading}: no usable FType: {source}")]
    Discriminant {
        record: usize,
        reading: usize,
        source: serde_json::Error,
    },

    #[error("record {record} reading {reading}: unrecognised FType {kind}")]
    UnknownKind { record: usize, reading: usize, kind: i64 },

    #[error("record {record} reading {reading} ({kind:?}): {source}")]
    Reading {
        record: usize,
        reading: usize,
        kind: ReadingKind,
        source: serde_json::Error,
    },

    #[error("record {record} reading {reading}: AnalogueData has no channel {channel:?}")]
    MissingChannel {
        record: usize,
        reading: usize,
        channel: &'static str,
    },
}

impl DecodeError {
    /// Index of the failing record, if the failure is inside one.
    pub fn record(&self) -> Option<usize> {
        match self {
            DecodeError::Envelope { .. } => None,
            DecodeError::Record { record, .. }
            | DecodeError::DeviceTime { record, .. }
            | DecodeError::FixTime { record, .. }
            | DecodeError::Discriminant { record, .. }
            | DecodeError::UnknownKind { record, .. }
            | DecodeError::Reading { record, .. }
            | DecodeError::MissingChannel { record, .. } => Some(*record),
        }
    }

    /// Index of the failing reading within its record, if any.
    pub fn reading(&self) -> Option<usize> {
        match self {
            DecodeError::FixTime { reading, .. }
            | DecodeError::Discriminant { reading, .. }
            | DecodeError::UnknownKind { reading, .. }
            | DecodeError::Reading { reading, .. }
            | DecodeError::MissingChannel { reading, .. } => Some(*reading),
            _ => None,
        }
    }
}
