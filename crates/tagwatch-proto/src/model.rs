use time::OffsetDateTime;

use crate::reason::ReasonCode;

/// One uploaded payload from one collar.
#[derive(Debug, Clone, PartialEq)]
pub struct Transmission {
    /// Assigned by the store, never by the decoder.
    pub id: Option<String>,
    pub serial_number: i64,
    pub imei: String,
    pub iccid: String,
    pub product_id: i64,
    pub firmware: String,
    /// Transmission order. Not sorted by time or sequence number.
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub sequence_number: i64,
    pub reason_code: i64,
    pub device_time: OffsetDateTime,
    pub readings: Vec<Reading>,
}

impl Record {
    /// `None` when the device sent a code outside 1..=50.
    pub fn reason(&self) -> Option<ReasonCode> {
        ReasonCode::from_code(self.reason_code)
    }

    pub fn location(&self) -> Option<&LocationFix> {
        self.readings.iter().find_map(|r| match r {
            Reading::Location(fix) => Some(fix),
            _ => None,
        })
    }

    pub fn digital_io(&self) -> Option<&DigitalIo> {
        self.readings.iter().find_map(|r| match r {
            Reading::DigitalIo(io) => Some(io),
            _ => None,
        })
    }

    pub fn analog(&self) -> Option<&AnalogBlock> {
        self.readings.iter().find_map(|r| match r {
            Reading::Analog(block) => Some(block),
            _ => None,
        })
    }

    pub fn trip(&self) -> Option<&TripSummary> {
        self.readings.iter().find_map(|r| match r {
            Reading::Trip(trip) => Some(trip),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Location(LocationFix),
    DigitalIo(DigitalIo),
    Analog(AnalogBlock),
    Trip(TripSummary),
}

impl Reading {
    pub fn kind(&self) -> ReadingKind {
        match self {
            Reading::Location(_) => ReadingKind::Location,
            Reading::DigitalIo(_) => ReadingKind::DigitalIo,
            Reading::Analog(_) => ReadingKind::Analog,
            Reading::Trip(_) => ReadingKind::Trip,
        }
    }
}

/// The closed set of reading kinds the collar firmware sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Location,
    DigitalIo,
    Analog,
    Trip,
}

impl ReadingKind {
    pub const ALL: [ReadingKind; 4] = [
        ReadingKind::Location,
        ReadingKind::DigitalIo,
        ReadingKind::Analog,
        ReadingKind::Trip,
    ];

    /// Value of the `FType` field on the wire.
    pub const fn discriminant(self) -> i64 {
        match self {
            ReadingKind::Location => 0,
            ReadingKind::DigitalIo => 2,
            ReadingKind::Analog => 6,
            ReadingKind::Trip => 15,
        }
    }

    pub fn from_discriminant(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.discriminant() == value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub speed: i64,
    pub speed_accuracy: i64,
    pub heading: i64,
    pub fix_status: i64,
    pub fix_time: OffsetDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: i64,
    pub position_accuracy: i64,
    pub pdop: i64,
}

impl LocationFix {
    /// The firmware reports 0 for a coordinate when it has no real fix.
    pub fn is_bogus(&self) -> bool {
        self.latitude == 0.0 || self.longitude == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitalIo {
    pub inputs: i64,
    pub outputs: i64,
    pub device_status: i64,
}

/// Analogue channels, already mapped from the device's numbered keys.
/// See [`crate::analog::ANALOG_CHANNELS`] for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogBlock {
    pub internal_battery_mv: i64,
    pub temperature: i64,
    pub last_signal_quality: i64,
    pub loaded_voltage_mv: i64,
}

impl AnalogBlock {
    pub fn battery_volts(&self) -> f64 {
        self.internal_battery_mv as f64 / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripSummary {
    pub trip_type: i64,
    pub trim: i64,
}
