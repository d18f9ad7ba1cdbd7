pub mod analog;
pub mod decode;
pub mod error;
mod lenient;
pub mod model;
pub mod reason;
pub mod timestamp;

pub use decode::decode;
pub use error::DecodeError;
pub use model::{
    AnalogBlock, DigitalIo, LocationFix, Reading, ReadingKind, Record, Transmission, TripSummary,
};
pub use reason::{reason_text, ReasonCode};
