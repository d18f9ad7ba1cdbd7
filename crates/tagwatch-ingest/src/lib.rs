pub mod clock;
pub mod directory;
pub mod error;
pub mod ingest;
pub mod store;
pub mod timeago;
pub mod txlog;

pub use clock::{Clock, SystemClock};
pub use directory::SubjectDirectory;
pub use error::IngestError;
pub use ingest::{IngestOutcome, Ingestor};
pub use store::{MemoryStore, TxStore};
pub use timeago::time_ago;
