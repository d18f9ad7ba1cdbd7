use tagwatch_proto::DecodeError;
use thiserror::Error;

/// Why an upload was refused. Alert failures are not here: they are logged
/// and the upload still succeeds.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("rejected transmission: {0}")]
    Decode(#[from] DecodeError),
    #[error("storing transmission from serial {serial}: {source:#}")]
    Store {
        serial: i64,
        #[source]
        source: anyhow::Error,
    },
}
