use std::path::PathBuf;

use thiserror::Error;

use teebox_core::error::EngineError;

/// Failures while loading a snapshot or tallying it.
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported snapshot extension {0:?}, expected .json or .msgpack")]
    UnsupportedExtension(String),
    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid MessagePack snapshot: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
    #[error("failed to encode MessagePack snapshot: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
