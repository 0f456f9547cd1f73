//! Error type for the fallible edges (config files, run log)
//!
//! The simulation itself never fails; only IO around it does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("unknown {kind}: {value:?}")]
    Unknown { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
