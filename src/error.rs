//! Error taxonomy for map construction and configuration loading.
//!
//! Only construction-time failures are represented as [`ConfigError`] values.
//! Domain "no result" outcomes (unreachable path, tile off the map) are
//! in-band sentinels (`Distance::NO_CONNECTION`, `RegionId::OUT_OF_MAP`),
//! not errors -- callers branch on them directly. Precondition violations
//! (querying an out-of-map tile, stepping a finished `Stepper`) panic,
//! since they indicate a logic bug that would desynchronise consensus and
//! cannot be recovered from.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed baked map blob: {0}")]
    MalformedBlob(String),

    #[error("preprocessor input header truncated or invalid")]
    InvalidPreprocessorHeader,

    #[error("unknown building footprint template: {0}")]
    UnknownFootprint(String),

    #[error("config deserialization failed: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("io error loading config: {0}")]
    Io(#[from] std::io::Error),
}
