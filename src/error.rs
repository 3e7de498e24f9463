use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O and serialization errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base64 encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    // Configuration errors
    #[error("Invalid compression level: {0} (expected 0-3)")]
    InvalidLevel(u8),

    // Compressor invariants: these indicate a defect in the match finder or
    // strategy, never bad input
    #[error("Invalid literal block length: {0} (must be 1-32)")]
    LiteralLength(usize),

    #[error("Invalid match length: {0} (must be 3-264)")]
    MatchLength(usize),

    #[error("Invalid match distance: {0} (must be 1-8192)")]
    MatchDistance(usize),

    // Stream decoding errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Back-reference distance {distance} exceeds available output {available}")]
    InvalidBackReference { distance: usize, available: usize },

    // Broadlink errors
    #[error("Empty Broadlink code")]
    EmptyCode,

    #[error("Invalid Broadlink format: too short ({0} bytes, min 4)")]
    BroadlinkTooShort(usize),

    #[error("Truncated extended duration at offset {0}")]
    TruncatedDuration(usize),

    #[error("No IR durations found in Broadlink code")]
    NoDurations,

    #[error("All durations filtered out (too large for u16)")]
    AllDurationsFiltered,

    // Document conversion errors
    #[error("Invalid SmartIR document: {0}")]
    InvalidDocument(String),

    #[error("Failed to convert code for key '{key}': {source}")]
    Command {
        key: String,
        #[source]
        source: Box<Error>,
    },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error signals a compressor defect rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            Error::LiteralLength(_) | Error::MatchLength(_) | Error::MatchDistance(_) => true,
            Error::Internal(_) => true,
            Error::Command { source, .. } => source.is_invariant_violation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
