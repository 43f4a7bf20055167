//! Error types for the conversion pipeline.

/// Invalid configuration, detected before any input is read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported format: {0}")]
    UnknownFormat(String),
    #[error("Group size must be 1 to 9, got {0}")]
    GroupSize(u8),
    #[error("Hash width must be 64, 128, 192 or 256, got {0}")]
    HashWidth(u32),
    #[error("Invalid {0} address")]
    EmptyAddress(&'static str),
    #[error("Format requires an IPv6 blackhole address")]
    MissingIpv6Address,
}

/// Error type for a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Containment index too large: {0} bytes")]
    IndexTooLarge(usize),
}
