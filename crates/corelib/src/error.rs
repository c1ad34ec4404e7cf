//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, RingError>;

/// Errors that can occur while constructing a ring.
///
/// Lookups and membership changes never fail: an empty ring resolves to
/// `None` and redundant adds or removes are no-ops.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// A ring needs at least one virtual node per server.
    #[error("virtual node count must be greater than zero")]
    ZeroVirtualNodes,

    /// Ring configuration could not be parsed.
    #[error("invalid ring configuration: {0}")]
    Config(#[from] serde_json::Error),
}
