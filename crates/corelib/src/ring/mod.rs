//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding servers responsible for keys.

pub mod ring;
pub mod shared;
pub mod topology;

pub use ring::{HashRing, RingBuilder, MAX_PROBES};
pub use shared::SharedRing;
pub use topology::{RingTopology, TokenRange};

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
