//! Hash functions mapping keys and virtual node identifiers to tokens.
//!
//! XXH3 is the default; SipHash-1-3 with fixed keys is available for rings
//! that must agree with SipHash-based placement elsewhere.

pub mod sip;
pub mod traits;
pub mod xxh3;

pub use sip::SipPartitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;
