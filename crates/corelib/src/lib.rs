//! Core library for consistent hashing.
//!
//! This crate provides the fundamental pieces of a consistent hash ring:
//! - Token positions and partitioners (hash functions)
//! - Server identifiers and virtual nodes
//! - The ring itself, with add/remove/lookup
//! - Ring topology (ownership, ranges) and a copy-on-write shared ring
//!
//! ```rust
//! use corelib::HashRing;
//!
//! let mut ring = HashRing::new(3).unwrap();
//! assert!(ring.get_server("Key1").is_none());
//!
//! ring.add_server("Server1");
//! ring.add_server("Server2");
//! let owner = ring.get_server("Key1").unwrap();
//! assert!(owner == "Server1" || owner == "Server2");
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod vnode;

pub use config::{CollisionPolicy, RingConfig, DEFAULT_VIRTUAL_NODES};
pub use error::{Result, RingError};
pub use node::ServerId;
pub use partitioner::{Partitioner, SipPartitioner, Xxh3Partitioner};
pub use ring::{HashRing, Ring, RingBuilder, RingTopology, SharedRing, TokenRange};
pub use token::Token;
pub use vnode::VirtualNode;
