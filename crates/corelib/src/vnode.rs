//! Virtual nodes.
//!
//! A server occupies `virtual_node_count` positions on the ring, one per
//! replica index. Virtual nodes are never stored: the ring recomputes a
//! position from the server identifier and the index whenever it adds or
//! removes a server, so the same pair always lands on the same token.
//!
//! More virtual nodes per server smooth the key distribution at the cost of
//! more ring entries. Lookup stays O(log n) in the total number of entries,
//! and adding or removing a server moves roughly k/s keys (k = keys,
//! s = servers after the change).

use crate::partitioner::Partitioner;
use crate::token::Token;
use std::fmt;

/// Separator between the server identifier, the replica index and the probe.
pub const SEPARATOR: char = '#';

/// A virtual node on the hash ring.
///
/// Identified by `"{server}#{index}"`. Under the rehash collision policy a
/// colliding virtual node is retried as `"{server}#{index}#{probe}"` with
/// `probe >= 1`; probe `0` is always the plain form.
///
/// Server identifiers that themselves contain `#` can alias another server's
/// probe identifiers (server `a#1`, index `2` and server `a`, index `1`,
/// probe `2` both read `a#1#2`). Such identifiers behave like any other hash
/// collision.
///
/// # Example
///
/// ```rust
/// use corelib::VirtualNode;
///
/// let vnode = VirtualNode::new("Server1", 0);
/// assert_eq!(vnode.identifier(), "Server1#0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualNode<'a> {
    /// The physical server that owns this virtual node.
    server: &'a str,

    /// Replica index in `[0, virtual_node_count)`.
    index: usize,

    /// Rehash attempt; `0` for the primary position.
    probe: u32,
}

impl<'a> VirtualNode<'a> {
    /// Create the primary virtual node for `server` at replica `index`.
    #[inline]
    pub fn new(server: &'a str, index: usize) -> Self {
        Self {
            server,
            index,
            probe: 0,
        }
    }

    /// Same virtual node, retried with the given probe.
    #[inline]
    pub fn with_probe(self, probe: u32) -> Self {
        Self { probe, ..self }
    }

    #[inline]
    pub fn server(&self) -> &'a str {
        self.server
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn probe(&self) -> u32 {
        self.probe
    }

    /// String that gets hashed to place this virtual node.
    pub fn identifier(&self) -> String {
        self.to_string()
    }

    /// Ring position of this virtual node under the given partitioner.
    ///
    /// Must use the same partitioner as key lookups.
    pub fn token<P: Partitioner + ?Sized>(&self, partitioner: &P) -> Token {
        partitioner.partition(self.identifier().as_bytes())
    }
}

impl fmt::Display for VirtualNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.server, SEPARATOR, self.index)?;
        if self.probe > 0 {
            write!(f, "{}{}", SEPARATOR, self.probe)?;
        }
        Ok(())
    }
}
