//! Ring topology: ownership calculation and range queries.
//!
//! Each ring entry owns the arc from its predecessor (exclusive) up to its own
//! position (inclusive), which is exactly the set of positions that
//! [`HashRing::owner_of`] resolves to it.

use crate::node::ServerId;
use crate::partitioner::Partitioner;
use crate::ring::HashRing;
use crate::token::Token;
use std::collections::BTreeMap;

/// Size of the full ring, 2^64 positions.
const RING_SIZE: u128 = 1 << 64;

/// Arc of the ring `(start, end]`, walking clockwise from `start`.
///
/// When `start == end` the arc covers the whole ring; this happens when the
/// ring holds a single entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRange {
    /// Exclusive lower bound (the predecessor entry).
    pub start: Token,
    /// Inclusive upper bound (the owning entry).
    pub end: Token,
}

impl TokenRange {
    pub fn new(start: Token, end: Token) -> Self {
        Self { start, end }
    }

    pub fn is_full_ring(&self) -> bool {
        self.start == self.end
    }

    /// Whether `token` falls in this arc, honouring wrap-around.
    pub fn contains(&self, token: Token) -> bool {
        match self.start.cmp(&self.end) {
            std::cmp::Ordering::Less => token > self.start && token <= self.end,
            std::cmp::Ordering::Greater => token > self.start || token <= self.end,
            std::cmp::Ordering::Equal => true,
        }
    }

    /// Number of positions covered.
    pub fn width(&self) -> u128 {
        if self.is_full_ring() {
            RING_SIZE
        } else {
            self.start.distance_to(&self.end) as u128
        }
    }
}

/// Read-only view over a ring for ownership and range analysis.
#[derive(Debug)]
pub struct RingTopology<'a, P: Partitioner> {
    ring: &'a HashRing<P>,
}

impl<'a, P: Partitioner> RingTopology<'a, P> {
    pub fn new(ring: &'a HashRing<P>) -> Self {
        Self { ring }
    }

    /// Every ring entry paired with the arc it owns, in ring order.
    fn arcs(&self) -> impl Iterator<Item = (TokenRange, &'a ServerId)> + 'a {
        let ring = self.ring;
        let mut previous = ring.tokens().last().map(|(token, _)| token);
        ring.tokens().map(move |(token, server)| {
            // `previous` is always set here: a non-empty ring has a last entry.
            let start = previous.unwrap_or(token);
            previous = Some(token);
            (TokenRange::new(start, token), server)
        })
    }

    /// Arcs owned by `server`, in ring order. Empty if the server is absent.
    pub fn ranges(&self, server: impl AsRef<str>) -> Vec<TokenRange> {
        let server = server.as_ref();
        self.arcs()
            .filter(|(_, owner)| *owner == server)
            .map(|(range, _)| range)
            .collect()
    }

    /// Fraction of the hash domain owned by each server.
    ///
    /// Fractions sum to 1.0 on a non-empty ring; an empty ring yields an
    /// empty map.
    pub fn ownership(&self) -> BTreeMap<ServerId, f64> {
        let mut widths: BTreeMap<&ServerId, u128> = BTreeMap::new();
        for (range, server) in self.arcs() {
            *widths.entry(server).or_default() += range.width();
        }

        widths
            .into_iter()
            .map(|(server, width)| (server.clone(), width as f64 / RING_SIZE as f64))
            .collect()
    }
}
