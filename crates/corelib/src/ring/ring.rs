//! Hash ring data structure.
//!
//! The ring is a `BTreeMap<Token, ServerId>` ordered by position. A key is
//! owned by the first virtual node at or clockwise after the key's position,
//! wrapping from the largest position back to the smallest.

use crate::config::{CollisionPolicy, RingConfig};
use crate::error::{Result, RingError};
use crate::node::ServerId;
use crate::partitioner::{Partitioner, Xxh3Partitioner};
use crate::ring::topology::RingTopology;
use crate::token::Token;
use crate::vnode::VirtualNode;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Probe attempts per virtual node under [`CollisionPolicy::Rehash`].
pub const MAX_PROBES: u32 = 8;

/// Consistent hash ring.
///
/// # Invariants
///
/// - `virtual_nodes > 0` and never changes after construction
/// - A server added with `Overwrite` owns exactly `virtual_nodes` entries
///   unless one of its positions collided with another virtual node
/// - A server added with `Rehash` owns exactly `virtual_nodes` entries
///   unless all `MAX_PROBES` positions of a virtual node were taken
///
/// The ring is a plain value with no interior locking. Wrap it in
/// [`SharedRing`](crate::ring::SharedRing) to share it between threads.
pub struct HashRing<P: Partitioner = Xxh3Partitioner> {
    ring: BTreeMap<Token, ServerId>,
    virtual_nodes: usize,
    collision_policy: CollisionPolicy,
    partitioner: Arc<P>,
}

impl<P: Partitioner> Clone for HashRing<P> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            virtual_nodes: self.virtual_nodes,
            collision_policy: self.collision_policy,
            partitioner: Arc::clone(&self.partitioner),
        }
    }
}

impl<P: Partitioner> fmt::Debug for HashRing<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("virtual_nodes", &self.virtual_nodes)
            .field("collision_policy", &self.collision_policy)
            .field("partitioner", &self.partitioner.name())
            .field("tokens", &self.ring.len())
            .finish()
    }
}

impl HashRing {
    /// Create an empty ring using the default XXH3 partitioner.
    ///
    /// Fails only if `virtual_nodes` is zero.
    pub fn new(virtual_nodes: usize) -> Result<Self> {
        Self::with_partitioner(virtual_nodes, Xxh3Partitioner)
    }

    /// Create an empty ring from a configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        Self::from_config_with_partitioner(config, Xxh3Partitioner)
    }
}

impl<P: Partitioner> HashRing<P> {
    /// Create an empty ring with a custom partitioner.
    pub fn with_partitioner(virtual_nodes: usize, partitioner: P) -> Result<Self> {
        Self::from_config_with_partitioner(&RingConfig::new(virtual_nodes), partitioner)
    }

    pub fn from_config_with_partitioner(config: &RingConfig, partitioner: P) -> Result<Self> {
        if config.virtual_node_count == 0 {
            return Err(RingError::ZeroVirtualNodes);
        }

        Ok(Self {
            ring: BTreeMap::new(),
            virtual_nodes: config.virtual_node_count,
            collision_policy: config.collision_policy,
            partitioner: Arc::new(partitioner),
        })
    }

    /// Place all virtual nodes of `server` on the ring.
    ///
    /// Adding a server that is already present recomputes the same positions
    /// and leaves the ring unchanged.
    pub fn add_server(&mut self, server: impl Into<ServerId>) {
        let server = server.into();
        // Positions taken by earlier indices of this server during this call.
        let mut claimed = BTreeSet::new();

        for index in 0..self.virtual_nodes {
            match self.collision_policy {
                CollisionPolicy::Overwrite => self.place(&server, index),
                CollisionPolicy::Rehash => self.place_with_probing(&server, index, &mut claimed),
            }
        }

        debug!(
            server = %server,
            virtual_nodes = self.virtual_nodes,
            tokens = self.ring.len(),
            "added server to ring"
        );
    }

    fn place(&mut self, server: &ServerId, index: usize) {
        let token = VirtualNode::new(server.as_str(), index).token(&*self.partitioner);

        if let Some(previous) = self.ring.insert(token, server.clone()) {
            if previous != *server {
                warn!(
                    %token,
                    previous = %previous,
                    server = %server,
                    index,
                    "ring position collision, previous owner overwritten"
                );
            }
        }
    }

    fn place_with_probing(
        &mut self,
        server: &ServerId,
        index: usize,
        claimed: &mut BTreeSet<Token>,
    ) {
        let vnode = VirtualNode::new(server.as_str(), index);
        let mut free = None;

        // Walk every probe: an earlier probe may have been freed since this
        // virtual node was placed further down the sequence. A slot of the same
        // server already claimed by another index does not count as placed.
        for probe in 0..MAX_PROBES {
            let candidate = vnode.with_probe(probe);
            let token = candidate.token(&*self.partitioner);
            match self.ring.get(&token) {
                Some(owner) if owner == server && claimed.insert(token) => return,
                Some(owner) => {
                    trace!(
                        %token,
                        owner = %owner,
                        server = candidate.server(),
                        index = candidate.index(),
                        probe = candidate.probe(),
                        "probe collided"
                    );
                }
                None if free.is_none() => free = Some(token),
                None => {}
            }
        }

        match free {
            Some(token) => {
                self.ring.insert(token, server.clone());
                claimed.insert(token);
            }
            None => warn!(
                server = vnode.server(),
                index = vnode.index(),
                probes = MAX_PROBES,
                "no free ring position, virtual node dropped"
            ),
        }
    }

    /// Remove all virtual nodes of `server` from the ring.
    ///
    /// Only entries still owned by `server` are erased. Removing a server
    /// that was never added is a no-op.
    pub fn remove_server(&mut self, server: impl AsRef<str>) {
        let server = server.as_ref();
        let probes = match self.collision_policy {
            CollisionPolicy::Overwrite => 1,
            CollisionPolicy::Rehash => MAX_PROBES,
        };
        let before = self.ring.len();

        // Erasing as we go means each index releases a distinct slot, even
        // when two indices of this server probed onto the same position.
        for index in 0..self.virtual_nodes {
            let vnode = VirtualNode::new(server, index);
            for probe in 0..probes {
                let token = vnode.with_probe(probe).token(&*self.partitioner);
                if self.ring.get(&token).is_some_and(|owner| owner == server) {
                    self.ring.remove(&token);
                    break;
                }
            }
        }

        let removed = before - self.ring.len();
        if removed > 0 {
            debug!(server, removed, tokens = self.ring.len(), "removed server from ring");
        } else {
            trace!(server, "server not on ring, nothing removed");
        }
    }

    /// Returns the server responsible for `key`, or `None` on an empty ring.
    ///
    /// # Performance
    /// - **Time**: O(log n) where n = ring entries, plus hashing the key
    pub fn get_server(&self, key: impl AsRef<[u8]>) -> Option<&ServerId> {
        let token = self.position(key);
        let server = self.owner_of(token);
        trace!(%token, server = ?server, "resolved key");
        server
    }

    /// Returns the server owning ring position `token`.
    ///
    /// Successor search: the first entry at or after `token`, wrapping to the
    /// smallest entry.
    pub fn owner_of(&self, token: Token) -> Option<&ServerId> {
        self.ring
            .range(token..)
            .next()
            .or_else(|| self.ring.iter().next())
            .map(|(_, server)| server)
    }

    /// Ring position a key hashes to.
    #[inline]
    pub fn position(&self, key: impl AsRef<[u8]>) -> Token {
        self.partitioner.partition(key.as_ref())
    }

    /// Number of ring entries (virtual nodes across all servers).
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn virtual_node_count(&self) -> usize {
        self.virtual_nodes
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Distinct servers on the ring, sorted.
    pub fn servers(&self) -> Vec<&ServerId> {
        self.ring
            .values()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether any ring entry belongs to `server`. Scans the whole ring.
    pub fn contains_server(&self, server: impl AsRef<str>) -> bool {
        let server = server.as_ref();
        self.ring.values().any(|owner| owner == server)
    }

    /// Ring entries in position order.
    pub fn tokens(&self) -> impl Iterator<Item = (Token, &ServerId)> + '_ {
        self.ring.iter().map(|(token, server)| (*token, server))
    }

    /// Ownership and range queries over the current ring state.
    pub fn topology(&self) -> RingTopology<'_, P> {
        RingTopology::new(self)
    }
}

/// Builder for [`HashRing`].
///
/// ```rust
/// use corelib::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_virtual_nodes(8)
///     .add_server("node1")
///     .add_server("node2")
///     .build()
///     .unwrap();
/// assert_eq!(ring.len(), 16);
/// ```
#[derive(Debug)]
pub struct RingBuilder<P: Partitioner = Xxh3Partitioner> {
    config: RingConfig,
    partitioner: P,
    servers: Vec<ServerId>,
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RingBuilder {
    /// Builder with the default configuration and XXH3 partitioner.
    pub fn new() -> Self {
        Self::from_config(RingConfig::default())
    }

    pub fn from_config(config: RingConfig) -> Self {
        Self {
            config,
            partitioner: Xxh3Partitioner,
            servers: Vec::new(),
        }
    }
}

impl<P: Partitioner> RingBuilder<P> {
    pub fn with_virtual_nodes(mut self, virtual_nodes: usize) -> Self {
        self.config.virtual_node_count = virtual_nodes;
        self
    }

    pub fn with_collision_policy(mut self, collision_policy: CollisionPolicy) -> Self {
        self.config.collision_policy = collision_policy;
        self
    }

    /// Switch the partitioner. Servers queued so far are kept.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            config: self.config,
            partitioner,
            servers: self.servers,
        }
    }

    pub fn add_server(mut self, server: impl Into<ServerId>) -> Self {
        self.servers.push(server.into());
        self
    }

    /// Build the ring, adding queued servers in order.
    pub fn build(self) -> Result<HashRing<P>> {
        let mut ring = HashRing::from_config_with_partitioner(&self.config, self.partitioner)?;
        for server in self.servers {
            ring.add_server(server);
        }
        Ok(ring)
    }
}
