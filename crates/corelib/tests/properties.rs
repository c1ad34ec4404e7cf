//! Property tests for ring invariants.

use corelib::{CollisionPolicy, HashRing, RingConfig};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn ring_with(servers: &BTreeSet<String>, vnodes: usize, policy: CollisionPolicy) -> HashRing {
    let config = RingConfig::new(vnodes).with_collision_policy(policy);
    let mut ring = HashRing::from_config(&config).unwrap();
    for server in servers {
        ring.add_server(server.as_str());
    }
    ring
}

fn servers() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..8)
}

fn policy() -> impl Strategy<Value = CollisionPolicy> {
    prop_oneof![Just(CollisionPolicy::Overwrite), Just(CollisionPolicy::Rehash)]
}

proptest! {
    #[test]
    fn lookup_is_deterministic_and_total(
        servers in servers(),
        vnodes in 1usize..32,
        policy in policy(),
        keys in prop::collection::vec(any::<String>(), 1..50),
    ) {
        let ring = ring_with(&servers, vnodes, policy);
        for key in &keys {
            let owner = ring.get_server(key);
            prop_assert!(owner.is_some());
            prop_assert!(servers.contains(owner.unwrap().as_str()));
            prop_assert_eq!(owner, ring.get_server(key));
        }
    }

    #[test]
    fn empty_ring_resolves_nothing(key in any::<Vec<u8>>(), vnodes in 1usize..64) {
        let ring = HashRing::new(vnodes).unwrap();
        prop_assert!(ring.get_server(&key).is_none());
    }

    #[test]
    fn removing_absent_server_changes_nothing(
        servers in servers(),
        absent in "[A-Z]{1,8}",
        vnodes in 1usize..32,
        keys in prop::collection::vec("[a-z0-9]{0,16}", 1..50),
    ) {
        let mut ring = ring_with(&servers, vnodes, CollisionPolicy::Overwrite);
        let before: Vec<_> = keys.iter().map(|k| ring.get_server(k).cloned()).collect();
        let len = ring.len();

        ring.remove_server(&absent);

        let after: Vec<_> = keys.iter().map(|k| ring.get_server(k).cloned()).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(len, ring.len());
    }

    #[test]
    fn add_then_remove_restores_assignments(
        servers in servers(),
        extra in "[A-Z]{1,8}",
        vnodes in 1usize..32,
        keys in prop::collection::vec("[a-z0-9]{0,16}", 1..50),
    ) {
        let mut ring = ring_with(&servers, vnodes, CollisionPolicy::Rehash);
        let before: Vec<_> = keys.iter().map(|k| ring.get_server(k).cloned()).collect();

        ring.add_server(extra.as_str());
        for key in &keys {
            // Keys either stay put or move to the new server
            let i = keys.iter().position(|k| k == key).unwrap();
            let now = ring.get_server(key).unwrap();
            prop_assert!(Some(now) == before[i].as_ref() || now == extra.as_str());
        }

        ring.remove_server(&extra);
        let after: Vec<_> = keys.iter().map(|k| ring.get_server(k).cloned()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn each_server_owns_its_virtual_nodes(servers in servers(), vnodes in 1usize..32) {
        let ring = ring_with(&servers, vnodes, CollisionPolicy::Rehash);
        prop_assert_eq!(ring.len(), servers.len() * vnodes);
        for server in &servers {
            prop_assert_eq!(ring.topology().ranges(server).len(), vnodes);
        }
    }
}
