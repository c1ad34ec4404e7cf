//! Ring configuration.

use crate::error::{Result, RingError};
use serde::{Deserialize, Serialize};

/// Virtual nodes per server when nothing else is configured.
pub const DEFAULT_VIRTUAL_NODES: usize = 160;

/// What happens when a virtual node lands on an occupied ring position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later insertion replaces the earlier one. The displaced server
    /// loses that virtual node.
    #[default]
    Overwrite,

    /// The colliding virtual node is re-hashed with a probe suffix until a
    /// free position is found, so every server keeps its full count.
    Rehash,
}

/// Ring construction parameters.
///
/// ```rust
/// use corelib::{CollisionPolicy, RingConfig};
///
/// let config = RingConfig::from_json(r#"{ "virtual_node_count": 64 }"#).unwrap();
/// assert_eq!(config.virtual_node_count, 64);
/// assert_eq!(config.collision_policy, CollisionPolicy::Overwrite);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Virtual nodes placed per server. Must be positive.
    pub virtual_node_count: usize,

    pub collision_policy: CollisionPolicy,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_node_count: DEFAULT_VIRTUAL_NODES,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl RingConfig {
    pub fn new(virtual_node_count: usize) -> Self {
        Self {
            virtual_node_count,
            ..Self::default()
        }
    }

    pub fn with_collision_policy(mut self, collision_policy: CollisionPolicy) -> Self {
        self.collision_policy = collision_policy;
        self
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.virtual_node_count == 0 {
            return Err(RingError::ZeroVirtualNodes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RingConfig::default();
        assert_eq!(config.virtual_node_count, DEFAULT_VIRTUAL_NODES);
        assert_eq!(config.collision_policy, CollisionPolicy::Overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config =
            RingConfig::from_json(r#"{ "virtual_node_count": 3, "collision_policy": "rehash" }"#)
                .unwrap();
        assert_eq!(config, RingConfig::new(3).with_collision_policy(CollisionPolicy::Rehash));

        let config = RingConfig::from_json("{}").unwrap();
        assert_eq!(config, RingConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = RingConfig::new(64).with_collision_policy(CollisionPolicy::Rehash);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"virtual_node_count":64,"collision_policy":"rehash"}"#);
        assert_eq!(RingConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_rejects_zero_vnodes() {
        let err = RingConfig::from_json(r#"{ "virtual_node_count": 0 }"#).unwrap_err();
        assert!(matches!(err, RingError::ZeroVirtualNodes));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            RingConfig::from_json(r#"{ "replicas": 3 }"#),
            Err(RingError::Config(_))
        ));
        assert!(matches!(
            RingConfig::from_json(r#"{ "collision_policy": "ignore" }"#),
            Err(RingError::Config(_))
        ));
    }
}
