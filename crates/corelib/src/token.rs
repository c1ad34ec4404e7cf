//! Ring positions.
//!
//! A token is a position on the ring: an unsigned 64-bit value covering the
//! whole hash domain. The ring is circular, so `Token::MAX` is immediately
//! followed by `Token::MIN`.

use std::fmt;

/// Position on the hash ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Token(pub u64);

impl Token {
    /// Start of the ring.
    pub const MIN: Token = Token(0);

    /// End of the ring.
    pub const MAX: Token = Token(u64::MAX);

    #[inline]
    pub fn is_min(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_max(&self) -> bool {
        self.0 == u64::MAX
    }

    /// Clockwise distance from `self` to `other` on the ring.
    ///
    /// Wraps past `Token::MAX`, so the distance from a token to itself is zero
    /// and the distance to its predecessor is `u64::MAX`.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        other.0.wrapping_sub(self.0)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Token(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
