use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Bitset accompanying every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActionFlags(u32);

impl ActionFlags {
    pub const NONE: Self = Self(0);
    /// Run even while the game is paused.
    pub const ALLOW_DURING_PAUSE: Self = Self(1 << 0);
    /// Preview placement: rendered but never charged.
    pub const GHOST: Self = Self(1 << 1);
    /// Set on nested sub-actions that must really mutate.
    pub const APPLY: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for ActionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}
