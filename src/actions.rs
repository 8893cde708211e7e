//! Permitted-action view of shield records.
//!
//! Shield generators store, per cell, a bitmask of the actions that are
//! safe to take there: bit `a` set means action `a` is allowed.
//! `OUT_OF_RANGE` has every bit set, so a state outside the grid permits
//! any action.

use crate::record::Record;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ActionSet(u64);

impl ActionSet {
    pub const ANY: ActionSet = ActionSet(u64::MAX);
    pub const NONE: ActionSet = ActionSet(0);

    /// Reinterpret the bits of a record.
    #[inline]
    pub const fn from_record(record: Record) -> Self {
        ActionSet(record as u64)
    }

    /// Keep only the first `n_actions` bits.
    /// Narrow records are sign extended on decode, so masking to the real
    /// action count is needed before iterating.
    pub const fn truncate(self, n_actions: u32) -> Self {
        if n_actions >= u64::BITS {
            self
        } else {
            ActionSet(self.0 & ((1u64 << n_actions) - 1))
        }
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn allows(self, action: u32) -> bool {
        action < u64::BITS && self.0 & (1u64 << action) != 0
    }

    #[inline]
    pub const fn is_any(self) -> bool {
        self.0 == u64::MAX
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Allowed action indices in increasing order.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        (0..u64::BITS).filter(move |a| self.allows(*a))
    }
}

impl std::fmt::Display for ActionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_any() {
            return write!(f, "any");
        }
        let actions: Vec<String> = self.iter().map(|a| a.to_string()).collect();
        write!(f, "{{{}}}", actions.join(", "))
    }
}
