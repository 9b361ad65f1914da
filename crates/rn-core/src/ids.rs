//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into arena `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID", equal to `<inner>::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Stable identity of a pursuing agent.  Also the tie-break key when two
    /// agents compete for right of way.
    pub struct AgentId(u32);
}

typed_id! {
    /// Slot of a node in the navigation-graph arena.  Slots are recycled once
    /// a transient node is removed.
    pub struct NodeId(u32);
}

typed_id! {
    /// Slot of an undirected edge in the navigation-graph arena.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Position of a ring in the map's radius-sorted ring list.
    pub struct RingId(u16);
}

typed_id! {
    /// Insertion index of a passageway in the map.
    pub struct PassageId(u16);
}
