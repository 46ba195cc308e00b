//! Stable arena identifiers for schema records.
//!
//! Every record in the schema graph lives in an append-only arena and is
//! addressed by a typed index. Records never move and are never removed, so
//! an identifier stays valid for the lifetime of the schema that issued it.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(u32);

        impl $name {
            /// Creates an identifier from a raw arena index.
            #[must_use]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw arena index.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Identifies a value type or entity type.
    ObjectTypeId,
    "object-type"
);
arena_id!(
    /// Identifies a fact type (including type inheritance fact types).
    FactTypeId,
    "fact-type"
);
arena_id!(
    /// Identifies a role of a fact type.
    RoleId,
    "role"
);
arena_id!(
    /// Identifies an ordered sequence of role references.
    RoleSequenceId,
    "role-sequence"
);
arena_id!(
    /// Identifies a reading of a fact type.
    ReadingId,
    "reading"
);
arena_id!(
    /// Identifies a presence constraint.
    ConstraintId,
    "constraint"
);
