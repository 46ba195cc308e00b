//! Presence constraints.

use std::fmt;

use cqlc_foundation::{ConstraintId, RoleId, RoleSequenceId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A frequency constraint over a role sequence.
///
/// "Each Girl is going out with at most one Boy" is a presence constraint
/// over the Girl role with a maximum frequency of one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PresenceConstraint {
    /// Arena identifier.
    pub id: ConstraintId,
    /// Optional declared name.
    pub name: Option<String>,
    /// The constrained roles.
    pub role_sequence: RoleSequenceId,
    /// Minimum occurrences, if bounded below.
    pub min_frequency: Option<u32>,
    /// Maximum occurrences, if bounded above.
    pub max_frequency: Option<u32>,
    /// Every instance of the player must occur.
    pub is_mandatory: bool,
    /// This constraint identifies an entity type.
    pub is_preferred_identifier: bool,
}

impl PresenceConstraint {
    /// Returns true for uniqueness constraints.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.max_frequency == Some(1)
    }

    /// Describes the frequency range.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        Frequency {
            min: self.min_frequency,
            max: self.max_frequency,
        }
    }
}

/// What is needed to allocate a presence constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintDefinition {
    /// The constrained roles, in order.
    pub roles: Vec<RoleId>,
    /// Optional declared name.
    pub name: Option<String>,
    /// Occurrence range.
    pub frequency: Frequency,
    /// Mandatory flag.
    pub is_mandatory: bool,
    /// Preferred identifier flag.
    pub is_preferred_identifier: bool,
}

impl ConstraintDefinition {
    /// A constraint over the given roles with no bounds yet.
    #[must_use]
    pub fn over(roles: Vec<RoleId>) -> Self {
        Self {
            roles,
            ..Self::default()
        }
    }

    /// Sets the occurrence range; a positive minimum makes it mandatory.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self.is_mandatory = frequency.min.is_some_and(|min| min > 0);
        self
    }

    /// Marks the constraint as a preferred identifier.
    #[must_use]
    pub fn preferred_identifier(mut self, preferred: bool) -> Self {
        self.is_preferred_identifier = preferred;
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// A min/max occurrence range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frequency {
    /// Lower bound.
    pub min: Option<u32>,
    /// Upper bound.
    pub max: Option<u32>,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "exactly {min}"),
            (Some(min), Some(max)) => write!(f, "{min}..{max}"),
            (Some(min), None) => write!(f, "at least {min}"),
            (None, Some(max)) => write!(f, "at most {max}"),
            (None, None) => f.write_str("any number"),
        }
    }
}

impl Frequency {
    /// Creates a range from optional bounds.
    #[must_use]
    pub const fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Exactly one occurrence.
    #[must_use]
    pub const fn exactly_one() -> Self {
        Self::new(Some(1), Some(1))
    }

    /// At most one occurrence.
    #[must_use]
    pub const fn at_most_one() -> Self {
        Self::new(None, Some(1))
    }
}
