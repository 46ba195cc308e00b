//! Role sequences and readings.
//!
//! A reading is a text template such as `"{0} is going out with {1}"`. Each
//! `{i}` marker refers to position `i` of the reading's role sequence, and
//! the role reference at that position may carry reading-local adjectives.

use std::fmt;

use cqlc_foundation::{Adjective, FactTypeId, ReadingId, RoleId, RoleSequenceId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A reference to a role from a role sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleRef {
    /// The referenced role.
    pub role: RoleId,
    /// Leading adjective as used in this sequence.
    pub leading: Adjective,
    /// Trailing adjective as used in this sequence.
    pub trailing: Adjective,
    /// Role name as used in this sequence.
    pub role_name: Option<String>,
}

impl RoleRef {
    /// A plain reference with no adjectives.
    #[must_use]
    pub fn to(role: RoleId) -> Self {
        Self {
            role,
            leading: Adjective::new(),
            trailing: Adjective::new(),
            role_name: None,
        }
    }

    /// Sets the adjectives.
    #[must_use]
    pub fn with_adjectives(mut self, leading: Adjective, trailing: Adjective) -> Self {
        self.leading = leading;
        self.trailing = trailing;
        self
    }

    /// Sets the role name.
    #[must_use]
    pub fn with_role_name(mut self, role_name: Option<String>) -> Self {
        self.role_name = role_name;
        self
    }
}

/// An ordered list of role references.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleSequence {
    /// Arena identifier.
    pub id: RoleSequenceId,
    /// The references, in order.
    pub refs: Vec<RoleRef>,
}

impl RoleSequence {
    /// The referenced roles, in order.
    pub fn roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.refs.iter().map(|r| r.role)
    }

    /// The referenced roles, sorted, for set comparison.
    #[must_use]
    pub fn role_set(&self) -> Vec<RoleId> {
        let mut roles: Vec<_> = self.roles().collect();
        roles.sort_unstable();
        roles.dedup();
        roles
    }
}

/// One verbalization of a fact type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Arena identifier.
    pub id: ReadingId,
    /// Owning fact type.
    pub fact_type: FactTypeId,
    /// Sequence the `{i}` markers refer to.
    pub role_sequence: RoleSequenceId,
    /// The template text.
    pub text: String,
}

impl Reading {
    /// Splits the template into words and role markers.
    #[must_use]
    pub fn elements(&self) -> Vec<ReadingElement> {
        ReadingElement::parse(&self.text)
    }
}

/// A piece of a reading template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadingElement {
    /// A literal linking word.
    Word(String),
    /// A `{i}` role marker.
    Role(usize),
}

impl ReadingElement {
    /// Parses template text.
    #[must_use]
    pub fn parse(text: &str) -> Vec<ReadingElement> {
        text.split_whitespace()
            .map(|word| {
                word.strip_prefix('{')
                    .and_then(|w| w.strip_suffix('}'))
                    .and_then(|n| n.parse().ok())
                    .map_or_else(|| Self::Word(word.to_string()), Self::Role)
            })
            .collect()
    }

    /// Joins elements back into template text.
    #[must_use]
    pub fn template(elements: &[ReadingElement]) -> String {
        elements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ReadingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => f.write_str(w),
            Self::Role(i) => write!(f, "{{{i}}}"),
        }
    }
}
