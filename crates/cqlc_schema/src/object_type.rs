//! Object types: value types and entity types.

use std::fmt;

use cqlc_foundation::{ConstraintId, FactTypeId, ObjectTypeId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named player of roles.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectType {
    /// Arena identifier.
    pub id: ObjectTypeId,
    /// Declared name, unique within the schema.
    pub name: String,
    /// Value or entity specifics.
    pub kind: ObjectKind,
}

impl ObjectType {
    /// Returns the entity data, if this is an entity type.
    #[must_use]
    pub fn as_entity(&self) -> Option<&EntityType> {
        match &self.kind {
            ObjectKind::Entity(entity) => Some(entity),
            ObjectKind::Value(_) => None,
        }
    }

    /// Returns the value data, if this is a value type.
    #[must_use]
    pub fn as_value(&self) -> Option<&ValueType> {
        match &self.kind {
            ObjectKind::Value(value) => Some(value),
            ObjectKind::Entity(_) => None,
        }
    }

    /// Returns true for value types.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, ObjectKind::Value(_))
    }

    /// Returns true for entity types only referenced so far, never declared.
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.as_entity().is_some_and(|e| e.provisional)
    }

    /// Short description used in diagnostics.
    #[must_use]
    pub fn describe_kind(&self) -> &'static str {
        match &self.kind {
            ObjectKind::Value(_) => "a value type",
            ObjectKind::Entity(e) if e.provisional => "a forward reference",
            ObjectKind::Entity(_) => "an entity type",
        }
    }
}

/// The two variants of object type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectKind {
    /// Lexical type with a base type and optional restrictions.
    Value(ValueType),
    /// Identified type with supertypes and a preferred identifier.
    Entity(EntityType),
}

/// Value type specifics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueType {
    /// The value type this one is written as.
    pub base: Option<ObjectTypeId>,
    /// Maximum length, if declared.
    pub length: Option<u32>,
    /// Decimal scale, if declared.
    pub scale: Option<u32>,
    /// Allowed values, if declared.
    pub restriction: Option<ValueRestriction>,
}

/// Entity type specifics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityType {
    /// Direct supertypes in declaration order.
    pub supertypes: Vec<ObjectTypeId>,
    /// The supertype through which this entity is identified, if any.
    pub identifying_supertype: Option<ObjectTypeId>,
    /// The fact type this entity objectifies, if any.
    pub objectified: Option<FactTypeId>,
    /// The preferred identifier constraint, once established.
    pub preferred_identifier: Option<ConstraintId>,
    /// Referenced before being declared.
    pub provisional: bool,
}

impl EntityType {
    /// Creates the placeholder for a name used before its declaration.
    #[must_use]
    pub fn provisional() -> Self {
        Self {
            provisional: true,
            ..Self::default()
        }
    }
}

/// A set of allowed values or ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueRestriction {
    /// Allowed values and ranges.
    pub ranges: Vec<ValueRange>,
}

impl ValueRestriction {
    /// Creates a restriction from its ranges.
    #[must_use]
    pub fn new(ranges: Vec<ValueRange>) -> Self {
        Self { ranges }
    }
}

/// One allowed value or range of values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueRange {
    /// A single literal value.
    Single(String),
    /// An inclusive range, open on a missing bound.
    Range {
        /// Lower bound.
        low: Option<String>,
        /// Upper bound.
        high: Option<String>,
    },
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(v) => f.write_str(v),
            Self::Range { low, high } => write!(
                f,
                "{}..{}",
                low.as_deref().unwrap_or(""),
                high.as_deref().unwrap_or("")
            ),
        }
    }
}

impl fmt::Display for ValueRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{range}")?;
        }
        f.write_str("}")
    }
}
