//! Fact types and their roles.

use cqlc_foundation::{Adjective, FactTypeId, ObjectTypeId, ReadingId, RoleId};

use crate::object_type::ValueRestriction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A relationship between object types.
///
/// The role list is fixed at creation; readings are appended as new
/// verbalizations are declared.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactType {
    /// Arena identifier.
    pub id: FactTypeId,
    /// Roles in creation order.
    pub roles: Vec<RoleId>,
    /// Readings in declaration order; the first is the preferred reading.
    pub readings: Vec<ReadingId>,
    /// The entity type objectifying this fact type, if any.
    pub objectified_by: Option<ObjectTypeId>,
    /// Present when this fact type links a subtype to a supertype.
    pub inheritance: Option<TypeInheritance>,
}

impl FactType {
    /// Number of roles.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.roles.len()
    }

    /// The preferred reading.
    #[must_use]
    pub fn default_reading(&self) -> Option<ReadingId> {
        self.readings.first().copied()
    }
}

/// The subtype/supertype link carried by an inheritance fact type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeInheritance {
    /// The subtype.
    pub subtype: ObjectTypeId,
    /// The supertype.
    pub supertype: ObjectTypeId,
    /// Whether the subtype is identified through this link.
    pub provides_identification: bool,
}

/// One argument position of a fact type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Role {
    /// Arena identifier.
    pub id: RoleId,
    /// Owning fact type.
    pub fact_type: FactTypeId,
    /// The object type playing this role.
    pub player: ObjectTypeId,
    /// Position within the fact type.
    pub ordinal: usize,
    /// Leading adjective from the first definition.
    pub leading: Adjective,
    /// Trailing adjective from the first definition.
    pub trailing: Adjective,
    /// Role name from the first definition.
    pub role_name: Option<String>,
    /// Values allowed for this role.
    pub restriction: Option<ValueRestriction>,
}

/// What is needed to allocate a role.
#[derive(Clone, Debug, PartialEq)]
pub struct RoleDefinition {
    /// The object type playing the role.
    pub player: ObjectTypeId,
    /// Leading adjective.
    pub leading: Adjective,
    /// Trailing adjective.
    pub trailing: Adjective,
    /// Role name.
    pub role_name: Option<String>,
    /// Role value restriction.
    pub restriction: Option<ValueRestriction>,
}

impl RoleDefinition {
    /// A role with no adjectives.
    #[must_use]
    pub fn played_by(player: ObjectTypeId) -> Self {
        Self {
            player,
            leading: Adjective::new(),
            trailing: Adjective::new(),
            role_name: None,
            restriction: None,
        }
    }

    /// Sets the leading adjective.
    #[must_use]
    pub fn with_leading(mut self, leading: Adjective) -> Self {
        self.leading = leading;
        self
    }

    /// Sets the trailing adjective.
    #[must_use]
    pub fn with_trailing(mut self, trailing: Adjective) -> Self {
        self.trailing = trailing;
        self
    }

    /// Sets the role name.
    #[must_use]
    pub fn with_role_name(mut self, role_name: Option<String>) -> Self {
        self.role_name = role_name;
        self
    }

    /// Sets the value restriction.
    #[must_use]
    pub fn with_restriction(mut self, restriction: Option<ValueRestriction>) -> Self {
        self.restriction = restriction;
        self
    }
}
