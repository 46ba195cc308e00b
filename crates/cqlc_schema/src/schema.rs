//! The schema graph.
//!
//! The `Schema` owns every object type, fact type, role, role sequence,
//! reading and presence constraint in append-only arenas. It uses persistent
//! data structures, so cloning is O(1) and a clone taken before a declaration
//! is a cheap snapshot to restore if the declaration fails.

use std::collections::{HashSet, VecDeque};

use im::{HashMap, Vector};

use cqlc_foundation::{
    ConstraintId, Error, ErrorKind, FactTypeId, ObjectTypeId, ReadingId, Result, RoleId,
    RoleSequenceId,
};

use crate::constraint::{ConstraintDefinition, PresenceConstraint};
use crate::fact_type::{FactType, Role, RoleDefinition, TypeInheritance};
use crate::object_type::{EntityType, ObjectKind, ObjectType, ValueType};
use crate::reading::{Reading, ReadingElement, RoleRef, RoleSequence};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fact-oriented conceptual schema.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    object_types: Vector<ObjectType>,
    fact_types: Vector<FactType>,
    roles: Vector<Role>,
    role_sequences: Vector<RoleSequence>,
    readings: Vector<Reading>,
    constraints: Vector<PresenceConstraint>,
    names: HashMap<String, ObjectTypeId>,
    roles_by_player: HashMap<ObjectTypeId, Vector<RoleId>>,
    constraints_by_role: HashMap<RoleId, Vector<ConstraintId>>,
}

/// Converts an arena length into the next raw index.
///
/// # Panics
///
/// Panics if an arena grows past `u32::MAX` records.
fn next_index(len: usize) -> u32 {
    u32::try_from(len).expect("schema arena exhausted")
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Object Types
    // =========================================================================

    /// Adds a value type.
    pub fn add_value_type(&mut self, name: impl Into<String>, value: ValueType) -> ObjectTypeId {
        self.add_object_type(name.into(), ObjectKind::Value(value))
    }

    /// Adds an entity type.
    pub fn add_entity_type(&mut self, name: impl Into<String>, entity: EntityType) -> ObjectTypeId {
        self.add_object_type(name.into(), ObjectKind::Entity(entity))
    }

    fn add_object_type(&mut self, name: String, kind: ObjectKind) -> ObjectTypeId {
        let id = ObjectTypeId::new(next_index(self.object_types.len()));
        self.names.insert(name.clone(), id);
        self.object_types.push_back(ObjectType { id, name, kind });
        id
    }

    /// Gets an object type by id.
    #[must_use]
    pub fn object_type(&self, id: ObjectTypeId) -> &ObjectType {
        &self.object_types[id.index()]
    }

    /// Gets an object type by name.
    #[must_use]
    pub fn object_type_by_name(&self, name: &str) -> Option<&ObjectType> {
        self.names.get(name).map(|&id| self.object_type(id))
    }

    /// Gets an object type id by name.
    #[must_use]
    pub fn object_type_id(&self, name: &str) -> Option<ObjectTypeId> {
        self.names.get(name).copied()
    }

    /// Returns the name of an object type.
    #[must_use]
    pub fn name_of(&self, id: ObjectTypeId) -> &str {
        &self.object_type(id).name
    }

    /// Iterates over all object types in creation order.
    pub fn object_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.object_types.iter()
    }

    /// Replaces the kind of an object type, keeping its id and roles.
    pub fn replace_kind(&mut self, id: ObjectTypeId, kind: ObjectKind) {
        if let Some(ot) = self.object_types.get_mut(id.index()) {
            ot.kind = kind;
        }
    }

    /// Gets mutable entity data.
    pub fn entity_type_mut(&mut self, id: ObjectTypeId) -> Option<&mut EntityType> {
        match self.object_types.get_mut(id.index()).map(|ot| &mut ot.kind) {
            Some(ObjectKind::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Object types referenced but never declared.
    pub fn provisional_object_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.object_types.iter().filter(|ot| ot.is_provisional())
    }

    // =========================================================================
    // Fact Types and Roles
    // =========================================================================

    /// Adds a fact type, allocating one role per definition in order.
    pub fn add_fact_type(
        &mut self,
        roles: Vec<RoleDefinition>,
        inheritance: Option<TypeInheritance>,
    ) -> FactTypeId {
        let id = FactTypeId::new(next_index(self.fact_types.len()));
        let mut role_ids = Vec::with_capacity(roles.len());

        for (ordinal, def) in roles.into_iter().enumerate() {
            let role_id = RoleId::new(next_index(self.roles.len()));
            self.roles.push_back(Role {
                id: role_id,
                fact_type: id,
                player: def.player,
                ordinal,
                leading: def.leading,
                trailing: def.trailing,
                role_name: def.role_name,
                restriction: def.restriction,
            });
            self.roles_by_player
                .entry(def.player)
                .or_default()
                .push_back(role_id);
            role_ids.push(role_id);
        }

        self.fact_types.push_back(FactType {
            id,
            roles: role_ids,
            readings: Vec::new(),
            objectified_by: None,
            inheritance,
        });
        id
    }

    /// Gets a fact type by id.
    #[must_use]
    pub fn fact_type(&self, id: FactTypeId) -> &FactType {
        &self.fact_types[id.index()]
    }

    /// Iterates over all fact types in creation order.
    pub fn fact_types(&self) -> impl Iterator<Item = &FactType> {
        self.fact_types.iter()
    }

    /// Records the entity type objectifying a fact type.
    pub fn set_objectified_by(&mut self, fact_type: FactTypeId, entity: ObjectTypeId) {
        if let Some(ft) = self.fact_types.get_mut(fact_type.index()) {
            ft.objectified_by = Some(entity);
        }
    }

    /// Gets a role by id.
    #[must_use]
    pub fn role(&self, id: RoleId) -> &Role {
        &self.roles[id.index()]
    }

    /// Roles played by an object type, in creation order.
    #[must_use]
    pub fn roles_played_by(&self, player: ObjectTypeId) -> Vec<RoleId> {
        self.roles_by_player
            .get(&player)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of roles played by an object type.
    #[must_use]
    pub fn role_count(&self, player: ObjectTypeId) -> usize {
        self.roles_by_player.get(&player).map_or(0, Vector::len)
    }

    /// The sorted multiset of players of a fact type.
    #[must_use]
    pub fn player_multiset(&self, fact_type: FactTypeId) -> Vec<ObjectTypeId> {
        let mut players: Vec<_> = self
            .fact_type(fact_type)
            .roles
            .iter()
            .map(|&r| self.role(r).player)
            .collect();
        players.sort_unstable();
        players
    }

    /// Fact types whose players are exactly the given multiset.
    ///
    /// Candidates come from the roles of whichever player plays the fewest.
    #[must_use]
    pub fn fact_types_with_players(&self, players: &[ObjectTypeId]) -> Vec<FactTypeId> {
        let mut wanted = players.to_vec();
        wanted.sort_unstable();

        let Some(&scan) = wanted.iter().min_by_key(|&&p| self.role_count(p)) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        self.roles_played_by(scan)
            .into_iter()
            .map(|r| self.role(r).fact_type)
            .filter(|&ft| seen.insert(ft))
            .filter(|&ft| self.player_multiset(ft) == wanted)
            .collect()
    }

    /// Fact types over the named players.
    ///
    /// Unknown names yield no fact types.
    #[must_use]
    pub fn fact_types_by_player_set(&self, sorted_names: &[&str]) -> Vec<FactTypeId> {
        let players: Option<Vec<_>> = sorted_names
            .iter()
            .map(|name| self.object_type_id(name))
            .collect();
        players.map_or_else(Vec::new, |p| self.fact_types_with_players(&p))
    }

    /// The inheritance fact type linking `subtype` directly to `supertype`.
    #[must_use]
    pub fn type_inheritance(
        &self,
        subtype: ObjectTypeId,
        supertype: ObjectTypeId,
    ) -> Option<FactTypeId> {
        self.roles_played_by(subtype)
            .into_iter()
            .map(|r| self.role(r).fact_type)
            .find(|&ft| {
                self.fact_type(ft)
                    .inheritance
                    .is_some_and(|i| i.subtype == subtype && i.supertype == supertype)
            })
    }

    /// The object type and all of its supertypes, breadth first, without duplicates.
    ///
    /// For value types the chain follows base types.
    #[must_use]
    pub fn supertypes_transitive(&self, id: ObjectTypeId) -> Vec<ObjectTypeId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([id]);

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            result.push(next);
            match &self.object_type(next).kind {
                ObjectKind::Entity(entity) => queue.extend(entity.supertypes.iter().copied()),
                ObjectKind::Value(value) => queue.extend(value.base),
            }
        }
        result
    }

    // =========================================================================
    // Role Sequences and Readings
    // =========================================================================

    /// Adds a role sequence.
    pub fn add_role_sequence(&mut self, refs: Vec<RoleRef>) -> RoleSequenceId {
        let id = RoleSequenceId::new(next_index(self.role_sequences.len()));
        self.role_sequences.push_back(RoleSequence { id, refs });
        id
    }

    /// Gets a role sequence by id.
    #[must_use]
    pub fn role_sequence(&self, id: RoleSequenceId) -> &RoleSequence {
        &self.role_sequences[id.index()]
    }

    /// Adds a reading to a fact type.
    pub fn add_reading(
        &mut self,
        fact_type: FactTypeId,
        role_sequence: RoleSequenceId,
        text: impl Into<String>,
    ) -> ReadingId {
        let id = ReadingId::new(next_index(self.readings.len()));
        self.readings.push_back(Reading {
            id,
            fact_type,
            role_sequence,
            text: text.into(),
        });
        if let Some(ft) = self.fact_types.get_mut(fact_type.index()) {
            ft.readings.push(id);
        }
        id
    }

    /// Gets a reading by id.
    #[must_use]
    pub fn reading(&self, id: ReadingId) -> &Reading {
        &self.readings[id.index()]
    }

    /// The readings of a fact type, preferred reading first.
    #[must_use]
    pub fn readings(&self, fact_type: FactTypeId) -> Vec<&Reading> {
        self.fact_type(fact_type)
            .readings
            .iter()
            .map(|&r| self.reading(r))
            .collect()
    }

    /// A reading of `fact_type` with this text over an identical sequence.
    #[must_use]
    pub fn find_reading(
        &self,
        fact_type: FactTypeId,
        text: &str,
        refs: &[RoleRef],
    ) -> Option<ReadingId> {
        self.readings(fact_type)
            .into_iter()
            .find(|r| r.text == text && self.role_sequence(r.role_sequence).refs == refs)
            .map(|r| r.id)
    }

    /// A role sequence already used by a reading of `fact_type` with these refs.
    #[must_use]
    pub fn find_reading_sequence(
        &self,
        fact_type: FactTypeId,
        refs: &[RoleRef],
    ) -> Option<RoleSequenceId> {
        self.readings(fact_type)
            .into_iter()
            .map(|r| r.role_sequence)
            .find(|&seq| self.role_sequence(seq).refs == refs)
    }

    /// Verbalizes a reading with hyphen-bound adjectives, e.g. `Girl is going out with ugly-Boy`.
    #[must_use]
    pub fn expand_reading(&self, reading: ReadingId) -> String {
        let reading = self.reading(reading);
        let sequence = self.role_sequence(reading.role_sequence);

        reading
            .elements()
            .into_iter()
            .map(|element| match element {
                ReadingElement::Word(word) => word,
                ReadingElement::Role(i) => sequence
                    .refs
                    .get(i)
                    .map_or_else(|| format!("{{{i}}}"), |r| self.expand_role_ref(r)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn expand_role_ref(&self, role_ref: &RoleRef) -> String {
        let mut text = String::new();
        if !role_ref.leading.is_empty() {
            text.push_str(&role_ref.leading.hyphenated());
            text.push('-');
        }
        text.push_str(self.name_of(self.role(role_ref.role).player));
        if !role_ref.trailing.is_empty() {
            text.push('-');
            text.push_str(&role_ref.trailing.hyphenated());
        }
        if let Some(name) = &role_ref.role_name {
            text.push_str(" (as ");
            text.push_str(name);
            text.push(')');
        }
        text
    }

    // =========================================================================
    // Presence Constraints
    // =========================================================================

    /// Adds a presence constraint with its own role sequence.
    pub fn add_presence_constraint(&mut self, def: ConstraintDefinition) -> ConstraintId {
        let id = ConstraintId::new(next_index(self.constraints.len()));
        let role_sequence =
            self.add_role_sequence(def.roles.iter().copied().map(RoleRef::to).collect());

        for &role in &def.roles {
            self.constraints_by_role
                .entry(role)
                .or_default()
                .push_back(id);
        }
        self.constraints.push_back(PresenceConstraint {
            id,
            name: def.name,
            role_sequence,
            min_frequency: def.frequency.min,
            max_frequency: def.frequency.max,
            is_mandatory: def.is_mandatory,
            is_preferred_identifier: def.is_preferred_identifier,
        });
        id
    }

    /// Gets a presence constraint by id.
    #[must_use]
    pub fn presence_constraint(&self, id: ConstraintId) -> &PresenceConstraint {
        &self.constraints[id.index()]
    }

    /// Gets a mutable presence constraint.
    pub fn presence_constraint_mut(&mut self, id: ConstraintId) -> Option<&mut PresenceConstraint> {
        self.constraints.get_mut(id.index())
    }

    /// Iterates over all presence constraints in creation order.
    pub fn presence_constraints(&self) -> impl Iterator<Item = &PresenceConstraint> {
        self.constraints.iter()
    }

    /// The roles a constraint spans, sorted.
    #[must_use]
    pub fn constrained_roles(&self, id: ConstraintId) -> Vec<RoleId> {
        self.role_sequence(self.presence_constraint(id).role_sequence)
            .role_set()
    }

    /// The first presence constraint spanning exactly this set of roles.
    #[must_use]
    pub fn presence_constraint_over(&self, roles: &[RoleId]) -> Option<ConstraintId> {
        let mut wanted = roles.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let first = wanted.first()?;
        self.constraints_by_role
            .get(first)?
            .iter()
            .copied()
            .find(|&pc| self.constrained_roles(pc) == wanted)
    }

    /// Presence constraints touching a role.
    #[must_use]
    pub fn constraints_on_role(&self, role: RoleId) -> Vec<ConstraintId> {
        self.constraints_by_role
            .get(&role)
            .map(|pcs| pcs.iter().copied().collect())
            .unwrap_or_default()
    }

    // =========================================================================
    // Identification
    // =========================================================================

    /// The constraint that identifies an entity type.
    ///
    /// # Errors
    ///
    /// Returns `NoIdentifier` for value types and for entity types with
    /// neither their own identification nor an identifying supertype.
    pub fn preferred_identifier(&self, entity: ObjectTypeId) -> Result<&PresenceConstraint> {
        let ot = self.object_type(entity);
        let no_identifier = || Error::new(ErrorKind::NoIdentifier(ot.name.clone()));
        let data = ot.as_entity().ok_or_else(no_identifier)?;

        if let Some(pc) = data.preferred_identifier {
            return Ok(self.presence_constraint(pc));
        }

        // An objectified fact type identifies its entity by its own uniqueness.
        if let Some(objectified) = data.objectified {
            let roles = &self.fact_type(objectified).roles;
            let spanning = self.presence_constraints().find(|pc| {
                pc.is_unique()
                    && self
                        .constrained_roles(pc.id)
                        .iter()
                        .all(|r| roles.contains(r))
            });
            if let Some(pc) = spanning {
                return Ok(pc);
            }
        }

        // Identified through the supertype role of the identifying inheritance link.
        let supertype = data.identifying_supertype.ok_or_else(no_identifier)?;
        let link = self
            .type_inheritance(entity, supertype)
            .ok_or_else(no_identifier)?;
        self.fact_type(link)
            .roles
            .iter()
            .filter(|&&r| self.role(r).player == supertype)
            .flat_map(|&r| self.constraints_on_role(r))
            .map(|pc| self.presence_constraint(pc))
            .find(|pc| pc.is_preferred_identifier)
            .ok_or_else(no_identifier)
    }

    // =========================================================================
    // Counts
    // =========================================================================

    /// Number of object types.
    #[must_use]
    pub fn object_type_count(&self) -> usize {
        self.object_types.len()
    }

    /// Number of fact types.
    #[must_use]
    pub fn fact_type_count(&self) -> usize {
        self.fact_types.len()
    }

    /// Number of presence constraints.
    #[must_use]
    pub fn presence_constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
