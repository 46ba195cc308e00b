//! Entity type declarations and identification.
//!
//! An entity declaration links its supertypes, then establishes how the
//! entity is identified: by reference mode, which generates a value type and
//! a two-role fact type, or by explicit identifying roles drawn from fact
//! types declared alongside. Either way the result is a preferred identifier
//! constraint with a maximum frequency of one.

use tracing::debug;

use cqlc_foundation::{ConstraintId, Error, ErrorKind, FactTypeId, ObjectTypeId, Result, RoleId};
use cqlc_schema::{
    ConstraintDefinition, EntityType, Frequency, RoleDefinition, RoleRef, Schema, ValueType,
};

use crate::binding::{Bindings, Lookup};
use crate::canonicalize::{CanonicalClause, canonicalize};
use crate::config::CompilerConfig;
use crate::declaration::{Clause, EntityTypeDecl, FactClauses, Identification, ReferenceMode};
use crate::embedded::constrain;
use crate::fact_type::{compile_fact_type, objectify_entity};
use crate::scope::ResolutionScope;
use crate::subtype::link_supertype;
use crate::value_type::declare_value_type;

/// Compiles an entity type declaration.
///
/// # Errors
///
/// Any error from supertype linking or identification.
pub fn compile_entity(
    schema: &mut Schema,
    decl: &EntityTypeDecl,
    config: &CompilerConfig,
) -> Result<ObjectTypeId> {
    let entity = declare_entity(schema, &decl.name)?;

    let mut wants_identifying_supertype =
        decl.identification.is_none() && !is_identified(schema, entity);
    for supertype in &decl.supertypes {
        let id = resolve_supertype(schema, &supertype.name, config)?;
        let identifying = wants_identifying_supertype && !supertype.non_identifying;
        link_supertype(schema, entity, id, identifying)?;
        if identifying {
            wants_identifying_supertype = false;
        }
    }

    match &decl.identification {
        None => {}
        Some(Identification::ReferenceMode(mode)) => {
            identify_by_reference_mode(schema, entity, mode)?;
        }
        Some(Identification::Roles {
            identifying,
            clauses,
        }) => {
            identify_by_roles(schema, entity, identifying, clauses, config)?;
        }
    }
    Ok(entity)
}

fn is_identified(schema: &Schema, entity: ObjectTypeId) -> bool {
    schema
        .object_type(entity)
        .as_entity()
        .is_some_and(|e| e.preferred_identifier.is_some() || e.identifying_supertype.is_some())
}

/// Declares the entity type, resolving a forward reference in place.
fn declare_entity(schema: &mut Schema, name: &str) -> Result<ObjectTypeId> {
    let existing = schema
        .object_type_by_name(name)
        .map(|ot| (ot.id, ot.is_value_type(), ot.describe_kind()));

    match existing {
        None => {
            let id = schema.add_entity_type(name, EntityType::default());
            debug!(name, "declared entity type");
            Ok(id)
        }
        Some((_, true, described)) => Err(Error::new(ErrorKind::TypeConflict {
            name: name.to_string(),
            existing: described.to_string(),
        })),
        Some((id, false, _)) => {
            if let Some(entity) = schema.entity_type_mut(id) {
                if entity.provisional {
                    entity.provisional = false;
                    debug!(name, "resolved forward reference as entity type");
                }
            }
            Ok(id)
        }
    }
}

fn resolve_supertype(schema: &mut Schema, name: &str, config: &CompilerConfig) -> Result<ObjectTypeId> {
    if let Some(id) = schema.object_type_id(name) {
        return Ok(id);
    }
    if !config.allow_forward_references {
        return Err(Error::object_type_not_found(name));
    }
    debug!(name, "forward reference to supertype");
    Ok(schema.add_entity_type(name, EntityType::provisional()))
}

/// Records `pc` as the entity's identifier. Repeating the same
/// identification is accepted; a different one conflicts.
fn set_preferred_identifier(
    schema: &mut Schema,
    entity: ObjectTypeId,
    pc: ConstraintId,
) -> Result<()> {
    let name = schema.name_of(entity).to_string();
    let Some(data) = schema.entity_type_mut(entity) else {
        return Err(Error::internal(format!("{name} is not an entity type")));
    };
    match data.preferred_identifier {
        Some(existing) if existing != pc => {
            Err(Error::new(ErrorKind::ConflictingDeclaration(name)))
        }
        Some(_) => Ok(()),
        None => {
            data.preferred_identifier = Some(pc);
            debug!(entity = %name, constraint = %pc, "preferred identifier");
            Ok(())
        }
    }
}

// =============================================================================
// Reference Mode
// =============================================================================

/// Identifies `entity` by a generated value type named `<Entity> <Mode>`.
///
/// The value type is based on the mode's own value type if one exists. The
/// fact type has readings `{0} has {1}` and `{0} is of {1}`. Each entity
/// has exactly one value; each value identifies at most one entity.
///
/// # Errors
///
/// `TypeConflict` if the generated name belongs to an entity type.
pub fn identify_by_reference_mode(
    schema: &mut Schema,
    entity: ObjectTypeId,
    mode: &ReferenceMode,
) -> Result<ConstraintId> {
    let value_name = format!("{} {}", schema.name_of(entity), mode.mode);
    let base = schema
        .object_type_by_name(&mode.mode)
        .filter(|ot| ot.is_value_type())
        .map(|ot| ot.id);

    let existing = schema
        .object_type_by_name(&value_name)
        .filter(|ot| ot.is_value_type())
        .map(|ot| ot.id);
    let value_type = match existing {
        Some(id) => id,
        None => declare_value_type(
            schema,
            &value_name,
            ValueType {
                base,
                length: mode.length,
                scale: mode.scale,
                restriction: mode.restriction.clone(),
            },
        )?,
    };

    let (entity_role, value_role) = match find_reference_fact_type(schema, entity, value_type) {
        Some(roles) => roles,
        None => create_reference_fact_type(schema, entity, value_type),
    };

    constrain(
        schema,
        ConstraintDefinition::over(vec![entity_role]).with_frequency(Frequency::exactly_one()),
    )?;
    let pc = constrain(
        schema,
        ConstraintDefinition::over(vec![value_role])
            .with_frequency(Frequency::at_most_one())
            .preferred_identifier(true),
    )?;
    set_preferred_identifier(schema, entity, pc)?;
    Ok(pc)
}

fn find_reference_fact_type(
    schema: &Schema,
    entity: ObjectTypeId,
    value_type: ObjectTypeId,
) -> Option<(RoleId, RoleId)> {
    schema
        .fact_types_with_players(&[entity, value_type])
        .into_iter()
        .filter(|&ft| schema.fact_type(ft).inheritance.is_none())
        .find_map(|ft| {
            schema
                .readings(ft)
                .into_iter()
                .filter(|r| r.text == "{0} has {1}")
                .find_map(|r| {
                    let roles: Vec<RoleId> = schema.role_sequence(r.role_sequence).roles().collect();
                    match roles.as_slice() {
                        [e, v]
                            if schema.role(*e).player == entity
                                && schema.role(*v).player == value_type =>
                        {
                            Some((*e, *v))
                        }
                        _ => None,
                    }
                })
        })
}

fn create_reference_fact_type(
    schema: &mut Schema,
    entity: ObjectTypeId,
    value_type: ObjectTypeId,
) -> (RoleId, RoleId) {
    let ft = schema.add_fact_type(
        vec![
            RoleDefinition::played_by(entity),
            RoleDefinition::played_by(value_type),
        ],
        None,
    );
    let roles = schema.fact_type(ft).roles.clone();
    let (entity_role, value_role) = (roles[0], roles[1]);

    let forward = schema.add_role_sequence(vec![RoleRef::to(entity_role), RoleRef::to(value_role)]);
    schema.add_reading(ft, forward, "{0} has {1}");
    let reverse = schema.add_role_sequence(vec![RoleRef::to(value_role), RoleRef::to(entity_role)]);
    schema.add_reading(ft, reverse, "{0} is of {1}");

    debug!(
        entity = schema.name_of(entity),
        value_type = schema.name_of(value_type),
        fact_type = %ft,
        "created reference mode fact type"
    );
    (entity_role, value_role)
}

// =============================================================================
// Identifying Roles
// =============================================================================

/// Identifies `entity` by the roles its identifying phrases name.
///
/// Each group of clauses is compiled as one fact type. A fact type the
/// entity does not play in is objectified by it. Any other must have the
/// entity in exactly one role, and every other player must be named by an
/// identifying phrase or be a supertype of the entity.
///
/// # Errors
///
/// - `MultipleObjectification` for a second fact type without the entity
/// - `NonIdentifyingFactType` for a fact type breaking the rules above
/// - `NoIdentifyingRoleFound` for an identifying phrase bound to no role
pub fn identify_by_roles(
    schema: &mut Schema,
    entity: ObjectTypeId,
    identifying: &[Clause],
    groups: &[FactClauses],
    config: &CompilerConfig,
) -> Result<ConstraintId> {
    let all: Vec<&Clause> = identifying
        .iter()
        .chain(groups.iter().flat_map(|g| &g.readings))
        .collect();
    let scope = ResolutionScope::prepare(schema, &all, config.allow_forward_references)?;

    let phrases: Vec<CanonicalClause> = identifying
        .iter()
        .map(|c| canonicalize(c, &scope))
        .collect::<Result<_>>()?;
    let identifying_players = phrases
        .iter()
        .map(|c| c.single_phrase().map(|p| p.player))
        .collect::<Result<Vec<_>>>()?;
    let supertypes = schema.supertypes_transitive(entity);
    let entity_name = schema.name_of(entity).to_string();

    let mut bindings = Bindings::new();
    let mut fact_types: Vec<FactTypeId> = Vec::new();
    let mut objectified: Option<FactTypeId> = None;

    for group in groups {
        let clauses = group
            .readings
            .iter()
            .map(|c| canonicalize(c, &scope).map_err(|e| e.in_clause(&c.to_string())))
            .collect::<Result<Vec<_>>>()?;
        let fact_type = compile_fact_type(schema, &clauses, &mut bindings)?.fact_type;
        let players = schema.player_multiset(fact_type);
        let describe = || clauses.first().map(|c| c.text.clone()).unwrap_or_default();

        if !players.contains(&entity) {
            if objectified.is_some_and(|ft| ft != fact_type) {
                return Err(Error::new(ErrorKind::MultipleObjectification {
                    entity: entity_name,
                    fact_type: describe(),
                }));
            }
            objectify_entity(schema, entity, fact_type)?;
            objectified = Some(fact_type);
            fact_types.push(fact_type);
            continue;
        }

        let plays_once = players.iter().filter(|&&p| p == entity).count() == 1;
        let others_identify = players
            .iter()
            .filter(|&&p| p != entity)
            .all(|p| identifying_players.contains(p) || supertypes.contains(p));
        if !plays_once || !others_identify {
            return Err(Error::new(ErrorKind::NonIdentifyingFactType {
                entity: entity_name,
                fact_type: describe(),
            }));
        }
        fact_types.push(fact_type);
    }

    let mut roles = Vec::with_capacity(phrases.len());
    for clause in &phrases {
        let phrase = clause.single_phrase()?;
        match bindings.lookup(phrase) {
            Lookup::Bound(role) if fact_types.contains(&schema.role(role).fact_type) => {
                roles.push(role);
            }
            _ => {
                return Err(Error::new(ErrorKind::NoIdentifyingRoleFound {
                    entity: entity_name,
                    phrase: clause.text.clone(),
                }));
            }
        }
    }

    // Reuses a uniqueness constraint over exactly these roles, promoting it.
    let pc = constrain(
        schema,
        ConstraintDefinition::over(roles)
            .with_frequency(Frequency::at_most_one())
            .preferred_identifier(true),
    )?;
    set_preferred_identifier(schema, entity, pc)?;
    Ok(pc)
}
