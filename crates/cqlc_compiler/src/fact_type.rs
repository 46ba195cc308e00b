//! Compiling the readings of one fact type.
//!
//! All clauses of a fact type declaration must involve the same players.
//! The first clause that matches an existing reading decides the fact type;
//! if none does, a new one is created from the first clause. Every other
//! clause is then matched against that fact type or, failing that, bound to
//! its roles and added as a new reading.

use tracing::debug;

use cqlc_foundation::{Error, ErrorKind, FactTypeId, ObjectTypeId, Result, RoleId};
use cqlc_schema::{EntityType, ObjectKind, Schema};

use crate::binding::Bindings;
use crate::builder::{add_reading, add_residual_reading, create_fact_type, residual_is_covered};
use crate::canonicalize::CanonicalClause;
use crate::embedded::apply_quantifiers;
use crate::matcher::{ReadingMatch, match_clause, match_clause_in};

/// The result of compiling one group of readings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledFactType {
    /// The matched or created fact type.
    pub fact_type: FactTypeId,
    /// True if the fact type was created by this group.
    pub created: bool,
    /// For each clause, the roles its phrases were bound to, in phrase order.
    pub clause_roles: Vec<Vec<RoleId>>,
}

/// Compiles the readings of one fact type.
///
/// # Errors
///
/// - `ClausePlayerMismatch` if the clauses involve different players
/// - `AmbiguousRoleMatch` if an unmatched clause cannot be bound
/// - `ConflictingFrequency` from embedded quantifiers
pub fn compile_fact_type(
    schema: &mut Schema,
    clauses: &[CanonicalClause],
    bindings: &mut Bindings,
) -> Result<CompiledFactType> {
    let Some(first) = clauses.first() else {
        return Err(Error::malformed_clause("fact type has no readings"));
    };
    let players = first.players();
    if let Some(odd) = clauses.iter().find(|c| c.players() != players) {
        return Err(Error::new(ErrorKind::ClausePlayerMismatch(odd.text.clone())));
    }

    let mut matches: Vec<Option<ReadingMatch>> =
        clauses.iter().map(|c| match_clause(schema, c)).collect();

    let (fact_type, created) = match matches.iter().flatten().next() {
        Some(m) => (m.fact_type, false),
        None => (create_fact_type(schema, first).0, true),
    };

    // Matches against other fact types over the same players are retried here.
    for (m, clause) in matches.iter_mut().zip(clauses) {
        if m.as_ref().is_some_and(|m| m.fact_type != fact_type) {
            *m = match_clause_in(schema, clause, fact_type);
        }
    }
    if created {
        matches[0] = match_clause_in(schema, first, fact_type);
    }

    let mut clause_roles: Vec<Option<Vec<RoleId>>> = vec![None; clauses.len()];
    for (i, m) in matches.iter().enumerate() {
        if let Some(m) = m {
            let roles = m.roles();
            bindings.record_clause(&clauses[i], &roles);
            clause_roles[i] = Some(roles);
        }
    }

    for (i, clause) in clauses.iter().enumerate() {
        if clause_roles[i].is_some() {
            continue;
        }
        let roles = match match_clause_in(schema, clause, fact_type) {
            Some(m) => {
                let roles = m.roles();
                matches[i] = Some(m);
                roles
            }
            None => {
                let roles = bindings
                    .bind(schema, clause, fact_type)
                    .map_err(|e| e.in_clause(&clause.text))?;
                add_reading(schema, fact_type, clause, &roles);
                roles
            }
        };
        bindings.record_clause(clause, &roles);
        clause_roles[i] = Some(roles);
    }

    // Residual adjectives call for a qualified copy of the matched reading,
    // unless a reading already qualifies the role that way.
    for m in matches.iter().flatten().filter(|m| m.has_residual()) {
        let uncovered = m
            .absorptions
            .iter()
            .filter(|a| a.has_residual())
            .any(|a| !residual_is_covered(schema, fact_type, a));
        if uncovered {
            add_residual_reading(schema, m);
        }
    }

    let clause_roles: Vec<Vec<RoleId>> = clause_roles.into_iter().flatten().collect();
    for (clause, roles) in clauses.iter().zip(&clause_roles) {
        apply_quantifiers(schema, fact_type, clause, roles).map_err(|e| e.in_clause(&clause.text))?;
    }

    Ok(CompiledFactType {
        fact_type,
        created,
        clause_roles,
    })
}

/// Makes `entity` the objectification of `fact_type`, creating or adopting
/// the entity type as needed.
///
/// # Errors
///
/// - `TypeConflict` if the name belongs to a value type
/// - `MultipleObjectification` if either side is already objectified elsewhere
pub fn objectify(schema: &mut Schema, name: &str, fact_type: FactTypeId) -> Result<ObjectTypeId> {
    let existing = schema
        .object_type_by_name(name)
        .map(|ot| (ot.id, ot.is_value_type(), ot.describe_kind()));
    let entity = match existing {
        Some((_, true, described)) => {
            return Err(Error::new(ErrorKind::TypeConflict {
                name: name.to_string(),
                existing: described.to_string(),
            }));
        }
        Some((id, false, _)) => id,
        None => schema.add_entity_type(name, EntityType::default()),
    };
    objectify_entity(schema, entity, fact_type)?;
    Ok(entity)
}

/// Links an existing entity type and a fact type by objectification.
///
/// # Errors
///
/// `MultipleObjectification` if either side is already objectified elsewhere.
pub fn objectify_entity(
    schema: &mut Schema,
    entity: ObjectTypeId,
    fact_type: FactTypeId,
) -> Result<()> {
    let current = schema
        .object_type(entity)
        .as_entity()
        .and_then(|e| e.objectified);
    let objectifier = schema.fact_type(fact_type).objectified_by;
    let clash = current.is_some_and(|ft| ft != fact_type)
        || objectifier.is_some_and(|e| e != entity);
    if clash {
        let reading = schema
            .fact_type(fact_type)
            .default_reading()
            .map(|r| schema.expand_reading(r))
            .unwrap_or_default();
        return Err(Error::new(ErrorKind::MultipleObjectification {
            entity: schema.name_of(entity).to_string(),
            fact_type: reading,
        }));
    }

    if let Some(data) = schema.entity_type_mut(entity) {
        data.objectified = Some(fact_type);
        data.provisional = false;
    } else {
        schema.replace_kind(
            entity,
            ObjectKind::Entity(EntityType {
                objectified: Some(fact_type),
                ..EntityType::default()
            }),
        );
    }
    schema.set_objectified_by(fact_type, entity);
    debug!(entity = schema.name_of(entity), fact_type = %fact_type, "objectified fact type");
    Ok(())
}
