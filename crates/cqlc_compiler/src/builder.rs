//! Reading construction.

use tracing::debug;

use cqlc_foundation::{FactTypeId, ReadingId, RoleId, RoleSequenceId};
use cqlc_schema::{RoleDefinition, RoleRef, Schema};

use crate::canonicalize::{CanonicalClause, ClauseElement};
use crate::matcher::{Absorption, ReadingMatch};

/// Creates a fact type with one role per phrase, in phrase order, and its
/// first reading.
pub fn create_fact_type(schema: &mut Schema, clause: &CanonicalClause) -> (FactTypeId, Vec<RoleId>) {
    let definitions = clause
        .phrases()
        .map(|p| {
            RoleDefinition::played_by(p.player)
                .with_leading(p.leading.clone())
                .with_trailing(p.trailing.clone())
                .with_role_name(p.role_name.clone())
                .with_restriction(p.restriction.clone())
        })
        .collect();
    let fact_type = schema.add_fact_type(definitions, None);
    let roles = schema.fact_type(fact_type).roles.clone();
    debug!(fact_type = %fact_type, arity = roles.len(), clause = %clause, "created fact type");

    add_reading(schema, fact_type, clause, &roles);
    (fact_type, roles)
}

/// The template for a clause: each phrase becomes `{i}` by phrase position.
#[must_use]
pub fn reading_template(clause: &CanonicalClause) -> String {
    let mut position = 0;
    clause
        .elements
        .iter()
        .map(|e| match e {
            ClauseElement::Word(w) => w.clone(),
            ClauseElement::Phrase(_) => {
                position += 1;
                format!("{{{}}}", position - 1)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Adds a reading for a clause whose phrases are bound to `roles`.
///
/// Re-adding an existing reading is a no-op, and an identical role sequence
/// already used by the fact type is reused.
pub fn add_reading(
    schema: &mut Schema,
    fact_type: FactTypeId,
    clause: &CanonicalClause,
    roles: &[RoleId],
) -> ReadingId {
    let refs: Vec<RoleRef> = clause
        .phrases()
        .zip(roles)
        .map(|(p, &role)| {
            RoleRef::to(role)
                .with_adjectives(p.leading.clone(), p.trailing.clone())
                .with_role_name(p.role_name.clone())
        })
        .collect();
    insert_reading(schema, fact_type, reading_template(clause), refs)
}

/// Adds the reading a match with residual qualifiers calls for: the matched
/// text over a copy of its role sequence carrying the extra qualifiers.
pub fn add_residual_reading(schema: &mut Schema, m: &ReadingMatch) -> ReadingId {
    let reading = schema.reading(m.reading).clone();
    let mut refs = schema.role_sequence(reading.role_sequence).refs.clone();
    for absorption in m.absorptions.iter().filter(|a| a.has_residual()) {
        if let Some(role_ref) = refs.get_mut(absorption.position) {
            *role_ref = absorption.extend(role_ref);
        }
    }
    insert_reading(schema, m.fact_type, reading.text, refs)
}

/// True if some reading of the fact type already qualifies the absorbed
/// role exactly as the residual does.
#[must_use]
pub fn residual_is_covered(schema: &Schema, fact_type: FactTypeId, absorption: &Absorption) -> bool {
    schema.readings(fact_type).into_iter().any(|reading| {
        schema
            .role_sequence(reading.role_sequence)
            .refs
            .iter()
            .any(|r| {
                r.role == absorption.role
                    && r.leading == absorption.residual_leading
                    && r.trailing == absorption.residual_trailing
                    && (absorption.residual_role_name.is_none()
                        || r.role_name == absorption.residual_role_name)
            })
    })
}

fn insert_reading(
    schema: &mut Schema,
    fact_type: FactTypeId,
    text: String,
    refs: Vec<RoleRef>,
) -> ReadingId {
    if let Some(existing) = schema.find_reading(fact_type, &text, &refs) {
        return existing;
    }
    let sequence: RoleSequenceId = match schema.find_reading_sequence(fact_type, &refs) {
        Some(sequence) => sequence,
        None => schema.add_role_sequence(refs),
    };
    let reading = schema.add_reading(fact_type, sequence, text);
    debug!(fact_type = %fact_type, reading = %reading, text = %schema.expand_reading(reading), "added reading");
    reading
}
