//! Presence constraints from quantifiers.
//!
//! "Girl is going out with at most one Boy" constrains how often each Girl
//! occurs, so the quantifier on the Boy phrase becomes a uniqueness
//! constraint over the complementary role set: every role except Boy's.

use tracing::debug;

use cqlc_foundation::{ConstraintId, Error, ErrorKind, FactTypeId, Result, RoleId};
use cqlc_schema::{ConstraintDefinition, Frequency, Schema};

use crate::canonicalize::CanonicalClause;

/// The roles a quantifier on `role` constrains.
///
/// A unary fact type has no other roles, so the role constrains itself.
#[must_use]
pub fn complementary_roles(schema: &Schema, fact_type: FactTypeId, role: RoleId) -> Vec<RoleId> {
    let roles = &schema.fact_type(fact_type).roles;
    if roles.len() == 1 {
        return roles.clone();
    }
    roles.iter().copied().filter(|&r| r != role).collect()
}

/// Applies every quantifier in a clause whose phrases are bound to `roles`.
///
/// # Errors
///
/// `ConflictingFrequency` if a quantifier disagrees with a recorded one.
pub fn apply_quantifiers(
    schema: &mut Schema,
    fact_type: FactTypeId,
    clause: &CanonicalClause,
    roles: &[RoleId],
) -> Result<Vec<ConstraintId>> {
    let quantified: Vec<(RoleId, Frequency)> = clause
        .phrases()
        .zip(roles)
        .filter_map(|(p, &role)| p.quantifier.map(|q| (role, q)))
        .collect();

    quantified
        .into_iter()
        .map(|(role, quantifier)| {
            let over = complementary_roles(schema, fact_type, role);
            constrain(
                schema,
                ConstraintDefinition::over(over).with_frequency(quantifier),
            )
        })
        .collect()
}

/// Creates a presence constraint, or tightens the one already spanning
/// exactly the same roles.
///
/// A bound may be set where none was recorded, or restated unchanged.
///
/// # Errors
///
/// `ConflictingFrequency` if a recorded bound differs from the requested one.
pub fn constrain(schema: &mut Schema, def: ConstraintDefinition) -> Result<ConstraintId> {
    let Some(existing) = schema.presence_constraint_over(&def.roles) else {
        let roles = def.roles.len();
        let frequency = def.frequency;
        let id = schema.add_presence_constraint(def);
        debug!(constraint = %id, roles, %frequency, "created presence constraint");
        return Ok(id);
    };

    let current = schema.presence_constraint(existing).frequency();
    let requested = def.frequency;
    let conflicts = |a: Option<u32>, b: Option<u32>| matches!((a, b), (Some(a), Some(b)) if a != b);
    if conflicts(current.min, requested.min) || conflicts(current.max, requested.max) {
        return Err(Error::new(ErrorKind::ConflictingFrequency {
            roles: describe_roles(schema, &def.roles),
            existing: current.to_string(),
            requested: requested.to_string(),
        }));
    }

    if let Some(pc) = schema.presence_constraint_mut(existing) {
        pc.min_frequency = pc.min_frequency.or(requested.min);
        pc.max_frequency = pc.max_frequency.or(requested.max);
        pc.is_mandatory |= def.is_mandatory;
        pc.is_preferred_identifier |= def.is_preferred_identifier;
        if pc.name.is_none() {
            pc.name = def.name;
        }
    }
    if current != requested {
        debug!(constraint = %existing, %requested, "tightened presence constraint");
    }
    Ok(existing)
}

/// Player names of a role set, for diagnostics.
#[must_use]
pub fn describe_roles(schema: &Schema, roles: &[RoleId]) -> String {
    roles
        .iter()
        .map(|&r| schema.name_of(schema.role(r).player))
        .collect::<Vec<_>>()
        .join(", ")
}
