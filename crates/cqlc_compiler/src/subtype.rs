//! Subtype links.
//!
//! Each supertype of an entity type is linked by an inheritance fact type
//! with roles (subtype, supertype), four readings, and two presence
//! constraints. The supertype-side constraint identifies the subtype when
//! the link is the identifying one.

use tracing::debug;

use cqlc_foundation::{Error, ErrorKind, FactTypeId, ObjectTypeId, Result};
use cqlc_schema::{ConstraintDefinition, Frequency, RoleDefinition, RoleRef, Schema, TypeInheritance};

/// Readings of an inheritance fact type; `{0}` is the subtype.
const INHERITANCE_READINGS: [&str; 2] = ["{0} is a kind of {1}", "{0} is a subtype of {1}"];

/// `{1} is a {0}` and `{1} is an {0}`, the one fitting the subtype's first
/// letter first.
fn article_readings(subtype_name: &str) -> [&'static str; 2] {
    let vowel = subtype_name
        .chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
    if vowel {
        ["{1} is an {0}", "{1} is a {0}"]
    } else {
        ["{1} is a {0}", "{1} is an {0}"]
    }
}

/// Links `subtype` to `supertype`. Linking the same pair again returns the
/// existing link.
///
/// # Errors
///
/// - `TypeConflict` if either side is a value type
/// - `CircularSupertype` if `supertype` is `subtype` or one of its subtypes
pub fn link_supertype(
    schema: &mut Schema,
    subtype: ObjectTypeId,
    supertype: ObjectTypeId,
    identifying: bool,
) -> Result<FactTypeId> {
    if let Some(existing) = schema.type_inheritance(subtype, supertype) {
        return Ok(existing);
    }
    for id in [subtype, supertype] {
        let ot = schema.object_type(id);
        if ot.is_value_type() {
            return Err(Error::new(ErrorKind::TypeConflict {
                name: ot.name.clone(),
                existing: ot.describe_kind().to_string(),
            }));
        }
    }
    if schema.supertypes_transitive(supertype).contains(&subtype) {
        return Err(Error::new(ErrorKind::CircularSupertype {
            subtype: schema.name_of(subtype).to_string(),
            supertype: schema.name_of(supertype).to_string(),
        }));
    }

    let fact_type = schema.add_fact_type(
        vec![
            RoleDefinition::played_by(subtype),
            RoleDefinition::played_by(supertype),
        ],
        Some(TypeInheritance {
            subtype,
            supertype,
            provides_identification: identifying,
        }),
    );
    let roles = schema.fact_type(fact_type).roles.clone();
    let (sub_role, super_role) = (roles[0], roles[1]);

    let sequence = schema.add_role_sequence(vec![RoleRef::to(sub_role), RoleRef::to(super_role)]);
    let articles = article_readings(schema.name_of(subtype));
    for text in INHERITANCE_READINGS.into_iter().chain(articles) {
        schema.add_reading(fact_type, sequence, text);
    }

    // Each subtype instance is exactly one supertype instance.
    schema.add_presence_constraint(
        ConstraintDefinition::over(vec![sub_role]).with_frequency(Frequency::exactly_one()),
    );
    // Each supertype instance is at most one subtype instance.
    schema.add_presence_constraint(
        ConstraintDefinition::over(vec![super_role])
            .with_frequency(Frequency::at_most_one())
            .preferred_identifier(identifying),
    );

    if let Some(entity) = schema.entity_type_mut(subtype) {
        entity.supertypes.push(supertype);
        if identifying {
            entity.identifying_supertype = Some(supertype);
        }
    }

    debug!(
        subtype = schema.name_of(subtype),
        supertype = schema.name_of(supertype),
        identifying,
        "linked subtype"
    );
    Ok(fact_type)
}
