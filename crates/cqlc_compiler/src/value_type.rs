//! Value type declarations.

use tracing::debug;

use cqlc_foundation::{Error, ErrorKind, ObjectTypeId, Result};
use cqlc_schema::{ObjectKind, Schema, ValueType};

use crate::declaration::ValueTypeDecl;

/// Declares a value type.
///
/// An unknown base type is created as a plain value type. A forward
/// reference of the same name is converted in place, keeping its roles.
///
/// # Errors
///
/// - `TypeConflict` if the name or base names a declared entity type
/// - `ConflictingDeclaration` if the name is a value type declared differently
pub fn compile_value_type(schema: &mut Schema, decl: &ValueTypeDecl) -> Result<ObjectTypeId> {
    let base = match decl.base.as_deref() {
        Some(base) if base != decl.name => Some(ensure_value_type(schema, base)?),
        _ => None,
    };
    let value = ValueType {
        base,
        length: decl.length,
        scale: decl.scale,
        restriction: decl.restriction.clone(),
    };
    declare_value_type(schema, &decl.name, value)
}

/// Declares a value type with the given specifics.
///
/// # Errors
///
/// As for [`compile_value_type`].
pub fn declare_value_type(schema: &mut Schema, name: &str, value: ValueType) -> Result<ObjectTypeId> {
    let Some(existing) = schema.object_type_by_name(name) else {
        let id = schema.add_value_type(name, value);
        debug!(name, "declared value type");
        return Ok(id);
    };
    let id = existing.id;
    let provisional = existing.is_provisional();
    let described = existing.describe_kind();

    match existing.as_value().cloned() {
        Some(current) if current == value => Ok(id),
        Some(_) => Err(Error::new(ErrorKind::ConflictingDeclaration(name.to_string()))),
        None if provisional => {
            schema.replace_kind(id, ObjectKind::Value(value));
            debug!(name, "resolved forward reference as value type");
            Ok(id)
        }
        None => Err(Error::new(ErrorKind::TypeConflict {
            name: name.to_string(),
            existing: described.to_string(),
        })),
    }
}

/// Finds or creates a plain value type.
///
/// # Errors
///
/// `TypeConflict` if the name belongs to a declared entity type.
pub fn ensure_value_type(schema: &mut Schema, name: &str) -> Result<ObjectTypeId> {
    let existing = schema
        .object_type_by_name(name)
        .filter(|ot| ot.is_value_type())
        .map(|ot| ot.id);
    match existing {
        Some(id) => Ok(id),
        None => declare_value_type(schema, name, ValueType::default()),
    }
}
