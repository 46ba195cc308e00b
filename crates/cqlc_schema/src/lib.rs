//! The schema graph for the CQL compiler.
//!
//! This crate provides:
//! - [`ObjectType`] - Value types and entity types
//! - [`FactType`] and [`Role`] - Relationships and their argument positions
//! - [`RoleSequence`] and [`Reading`] - Verbalizations with reading-local adjectives
//! - [`PresenceConstraint`] - Frequency, mandatory and identification constraints
//! - [`Schema`] - The arena-backed graph with lookup indices and queries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constraint;
pub mod fact_type;
pub mod object_type;
pub mod reading;
pub mod schema;

pub use constraint::{ConstraintDefinition, Frequency, PresenceConstraint};
pub use fact_type::{FactType, Role, RoleDefinition, TypeInheritance};
pub use object_type::{EntityType, ObjectKind, ObjectType, ValueRange, ValueRestriction, ValueType};
pub use reading::{Reading, ReadingElement, RoleRef, RoleSequence};
pub use schema::Schema;
