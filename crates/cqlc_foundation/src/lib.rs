//! Core types for the CQL compiler.
//!
//! This crate provides:
//! - Typed arena identifiers ([`ObjectTypeId`], [`FactTypeId`], [`RoleId`], ...)
//! - [`Adjective`] - Ordered adjective words with prefix/suffix algebra
//! - [`Error`] - Rich error types with declaration context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adjective;
pub mod error;
pub mod id;

pub use adjective::Adjective;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{ConstraintId, FactTypeId, ObjectTypeId, ReadingId, RoleId, RoleSequenceId};
