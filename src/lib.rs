//! cqlc - Reading matching and role resolution for CQL
//!
//! This crate re-exports all layers of the compiler for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: cqlc_compiler    Declarations, canonicalizer, matcher, identification
//! Layer 1: cqlc_schema      Object types, fact types, readings, constraints
//! Layer 0: cqlc_foundation  Core types (ids, Adjective, Error)
//! ```

pub use cqlc_compiler as compiler;
pub use cqlc_foundation as foundation;
pub use cqlc_schema as schema;
