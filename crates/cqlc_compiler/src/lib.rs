//! Reading matching and role resolution for CQL.
//!
//! This crate compiles declarations into a [`cqlc_schema::Schema`]:
//! - [`declaration`] - The declarations and clause tokens an upstream parser produces
//! - [`scope`] and [`canonicalize`] - Resolving words to players, adjectives and role names
//! - [`matcher`] - Matching a clause against existing readings, absorbing adjectives
//! - [`binding`] and [`builder`] - Binding phrases to roles and adding readings
//! - [`embedded`] - Presence constraints from quantifiers
//! - [`entity`], [`subtype`] and [`value_type`] - Object type declarations and identification
//! - [`compiler`] - The atomic, policy-driven driver
//!
//! # Example
//!
//! ```
//! use cqlc_compiler::{Clause, Compiler, Declaration, EntityTypeDecl, FactTypeDecl};
//! use cqlc_schema::Frequency;
//!
//! let mut compiler = Compiler::new();
//! compiler.compile(&Declaration::EntityType(EntityTypeDecl::new("Girl"))).unwrap();
//! compiler.compile(&Declaration::EntityType(EntityTypeDecl::new("Boy"))).unwrap();
//! compiler
//!     .compile(&Declaration::FactType(FactTypeDecl::new(vec![
//!         Clause::new()
//!             .words("Girl is going out with")
//!             .quantifier(Frequency::at_most_one())
//!             .words("Boy"),
//!     ])))
//!     .unwrap();
//!
//! assert_eq!(compiler.schema().fact_type_count(), 1);
//! assert_eq!(compiler.schema().presence_constraint_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod builder;
pub mod canonicalize;
pub mod compiler;
pub mod config;
pub mod constraint;
pub mod declaration;
pub mod embedded;
pub mod entity;
pub mod fact_type;
pub mod matcher;
pub mod scope;
pub mod subtype;
pub mod value_type;

pub use binding::{Bindings, Lookup, RoleKey};
pub use canonicalize::{CanonicalClause, ClauseElement, RolePhrase, canonicalize};
pub use compiler::{Compiler, compile_schema};
pub use config::{CompilerConfig, ErrorPolicy};
pub use declaration::{
    Clause, ConstraintDecl, Declaration, EntityTypeDecl, FactClauses, FactTypeDecl,
    Identification, ReferenceMode, SupertypeRef, TermToken, Token, ValueTypeDecl,
};
pub use fact_type::CompiledFactType;
pub use matcher::{Absorption, ReadingMatch, match_clause};
pub use scope::ResolutionScope;
