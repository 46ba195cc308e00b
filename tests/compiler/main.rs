//! Integration tests for Layer 2: Compiler
//!
//! Tests for compiling declarations into a schema: reading matching,
//! adjective absorption, role binding, embedded quantifiers, entity
//! identification, subtypes, and the compiler driver.

mod declarations;
mod scenarios;
mod support;
