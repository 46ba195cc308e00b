//! Integration tests for Layer 1: Schema
//!
//! Tests for the metamodel graph: object types, fact types, readings,
//! presence constraints, and identification queries.

mod graph;
mod identification;
