//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: arena ids, Adjective, and Error.

mod adjectives;
mod errors;
