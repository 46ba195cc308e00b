//! Configuration for the compiler driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the driver does when a declaration fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorPolicy {
    /// Stop at the first failing declaration.
    #[default]
    StopAtFirst,
    /// Roll the failing declaration back and continue with the next.
    Collect,
}

/// Configuration for the compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompilerConfig {
    /// Behavior on a failing declaration.
    pub error_policy: ErrorPolicy,

    /// Maximum number of errors collected before giving up.
    pub max_errors: usize,

    /// Whether an undeclared term becomes a provisional entity type.
    pub allow_forward_references: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::StopAtFirst,
            max_errors: 100,
            allow_forward_references: true,
        }
    }
}

impl CompilerConfig {
    /// Stops at the first error and requires every term to be declared first.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            error_policy: ErrorPolicy::StopAtFirst,
            max_errors: 1,
            allow_forward_references: false,
        }
    }

    /// Collects as many errors as possible and allows forward references.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            error_policy: ErrorPolicy::Collect,
            max_errors: usize::MAX,
            allow_forward_references: true,
        }
    }

    /// Builder method to set the error policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Builder method to set the error cap.
    #[must_use]
    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = max;
        self
    }

    /// Builder method to allow or forbid forward references.
    #[must_use]
    pub fn with_forward_references(mut self, allow: bool) -> Self {
        self.allow_forward_references = allow;
        self
    }
}
