//! Error types for the CQL compiler.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! error aborts the declaration that raised it; the compiler driver decides
//! whether to continue with the next declaration.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for compilation.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Fills in the declaration name unless context already names one.
    #[must_use]
    pub fn in_declaration(mut self, declaration: &str) -> Self {
        let context = self.context.take().unwrap_or_default();
        let context = if context.declaration.is_some() {
            context
        } else {
            context.with_declaration(declaration)
        };
        self.context = Some(context);
        self
    }

    /// Fills in the clause text unless context already records one.
    #[must_use]
    pub fn in_clause(mut self, clause: &str) -> Self {
        let context = self.context.get_or_insert_with(ErrorContext::default);
        if context.clause.is_none() {
            context.clause = Some(clause.to_string());
        }
        self
    }

    /// Creates an unresolved adjective error.
    #[must_use]
    pub fn unresolved_adjective(adjective: impl Into<String>, clause: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedAdjective {
            adjective: adjective.into(),
            clause: clause.into(),
        })
    }

    /// Creates an unrecognized player error.
    #[must_use]
    pub fn unrecognized_player(clause: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnrecognizedPlayer(clause.into()))
    }

    /// Creates a malformed clause error.
    #[must_use]
    pub fn malformed_clause(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedClause(message.into()))
    }

    /// Creates an object type not found error.
    #[must_use]
    pub fn object_type_not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::ObjectTypeNotFound(name.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A hyphen-bound adjective never reached a role player.
    #[error("adjective '{adjective}' is not attached to any object type in '{clause}'")]
    UnresolvedAdjective {
        /// The dangling adjective text.
        adjective: String,
        /// The clause being canonicalized.
        clause: String,
    },

    /// A phrase could not be classified as a role player.
    #[error("unrecognized role player in '{0}'")]
    UnrecognizedPlayer(String),

    /// Several unmatched phrases map to the same player with nothing to tell them apart.
    #[error("ambiguous role for {player} in '{clause}'")]
    AmbiguousRoleMatch {
        /// The player with more than one candidate role.
        player: String,
        /// The clause being bound.
        clause: String,
    },

    /// An embedded quantifier disagrees with an existing constraint.
    #[error("conflicting frequency over {roles}: already {existing}, now {requested}")]
    ConflictingFrequency {
        /// Description of the constrained role set.
        roles: String,
        /// The frequency already recorded.
        existing: String,
        /// The frequency requested now.
        requested: String,
    },

    /// A fact type in an identification does not identify the entity.
    #[error("fact type '{fact_type}' does not identify {entity}")]
    NonIdentifyingFactType {
        /// The entity type being identified.
        entity: String,
        /// A reading of the offending fact type.
        fact_type: String,
    },

    /// An identifying phrase was not bound to any role.
    #[error("no identifying role found for '{phrase}' of {entity}")]
    NoIdentifyingRoleFound {
        /// The entity type being identified.
        entity: String,
        /// The identifying phrase.
        phrase: String,
    },

    /// A fact type or entity type would be objectified twice.
    #[error("{entity} cannot objectify '{fact_type}': already objectified")]
    MultipleObjectification {
        /// The objectifying entity type.
        entity: String,
        /// A reading of the fact type.
        fact_type: String,
    },

    /// Names used but never declared.
    #[error("unresolved forward references: {}", .0.join(", "))]
    UnresolvedForwardReference(Vec<String>),

    /// No preferred identifier can be resolved for an entity type.
    #[error("{0} has no preferred identifier")]
    NoIdentifier(String),

    /// A clause is structurally invalid.
    #[error("malformed clause: {0}")]
    MalformedClause(String),

    /// Clauses of one declaration do not share a player set.
    #[error("clauses do not involve the same object types: '{0}'")]
    ClausePlayerMismatch(String),

    /// A constraint refers to a fact type reading that does not exist.
    #[error("no fact type matches '{0}'")]
    NoMatchingFactType(String),

    /// A name is already used by an object type of another kind.
    #[error("{name} is already declared as {existing}")]
    TypeConflict {
        /// The declared name.
        name: String,
        /// Description of the existing declaration.
        existing: String,
    },

    /// A redeclaration disagrees with the original.
    #[error("conflicting declaration of {0}")]
    ConflictingDeclaration(String),

    /// A subtype link would close a cycle.
    #[error("{subtype} cannot be a subtype of {supertype}: circular inheritance")]
    CircularSupertype {
        /// The would-be subtype.
        subtype: String,
        /// The would-be supertype.
        supertype: String,
    },

    /// Lookup by name failed.
    #[error("object type not found: {0}")]
    ObjectTypeNotFound(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Name of the declaration being compiled.
    pub declaration: Option<String>,
    /// Text of the offending clause.
    pub clause: Option<String>,
    /// Position of the declaration in the compilation unit.
    pub index: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the declaration name.
    #[must_use]
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }

    /// Sets the clause text.
    #[must_use]
    pub fn with_clause(mut self, clause: impl Into<String>) -> Self {
        self.clause = Some(clause.into());
        self
    }

    /// Sets the declaration position.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.index {
            write!(f, "declaration {index}")?;
        }
        if let Some(declaration) = &self.declaration {
            if self.index.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "({declaration})")?;
        }
        if let Some(clause) = &self.clause {
            write!(f, ": {clause}")?;
        }
        Ok(())
    }
}
