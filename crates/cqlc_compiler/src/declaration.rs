//! Declarations consumed by the compiler.
//!
//! These are the structures an upstream parser produces for each top-level
//! CQL statement. A clause is a flat token list; the canonicalizer decides
//! which words are role players and which are linking words.

use std::fmt;

use cqlc_foundation::Adjective;
use cqlc_schema::{Frequency, ValueRestriction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Declarations
// =============================================================================

/// One top-level CQL statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Declaration {
    /// `Name is written as String(32);`
    ValueType(ValueTypeDecl),
    /// `Person is identified by its Id;`
    EntityType(EntityTypeDecl),
    /// `Girl is going out with at most one Boy;`
    FactType(FactTypeDecl),
    /// `each Girl occurs at most one time in Girl is going out with Boy;`
    Constraint(ConstraintDecl),
}

impl Declaration {
    /// A short label used in error context.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::ValueType(decl) => decl.name.clone(),
            Self::EntityType(decl) => decl.name.clone(),
            Self::FactType(decl) => decl.name.clone().unwrap_or_else(|| {
                decl.clauses
                    .first()
                    .map_or_else(String::new, ToString::to_string)
            }),
            Self::Constraint(ConstraintDecl::Presence { name, clauses, .. }) => {
                name.clone().unwrap_or_else(|| {
                    clauses
                        .first()
                        .map_or_else(|| "constraint".to_string(), ToString::to_string)
                })
            }
        }
    }
}

/// A value type declaration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueTypeDecl {
    /// Declared name.
    pub name: String,
    /// Base value type name.
    pub base: Option<String>,
    /// Maximum length.
    pub length: Option<u32>,
    /// Decimal scale.
    pub scale: Option<u32>,
    /// Allowed values.
    pub restriction: Option<ValueRestriction>,
}

impl ValueTypeDecl {
    /// Creates a declaration with no base type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn written_as(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Sets the length and scale.
    #[must_use]
    pub fn with_size(mut self, length: Option<u32>, scale: Option<u32>) -> Self {
        self.length = length;
        self.scale = scale;
        self
    }

    /// Sets the allowed values.
    #[must_use]
    pub fn restricted_to(mut self, restriction: ValueRestriction) -> Self {
        self.restriction = Some(restriction);
        self
    }
}

/// An entity type declaration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityTypeDecl {
    /// Declared name.
    pub name: String,
    /// Supertypes in declaration order.
    pub supertypes: Vec<SupertypeRef>,
    /// How instances are identified, if stated here.
    pub identification: Option<Identification>,
}

impl EntityTypeDecl {
    /// Creates a declaration with no supertypes or identification.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a supertype.
    #[must_use]
    pub fn subtype_of(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(SupertypeRef::new(supertype));
        self
    }

    /// Adds a supertype that does not provide identification.
    #[must_use]
    pub fn non_identifying_subtype_of(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(SupertypeRef {
            name: supertype.into(),
            non_identifying: true,
        });
        self
    }

    /// Identifies by reference mode: `identified by its <mode>`.
    #[must_use]
    pub fn identified_by_mode(mut self, mode: impl Into<String>) -> Self {
        self.identification = Some(Identification::ReferenceMode(ReferenceMode::new(mode)));
        self
    }

    /// Sets the identification.
    #[must_use]
    pub fn identified_by(mut self, identification: Identification) -> Self {
        self.identification = Some(identification);
        self
    }
}

/// A supertype named in an entity declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupertypeRef {
    /// Supertype name.
    pub name: String,
    /// Explicitly marked as not providing identification.
    pub non_identifying: bool,
}

impl SupertypeRef {
    /// An ordinary supertype reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            non_identifying: false,
        }
    }
}

/// How an entity type is identified.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Identification {
    /// `identified by its Id`
    ReferenceMode(ReferenceMode),
    /// `identified by A and B where <fact clauses>`
    Roles {
        /// One single-phrase clause per identifying role.
        identifying: Vec<Clause>,
        /// The fact types, each a group of readings.
        clauses: Vec<FactClauses>,
    },
}

/// Reference mode shorthand.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceMode {
    /// The mode word, e.g. `Id` or `Code`.
    pub mode: String,
    /// Length of the generated value type.
    pub length: Option<u32>,
    /// Scale of the generated value type.
    pub scale: Option<u32>,
    /// Allowed values of the generated value type.
    pub restriction: Option<ValueRestriction>,
}

impl ReferenceMode {
    /// A mode with no size or restriction.
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            ..Self::default()
        }
    }
}

/// The readings of one fact type within a larger declaration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactClauses {
    /// Readings; all must involve the same players.
    pub readings: Vec<Clause>,
}

impl FactClauses {
    /// Groups readings of a single fact type.
    #[must_use]
    pub fn new(readings: Vec<Clause>) -> Self {
        Self { readings }
    }
}

/// A fact type declaration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactTypeDecl {
    /// Name of the objectifying entity type, if any.
    pub name: Option<String>,
    /// Readings; all must involve the same players.
    pub clauses: Vec<Clause>,
}

impl FactTypeDecl {
    /// An anonymous fact type.
    #[must_use]
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self {
            name: None,
            clauses,
        }
    }

    /// A fact type objectified by the named entity type.
    pub fn objectified(name: impl Into<String>, clauses: Vec<Clause>) -> Self {
        Self {
            name: Some(name.into()),
            clauses,
        }
    }
}

/// A constraint declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstraintDecl {
    /// `each <roles> occurs <quantifier> in <clauses>`
    Presence {
        /// Optional constraint name.
        name: Option<String>,
        /// The frequency range.
        quantifier: Frequency,
        /// One single-phrase clause per constrained role.
        roles: Vec<Clause>,
        /// Existing readings the roles are found in.
        clauses: Vec<Clause>,
    },
}

// =============================================================================
// Clauses and Tokens
// =============================================================================

/// A flat token list for one reading.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Clause {
    /// The tokens, in source order.
    pub tokens: Vec<Token>,
}

/// One element of a clause.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Token {
    /// A plain word: a linking word or part of a player name.
    Word(String),
    /// A term already resolved by the parser.
    Term(TermToken),
    /// `at most one`, `exactly one`, `some`
    Quantifier(Frequency),
    /// `ugly-` before a player
    LeadingAdjective(Adjective),
    /// `-monster` after a player
    TrailingAdjective(Adjective),
    /// `(as Father)` after a player
    RoleName(String),
    /// A value restriction after a player.
    Restriction(ValueRestriction),
    /// A literal value after a player.
    Literal(String),
}

/// The hash form of a role player.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TermToken {
    /// Object type name.
    pub name: String,
    /// Leading adjective.
    pub leading: Adjective,
    /// Trailing adjective.
    pub trailing: Adjective,
    /// Role name.
    pub role_name: Option<String>,
    /// Quantifier.
    pub quantifier: Option<Frequency>,
    /// Role value restriction.
    pub restriction: Option<ValueRestriction>,
    /// Literal value.
    pub literal: Option<String>,
}

impl TermToken {
    /// A bare term.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Clause {
    /// Creates an empty clause.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one plain word per whitespace-separated piece of `text`.
    #[must_use]
    pub fn words(mut self, text: &str) -> Self {
        self.tokens
            .extend(text.split_whitespace().map(|w| Token::Word(w.to_string())));
        self
    }

    /// Appends a resolved term.
    #[must_use]
    pub fn term(mut self, term: TermToken) -> Self {
        self.tokens.push(Token::Term(term));
        self
    }

    /// Appends a quantifier.
    #[must_use]
    pub fn quantifier(mut self, frequency: Frequency) -> Self {
        self.tokens.push(Token::Quantifier(frequency));
        self
    }

    /// Appends a hyphen-bound leading adjective.
    #[must_use]
    pub fn leading(mut self, adjective: &str) -> Self {
        self.tokens
            .push(Token::LeadingAdjective(Adjective::parse(adjective)));
        self
    }

    /// Appends a hyphen-bound trailing adjective.
    #[must_use]
    pub fn trailing(mut self, adjective: &str) -> Self {
        self.tokens
            .push(Token::TrailingAdjective(Adjective::parse(adjective)));
        self
    }

    /// Appends a role name.
    #[must_use]
    pub fn role_name(mut self, name: impl Into<String>) -> Self {
        self.tokens.push(Token::RoleName(name.into()));
        self
    }

    /// Appends a value restriction.
    #[must_use]
    pub fn restriction(mut self, restriction: ValueRestriction) -> Self {
        self.tokens.push(Token::Restriction(restriction));
        self
    }

    /// Appends a literal.
    #[must_use]
    pub fn literal(mut self, value: impl Into<String>) -> Self {
        self.tokens.push(Token::Literal(value.into()));
        self
    }

    /// Names of all terms, for forward reference declaration.
    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Term(term) => Some(term.name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut glue = true;
        for token in &self.tokens {
            let text = token.to_string();
            if !glue && !text.starts_with('-') {
                f.write_str(" ")?;
            }
            f.write_str(&text)?;
            glue = text.ends_with('-');
        }
        Ok(())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => f.write_str(w),
            Self::Term(term) => write!(f, "{term}"),
            Self::Quantifier(q) => write!(f, "{q}"),
            Self::LeadingAdjective(adj) => write!(f, "{}-", adj.hyphenated()),
            Self::TrailingAdjective(adj) => write!(f, "-{}", adj.hyphenated()),
            Self::RoleName(name) => write!(f, "(as {name})"),
            Self::Restriction(r) => write!(f, "restricted to {r}"),
            Self::Literal(v) => f.write_str(v),
        }
    }
}

impl fmt::Display for TermToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = &self.quantifier {
            write!(f, "{q} ")?;
        }
        if !self.leading.is_empty() {
            write!(f, "{}-", self.leading.hyphenated())?;
        }
        f.write_str(&self.name)?;
        if !self.trailing.is_empty() {
            write!(f, "-{}", self.trailing.hyphenated())?;
        }
        if let Some(name) = &self.role_name {
            write!(f, " (as {name})")?;
        }
        Ok(())
    }
}
