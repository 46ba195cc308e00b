//! Presence constraint declarations.
//!
//! `each Girl occurs at most one time in Girl is going out with Boy` names
//! roles by single phrases and finds them in existing readings. The clauses
//! never create fact types or readings.

use cqlc_foundation::{ConstraintId, Error, ErrorKind, Result, RoleId};
use cqlc_schema::{ConstraintDefinition, Frequency, Schema};

use crate::binding::{Bindings, Lookup};
use crate::canonicalize::{CanonicalClause, canonicalize};
use crate::declaration::{Clause, ConstraintDecl};
use crate::embedded::constrain;
use crate::matcher::match_clause;
use crate::scope::ResolutionScope;

/// Compiles a constraint declaration.
///
/// # Errors
///
/// - `NoMatchingFactType` if a clause matches no existing reading
/// - `AmbiguousRoleMatch` or `UnrecognizedPlayer` for an unresolvable role
/// - `ConflictingFrequency` if the roles already carry a different bound
pub fn compile_constraint(schema: &mut Schema, decl: &ConstraintDecl) -> Result<ConstraintId> {
    match decl {
        ConstraintDecl::Presence {
            name,
            quantifier,
            roles,
            clauses,
        } => compile_presence(schema, name.clone(), *quantifier, roles, clauses),
    }
}

fn compile_presence(
    schema: &mut Schema,
    name: Option<String>,
    quantifier: Frequency,
    roles: &[Clause],
    clauses: &[Clause],
) -> Result<ConstraintId> {
    let all: Vec<&Clause> = roles.iter().chain(clauses).collect();
    let scope = ResolutionScope::prepare(schema, &all, false)?;

    let mut bindings = Bindings::new();
    let mut matched: Vec<RoleId> = Vec::new();
    for clause in clauses {
        let canonical = canonicalize(clause, &scope).map_err(|e| e.in_clause(&clause.to_string()))?;
        let Some(m) = match_clause(schema, &canonical) else {
            return Err(Error::new(ErrorKind::NoMatchingFactType(canonical.text)));
        };
        let bound = m.roles();
        bindings.record_clause(&canonical, &bound);
        matched.extend(bound);
    }

    let mut constrained = Vec::with_capacity(roles.len());
    for clause in roles {
        let canonical = canonicalize(clause, &scope).map_err(|e| e.in_clause(&clause.to_string()))?;
        let role = resolve_role(schema, &bindings, &matched, &canonical)?;
        if !constrained.contains(&role) {
            constrained.push(role);
        }
    }

    constrain(
        schema,
        ConstraintDefinition::over(constrained)
            .with_frequency(quantifier)
            .named(name),
    )
}

/// Finds the role a single-phrase clause names among the matched roles.
///
/// The phrase's exact form is tried first; a bare player name then stands
/// for the only matched role it plays.
fn resolve_role(
    schema: &Schema,
    bindings: &Bindings,
    matched: &[RoleId],
    clause: &CanonicalClause,
) -> Result<RoleId> {
    let phrase = clause.single_phrase()?;
    let ambiguous = || {
        Error::new(ErrorKind::AmbiguousRoleMatch {
            player: clause.text.clone(),
            clause: clause.text.clone(),
        })
    };

    match bindings.lookup(phrase) {
        Lookup::Bound(role) => Ok(role),
        Lookup::Ambiguous => Err(ambiguous()),
        Lookup::Unbound => {
            let mut candidates: Vec<RoleId> = matched
                .iter()
                .copied()
                .filter(|&r| schema.role(r).player == phrase.player)
                .collect();
            candidates.dedup();
            match candidates.as_slice() {
                [] => Err(Error::unrecognized_player(clause.text.clone())),
                [role] => Ok(*role),
                _ => Err(ambiguous()),
            }
        }
    }
}
