//! Role bindings shared across the clauses of one declaration.
//!
//! Once a phrase has been bound to a role, later phrases with the same role
//! name, or the same player and adjectives, refer to the same role. This is
//! how a reading that matches nothing can still be attached to the roles of
//! a fact type established by an earlier clause.

use std::collections::HashMap;

use cqlc_foundation::{Adjective, Error, ErrorKind, FactTypeId, ObjectTypeId, Result, RoleId};
use cqlc_schema::Schema;

use crate::canonicalize::{CanonicalClause, RolePhrase};

/// How a phrase is recognized across clauses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoleKey {
    /// A role name.
    RoleName(String),
    /// A player with its adjectives.
    Form {
        /// The player.
        player: ObjectTypeId,
        /// Leading adjective.
        leading: Adjective,
        /// Trailing adjective.
        trailing: Adjective,
    },
}

impl RoleKey {
    /// The key a phrase is looked up by: its role name if it has one.
    #[must_use]
    pub fn of(phrase: &RolePhrase) -> Self {
        match &phrase.role_name {
            Some(name) => Self::RoleName(name.clone()),
            None => Self::form_of(phrase),
        }
    }

    fn form_of(phrase: &RolePhrase) -> Self {
        Self::Form {
            player: phrase.player,
            leading: phrase.leading.clone(),
            trailing: phrase.trailing.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entry {
    Role(RoleId),
    Ambiguous,
}

/// The outcome of looking a phrase up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Exactly one role.
    Bound(RoleId),
    /// The key was used for more than one role.
    Ambiguous,
    /// Never seen.
    Unbound,
}

/// Phrase-to-role bindings for one declaration.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    keys: HashMap<RoleKey, Entry>,
}

impl Bindings {
    /// Creates empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a phrase was bound to a role.
    pub fn record(&mut self, phrase: &RolePhrase, role: RoleId) {
        if let Some(name) = &phrase.role_name {
            self.insert(RoleKey::RoleName(name.clone()), role);
        }
        self.insert(RoleKey::form_of(phrase), role);
    }

    /// Records every phrase of a clause against its roles, in phrase order.
    pub fn record_clause(&mut self, clause: &CanonicalClause, roles: &[RoleId]) {
        for (phrase, &role) in clause.phrases().zip(roles) {
            self.record(phrase, role);
        }
    }

    fn insert(&mut self, key: RoleKey, role: RoleId) {
        self.keys
            .entry(key)
            .and_modify(|entry| {
                if *entry != Entry::Role(role) {
                    *entry = Entry::Ambiguous;
                }
            })
            .or_insert(Entry::Role(role));
    }

    /// Looks a phrase up by its key.
    #[must_use]
    pub fn lookup(&self, phrase: &RolePhrase) -> Lookup {
        match self.keys.get(&RoleKey::of(phrase)) {
            Some(Entry::Role(role)) => Lookup::Bound(*role),
            Some(Entry::Ambiguous) => Lookup::Ambiguous,
            None => Lookup::Unbound,
        }
    }

    /// Binds each phrase of a clause to a distinct role of `fact_type`.
    ///
    /// A phrase is bound by its key when that names an unused role of the
    /// fact type. Otherwise it takes the only unused role with its player,
    /// narrowing by the role's own adjectives when several remain.
    ///
    /// # Errors
    ///
    /// `AmbiguousRoleMatch` when more than one role remains for a phrase,
    /// `ClausePlayerMismatch` when none does.
    pub fn bind(
        &self,
        schema: &Schema,
        clause: &CanonicalClause,
        fact_type: FactTypeId,
    ) -> Result<Vec<RoleId>> {
        let roles = &schema.fact_type(fact_type).roles;
        let mut bound: Vec<RoleId> = Vec::with_capacity(roles.len());

        for phrase in clause.phrases() {
            if let Lookup::Bound(role) = self.lookup(phrase) {
                if roles.contains(&role) && !bound.contains(&role) {
                    bound.push(role);
                    continue;
                }
            }

            let candidates: Vec<RoleId> = roles
                .iter()
                .copied()
                .filter(|r| !bound.contains(r) && schema.role(*r).player == phrase.player)
                .collect();

            let chosen = match candidates.as_slice() {
                [] => {
                    return Err(Error::new(ErrorKind::ClausePlayerMismatch(
                        clause.text.clone(),
                    )));
                }
                [role] => *role,
                _ => {
                    let narrowed: Vec<RoleId> = candidates
                        .iter()
                        .copied()
                        .filter(|&r| {
                            let role = schema.role(r);
                            role.leading == phrase.leading && role.trailing == phrase.trailing
                        })
                        .collect();
                    match narrowed.as_slice() {
                        [role] => *role,
                        _ => {
                            return Err(Error::new(ErrorKind::AmbiguousRoleMatch {
                                player: schema.name_of(phrase.player).to_string(),
                                clause: clause.text.clone(),
                            }));
                        }
                    }
                }
            };
            bound.push(chosen);
        }
        Ok(bound)
    }
}
