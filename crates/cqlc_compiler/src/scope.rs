//! Per-declaration name resolution.
//!
//! A `ResolutionScope` is built fresh for every top-level declaration. It
//! knows the object type names in the schema, plus the role names and
//! adjectival forms the declaration itself defines, so that an adjective
//! hyphen-bound in one clause is recognized without the hyphen in another.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use cqlc_foundation::{Adjective, Error, ObjectTypeId, Result};
use cqlc_schema::{EntityType, Schema};

use crate::canonicalize::{ClauseElement, canonicalize};
use crate::declaration::{Clause, Token};

/// What a recognized name refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameTarget {
    /// An object type in the schema.
    ObjectType(ObjectTypeId),
    /// A role name defined in this declaration.
    RoleName(String),
}

/// The phrase a role name stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleNameDef {
    /// Player of the named role.
    pub player: ObjectTypeId,
    /// Leading adjective of the defining phrase.
    pub leading: Adjective,
    /// Trailing adjective of the defining phrase.
    pub trailing: Adjective,
}

/// An adjectival form defined by a hyphen in this declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalForm {
    /// The qualified player.
    pub player: ObjectTypeId,
    /// Leading words.
    pub leading: Adjective,
    /// Trailing words.
    pub trailing: Adjective,
}

#[derive(Clone, Debug)]
struct KnownName {
    words: Vec<String>,
    target: NameTarget,
}

/// Names, role names and adjectival forms visible to one declaration.
#[derive(Clone, Debug, Default)]
pub struct ResolutionScope {
    names: Vec<KnownName>,
    object_types: HashMap<String, ObjectTypeId>,
    role_names: HashMap<String, RoleNameDef>,
    forms: Vec<LocalForm>,
}

impl ResolutionScope {
    /// Creates a scope over every object type in the schema.
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        let mut scope = Self::default();
        for ot in schema.object_types() {
            scope.object_types.insert(ot.name.clone(), ot.id);
            scope.insert_name(&ot.name, NameTarget::ObjectType(ot.id));
        }
        scope
    }

    /// Builds the scope for one declaration.
    ///
    /// Terms naming nothing in the schema become provisional entity types,
    /// unless they are role names the declaration defines. Role names and
    /// adjectival forms are then learned from every clause.
    ///
    /// # Errors
    ///
    /// `UnrecognizedPlayer` for an unknown term when forward references are
    /// not allowed.
    pub fn prepare(
        schema: &mut Schema,
        clauses: &[&Clause],
        allow_forward_references: bool,
    ) -> Result<Self> {
        let role_names: HashSet<&str> = clauses
            .iter()
            .flat_map(|c| &c.tokens)
            .filter_map(|t| match t {
                Token::RoleName(name) => Some(name.as_str()),
                Token::Term(term) => term.role_name.as_deref(),
                _ => None,
            })
            .collect();

        for name in clauses.iter().flat_map(|c| c.term_names()) {
            if role_names.contains(name) || schema.object_type_id(name).is_some() {
                continue;
            }
            if !allow_forward_references {
                return Err(Error::unrecognized_player(name));
            }
            schema.add_entity_type(name, EntityType::provisional());
            debug!(name, "forward reference");
        }

        let mut scope = Self::new(schema);
        scope.learn(clauses.iter().copied());
        Ok(scope)
    }

    fn insert_name(&mut self, name: &str, target: NameTarget) {
        let words: Vec<String> = name.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return;
        }
        // Longest names first; role names before object types of equal length.
        let rank = |n: &KnownName| {
            (
                std::cmp::Reverse(n.words.len()),
                !matches!(n.target, NameTarget::RoleName(_)),
            )
        };
        let entry = KnownName { words, target };
        let at = self.names.partition_point(|n| rank(n) <= rank(&entry));
        self.names.insert(at, entry);
    }

    /// Learns role names and adjectival forms from every clause of a declaration.
    ///
    /// Clauses that fail to canonicalize here are skipped; the main pass
    /// reports their errors.
    pub fn learn<'a>(&mut self, clauses: impl IntoIterator<Item = &'a Clause>) {
        for clause in clauses {
            let Ok(canonical) = canonicalize(clause, self) else {
                continue;
            };
            for element in canonical.elements {
                let ClauseElement::Phrase(phrase) = element else {
                    continue;
                };
                if phrase.role_name_ref {
                    continue;
                }
                if let Some(name) = &phrase.role_name {
                    self.define_role_name(
                        name,
                        RoleNameDef {
                            player: phrase.player,
                            leading: phrase.leading.clone(),
                            trailing: phrase.trailing.clone(),
                        },
                    );
                }
                if phrase.explicit_leading || phrase.explicit_trailing {
                    self.define_form(LocalForm {
                        player: phrase.player,
                        leading: phrase.leading,
                        trailing: phrase.trailing,
                    });
                }
            }
        }
    }

    /// Defines a role name. The first definition wins.
    pub fn define_role_name(&mut self, name: &str, def: RoleNameDef) {
        if self.role_names.contains_key(name) {
            return;
        }
        self.role_names.insert(name.to_string(), def);
        self.insert_name(name, NameTarget::RoleName(name.to_string()));
    }

    /// Defines an adjectival form.
    pub fn define_form(&mut self, form: LocalForm) {
        if !self.forms.contains(&form) {
            self.forms.push(form);
        }
    }

    /// Finds the longest known name at the start of `words`.
    ///
    /// Returns the number of words consumed and the target.
    #[must_use]
    pub fn longest_name(&self, words: &[&str]) -> Option<(usize, &NameTarget)> {
        self.names
            .iter()
            .find(|n| {
                n.words.len() <= words.len()
                    && n.words.iter().zip(words).all(|(a, b)| a == b)
            })
            .map(|n| (n.words.len(), &n.target))
    }

    /// Resolves a complete name, role names first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<NameTarget> {
        if self.role_names.contains_key(name) {
            return Some(NameTarget::RoleName(name.to_string()));
        }
        self.object_types
            .get(name)
            .map(|&id| NameTarget::ObjectType(id))
    }

    /// The definition of a role name.
    #[must_use]
    pub fn role_name(&self, name: &str) -> Option<&RoleNameDef> {
        self.role_names.get(name)
    }

    /// Adjectival forms defined for a player.
    pub fn forms_for(&self, player: ObjectTypeId) -> impl Iterator<Item = &LocalForm> {
        self.forms.iter().filter(move |f| f.player == player)
    }
}
