//! Phrase canonicalization.
//!
//! Turns a clause's flat token list into linking words and role phrases.
//! Known names are matched longest first over runs of plain words; a
//! quantifier or hyphen-bound leading adjective opens a pending buffer that
//! the next role player closes. Adjectival forms defined elsewhere in the
//! same declaration are then applied to the plain words around each phrase,
//! trailing forms before leading forms.

use std::fmt;

use cqlc_foundation::{Adjective, Error, ObjectTypeId, Result};
use cqlc_schema::{Frequency, ValueRestriction};

use crate::declaration::{Clause, TermToken, Token};
use crate::scope::{NameTarget, ResolutionScope};

/// A role player with its qualifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct RolePhrase {
    /// The resolved player.
    pub player: ObjectTypeId,
    /// Leading adjective.
    pub leading: Adjective,
    /// Trailing adjective.
    pub trailing: Adjective,
    /// Role name defined or referenced.
    pub role_name: Option<String>,
    /// True when the phrase is a use of a role name rather than its definition.
    pub role_name_ref: bool,
    /// Embedded quantifier.
    pub quantifier: Option<Frequency>,
    /// Role value restriction.
    pub restriction: Option<ValueRestriction>,
    /// Literal value.
    pub literal: Option<String>,
    /// Leading adjective was hyphen-bound.
    pub explicit_leading: bool,
    /// Trailing adjective was hyphen-bound.
    pub explicit_trailing: bool,
}

impl RolePhrase {
    /// A bare phrase for a player.
    #[must_use]
    pub fn new(player: ObjectTypeId) -> Self {
        Self {
            player,
            leading: Adjective::new(),
            trailing: Adjective::new(),
            role_name: None,
            role_name_ref: false,
            quantifier: None,
            restriction: None,
            literal: None,
            explicit_leading: false,
            explicit_trailing: false,
        }
    }

    fn apply_pending(&mut self, pending: Pending) {
        self.quantifier = pending.quantifier;
        if let Some(leading) = pending.leading {
            self.leading = leading.concat(&self.leading);
            self.explicit_leading = true;
        }
    }
}

/// One element of a canonical clause.
#[derive(Clone, Debug, PartialEq)]
pub enum ClauseElement {
    /// A linking word.
    Word(String),
    /// A role phrase.
    Phrase(RolePhrase),
}

/// A clause split into linking words and role phrases.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalClause {
    /// Source text, for diagnostics.
    pub text: String,
    /// Words and phrases in order.
    pub elements: Vec<ClauseElement>,
}

impl CanonicalClause {
    /// The role phrases, in order.
    pub fn phrases(&self) -> impl Iterator<Item = &RolePhrase> {
        self.elements.iter().filter_map(|e| match e {
            ClauseElement::Phrase(p) => Some(p),
            ClauseElement::Word(_) => None,
        })
    }

    /// Number of role phrases.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.phrases().count()
    }

    /// The only role phrase of a clause naming a single role.
    ///
    /// # Errors
    ///
    /// `MalformedClause` unless the clause has exactly one phrase.
    pub fn single_phrase(&self) -> Result<&RolePhrase> {
        let mut phrases = self.phrases();
        match (phrases.next(), phrases.next()) {
            (Some(phrase), None) => Ok(phrase),
            _ => Err(Error::malformed_clause(format!(
                "'{}' should name exactly one role",
                self.text
            ))),
        }
    }

    /// The sorted player multiset.
    #[must_use]
    pub fn players(&self) -> Vec<ObjectTypeId> {
        let mut players: Vec<_> = self.phrases().map(|p| p.player).collect();
        players.sort_unstable();
        players
    }
}

impl fmt::Display for CanonicalClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Default)]
struct Pending {
    quantifier: Option<Frequency>,
    leading: Option<Adjective>,
}

impl Pending {
    fn is_open(&self) -> bool {
        self.quantifier.is_some() || self.leading.is_some()
    }
}

/// Canonicalizes one clause against a scope.
///
/// # Errors
///
/// - `UnresolvedAdjective` if a hyphen-bound adjective never reaches a player
/// - `MalformedClause` for a dangling quantifier or a misplaced marker
/// - `UnrecognizedPlayer` if the clause has no role player or names an unknown term
pub fn canonicalize(clause: &Clause, scope: &ResolutionScope) -> Result<CanonicalClause> {
    let text = clause.to_string();
    let tokens = &clause.tokens;
    let mut elements = Vec::new();
    let mut pending = Pending::default();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(word) => {
                let run: Vec<&str> = tokens[i..]
                    .iter()
                    .map_while(|t| match t {
                        Token::Word(w) => Some(w.as_str()),
                        _ => None,
                    })
                    .collect();

                if let Some((len, target)) = scope.longest_name(&run) {
                    let mut phrase = phrase_for(target, scope, &text)?;
                    phrase.apply_pending(std::mem::take(&mut pending));
                    elements.push(ClauseElement::Phrase(phrase));
                    i += len;
                    continue;
                }

                match pending.leading.as_mut() {
                    Some(leading) => leading.push(word.as_str()),
                    None => elements.push(ClauseElement::Word(word.clone())),
                }
            }
            Token::Term(term) => {
                let mut phrase = phrase_for_term(term, scope, &text)?;
                phrase.apply_pending(std::mem::take(&mut pending));
                if term.quantifier.is_some() {
                    phrase.quantifier = term.quantifier;
                }
                elements.push(ClauseElement::Phrase(phrase));
            }
            Token::Quantifier(q) => {
                if pending.is_open() {
                    return Err(Error::malformed_clause(format!(
                        "quantifier '{q}' does not precede a role player in '{text}'"
                    )));
                }
                pending.quantifier = Some(*q);
            }
            Token::LeadingAdjective(adj) => {
                let leading = pending.leading.take().unwrap_or_default();
                pending.leading = Some(leading.concat(adj));
            }
            Token::TrailingAdjective(adj) => match elements.last_mut() {
                Some(ClauseElement::Phrase(phrase)) => {
                    phrase.trailing = phrase.trailing.concat(adj);
                    phrase.explicit_trailing = true;
                }
                _ => return Err(Error::unresolved_adjective(adj.to_string(), text)),
            },
            Token::RoleName(name) => {
                last_phrase(&mut elements, "role name", &text)?.role_name = Some(name.clone());
            }
            Token::Restriction(r) => {
                last_phrase(&mut elements, "restriction", &text)?.restriction = Some(r.clone());
            }
            Token::Literal(v) => {
                last_phrase(&mut elements, "literal", &text)?.literal = Some(v.clone());
            }
        }
        i += 1;
    }

    if let Some(leading) = pending.leading {
        return Err(Error::unresolved_adjective(leading.to_string(), text));
    }
    if let Some(q) = pending.quantifier {
        return Err(Error::malformed_clause(format!(
            "quantifier '{q}' does not precede a role player in '{text}'"
        )));
    }

    claim_trailing_forms(&mut elements, scope);
    claim_leading_forms(&mut elements, scope);

    let clause = CanonicalClause { text, elements };
    if clause.arity() == 0 {
        return Err(Error::unrecognized_player(clause.text));
    }
    Ok(clause)
}

fn phrase_for(target: &NameTarget, scope: &ResolutionScope, text: &str) -> Result<RolePhrase> {
    match target {
        NameTarget::ObjectType(id) => Ok(RolePhrase::new(*id)),
        NameTarget::RoleName(name) => {
            let def = scope
                .role_name(name)
                .ok_or_else(|| Error::unrecognized_player(text))?;
            let mut phrase = RolePhrase::new(def.player);
            phrase.leading = def.leading.clone();
            phrase.trailing = def.trailing.clone();
            phrase.role_name = Some(name.clone());
            phrase.role_name_ref = true;
            Ok(phrase)
        }
    }
}

fn phrase_for_term(term: &TermToken, scope: &ResolutionScope, text: &str) -> Result<RolePhrase> {
    let target = scope
        .lookup(&term.name)
        .ok_or_else(|| Error::unrecognized_player(format!("{} in '{text}'", term.name)))?;
    let mut phrase = phrase_for(&target, scope, text)?;
    if !term.leading.is_empty() {
        phrase.leading = term.leading.clone();
        phrase.explicit_leading = true;
    }
    if !term.trailing.is_empty() {
        phrase.trailing = term.trailing.clone();
        phrase.explicit_trailing = true;
    }
    if term.role_name.is_some() {
        phrase.role_name.clone_from(&term.role_name);
        phrase.role_name_ref = false;
    }
    phrase.restriction.clone_from(&term.restriction);
    phrase.literal.clone_from(&term.literal);
    Ok(phrase)
}

fn last_phrase<'a>(
    elements: &'a mut [ClauseElement],
    marker: &str,
    text: &str,
) -> Result<&'a mut RolePhrase> {
    match elements.last_mut() {
        Some(ClauseElement::Phrase(phrase)) => Ok(phrase),
        _ => Err(Error::malformed_clause(format!(
            "{marker} does not follow a role player in '{text}'"
        ))),
    }
}

/// Words immediately following `index`, up to the next phrase.
fn words_after(elements: &[ClauseElement], index: usize) -> Vec<&str> {
    elements[index + 1..]
        .iter()
        .map_while(|e| match e {
            ClauseElement::Word(w) => Some(w.as_str()),
            ClauseElement::Phrase(_) => None,
        })
        .collect()
}

/// Words immediately preceding `index`, back to the previous phrase.
fn words_before(elements: &[ClauseElement], index: usize) -> Vec<&str> {
    let mut words: Vec<&str> = elements[..index]
        .iter()
        .rev()
        .map_while(|e| match e {
            ClauseElement::Word(w) => Some(w.as_str()),
            ClauseElement::Phrase(_) => None,
        })
        .collect();
    words.reverse();
    words
}

fn claim_trailing_forms(elements: &mut Vec<ClauseElement>, scope: &ResolutionScope) {
    let mut index = 0;
    while index < elements.len() {
        let claim = match &elements[index] {
            ClauseElement::Phrase(p) if p.trailing.is_empty() && !p.role_name_ref => {
                let following = words_after(elements, index);
                scope
                    .forms_for(p.player)
                    .filter(|f| !f.trailing.is_empty())
                    .filter(|f| following.starts_with(&word_refs(&f.trailing)))
                    .max_by_key(|f| f.trailing.len())
                    .map(|f| f.trailing.clone())
            }
            _ => None,
        };

        if let Some(trailing) = claim {
            elements.drain(index + 1..=index + trailing.len());
            if let ClauseElement::Phrase(p) = &mut elements[index] {
                p.trailing = trailing;
            }
        }
        index += 1;
    }
}

fn claim_leading_forms(elements: &mut Vec<ClauseElement>, scope: &ResolutionScope) {
    let mut index = 0;
    while index < elements.len() {
        let claim = match &elements[index] {
            ClauseElement::Phrase(p) if p.leading.is_empty() && !p.role_name_ref => {
                let preceding = words_before(elements, index);
                scope
                    .forms_for(p.player)
                    .filter(|f| !f.leading.is_empty())
                    .filter(|f| preceding.ends_with(&word_refs(&f.leading)))
                    .max_by_key(|f| f.leading.len())
                    .map(|f| f.leading.clone())
            }
            _ => None,
        };

        if let Some(leading) = claim {
            let start = index - leading.len();
            elements.drain(start..index);
            index = start;
            if let ClauseElement::Phrase(p) = &mut elements[index] {
                p.leading = leading;
            }
        }
        index += 1;
    }
}

fn word_refs(adjective: &Adjective) -> Vec<&str> {
    adjective.words().iter().map(String::as_str).collect()
}
