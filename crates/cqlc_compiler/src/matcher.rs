//! Fact type matching and adjective absorption.
//!
//! A canonical clause matches a reading when the reading's literal words and
//! role markers line up with the clause's words and phrases. Matching never
//! mutates anything: a successful match returns one [`Absorption`] per phrase
//! recording which role it bound to, which adjective words the reading
//! consumed, and what is left over. The caller applies the log.
//!
//! The first reading that matches wins; alternatives are not explored.

use tracing::trace;

use cqlc_foundation::{Adjective, FactTypeId, ReadingId, RoleId};
use cqlc_schema::{Reading, ReadingElement, RoleRef, Schema};

use crate::canonicalize::{CanonicalClause, ClauseElement, RolePhrase};

/// What matching did to one phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Absorption {
    /// Position of the phrase among the clause's phrases.
    pub phrase: usize,
    /// Position of the bound role in the reading's role sequence.
    pub position: usize,
    /// The bound role.
    pub role: RoleId,
    /// Leading words the reading accounted for.
    pub consumed_leading: Adjective,
    /// Trailing words the reading accounted for.
    pub consumed_trailing: Adjective,
    /// Leading words the reading did not have.
    pub residual_leading: Adjective,
    /// Trailing words the reading did not have.
    pub residual_trailing: Adjective,
    /// A role name the reading did not have.
    pub residual_role_name: Option<String>,
}

impl Absorption {
    /// True if the phrase carried qualifiers the reading lacks.
    #[must_use]
    pub fn has_residual(&self) -> bool {
        !self.residual_leading.is_empty()
            || !self.residual_trailing.is_empty()
            || self.residual_role_name.is_some()
    }

    /// The reading's role reference extended with the residual qualifiers.
    #[must_use]
    pub fn extend(&self, role_ref: &RoleRef) -> RoleRef {
        RoleRef {
            role: role_ref.role,
            leading: self.residual_leading.concat(&role_ref.leading),
            trailing: role_ref.trailing.concat(&self.residual_trailing),
            role_name: self
                .residual_role_name
                .clone()
                .or_else(|| role_ref.role_name.clone()),
        }
    }
}

/// A successful match of a clause against a reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadingMatch {
    /// The matched fact type.
    pub fact_type: FactTypeId,
    /// The matched reading.
    pub reading: ReadingId,
    /// One entry per phrase, in phrase order.
    pub absorptions: Vec<Absorption>,
}

impl ReadingMatch {
    /// The bound roles, in phrase order.
    #[must_use]
    pub fn roles(&self) -> Vec<RoleId> {
        self.absorptions.iter().map(|a| a.role).collect()
    }

    /// True if any phrase has residual qualifiers.
    #[must_use]
    pub fn has_residual(&self) -> bool {
        self.absorptions.iter().any(Absorption::has_residual)
    }
}

/// Matches a clause against every fact type over the same players.
#[must_use]
pub fn match_clause(schema: &Schema, clause: &CanonicalClause) -> Option<ReadingMatch> {
    schema
        .fact_types_with_players(&clause.players())
        .into_iter()
        .find_map(|ft| match_clause_in(schema, clause, ft))
}

/// Matches a clause against the readings of one fact type, in order.
#[must_use]
pub fn match_clause_in(
    schema: &Schema,
    clause: &CanonicalClause,
    fact_type: FactTypeId,
) -> Option<ReadingMatch> {
    if schema.player_multiset(fact_type) != clause.players() {
        return None;
    }
    schema
        .readings(fact_type)
        .into_iter()
        .find_map(|reading| match_reading(schema, clause, reading))
}

/// Matches a clause against one reading.
#[must_use]
pub fn match_reading(
    schema: &Schema,
    clause: &CanonicalClause,
    reading: &Reading,
) -> Option<ReadingMatch> {
    let sequence = schema.role_sequence(reading.role_sequence);
    let incoming = &clause.elements;
    let mut cursor = 0;
    let mut absorptions: Vec<Absorption> = Vec::new();

    for element in reading.elements() {
        match element {
            ReadingElement::Word(word) => match incoming.get(cursor) {
                Some(ClauseElement::Word(w)) if *w == word => cursor += 1,
                _ => return reject(reading, clause, "linking word"),
            },
            ReadingElement::Role(position) => {
                let role_ref = sequence.refs.get(position)?;
                if absorptions.iter().any(|a| a.position == position) {
                    return None;
                }

                let start = cursor;
                while let Some(ClauseElement::Word(_)) = incoming.get(cursor) {
                    cursor += 1;
                }
                let intervening = word_list(&incoming[start..cursor]);

                let Some(ClauseElement::Phrase(phrase)) = incoming.get(cursor) else {
                    return reject(reading, clause, "missing role player");
                };
                if schema.role(role_ref.role).player != phrase.player {
                    return reject(reading, clause, "player");
                }
                cursor += 1;

                let Some((consumed_leading, residual_leading)) =
                    absorb_leading(&role_ref.leading, phrase, &intervening)
                else {
                    return reject(reading, clause, "leading adjective");
                };

                let following = word_list(&incoming[cursor..]);
                let Some((consumed_trailing, residual_trailing, taken)) =
                    absorb_trailing(&role_ref.trailing, phrase, &following)
                else {
                    return reject(reading, clause, "trailing adjective");
                };
                cursor += taken;

                let residual_role_name = match (&phrase.role_name, &role_ref.role_name) {
                    (Some(a), Some(b)) if a != b => {
                        return reject(reading, clause, "role name");
                    }
                    (Some(name), None) if !phrase.role_name_ref => Some(name.clone()),
                    _ => None,
                };

                let mut absorption = Absorption {
                    phrase: absorptions.len(),
                    position,
                    role: role_ref.role,
                    consumed_leading,
                    consumed_trailing,
                    residual_leading,
                    residual_trailing,
                    residual_role_name,
                };
                // A role name use stands for its definition and adds nothing.
                if phrase.role_name_ref {
                    absorption.residual_leading = Adjective::new();
                    absorption.residual_trailing = Adjective::new();
                }
                absorptions.push(absorption);
            }
        }
    }

    if cursor != incoming.len() {
        return reject(reading, clause, "unmatched trailing words");
    }

    trace!(reading = %reading.id, clause = %clause, "clause matched reading");
    Some(ReadingMatch {
        fact_type: reading.fact_type,
        reading: reading.id,
        absorptions,
    })
}

fn reject(reading: &Reading, clause: &CanonicalClause, what: &str) -> Option<ReadingMatch> {
    trace!(reading = %reading.id, clause = %clause, mismatch = what, "reading rejected");
    None
}

fn word_list(elements: &[ClauseElement]) -> Vec<String> {
    elements
        .iter()
        .map_while(|e| match e {
            ClauseElement::Word(w) => Some(w.clone()),
            ClauseElement::Phrase(_) => None,
        })
        .collect()
}

/// Satisfies the reading's leading adjective.
///
/// Intervening words must spell it exactly, in which case the phrase's own
/// leading adjective is residual. Otherwise the phrase's leading adjective
/// must end with it and the excess prefix is residual.
fn absorb_leading(
    expected: &Adjective,
    phrase: &RolePhrase,
    intervening: &[String],
) -> Option<(Adjective, Adjective)> {
    if intervening.is_empty() {
        let residual = phrase.leading.strip_suffix(expected)?;
        return Some((expected.clone(), residual));
    }
    (expected.words() == intervening).then(|| (expected.clone(), phrase.leading.clone()))
}

/// Satisfies the reading's trailing adjective.
///
/// Returns the consumed words, the residual, and how many following clause
/// words were taken.
fn absorb_trailing(
    expected: &Adjective,
    phrase: &RolePhrase,
    following: &[String],
) -> Option<(Adjective, Adjective, usize)> {
    if let Some(residual) = phrase.trailing.strip_prefix(expected) {
        return Some((expected.clone(), residual, 0));
    }
    (phrase.trailing.is_empty() && following.starts_with(expected.words()))
        .then(|| (expected.clone(), Adjective::new(), expected.len()))
}
