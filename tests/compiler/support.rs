//! Shared helpers: a tiny clause reader and common declarations.
//!
//! `clause` turns readable text into tokens the way an upstream parser
//! would:
//! - `ugly-Boy` is a leading adjective bound to `Boy`
//! - `Boy-monster` is a trailing adjective bound to `Boy`
//! - `at most one`, `at most 2`, `exactly one`, `at least one` and `one`
//!   are quantifiers
//! - `(as Father)` is a role name
//! - `[Company]` is an explicit term, possibly a forward reference

use cqlc_compiler::{
    Clause, Compiler, Declaration, EntityTypeDecl, FactTypeDecl, TermToken, ValueTypeDecl,
};
use cqlc_schema::Frequency;

fn number(word: &str) -> Option<u32> {
    match word {
        "one" => Some(1),
        "two" => Some(2),
        _ => word.parse().ok(),
    }
}

/// Reads clause text into tokens.
pub fn clause(text: &str) -> Clause {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut clause = Clause::new();
    let mut i = 0;

    while i < words.len() {
        let word = words[i];
        let next = words.get(i + 1).copied();
        let after = words.get(i + 2).copied().and_then(number);

        match (word, next) {
            ("at", Some("most")) if after.is_some() => {
                clause = clause.quantifier(Frequency::new(None, after));
                i += 3;
                continue;
            }
            ("at", Some("least")) if after.is_some() => {
                clause = clause.quantifier(Frequency::new(after, None));
                i += 3;
                continue;
            }
            ("exactly", Some(n)) if number(n).is_some() => {
                let n = number(n);
                clause = clause.quantifier(Frequency::new(n, n));
                i += 2;
                continue;
            }
            ("one", _) => {
                clause = clause.quantifier(Frequency::exactly_one());
                i += 1;
                continue;
            }
            ("(as", Some(name)) => {
                clause = clause.role_name(name.trim_end_matches(')'));
                i += 2;
                continue;
            }
            _ => {}
        }

        if let Some(name) = word.strip_prefix('[').and_then(|w| w.strip_suffix(']')) {
            clause = clause.term(TermToken::new(name));
        } else if word.contains('-') {
            clause = hyphenated(clause, word);
        } else {
            clause = clause.words(word);
        }
        i += 1;
    }
    clause
}

/// `big-ugly-Boy-monster`: parts before the capitalized one lead, parts after trail.
fn hyphenated(mut clause: Clause, word: &str) -> Clause {
    let parts: Vec<&str> = word.split('-').collect();
    let Some(noun) = parts
        .iter()
        .position(|p| p.chars().next().is_some_and(char::is_uppercase))
    else {
        return clause.words(word);
    };
    if noun > 0 {
        clause = clause.leading(&parts[..noun].join(" "));
    }
    clause = clause.words(parts[noun]);
    if noun + 1 < parts.len() {
        clause = clause.trailing(&parts[noun + 1..].join(" "));
    }
    clause
}

/// A fact type declaration from clause texts.
pub fn fact(texts: &[&str]) -> Declaration {
    Declaration::FactType(FactTypeDecl::new(texts.iter().map(|t| clause(t)).collect()))
}

/// An entity type declaration with no identification.
pub fn entity(name: &str) -> Declaration {
    Declaration::EntityType(EntityTypeDecl::new(name))
}

/// An entity type identified by a reference mode.
pub fn entity_with_mode(name: &str, mode: &str) -> Declaration {
    Declaration::EntityType(EntityTypeDecl::new(name).identified_by_mode(mode))
}

/// A plain value type.
pub fn value(name: &str) -> Declaration {
    Declaration::ValueType(ValueTypeDecl::new(name))
}

/// A compiler that has already compiled `declarations` without error.
pub fn compiled(declarations: &[Declaration]) -> Compiler {
    let mut compiler = Compiler::new();
    let errors = compiler.compile_all(declarations);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    compiler
}

/// `Girl` and `Boy`, ready to go out.
pub fn girl_and_boy() -> Vec<Declaration> {
    vec![entity("Girl"), entity("Boy")]
}

#[test]
fn clause_reader_splits_hyphens_and_quantifiers() {
    assert_eq!(
        clause("Girl is going out with at most one ugly-Boy-monster").to_string(),
        "Girl is going out with at most 1 ugly-Boy-monster"
    );
    assert_eq!(
        clause("Person (as Father) has one Son").to_string(),
        "Person (as Father) has exactly 1 Son"
    );
}
