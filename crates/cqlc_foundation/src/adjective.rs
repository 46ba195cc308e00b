//! Adjectives attached to role players.
//!
//! An adjective is an ordered list of words. Matching a reading against an
//! incoming clause compares adjectives as word lists: a reading's leading
//! adjective may be satisfied by the tail of a longer incoming adjective, and
//! a trailing adjective by its head. The excess words are the residual.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered, possibly empty, list of adjective words.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Adjective {
    words: Vec<String>,
}

impl Adjective {
    /// Creates an empty adjective.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adjective from its words.
    #[must_use]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits adjective text on whitespace and hyphens.
    ///
    /// `"big ugly"` and `"big-ugly"` both yield `[big, ugly]`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_words(
            text.split(|c: char| c.is_whitespace() || c == '-')
                .filter(|w| !w.is_empty()),
        )
    }

    /// Returns the words of this adjective.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if there are no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns true if `tail` is a word-wise suffix of this adjective.
    #[must_use]
    pub fn ends_with(&self, tail: &Adjective) -> bool {
        self.words.ends_with(&tail.words)
    }

    /// Returns true if `head` is a word-wise prefix of this adjective.
    #[must_use]
    pub fn starts_with(&self, head: &Adjective) -> bool {
        self.words.starts_with(&head.words)
    }

    /// Removes `tail` from the end, returning the remaining prefix.
    #[must_use]
    pub fn strip_suffix(&self, tail: &Adjective) -> Option<Adjective> {
        self.words.strip_suffix(tail.words.as_slice()).map(|rest| Self {
            words: rest.to_vec(),
        })
    }

    /// Removes `head` from the start, returning the remaining suffix.
    #[must_use]
    pub fn strip_prefix(&self, head: &Adjective) -> Option<Adjective> {
        self.words.strip_prefix(head.words.as_slice()).map(|rest| Self {
            words: rest.to_vec(),
        })
    }

    /// Returns a new adjective with `other`'s words appended.
    #[must_use]
    pub fn concat(&self, other: &Adjective) -> Adjective {
        let mut words = self.words.clone();
        words.extend(other.words.iter().cloned());
        Self { words }
    }

    /// Appends a single word.
    pub fn push(&mut self, word: impl Into<String>) {
        self.words.push(word.into());
    }

    /// The words joined by hyphens, as written when bound to a player:
    /// `big-ugly` in `big-ugly-Boy`.
    #[must_use]
    pub fn hyphenated(&self) -> String {
        self.words.join("-")
    }
}

impl fmt::Display for Adjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for Adjective {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_words(iter)
    }
}

impl From<&str> for Adjective {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}
