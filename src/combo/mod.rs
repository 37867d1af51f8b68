//! Combo requirements: an OR of lines, each line an AND of conditions, each
//! condition an OR of card-count requirements.

pub mod evaluate;
pub mod parser;

pub use evaluate::TrialView;
pub use parser::{parse_combo, ComboParseError, ComboSyntaxError, ParsedCombo};

use serde::Serialize;
use std::fmt;

/// Where a requirement's card count is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Locality {
    /// The hand after effect resolution
    Hand,
    /// The cards left in the deck after effect resolution
    RemainingDeck,
}

/// At least `count` copies of `card` must be present in `locality`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub card: String,
    pub count: usize,
    pub locality: Locality,
}

impl Requirement {
    pub fn in_hand(card: impl Into<String>, count: usize) -> Self {
        Requirement { card: card.into(), count, locality: Locality::Hand }
    }

    pub fn in_deck(card: impl Into<String>, count: usize) -> Self {
        Requirement { card: card.into(), count, locality: Locality::RemainingDeck }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.locality == Locality::RemainingDeck {
            write!(f, "-")?;
        }
        write!(f, "{} {}", self.count, self.card)
    }
}

/// Satisfied when any of its requirements is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Condition {
    pub any_of: Vec<Requirement>,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.any_of.len() == 1 {
            return write!(f, "{}", self.any_of[0]);
        }
        write!(f, "(")?;
        for (i, req) in self.any_of.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", req)?;
        }
        write!(f, ")")
    }
}

/// Satisfied when all of its conditions are
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Line {
    pub all_of: Vec<Condition>,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cond) in self.all_of.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", cond)?;
        }
        Ok(())
    }
}

/// A full combo: satisfied when any line is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComboSpec {
    pub lines: Vec<Line>,
}

impl ComboSpec {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lone requirement of a combo made of one line, one condition and
    /// one requirement, if that is its shape
    pub fn single_requirement(&self) -> Option<&Requirement> {
        match self.lines.as_slice() {
            [line] => match line.all_of.as_slice() {
                [cond] => match cond.any_of.as_slice() {
                    [req] => Some(req),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for ComboSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
