use serde::Serialize;
use std::fmt;

use super::{format_percent, HypergeometricQuery, InputValidationError, ThresholdOdds};

/// A validated request for the exact calculator: the draw plus the copy
/// count the odds are reported around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OddsRequest {
    pub query: HypergeometricQuery,
    pub target: u64,
}

impl OddsRequest {
    pub fn new(
        deck_size: u64,
        copies: u64,
        cards_drawn: u64,
        target: u64,
    ) -> Result<Self, InputValidationError> {
        let query = HypergeometricQuery::new(deck_size, copies, cards_drawn)?;
        Ok(OddsRequest { query, target })
    }

    /// The five cumulative odds around the target plus the expected value
    pub fn threshold_odds(&self) -> ThresholdOdds {
        self.query.threshold_odds(self.target)
    }

    /// The exactly / at least / at most view of the same numbers
    pub fn summary(&self) -> CalculatorSummary {
        CalculatorSummary::from(self.threshold_odds())
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<u64, InputValidationError> {
    value.trim().parse().map_err(|_| InputValidationError::NotANumber {
        field,
        value: value.to_string(),
    })
}

/// Validate the four raw text fields of the calculator. Every field must be a
/// whole number, copies and cards drawn may not exceed the deck size.
pub fn parse_odds_request(
    deck_size: &str,
    copies: &str,
    cards_drawn: &str,
    target: &str,
) -> Result<OddsRequest, InputValidationError> {
    let deck_size = parse_field("Deck size", deck_size)?;
    let copies = parse_field("Copies ran", copies)?;
    let cards_drawn = parse_field("Cards drawn", cards_drawn)?;
    let target = parse_field("Desired copies", target)?;
    OddsRequest::new(deck_size, copies, cards_drawn, target)
}

/// Deck calculator view: exactly, at least and at most `desired` copies
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculatorSummary {
    pub desired: u64,
    pub exactly: f64,
    pub at_least: f64,
    pub at_most: f64,
    pub expected_value: f64,
}

impl From<ThresholdOdds> for CalculatorSummary {
    fn from(odds: ThresholdOdds) -> Self {
        CalculatorSummary {
            desired: odds.threshold,
            exactly: odds.exactly,
            at_least: odds.at_least,
            at_most: odds.at_most,
            expected_value: odds.expected_value,
        }
    }
}

impl fmt::Display for CalculatorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.desired;
        let noun = if d == 1 { "copy" } else { "copies" };
        writeln!(f, "Probability of exactly {} {}: {}", d, noun, format_percent(self.exactly, 2))?;
        writeln!(f, "Probability of at least {} {}: {}", d, noun, format_percent(self.at_least, 2))?;
        writeln!(f, "Probability of at most {} {}: {}", d, noun, format_percent(self.at_most, 2))?;
        writeln!(f, "Expected value: {:.2} copies", self.expected_value)
    }
}
