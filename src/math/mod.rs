pub mod calculator;
pub mod hypergeometric;

pub use calculator::{parse_odds_request, CalculatorSummary, OddsRequest};
pub use hypergeometric::{
    combination, hypergeometric_probability, ln_combination, HypergeometricQuery,
    InputValidationError, ThresholdOdds,
};

/// Format a probability in [0, 1] as a percentage with `decimals` places
pub fn format_percent(probability: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, probability * 100.0)
}
