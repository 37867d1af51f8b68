use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::format_percent;

/// Invalid input for the exact calculator. Computation is not attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: &'static str, value: String },
    #[error("Copies ran ({copies}) cannot be greater than deck size ({population})")]
    CopiesExceedPopulation { copies: u64, population: u64 },
    #[error("Cards drawn ({draws}) cannot be greater than deck size ({population})")]
    DrawsExceedPopulation { draws: u64, population: u64 },
    #[error("Deck size must be at least 1")]
    EmptyPopulation,
}

/// Binomial coefficient C(n, k), built up by multiplicative cancellation so
/// intermediate values stay close to the result instead of overflowing like
/// a factorial ratio would.
pub fn combination(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0_f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

/// ln C(n, k); negative infinity when k > n
pub fn ln_combination(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    (0..k).map(|i| ((n - i) as f64 / (i + 1) as f64).ln()).sum()
}

/// P(X = k) when drawing `draws` cards without replacement from `population`
/// cards of which `successes` are hits. Zero outside the support
/// max(0, n - (N - K)) <= k <= min(K, n), or when the counts are inconsistent.
pub fn hypergeometric_probability(population: u64, successes: u64, draws: u64, k: u64) -> f64 {
    if successes > population || draws > population {
        return 0.0;
    }
    if k > successes || k > draws || draws - k > population - successes {
        return 0.0;
    }

    let ln_p = ln_combination(successes, k) + ln_combination(population - successes, draws - k)
        - ln_combination(population, draws);
    ln_p.exp()
}

/// A validated draw: `draws` cards from a deck of `population` holding
/// `successes` copies of the card of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HypergeometricQuery {
    pub population: u64,
    pub successes: u64,
    pub draws: u64,
}

impl HypergeometricQuery {
    pub fn new(population: u64, successes: u64, draws: u64) -> Result<Self, InputValidationError> {
        if population == 0 {
            return Err(InputValidationError::EmptyPopulation);
        }
        if successes > population {
            return Err(InputValidationError::CopiesExceedPopulation {
                copies: successes,
                population,
            });
        }
        if draws > population {
            return Err(InputValidationError::DrawsExceedPopulation { draws, population });
        }
        Ok(HypergeometricQuery { population, successes, draws })
    }

    /// Largest hit count that can occur
    pub fn max_hits(&self) -> u64 {
        self.successes.min(self.draws)
    }

    pub fn probability(&self, k: u64) -> f64 {
        hypergeometric_probability(self.population, self.successes, self.draws, k)
    }

    /// (k, P(X = k)) for k = 0..=min(K, n)
    pub fn distribution(&self) -> Vec<(u64, f64)> {
        (0..=self.max_hits()).map(|k| (k, self.probability(k))).collect()
    }

    pub fn expected_value(&self) -> f64 {
        self.draws as f64 * self.successes as f64 / self.population as f64
    }

    /// Cumulative odds around `threshold`
    pub fn threshold_odds(&self, threshold: u64) -> ThresholdOdds {
        let mut odds = ThresholdOdds {
            threshold,
            less: 0.0,
            at_most: 0.0,
            exactly: 0.0,
            at_least: 0.0,
            greater: 0.0,
            expected_value: self.expected_value(),
        };

        for (k, p) in self.distribution() {
            if k < threshold {
                odds.less += p;
            }
            if k <= threshold {
                odds.at_most += p;
            }
            if k == threshold {
                odds.exactly += p;
            }
            if k >= threshold {
                odds.at_least += p;
            }
            if k > threshold {
                odds.greater += p;
            }
        }

        odds
    }
}

/// P(X < t), P(X <= t), P(X = t), P(X >= t), P(X > t) and E[X]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdOdds {
    pub threshold: u64,
    pub less: f64,
    pub at_most: f64,
    pub exactly: f64,
    pub at_least: f64,
    pub greater: f64,
    pub expected_value: f64,
}

impl fmt::Display for ThresholdOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.threshold;
        writeln!(f, "Odds of < {}: {}", t, format_percent(self.less, 2))?;
        writeln!(f, "Odds of ≤ {}: {}", t, format_percent(self.at_most, 2))?;
        writeln!(f, "Odds of = {}: {}", t, format_percent(self.exactly, 2))?;
        writeln!(f, "Odds of ≥ {}: {}", t, format_percent(self.at_least, 2))?;
        writeln!(f, "Odds of > {}: {}", t, format_percent(self.greater, 2))?;
        writeln!(f, "Expected value: {:.2}", self.expected_value)
    }
}
