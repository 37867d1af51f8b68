use crate::combo::parse_combo;
use crate::deck::parse_deck;
use crate::math::format_percent;
use crate::rng::GameRng;
use crate::simulation::background::CancelToken;
use crate::simulation::engine::{
    exact_probability, run_chunked, run_parallel, Estimate, SimulationError, SimulationParams,
};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Default number of simulated hands
pub const DEFAULT_TRIALS: usize = 100_000;

/// Default opening hand size
pub const DEFAULT_HAND_SIZE: usize = 5;

/// One probability request: deck and combo text plus the run parameters
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub deck_text: String,
    pub combo_text: String,
    pub params: SimulationParams,
    /// Use the exact calculator when the combo is a single hand requirement
    /// and the deck has no effect cards
    pub prefer_exact: bool,
    pub parallel: bool,
}

/// What a request produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// Deck or combo text had errors; nothing was simulated
    ParseErrors {
        deck_errors: Vec<String>,
        combo_errors: Vec<String>,
    },
    /// The normalized deck has no cards
    EmptyDeck,
    Estimated { estimate: Estimate, probability: f64 },
    Exact { probability: f64 },
}

impl SimulationOutcome {
    pub fn probability(&self) -> Option<f64> {
        match self {
            SimulationOutcome::ParseErrors { .. } => None,
            SimulationOutcome::EmptyDeck => Some(0.0),
            SimulationOutcome::Estimated { probability, .. }
            | SimulationOutcome::Exact { probability } => Some(*probability),
        }
    }

    /// Every parse error, deck errors first
    pub fn errors(&self) -> Vec<String> {
        match self {
            SimulationOutcome::ParseErrors { deck_errors, combo_errors } => {
                deck_errors.iter().chain(combo_errors).cloned().collect()
            }
            _ => Vec::new(),
        }
    }
}

/// `Error`, `0%`, or the probability as a percentage with four decimals
impl fmt::Display for SimulationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationOutcome::ParseErrors { .. } => write!(f, "Error"),
            SimulationOutcome::EmptyDeck => write!(f, "0%"),
            SimulationOutcome::Estimated { probability, .. }
            | SimulationOutcome::Exact { probability } => {
                write!(f, "{}", format_percent(*probability, 4))
            }
        }
    }
}

/// Parse both texts, stop on any parse error, otherwise compute the
/// probability (exactly when allowed and possible, else by simulation)
pub fn run_request(
    request: &SimulationRequest,
    rng: &mut GameRng,
    cancel: &CancelToken,
    on_progress: impl FnMut(usize),
) -> Result<SimulationOutcome, SimulationError> {
    let parsed_deck = parse_deck(&request.deck_text);
    let parsed_combo = parse_combo(&request.combo_text);

    if !parsed_deck.is_ok() || !parsed_combo.is_ok() {
        return Ok(SimulationOutcome::ParseErrors {
            deck_errors: parsed_deck.errors.iter().map(|e| e.to_string()).collect(),
            combo_errors: parsed_combo.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let deck = parsed_deck.deck;
    let combo = parsed_combo.combo;
    if deck.is_empty() {
        return Ok(SimulationOutcome::EmptyDeck);
    }

    if request.prefer_exact {
        if let Some(probability) = exact_probability(&deck, &combo, request.params.hand_size) {
            info!("single-card combo, using exact hypergeometric odds");
            return Ok(SimulationOutcome::Exact { probability });
        }
    }

    info!(
        cards = deck.len(),
        lines = combo.lines.len(),
        trials = request.params.trials,
        seed = rng.seed(),
        "running simulation"
    );
    let estimate = if request.parallel {
        run_parallel(&deck, &combo, request.params, rng, cancel)?
    } else {
        run_chunked(&deck, &combo, request.params, rng, cancel, on_progress)?
    };

    Ok(SimulationOutcome::Estimated { probability: estimate.probability(), estimate })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(deck: &str, combo: &str) -> SimulationRequest {
        SimulationRequest {
            deck_text: deck.to_string(),
            combo_text: combo.to_string(),
            params: SimulationParams { hand_size: 5, trials: 2_000, chunk_size: 500 },
            prefer_exact: false,
            parallel: false,
        }
    }

    fn run(request: &SimulationRequest) -> SimulationOutcome {
        run_request(request, &mut GameRng::new(Some(1)), &CancelToken::new(), |_| {}).unwrap()
    }

    #[test]
    fn test_parse_errors_block_simulation() {
        let outcome = run(&request("3 Foo\nbad line", "Foo\n(Bar | Baz"));
        assert_eq!(outcome.to_string(), "Error");
        assert_eq!(outcome.probability(), None);
        assert_eq!(
            outcome.errors(),
            vec![
                "Invalid line: \"bad line\"".to_string(),
                "Error parsing: \"(Bar | Baz\" - group '(Bar | Baz' is missing a closing ')'"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_deck_reports_zero_percent() {
        let outcome = run(&request("0 total", "Foo"));
        assert_eq!(outcome, SimulationOutcome::EmptyDeck);
        assert_eq!(outcome.to_string(), "0%");
    }

    #[test]
    fn test_probability_has_four_decimals() {
        let outcome = run(&request("40 Foo", "Foo"));
        assert_eq!(outcome.to_string(), "100.0000%");
    }

    #[test]
    fn test_exact_path_used_when_preferred() {
        let mut req = request("3 Foo", "Foo");
        req.prefer_exact = true;
        match run(&req) {
            SimulationOutcome::Exact { probability } => {
                assert!((probability - (1.0 - 435_897.0 / 658_008.0)).abs() < 1e-9)
            }
            other => panic!("expected exact outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_falls_back_to_simulation_with_effects() {
        let mut req = request("3 Foo\n2 draw2", "Foo");
        req.prefer_exact = true;
        assert!(matches!(run(&req), SimulationOutcome::Estimated { .. }));
    }

    #[test]
    fn test_parallel_request() {
        let mut req = request("3 Foo\n3 pickfrom6", "Foo");
        req.parallel = true;
        match run(&req) {
            SimulationOutcome::Estimated { estimate, .. } => assert_eq!(estimate.trials, 2_000),
            other => panic!("expected estimate, got {:?}", other),
        }
    }
}
