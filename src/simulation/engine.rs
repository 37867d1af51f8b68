use crate::combo::{ComboSpec, Locality};
use crate::deck::Deck;
use crate::math::HypergeometricQuery;
use crate::rng::GameRng;
use crate::simulation::background::CancelToken;
use crate::simulation::hand::simulate_hand;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("simulation cancelled")]
    Cancelled,
    #[error("trial count must be at least 1")]
    ZeroTrials,
    #[error("chunk size must be at least 1")]
    ZeroChunkSize,
    #[error("simulation worker panicked")]
    WorkerPanicked,
}

/// How many hands to deal and how to split the work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationParams {
    pub hand_size: usize,
    pub trials: usize,
    /// Trials run between cancellation checks / progress reports
    pub chunk_size: usize,
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::ZeroTrials);
        }
        if self.chunk_size == 0 {
            return Err(SimulationError::ZeroChunkSize);
        }
        Ok(())
    }

    /// Sizes of the consecutive chunks covering all trials
    fn chunks(&self) -> Vec<usize> {
        let full = self.trials / self.chunk_size;
        let mut sizes = vec![self.chunk_size; full];
        let rest = self.trials % self.chunk_size;
        if rest > 0 {
            sizes.push(rest);
        }
        sizes
    }
}

/// Monte Carlo result: successes out of trials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub successes: usize,
    pub trials: usize,
}

impl Estimate {
    /// successes / trials; zero when nothing was simulated
    pub fn probability(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.successes as f64 / self.trials as f64
    }

    /// sqrt(p(1-p)/n)
    pub fn standard_error(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let p = self.probability();
        (p * (1.0 - p) / self.trials as f64).sqrt()
    }
}

/// Deal `trials` hands and count how many satisfy the combo
pub fn run_trials(
    deck: &Deck,
    combo: &ComboSpec,
    hand_size: usize,
    trials: usize,
    rng: &mut GameRng,
) -> usize {
    let mut successes = 0;
    for _ in 0..trials {
        let trial = simulate_hand(deck, hand_size, rng);
        if combo.is_satisfied(&trial) {
            successes += 1;
        }
    }
    successes
}

/// Plain Monte Carlo estimate of the probability the combo is met.
/// An empty deck is reported as 0 without dealing anything.
pub fn estimate_probability(
    deck: &Deck,
    combo: &ComboSpec,
    hand_size: usize,
    trials: usize,
    rng: &mut GameRng,
) -> f64 {
    if deck.is_empty() || trials == 0 {
        return 0.0;
    }
    run_trials(deck, combo, hand_size, trials, rng) as f64 / trials as f64
}

/// Run the simulation chunk by chunk on the calling thread, checking
/// `cancel` between chunks and reporting completed trials to `on_progress`.
/// A cancelled run returns an error, never a partial estimate.
pub fn run_chunked<F>(
    deck: &Deck,
    combo: &ComboSpec,
    params: SimulationParams,
    rng: &mut GameRng,
    cancel: &CancelToken,
    mut on_progress: F,
) -> Result<Estimate, SimulationError>
where
    F: FnMut(usize),
{
    params.validate()?;
    if deck.is_empty() {
        return Ok(Estimate { successes: 0, trials: 0 });
    }

    let mut estimate = Estimate { successes: 0, trials: 0 };
    for size in params.chunks() {
        if cancel.is_cancelled() {
            debug!(completed = estimate.trials, "simulation cancelled");
            return Err(SimulationError::Cancelled);
        }
        estimate.successes += run_trials(deck, combo, params.hand_size, size, rng);
        estimate.trials += size;
        trace!(completed = estimate.trials, total = params.trials, "chunk done");
        on_progress(estimate.trials);
    }

    debug!(
        trials = estimate.trials,
        successes = estimate.successes,
        "simulation finished"
    );
    Ok(estimate)
}

/// Run chunks on the rayon pool. Chunk `i` uses a generator forked from
/// `rng` with stream `i`, so a seeded run gives the same estimate on any
/// number of threads.
pub fn run_parallel(
    deck: &Deck,
    combo: &ComboSpec,
    params: SimulationParams,
    rng: &GameRng,
    cancel: &CancelToken,
) -> Result<Estimate, SimulationError> {
    params.validate()?;
    if deck.is_empty() {
        return Ok(Estimate { successes: 0, trials: 0 });
    }

    let chunks = params.chunks();
    let results: Vec<Option<usize>> = chunks
        .par_iter()
        .enumerate()
        .map(|(i, &size)| {
            if cancel.is_cancelled() {
                return None;
            }
            let mut chunk_rng = rng.fork(i as u64);
            Some(run_trials(deck, combo, params.hand_size, size, &mut chunk_rng))
        })
        .collect();

    let mut successes = 0;
    for result in results {
        successes += result.ok_or(SimulationError::Cancelled)?;
    }

    debug!(trials = params.trials, successes, chunks = chunks.len(), "parallel simulation finished");
    Ok(Estimate { successes, trials: params.trials })
}

/// Exact probability for a combo that is a single hand requirement on a
/// deck without effect cards: P(at least `count` copies in the hand).
/// Returns None when the combo or deck needs simulating.
pub fn exact_probability(deck: &Deck, combo: &ComboSpec, hand_size: usize) -> Option<f64> {
    let req = combo.single_requirement()?;
    if req.locality != Locality::Hand || deck.has_effects() || deck.is_empty() {
        return None;
    }

    let population = deck.len() as u64;
    let draws = (hand_size as u64).min(population);
    let copies = deck.count_of(&req.card) as u64;
    let query = HypergeometricQuery::new(population, copies, draws).ok()?;
    Some(query.threshold_odds(req.count as u64).at_least)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::parse_combo;
    use crate::deck::parse_deck;

    fn combo(text: &str) -> ComboSpec {
        parse_combo(text).combo
    }

    fn params(trials: usize, chunk_size: usize) -> SimulationParams {
        SimulationParams { hand_size: 5, trials, chunk_size }
    }

    #[test]
    fn test_empty_deck_is_zero_without_trials() {
        let deck = parse_deck("0 total").deck;
        let mut rng = GameRng::new(Some(1));
        assert_eq!(estimate_probability(&deck, &combo("Foo"), 5, 1000, &mut rng), 0.0);

        let estimate = run_chunked(&deck, &combo("Foo"), params(1000, 100), &mut rng, &CancelToken::new(), |_| {
            panic!("no chunk should run")
        })
        .unwrap();
        assert_eq!(estimate.trials, 0);
        assert_eq!(estimate.probability(), 0.0);
    }

    #[test]
    fn test_certain_and_impossible_combos() {
        let deck = parse_deck("40 Foo").deck;
        let mut rng = GameRng::new(Some(2));
        assert_eq!(estimate_probability(&deck, &combo("5 Foo"), 5, 500, &mut rng), 1.0);
        assert_eq!(estimate_probability(&deck, &combo("6 Foo"), 5, 500, &mut rng), 0.0);
        assert_eq!(estimate_probability(&deck, &combo("-35 Foo"), 5, 500, &mut rng), 1.0);
        assert_eq!(estimate_probability(&deck, &ComboSpec::default(), 5, 500, &mut rng), 0.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let deck = parse_deck("3 Foo\n2 draw2\n3 pickfrom6").deck;
        let wanted = combo("Foo");
        let a = estimate_probability(&deck, &wanted, 5, 2_000, &mut GameRng::new(Some(42)));
        let b = estimate_probability(&deck, &wanted, 5, 2_000, &mut GameRng::new(Some(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_chunked_counts_every_trial() {
        let deck = parse_deck("3 Foo").deck;
        let mut progress = Vec::new();
        let estimate = run_chunked(
            &deck,
            &combo("Foo"),
            params(2_500, 1_000),
            &mut GameRng::new(Some(3)),
            &CancelToken::new(),
            |done| progress.push(done),
        )
        .unwrap();

        assert_eq!(estimate.trials, 2_500);
        assert_eq!(progress, vec![1_000, 2_000, 2_500]);
    }

    #[test]
    fn test_chunked_matches_plain_loop_for_same_seed() {
        let deck = parse_deck("3 Foo\n2 draw2").deck;
        let wanted = combo("Foo");
        let plain = estimate_probability(&deck, &wanted, 5, 3_000, &mut GameRng::new(Some(8)));
        let chunked = run_chunked(
            &deck,
            &wanted,
            params(3_000, 700),
            &mut GameRng::new(Some(8)),
            &CancelToken::new(),
            |_| {},
        )
        .unwrap();
        assert_eq!(chunked.probability(), plain);
    }

    #[test]
    fn test_cancelled_run_reports_no_estimate() {
        let deck = parse_deck("3 Foo").deck;
        let cancel = CancelToken::new();
        let result = run_chunked(
            &deck,
            &combo("Foo"),
            params(10_000, 100),
            &mut GameRng::new(Some(4)),
            &cancel,
            |done| {
                if done >= 300 {
                    cancel.cancel();
                }
            },
        );
        assert_eq!(result, Err(SimulationError::Cancelled));

        let parallel = run_parallel(&deck, &combo("Foo"), params(10_000, 100), &GameRng::new(Some(4)), &cancel);
        assert_eq!(parallel, Err(SimulationError::Cancelled));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let deck = parse_deck("3 Foo").deck;
        let result = run_chunked(
            &deck,
            &combo("Foo"),
            params(0, 100),
            &mut GameRng::new(Some(4)),
            &CancelToken::new(),
            |_| {},
        );
        assert_eq!(result, Err(SimulationError::ZeroTrials));
        assert_eq!(params(10, 0).validate(), Err(SimulationError::ZeroChunkSize));
    }

    #[test]
    fn test_parallel_is_reproducible() {
        let deck = parse_deck("3 Foo\n3 pickfrom6").deck;
        let wanted = combo("Foo");
        let rng = GameRng::new(Some(11));
        let a = run_parallel(&deck, &wanted, params(20_000, 1_000), &rng, &CancelToken::new()).unwrap();
        let b = run_parallel(&deck, &wanted, params(20_000, 1_000), &rng, &CancelToken::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.trials, 20_000);
    }

    #[test]
    fn test_exact_probability_single_requirement() {
        let deck = parse_deck("3 Foo\n40 total").deck;
        let p = exact_probability(&deck, &combo("Foo"), 5).unwrap();
        assert!((p - (1.0 - 435_897.0 / 658_008.0)).abs() < 1e-9);
    }

    #[test]
    fn test_exact_probability_not_available() {
        let plain = parse_deck("3 Foo").deck;
        let with_effects = parse_deck("3 Foo\n1 draw2").deck;
        assert_eq!(exact_probability(&plain, &combo("Foo + Bar"), 5), None);
        assert_eq!(exact_probability(&plain, &combo("-1 Foo"), 5), None);
        assert_eq!(exact_probability(&plain, &combo("Foo\nBar"), 5), None);
        assert_eq!(exact_probability(&with_effects, &combo("Foo"), 5), None);
    }

    #[test]
    fn test_standard_error() {
        let estimate = Estimate { successes: 25, trials: 100 };
        assert!((estimate.standard_error() - (0.25f64 * 0.75 / 100.0).sqrt()).abs() < 1e-12);
    }
}
