use clap::{Parser, Subcommand, ValueEnum};
use combo_odds::combo::parse_combo;
use combo_odds::config::SimulationConfig;
use combo_odds::deck::parse_deck;
use combo_odds::logging::init_tracing;
use combo_odds::math::{format_percent, parse_odds_request, OddsRequest};
use combo_odds::presets::Preset;
use combo_odds::rng::GameRng;
use combo_odds::simulation::{SimulationError, SimulationHandle, SimulationOutcome, SimulationRequest};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "combo-odds")]
#[command(about = "Opening hand combo probability calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with simulation defaults
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the chance an opening hand meets the combo
    Simulate {
        /// Deck list file
        #[arg(short, long)]
        deck: Option<String>,

        /// Combo file
        #[arg(short = 'k', long)]
        combo: Option<String>,

        /// Built-in deck to use instead of a file
        #[arg(long, value_enum)]
        deck_preset: Option<Preset>,

        /// Built-in combo to use instead of a file
        #[arg(long, value_enum)]
        combo_preset: Option<Preset>,

        /// Cards in the opening hand
        #[arg(long)]
        hand_size: Option<usize>,

        /// Number of hands to simulate
        #[arg(short = 'n', long)]
        trials: Option<usize>,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Spread trials over all cores
        #[arg(long)]
        parallel: bool,

        /// Use exact odds when the combo is a single card requirement
        #[arg(long)]
        exact: bool,

        /// Give up after this many seconds
        #[arg(long, value_parser = parse_time_limit)]
        time_limit: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exact odds of drawing a card: <, ≤, =, ≥, > the target count
    Odds {
        /// Cards in the deck
        deck_size: String,

        /// Copies of the card in the deck
        copies: String,

        /// Cards drawn
        cards_drawn: String,

        /// Copy count to compare against
        target: String,

        /// Also print P(X = k) for every k
        #[arg(long)]
        distribution: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exactly / at least / at most odds for a desired copy count
    Calc {
        #[arg(long, default_value = "40")]
        deck_size: String,

        #[arg(long, default_value = "3")]
        copies: String,

        #[arg(long, default_value = "5")]
        hand_size: String,

        #[arg(long, default_value = "1")]
        desired: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a deck and combo and show what was understood
    Check {
        #[arg(short, long)]
        deck: Option<String>,

        #[arg(short = 'k', long)]
        combo: Option<String>,

        #[arg(long, value_enum)]
        deck_preset: Option<Preset>,

        #[arg(long, value_enum)]
        combo_preset: Option<Preset>,
    },

    /// Print a built-in deck or combo
    Preset {
        #[arg(value_enum)]
        kind: PresetKind,

        #[arg(value_enum, default_value = "default")]
        preset: Preset,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetKind {
    Deck,
    Combo,
}

#[derive(Serialize)]
struct JsonReport<T: Serialize> {
    generated_at: String,
    result: T,
}

fn print_json<T: Serialize>(result: T) {
    let report = JsonReport { generated_at: chrono::Utc::now().to_rfc3339(), result };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("✗ Failed to serialize result: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match SimulationConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ Failed to load config '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    match cli.command {
        Commands::Simulate {
            deck,
            combo,
            deck_preset,
            combo_preset,
            hand_size,
            trials,
            seed,
            parallel,
            exact,
            time_limit,
            json,
        } => {
            let mut config = config;
            if let Some(h) = hand_size {
                config.hand_size = h;
            }
            if let Some(n) = trials {
                config.trials = n;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            config.parallel |= parallel;
            if let Err(e) = config.validate() {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }

            let request = SimulationRequest {
                deck_text: load_text(deck.as_deref(), deck_preset, Preset::deck),
                combo_text: load_text(combo.as_deref(), combo_preset, Preset::combo),
                params: config.params(),
                prefer_exact: exact,
                parallel: config.parallel,
            };
            run_simulation(request, GameRng::new(config.seed), time_limit, json);
        }
        Commands::Odds { deck_size, copies, cards_drawn, target, distribution, json } => {
            let request = validated(parse_odds_request(&deck_size, &copies, &cards_drawn, &target));
            print_odds(&request, distribution, json);
        }
        Commands::Calc { deck_size, copies, hand_size, desired, json } => {
            let request = validated(parse_odds_request(&deck_size, &copies, &hand_size, &desired));
            let summary = request.summary();
            if json {
                print_json(summary);
            } else {
                println!("\n=== Deck Calculator ===\n");
                println!(
                    "Deck: {} cards, {} copies, {} drawn\n",
                    request.query.population, request.query.successes, request.query.draws
                );
                print!("{}", summary);
            }
        }
        Commands::Check { deck, combo, deck_preset, combo_preset } => {
            let deck_text = load_text(deck.as_deref(), deck_preset, Preset::deck);
            let combo_text = load_text(combo.as_deref(), combo_preset, Preset::combo);
            check(&deck_text, &combo_text);
        }
        Commands::Preset { kind, preset } => match kind {
            PresetKind::Deck => println!("{}", preset.deck()),
            PresetKind::Combo => println!("{}", preset.combo()),
        },
    }
}

/// Read a file, or fall back to a preset (the default one if neither is given)
fn load_text(path: Option<&str>, preset: Option<Preset>, pick: fn(&Preset) -> &'static str) -> String {
    match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("✗ Failed to read '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => pick(&preset.unwrap_or(Preset::Default)).to_string(),
    }
}

/// Seconds for `--time-limit`: a finite number above zero
fn parse_time_limit(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|_| format!("'{}' is not a number of seconds", s))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("time limit must be a positive number of seconds, got '{}'", s));
    }
    Ok(secs)
}

fn validated<E: std::fmt::Display>(result: Result<OddsRequest, E>) -> OddsRequest {
    match result {
        Ok(request) => request,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn print_odds(request: &OddsRequest, distribution: bool, json: bool) {
    let odds = request.threshold_odds();
    if json {
        #[derive(Serialize)]
        struct OddsJson {
            odds: combo_odds::math::ThresholdOdds,
            distribution: Option<Vec<(u64, f64)>>,
        }
        print_json(OddsJson {
            odds,
            distribution: distribution.then(|| request.query.distribution()),
        });
        return;
    }

    println!("\n=== Hypergeometric Odds ===\n");
    println!(
        "Deck: {} cards, {} copies, {} drawn\n",
        request.query.population, request.query.successes, request.query.draws
    );
    print!("{}", odds);

    if distribution {
        println!("\nDistribution:");
        for (k, p) in request.query.distribution() {
            let bar = "█".repeat((p * 50.0) as usize);
            println!("  {:3} copies: {:>7} {}", k, format_percent(p, 2), bar);
        }
    }
}

fn run_simulation(request: SimulationRequest, rng: GameRng, time_limit: Option<f64>, json: bool) {
    let seed = rng.seed();
    let trials = request.params.trials;
    let hand_size = request.params.hand_size;

    let progress = if json || request.parallel {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(trials as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} hands ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let start = Instant::now();
    let limit = time_limit.map(Duration::from_secs_f64);
    let handle = SimulationHandle::spawn(request, rng);
    while !handle.is_finished() {
        progress.set_position(handle.completed_trials() as u64);
        if limit.is_some_and(|limit| start.elapsed() >= limit) {
            handle.cancel();
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    let result = handle.join();
    let elapsed = start.elapsed();
    progress.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(SimulationError::Cancelled) => {
            eprintln!("✗ Simulation stopped after {:.2?}, no result", elapsed);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("✗ Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        print_json(&outcome);
    } else {
        if let SimulationOutcome::ParseErrors { deck_errors, combo_errors } = &outcome {
            if !deck_errors.is_empty() {
                eprintln!("Deck errors: {}", deck_errors.join(", "));
            }
            if !combo_errors.is_empty() {
                eprintln!("Combo errors: {}", combo_errors.join(", "));
            }
        }

        println!("\n=== Combo Simulation ===\n");
        println!("Hand size: {}", hand_size);
        println!("Trials: {}", trials);
        println!("Seed: {}", seed);
        println!();
        println!("Probability: {}", outcome);
        if let SimulationOutcome::Estimated { estimate, .. } = &outcome {
            println!("Standard error: ±{}", format_percent(estimate.standard_error(), 4));
            println!(
                "\nSimulation completed in {:.2?} ({:.0} hands/sec)",
                elapsed,
                estimate.trials as f64 / elapsed.as_secs_f64()
            );
        }
    }

    if matches!(outcome, SimulationOutcome::ParseErrors { .. }) {
        std::process::exit(1);
    }
}

fn check(deck_text: &str, combo_text: &str) {
    let parsed_deck = parse_deck(deck_text);
    let parsed_combo = parse_combo(combo_text);

    println!("\n=== Deck ({} cards) ===\n", parsed_deck.total());
    for (label, count) in parsed_deck.deck.composition() {
        println!("  {:3} {}", count, label);
    }
    for e in &parsed_deck.errors {
        println!("  ✗ line {}: {}", e.line(), e);
    }

    println!("\n=== Combo ({} lines) ===\n", parsed_combo.combo.lines.len());
    for (i, line) in parsed_combo.combo.lines.iter().enumerate() {
        println!("  [{}] {}", i + 1, line);
    }
    for e in &parsed_combo.errors {
        println!("  ✗ line {}: {}", e.line, e);
    }

    if !parsed_deck.is_ok() || !parsed_combo.is_ok() {
        std::process::exit(1);
    }
}
