pub mod card;
pub mod combo;
pub mod config;
pub mod deck;
pub mod logging;
pub mod math;
pub mod presets;
pub mod rng;
pub mod simulation;
