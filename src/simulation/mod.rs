pub mod background;
pub mod engine;
pub mod hand;
pub mod report;

pub use background::{CancelToken, SimulationHandle};
pub use engine::{
    estimate_probability, exact_probability, run_chunked, run_parallel, run_trials, Estimate,
    SimulationError, SimulationParams,
};
pub use hand::{simulate_hand, Trial};
pub use report::{run_request, SimulationOutcome, SimulationRequest, DEFAULT_HAND_SIZE, DEFAULT_TRIALS};
