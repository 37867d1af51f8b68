use crate::rng::GameRng;
use crate::simulation::engine::SimulationError;
use crate::simulation::report::{run_request, SimulationOutcome, SimulationRequest};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Shared flag that asks a running simulation to stop at the next chunk
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A simulation request running on its own thread
pub struct SimulationHandle {
    cancel: CancelToken,
    completed: Arc<AtomicUsize>,
    trials: usize,
    worker: JoinHandle<Result<SimulationOutcome, SimulationError>>,
}

impl SimulationHandle {
    /// Start the request in the background. The caller keeps the handle to
    /// poll progress, cancel or join.
    pub fn spawn(request: SimulationRequest, mut rng: GameRng) -> Self {
        let cancel = CancelToken::new();
        let completed = Arc::new(AtomicUsize::new(0));
        let trials = request.params.trials;

        let worker_cancel = cancel.clone();
        let worker_completed = Arc::clone(&completed);
        let worker = std::thread::spawn(move || {
            run_request(&request, &mut rng, &worker_cancel, |done| {
                worker_completed.store(done, Ordering::Relaxed);
            })
        });

        SimulationHandle { cancel, completed, trials, worker }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Trials finished so far (sequential runs only)
    pub fn completed_trials(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total_trials(&self) -> usize {
        self.trials
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the worker. Cancelled runs come back as
    /// `SimulationError::Cancelled`, never as a partial estimate.
    pub fn join(self) -> Result<SimulationOutcome, SimulationError> {
        self.worker.join().map_err(|_| SimulationError::WorkerPanicked)?
    }
}
