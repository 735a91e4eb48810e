//! Cancellable background generation.
//!
//! Generation is CPU-bound and can take a while at the harder levels, so it
//! must not run on an interactive thread. [`spawn_generation`] moves the
//! whole run onto a worker thread and hands back a [`GenerationHandle`]; the
//! caller polls or joins at its leisure, and can cancel at any point — the
//! embedded searches observe the cancel flag at every expanded node, so an
//! abandoned run stops promptly instead of finishing a puzzle nobody wants.

use std::{
    sync::mpsc::{Receiver, TryRecvError, channel},
    thread::JoinHandle,
};

use log::debug;
use ninefold_solver::CancelToken;

use crate::{Difficulty, GenerateError, GeneratedPuzzle, PuzzleGenerator, PuzzleSeed};

/// Handle to an in-flight background generation.
///
/// Dropping the handle detaches the worker; call [`cancel`](Self::cancel)
/// first to stop it promptly. A cancelled run yields
/// [`GenerateError::Cancelled`] — never a partial puzzle.
#[derive(Debug)]
pub struct GenerationHandle {
    cancel: CancelToken,
    receiver: Receiver<Result<GeneratedPuzzle, GenerateError>>,
    worker: JoinHandle<()>,
}

/// Spawns puzzle generation on a background worker thread.
///
/// With `seed` set, the run is deterministic; otherwise a fresh entropy
/// seed is drawn on the worker.
///
/// # Examples
///
/// ```no_run
/// use ninefold_generator::{Difficulty, spawn_generation};
///
/// let handle = spawn_generation(Difficulty::Medium, None);
/// let puzzle = handle.join().expect("generation succeeds");
/// println!("{}", puzzle.problem);
/// ```
#[must_use]
pub fn spawn_generation(difficulty: Difficulty, seed: Option<PuzzleSeed>) -> GenerationHandle {
    let cancel = CancelToken::new();
    let (sender, receiver) = channel();

    let token = cancel.clone();
    let worker = std::thread::spawn(move || {
        let generator = PuzzleGenerator::new().with_cancel_token(token);
        let result = match seed {
            Some(seed) => generator.generate_with_seed(difficulty, seed),
            None => generator.generate(difficulty),
        };
        debug!("background generation for {difficulty} finished: ok={}", result.is_ok());
        // The receiver may be gone if the caller lost interest; that is
        // not an error worth surfacing.
        let _ = sender.send(result);
    });

    GenerationHandle {
        cancel,
        receiver,
        worker,
    }
}

impl GenerationHandle {
    /// Requests cancellation of the in-flight generation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` if the worker has finished (successfully or not).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Retrieves the outcome if the worker has finished, without blocking.
    pub fn try_result(&self) -> Option<Result<GeneratedPuzzle, GenerateError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            // A worker that died without sending behaves like a cancelled
            // run from the caller's perspective.
            Err(TryRecvError::Disconnected) => Some(Err(GenerateError::Cancelled)),
        }
    }

    /// Blocks until the worker finishes and returns its outcome.
    pub fn join(self) -> Result<GeneratedPuzzle, GenerateError> {
        let result = self
            .receiver
            .recv()
            .unwrap_or(Err(GenerateError::Cancelled));
        let _ = self.worker.join();
        result
    }
}
