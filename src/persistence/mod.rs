//! Best score persistence
//!
//! The storage backend sits behind `PersistenceService` and runs on its own
//! worker thread. The game loop talks to it only through `ScoreKeeper`:
//! requests are fire-and-forget, results are polled without blocking.

use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use serde::{Deserialize, Serialize};

/// Result of a conditional save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
    /// Stored as the new best
    NewBest(u32),
    /// Not stored; the existing best is at least as high
    NotHigher { best: u32 },
}

impl SaveOutcome {
    /// Best score known to the store after the save
    pub fn best(self) -> u32 {
        match self {
            Self::NewBest(best) | Self::NotHigher { best } => best,
        }
    }
}

/// Backend that keeps the best score
pub trait PersistenceService: Send {
    fn load_best_score(&mut self) -> anyhow::Result<u32>;

    fn save_if_higher(&mut self, score: u32) -> anyhow::Result<SaveOutcome>;
}

/// Work sent to the persistence worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistRequest {
    LoadBest,
    SaveIfHigher(u32),
    Shutdown,
}

/// Completed work reported back to the game loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistResult {
    BestLoaded(u32),
    Saved(SaveOutcome),
    Failed { request: PersistRequest, error: String },
}

/// Handle to the persistence worker thread
pub struct ScoreKeeper {
    requests: Sender<PersistRequest>,
    results: Receiver<PersistResult>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ScoreKeeper {
    /// Start a worker thread that owns `service`
    pub fn spawn(service: Box<dyn PersistenceService>) -> Self {
        let (requests, request_rx) = unbounded();
        let (result_tx, results) = unbounded();

        let worker = thread::Builder::new()
            .name("score-keeper".into())
            .spawn(move || run_worker(service, request_rx, result_tx));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                // Requests pile up unanswered; the game runs without persistence
                log::warn!("Could not start persistence worker: {}", e);
                None
            }
        };

        Self {
            requests,
            results,
            worker,
        }
    }

    /// Ask for the stored best score
    pub fn request_load(&self) {
        self.send(PersistRequest::LoadBest);
    }

    /// Ask the store to keep `score` if it beats the stored best
    pub fn save_if_higher(&self, score: u32) {
        self.send(PersistRequest::SaveIfHigher(score));
    }

    /// Drain finished results without blocking
    pub fn poll(&self) -> Vec<PersistResult> {
        let mut out = Vec::new();
        loop {
            match self.results.try_recv() {
                Ok(result) => out.push(result),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Finish queued work, stop the worker and return whatever it reported
    pub fn shutdown(mut self) -> Vec<PersistResult> {
        self.stop();
        self.poll()
    }

    fn send(&self, request: PersistRequest) {
        if self.requests.send(request).is_err() {
            log::warn!("Persistence worker gone, dropping {:?}", request);
        }
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.requests.send(PersistRequest::Shutdown);
            if worker.join().is_err() {
                log::warn!("Persistence worker panicked");
            }
        }
    }
}

impl Drop for ScoreKeeper {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(
    mut service: Box<dyn PersistenceService>,
    requests: Receiver<PersistRequest>,
    results: Sender<PersistResult>,
) {
    log::debug!("Persistence worker started");
    for request in requests.iter() {
        let result = match request {
            PersistRequest::Shutdown => break,
            PersistRequest::LoadBest => service.load_best_score().map(PersistResult::BestLoaded),
            PersistRequest::SaveIfHigher(score) => {
                service.save_if_higher(score).map(PersistResult::Saved)
            }
        };
        let result = result.unwrap_or_else(|e| {
            log::warn!("Persistence {:?} failed: {:#}", request, e);
            PersistResult::Failed {
                request,
                error: format!("{:#}", e),
            }
        });
        if results.send(result).is_err() {
            break;
        }
    }
    log::debug!("Persistence worker stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::bail;

    use super::*;

    /// In-memory store that records every save it is asked for
    #[derive(Clone, Default)]
    struct MemoryStore {
        best: Arc<Mutex<u32>>,
        saves: Arc<Mutex<Vec<u32>>>,
    }

    impl PersistenceService for MemoryStore {
        fn load_best_score(&mut self) -> anyhow::Result<u32> {
            Ok(*self.best.lock().unwrap())
        }

        fn save_if_higher(&mut self, score: u32) -> anyhow::Result<SaveOutcome> {
            self.saves.lock().unwrap().push(score);
            let mut best = self.best.lock().unwrap();
            if score > *best {
                *best = score;
                Ok(SaveOutcome::NewBest(score))
            } else {
                Ok(SaveOutcome::NotHigher { best: *best })
            }
        }
    }

    struct FailingStore;

    impl PersistenceService for FailingStore {
        fn load_best_score(&mut self) -> anyhow::Result<u32> {
            bail!("disk on fire")
        }

        fn save_if_higher(&mut self, _score: u32) -> anyhow::Result<SaveOutcome> {
            bail!("disk on fire")
        }
    }

    #[test]
    fn test_requests_are_answered_in_order() {
        let store = MemoryStore::default();
        *store.best.lock().unwrap() = 5;
        let keeper = ScoreKeeper::spawn(Box::new(store.clone()));

        keeper.request_load();
        keeper.save_if_higher(3);
        keeper.save_if_higher(9);

        let results = keeper.shutdown();
        assert_eq!(
            results,
            vec![
                PersistResult::BestLoaded(5),
                PersistResult::Saved(SaveOutcome::NotHigher { best: 5 }),
                PersistResult::Saved(SaveOutcome::NewBest(9)),
            ]
        );
        assert_eq!(*store.saves.lock().unwrap(), vec![3, 9]);
    }

    #[test]
    fn test_failures_are_reported_not_raised() {
        let keeper = ScoreKeeper::spawn(Box::new(FailingStore));
        keeper.request_load();
        keeper.save_if_higher(1);

        let results = keeper.shutdown();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            &results[0],
            PersistResult::Failed { request: PersistRequest::LoadBest, error } if error.contains("disk on fire")
        ));
        assert!(matches!(
            results[1],
            PersistResult::Failed {
                request: PersistRequest::SaveIfHigher(1),
                ..
            }
        ));
    }

    #[test]
    fn test_poll_never_blocks() {
        let keeper = ScoreKeeper::spawn(Box::new(MemoryStore::default()));
        // Nothing requested yet
        assert!(keeper.poll().is_empty());
    }

    #[test]
    fn test_save_outcome_best() {
        assert_eq!(SaveOutcome::NewBest(4).best(), 4);
        assert_eq!(SaveOutcome::NotHigher { best: 7 }.best(), 7);
    }
}
