//! `ResultSink` adapters that feed finished matches into a store.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use game_core::{MatchResult, PersistError, ResultSink};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::MatchStore;

/// Saves synchronously into a shared store
pub struct StoreSink<S> {
    store: Arc<Mutex<S>>,
}

impl<S: MatchStore> StoreSink<S> {
    pub fn new(store: Arc<Mutex<S>>) -> Self {
        Self { store }
    }
}

impl<S: MatchStore> ResultSink for StoreSink<S> {
    fn save(&mut self, result: &MatchResult) -> Result<(), PersistError> {
        let mut store = self.store.lock().map_err(|_| StoreError::Poisoned)?;
        store.record(result)?;
        Ok(())
    }
}

/// Hands results to a writer thread and returns immediately.
///
/// Store failures inside the worker are logged; the session has already
/// moved on by then.
pub struct BackgroundSink {
    tx: Option<Sender<MatchResult>>,
    worker: Option<JoinHandle<usize>>,
}

impl BackgroundSink {
    pub fn spawn<S: MatchStore + 'static>(store: Arc<Mutex<S>>) -> Result<Self, StoreError> {
        let (tx, rx) = mpsc::channel::<MatchResult>();
        let worker = thread::Builder::new()
            .name("match-store-writer".into())
            .spawn(move || {
                let mut saved: usize = 0;
                for result in rx {
                    let Ok(mut guard) = store.lock() else {
                        warn!("store lock poisoned, writer exiting");
                        break;
                    };
                    match guard.record(&result) {
                        Ok(record) => {
                            saved += 1;
                            debug!(id = record.id, "result saved in background");
                        }
                        Err(err) => warn!(error = %err, "background save failed"),
                    }
                }
                saved
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Close the queue, wait for pending writes and return how many landed.
    pub fn shutdown(mut self) -> Result<usize, StoreError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<usize, StoreError> {
        drop(self.tx.take());
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| StoreError::WorkerStopped),
            None => Ok(0),
        }
    }
}

impl ResultSink for BackgroundSink {
    fn save(&mut self, result: &MatchResult) -> Result<(), PersistError> {
        let tx = self.tx.as_ref().ok_or(StoreError::WorkerStopped)?;
        tx.send(result.clone())
            .map_err(|_| StoreError::WorkerStopped)?;
        Ok(())
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            warn!(error = %err, "writer did not shut down cleanly");
        }
    }
}
