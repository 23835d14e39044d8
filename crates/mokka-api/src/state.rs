//! Shared application state for axum handlers.

use mokka_hardware::CoffeeMachine;
use mokka_storage::SettingsStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Application state shared across all axum handlers.
///
/// Cheap to clone: the machine facade and the settings store are already
/// handle types. Job ids are a process-local sequence; the authoritative job
/// record lives with the remote web service, which is outside this crate.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Hardware access facade.
    pub machine: CoffeeMachine,

    /// Settings record store.
    pub settings: SettingsStore,

    /// Next job id.
    job_ids: Arc<AtomicI64>,
}

impl AppState {
    /// Create the application state.
    pub fn new(machine: CoffeeMachine, settings: SettingsStore) -> Self {
        Self {
            machine,
            settings,
            job_ids: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Allocate the next job id.
    pub fn next_job_id(&self) -> i64 {
        self.job_ids.fetch_add(1, Ordering::Relaxed)
    }
}
