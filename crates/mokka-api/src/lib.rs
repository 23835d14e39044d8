//! HTTP surface of the mokka remote control service.
//!
//! Thin axum adapter over [`mokka_hardware::CoffeeMachine`] and
//! [`mokka_storage::SettingsStore`]: request/response marshaling and status
//! code mapping only, no device logic. Busy hardware maps to `409 Conflict`
//! so clients can tell "try again later" apart from a bad request.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

pub use router::build;
pub use state::AppState;
