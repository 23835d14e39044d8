//! Settings persistence for the mokka remote control service.
//!
//! The device settings are a small whole-record document: read before every
//! job, rewritten completely on edit. A JSON file is all the storage this
//! needs; the store creates it with default (unconfigured) settings on first
//! access.

pub mod error;
pub mod settings;

pub use error::{StorageError, StorageResult};
pub use settings::SettingsStore;
