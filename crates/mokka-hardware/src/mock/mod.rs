//! Mock hardware implementations for testing and development.
//!
//! This module provides simulated pin and DAC bus backends that can be
//! controlled programmatically without physical hardware. Each backend is
//! created together with a handle; the handle drives line levels and fault
//! injection and exposes a journal of everything the code under test did to
//! the hardware.

pub mod dac;
pub mod pins;

// Re-export commonly used types
pub use dac::{DacWrite, MockDacBus, MockDacHandle};
pub use pins::{MockPinController, MockPinHandle, PinEvent, PinMode};
