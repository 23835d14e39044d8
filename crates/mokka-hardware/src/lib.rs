//! Hardware coordination layer for the mokka coffee machine remote control.
//!
//! The appliance is wired to the controlling computer through a set of
//! digital lines (signal LEDs in, button contacts out) and one I2C DAC per
//! adjustable brew parameter. This crate owns everything that touches those
//! lines:
//!
//! - **Sampling** ([`sampler`]): one read cycle busy-polls each input line
//!   until a high pulse is seen or the sample budget runs out; a consensus
//!   read repeats the cycle and keeps only readings every cycle agreed on,
//!   which debounces the blinking LEDs without dedicated filtering hardware.
//! - **Translation** ([`status`]): maps agreed line readings to a
//!   [`DeviceStatus`](mokka_core::DeviceStatus), substituting fail-safe
//!   fallbacks for lines that never reached agreement.
//! - **Actuation** ([`actuator`], [`analog`]): momentary button presses on
//!   output lines and 12-bit level codes written to the DAC channels.
//! - **Exclusive access** ([`session`]): a single [`Session`] guards all pin
//!   I/O; opening asserts the relay line that powers the control interface,
//!   closing releases it either immediately or through a background watcher
//!   that waits for the device to become ready, bounded by a timeout.
//!
//! # Design Philosophy
//!
//! - **Async-first**: all I/O operations are asynchronous using native
//!   `async fn` in traits (Edition 2024 RPITIT).
//! - **Substitutable hardware**: pin and bus access go through the
//!   [`PinController`] and [`DacBus`] traits; the [`mock`] implementations
//!   stand in for real peripherals in tests and on development machines.
//! - **Checked exclusivity**: acquiring the session gate never blocks; a
//!   second caller gets [`HardwareError::DeviceBusy`] and decides for itself
//!   whether to retry.
//!
//! # Examples
//!
//! ```
//! use mokka_hardware::config::MachineConfig;
//! use mokka_hardware::devices::{AnyDacBus, AnyPinController};
//! use mokka_hardware::mock::{MockDacBus, MockPinController};
//! use mokka_hardware::CoffeeMachine;
//!
//! #[tokio::main]
//! async fn main() -> mokka_hardware::Result<()> {
//!     let (pins, handle) = MockPinController::new();
//!     let (dac, _dac_handle) = MockDacBus::new();
//!
//!     let machine = CoffeeMachine::new(
//!         AnyPinController::Mock(pins),
//!         AnyDacBus::Mock(dac),
//!         MachineConfig::default(),
//!     );
//!
//!     // Simulate the dose LEDs being lit (machine on, nothing to report).
//!     let layout = MachineConfig::default().layout;
//!     handle.set_level(layout.inputs.one_dose, true);
//!     handle.set_level(layout.inputs.two_doses, true);
//!
//!     let status = machine.status().await?;
//!     assert!(status.device_ready);
//!     Ok(())
//! }
//! ```

pub mod actuator;
pub mod analog;
pub mod config;
pub mod devices;
pub mod error;
pub mod machine;
pub mod mock;
pub mod sampler;
pub mod session;
pub mod status;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use machine::CoffeeMachine;
pub use session::{Session, SessionGate};
pub use traits::{DacBus, PinController};
pub use types::{AggregatedReadings, LineReading, PinAccess};
