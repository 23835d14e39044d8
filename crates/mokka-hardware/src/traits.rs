//! Hardware access trait definitions.
//!
//! These traits are the seam between the coordination algorithms and the
//! physical peripherals. The pin controller replaces the usual global GPIO
//! library state with an explicit object owning per-line configuration, so
//! the algorithms can run against the [`mock`](crate::mock) implementations
//! in tests and on development machines.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT); for
//! dynamic dispatch use the enum wrappers in [`devices`](crate::devices).

#![allow(async_fn_in_trait)]

use crate::error::Result;

/// Digital line controller.
///
/// Owns the configuration state of every line it hands out. A line must be
/// configured as input before [`read`](PinController::read) and as output
/// before [`write`](PinController::write); releasing a line returns it to the
/// unconfigured state.
///
/// # Object Safety and Dynamic Dispatch
///
/// `async fn` methods return `impl Future`, so this trait is not object-safe.
/// Use generic type parameters, or the
/// [`AnyPinController`](crate::devices::AnyPinController) enum wrapper where
/// one concrete type is needed.
pub trait PinController: Send + Sync {
    /// Configure `line` as a digital input (pull-down).
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be claimed or configured.
    async fn configure_input(&mut self, line: u8) -> Result<()>;

    /// Configure `line` as a digital output.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be claimed or configured.
    async fn configure_output(&mut self, line: u8) -> Result<()>;

    /// Read the current level of an input line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not configured as an input or the
    /// read itself fails.
    async fn read(&mut self, line: u8) -> Result<bool>;

    /// Drive an output line to `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not configured as an output or the
    /// write itself fails.
    async fn write(&mut self, line: u8, level: bool) -> Result<()>;

    /// Return `line` to the unconfigured state.
    ///
    /// # Errors
    ///
    /// Returns an error if the release fails; callers on cleanup paths
    /// typically log and continue.
    async fn release(&mut self, line: u8) -> Result<()>;

    /// Return every configured line to the unconfigured state.
    ///
    /// # Errors
    ///
    /// Returns an error if the release fails.
    async fn release_all(&mut self) -> Result<()>;
}

/// Addressed DAC bus.
///
/// The appliance's adjustable brew parameters are set through small I2C DACs;
/// one block write per level change.
pub trait DacBus: Send + Sync {
    /// Write `data` to `register` of the device at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transaction fails.
    async fn write_block(&mut self, address: u8, register: u8, data: &[u8]) -> Result<()>;
}
