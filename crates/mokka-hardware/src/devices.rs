//! Enum wrappers for hardware backend dispatch.
//!
//! Native `async fn` in traits (RPITIT) are not object-safe, so the backends
//! cannot be boxed as trait objects. These enums provide concrete type
//! dispatch instead: zero-cost, type-safe, and extensible behind feature
//! flags when real hardware backends land.

use crate::error::Result;
use crate::mock::{MockDacBus, MockPinController};
use crate::traits::{DacBus, PinController};

/// Enum wrapper for pin controller dispatch.
///
/// # Examples
///
/// ```
/// use mokka_hardware::devices::AnyPinController;
/// use mokka_hardware::mock::MockPinController;
/// use mokka_hardware::traits::PinController;
///
/// #[tokio::main]
/// async fn main() -> mokka_hardware::Result<()> {
///     let (pins, handle) = MockPinController::new();
///     let mut controller = AnyPinController::Mock(pins);
///
///     controller.configure_input(4).await?;
///     handle.set_level(4, true);
///     assert!(controller.read(4).await?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyPinController {
    /// Mock controller for development and testing.
    Mock(MockPinController),
    // Future: Gpio(GpioPinController) behind the hardware-gpio feature.
}

impl PinController for AnyPinController {
    async fn configure_input(&mut self, line: u8) -> Result<()> {
        match self {
            Self::Mock(controller) => controller.configure_input(line).await,
        }
    }

    async fn configure_output(&mut self, line: u8) -> Result<()> {
        match self {
            Self::Mock(controller) => controller.configure_output(line).await,
        }
    }

    async fn read(&mut self, line: u8) -> Result<bool> {
        match self {
            Self::Mock(controller) => controller.read(line).await,
        }
    }

    async fn write(&mut self, line: u8, level: bool) -> Result<()> {
        match self {
            Self::Mock(controller) => controller.write(line, level).await,
        }
    }

    async fn release(&mut self, line: u8) -> Result<()> {
        match self {
            Self::Mock(controller) => controller.release(line).await,
        }
    }

    async fn release_all(&mut self) -> Result<()> {
        match self {
            Self::Mock(controller) => controller.release_all().await,
        }
    }
}

/// Enum wrapper for DAC bus dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDacBus {
    /// Mock bus for development and testing.
    Mock(MockDacBus),
    // Future: I2c(I2cDacBus) behind the hardware-i2c feature.
}

impl DacBus for AnyDacBus {
    async fn write_block(&mut self, address: u8, register: u8, data: &[u8]) -> Result<()> {
        match self {
            Self::Mock(bus) => bus.write_block(address, register, data).await,
        }
    }
}
