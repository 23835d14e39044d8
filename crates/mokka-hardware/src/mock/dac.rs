//! Mock DAC bus for testing and development.

use crate::error::{HardwareError, Result};
use crate::traits::DacBus;
use std::sync::{Arc, Mutex};

/// One recorded bus write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DacWrite {
    /// Device address on the bus.
    pub address: u8,

    /// Target register.
    pub register: u8,

    /// Payload bytes.
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
struct MockDacState {
    writes: Vec<DacWrite>,
    failing: bool,
}

/// Mock DAC bus recording every block write.
///
/// # Examples
///
/// ```
/// use mokka_hardware::mock::MockDacBus;
/// use mokka_hardware::traits::DacBus;
///
/// #[tokio::main]
/// async fn main() -> mokka_hardware::Result<()> {
///     let (mut bus, handle) = MockDacBus::new();
///
///     bus.write_block(0x60, 0x40, &[0xFF, 0xF0]).await?;
///
///     let writes = handle.writes();
///     assert_eq!(writes.len(), 1);
///     assert_eq!(writes[0].data, vec![0xFF, 0xF0]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDacBus {
    state: Arc<Mutex<MockDacState>>,
}

impl MockDacBus {
    /// Create a new mock bus and its handle.
    pub fn new() -> (Self, MockDacHandle) {
        let state = Arc::new(Mutex::new(MockDacState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockDacHandle { state },
        )
    }
}

impl Default for MockDacBus {
    fn default() -> Self {
        Self::new().0
    }
}

impl DacBus for MockDacBus {
    async fn write_block(&mut self, address: u8, register: u8, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().expect("mock dac state poisoned");
        if state.failing {
            return Err(HardwareError::communication(format!(
                "simulated bus failure writing to {address:#04x}"
            )));
        }
        state.writes.push(DacWrite {
            address,
            register,
            data: data.to_vec(),
        });
        Ok(())
    }
}

/// Handle for controlling a mock DAC bus.
#[derive(Debug, Clone)]
pub struct MockDacHandle {
    state: Arc<Mutex<MockDacState>>,
}

impl MockDacHandle {
    fn state(&self) -> std::sync::MutexGuard<'_, MockDacState> {
        self.state.lock().expect("mock dac state poisoned")
    }

    /// Make every subsequent write fail with a communication error.
    pub fn fail_writes(&self, failing: bool) {
        self.state().failing = failing;
    }

    /// All recorded writes, in order.
    pub fn writes(&self) -> Vec<DacWrite> {
        self.state().writes.clone()
    }

    /// Clear the recorded writes.
    pub fn clear(&self) {
        self.state().writes.clear();
    }
}
