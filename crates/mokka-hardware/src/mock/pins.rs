//! Mock pin controller for testing and development.
//!
//! Simulates a bank of digital lines. Unlike an event-stream peripheral, pin
//! levels are sampled state, so the mock shares a state table between the
//! controller and its handle instead of passing messages: the handle sets
//! levels or scripts per-poll read sequences, and reads back a journal of
//! configuration changes and writes.

use crate::error::{HardwareError, Result};
use crate::traits::PinController;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Configured mode of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Configured as digital input.
    Input,

    /// Configured as digital output.
    Output,
}

/// One entry of the mock's hardware journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinEvent {
    /// A line was configured as input.
    ConfiguredInput(u8),

    /// A line was configured as output.
    ConfiguredOutput(u8),

    /// A level was driven onto an output line.
    Wrote { line: u8, level: bool },

    /// A line was returned to the unconfigured state.
    Released(u8),
}

#[derive(Debug, Default)]
struct MockPinState {
    modes: HashMap<u8, PinMode>,
    levels: HashMap<u8, bool>,
    scripts: HashMap<u8, VecDeque<bool>>,
    events: Vec<PinEvent>,
    failing_configuration: HashSet<u8>,
    failing_reads: HashSet<u8>,
}

/// Mock pin controller.
///
/// # Examples
///
/// ```
/// use mokka_hardware::mock::MockPinController;
/// use mokka_hardware::traits::PinController;
///
/// #[tokio::main]
/// async fn main() -> mokka_hardware::Result<()> {
///     let (mut pins, handle) = MockPinController::new();
///
///     handle.set_level(4, true);
///
///     pins.configure_input(4).await?;
///     assert!(pins.read(4).await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockPinController {
    state: Arc<Mutex<MockPinState>>,
}

impl MockPinController {
    /// Create a new mock controller and its handle.
    pub fn new() -> (Self, MockPinHandle) {
        let state = Arc::new(Mutex::new(MockPinState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockPinHandle { state },
        )
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockPinState> {
        self.state.lock().expect("mock pin state poisoned")
    }
}

impl Default for MockPinController {
    fn default() -> Self {
        Self::new().0
    }
}

impl PinController for MockPinController {
    async fn configure_input(&mut self, line: u8) -> Result<()> {
        let mut state = self.state();
        if state.failing_configuration.contains(&line) {
            return Err(HardwareError::configuration(format!(
                "simulated configuration failure on line {line}"
            )));
        }
        state.modes.insert(line, PinMode::Input);
        state.events.push(PinEvent::ConfiguredInput(line));
        Ok(())
    }

    async fn configure_output(&mut self, line: u8) -> Result<()> {
        let mut state = self.state();
        if state.failing_configuration.contains(&line) {
            return Err(HardwareError::configuration(format!(
                "simulated configuration failure on line {line}"
            )));
        }
        state.modes.insert(line, PinMode::Output);
        state.events.push(PinEvent::ConfiguredOutput(line));
        Ok(())
    }

    async fn read(&mut self, line: u8) -> Result<bool> {
        let mut state = self.state();
        if state.failing_reads.contains(&line) {
            return Err(HardwareError::communication(format!(
                "simulated read failure on line {line}"
            )));
        }
        if state.modes.get(&line) != Some(&PinMode::Input) {
            return Err(HardwareError::configuration(format!(
                "line {line} is not configured as input"
            )));
        }
        if let Some(script) = state.scripts.get_mut(&line)
            && let Some(level) = script.pop_front()
        {
            return Ok(level);
        }
        Ok(state.levels.get(&line).copied().unwrap_or(false))
    }

    async fn write(&mut self, line: u8, level: bool) -> Result<()> {
        let mut state = self.state();
        if state.modes.get(&line) != Some(&PinMode::Output) {
            return Err(HardwareError::configuration(format!(
                "line {line} is not configured as output"
            )));
        }
        state.events.push(PinEvent::Wrote { line, level });
        Ok(())
    }

    async fn release(&mut self, line: u8) -> Result<()> {
        let mut state = self.state();
        state.modes.remove(&line);
        state.events.push(PinEvent::Released(line));
        Ok(())
    }

    async fn release_all(&mut self) -> Result<()> {
        let mut state = self.state();
        let mut lines: Vec<u8> = state.modes.keys().copied().collect();
        lines.sort_unstable();
        state.modes.clear();
        for line in lines {
            state.events.push(PinEvent::Released(line));
        }
        Ok(())
    }
}

/// Handle for controlling a mock pin controller.
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockPinHandle {
    state: Arc<Mutex<MockPinState>>,
}

impl MockPinHandle {
    fn state(&self) -> std::sync::MutexGuard<'_, MockPinState> {
        self.state.lock().expect("mock pin state poisoned")
    }

    /// Set the steady level an input line reads at.
    pub fn set_level(&self, line: u8, level: bool) {
        self.state().levels.insert(line, level);
    }

    /// Set steady levels for several lines at once.
    pub fn set_levels(&self, levels: &[(u8, bool)]) {
        let mut state = self.state();
        for &(line, level) in levels {
            state.levels.insert(line, level);
        }
    }

    /// Script the next polls of `line`; once the script is exhausted, reads
    /// fall back to the steady level.
    pub fn script_reads(&self, line: u8, reads: impl IntoIterator<Item = bool>) {
        self.state().scripts.insert(line, reads.into_iter().collect());
    }

    /// Make configuration of `line` fail.
    pub fn fail_configuration(&self, line: u8) {
        self.state().failing_configuration.insert(line);
    }

    /// Make reads of `line` fail with a communication error.
    pub fn fail_reads(&self, line: u8) {
        self.state().failing_reads.insert(line);
    }

    /// Stop failing reads of `line`.
    pub fn restore_reads(&self, line: u8) {
        self.state().failing_reads.remove(&line);
    }

    /// Current configured mode of `line`, if any.
    pub fn mode(&self, line: u8) -> Option<PinMode> {
        self.state().modes.get(&line).copied()
    }

    /// Everything done to the hardware so far, in order.
    pub fn events(&self) -> Vec<PinEvent> {
        self.state().events.clone()
    }

    /// Levels written to `line`, in order.
    pub fn writes(&self, line: u8) -> Vec<bool> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                PinEvent::Wrote { line: l, level } if *l == line => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Clear the journal (modes and levels are kept).
    pub fn clear_events(&self) {
        self.state().events.clear();
    }
}
