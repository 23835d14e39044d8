//! Static configuration of the appliance wiring and timing.
//!
//! The pin maps and channel table describe one hardware revision and are
//! immutable for the process lifetime; a new revision swaps the tables
//! without touching the algorithms. Timing values all have defaults from
//! [`mokka_core::constants`] and builder-style setters for tuning.

use mokka_core::constants::{
    DEFAULT_CHECK_CYCLES, DEFAULT_PRESS_DURATION, DEFAULT_RELEASE_POLL_INTERVAL,
    DEFAULT_RELEASE_TIMEOUT, DEFAULT_SAMPLES_PER_LINE, DEFAULT_SETTLE_DELAY,
};
use std::fmt;
use std::time::Duration;

use crate::status::StatusFallbacks;

/// Logical names of the input (signal LED) lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputLine {
    Water,
    CoffeeGroundsContainer,
    OneDose,
    TwoDoses,
    Warning,
    Steam,
    Maintenance,
    Eco,
}

impl fmt::Display for InputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Water => write!(f, "WATER"),
            Self::CoffeeGroundsContainer => write!(f, "COFFEE_GROUNDS_CONTAINER"),
            Self::OneDose => write!(f, "ONE_DOSE"),
            Self::TwoDoses => write!(f, "TWO_DOSES"),
            Self::Warning => write!(f, "WARNING"),
            Self::Steam => write!(f, "STEAM"),
            Self::Maintenance => write!(f, "MAINTENANCE"),
            Self::Eco => write!(f, "ECO"),
        }
    }
}

/// Logical names of the output (button contact) lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputLine {
    OneDose,
    TwoDoses,
    Power,
    Steam,
    Maintenance,
    Eco,
    Relais,
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneDose => write!(f, "ONE_DOSE"),
            Self::TwoDoses => write!(f, "TWO_DOSES"),
            Self::Power => write!(f, "POWER"),
            Self::Steam => write!(f, "STEAM"),
            Self::Maintenance => write!(f, "MAINTENANCE"),
            Self::Eco => write!(f, "ECO"),
            Self::Relais => write!(f, "RELAIS"),
        }
    }
}

/// Physical line numbers of the input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPins {
    pub water: u8,
    pub coffee_grounds_container: u8,
    pub one_dose: u8,
    pub two_doses: u8,
    pub warning: u8,
    pub steam: u8,
    pub maintenance: u8,
    pub eco: u8,
}

/// Physical line numbers of the output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPins {
    pub one_dose: u8,
    pub two_doses: u8,
    pub power: u8,
    pub steam: u8,
    pub maintenance: u8,
    pub eco: u8,
    pub relais: u8,
}

/// Mapping from logical line names to physical line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinLayout {
    pub inputs: InputPins,
    pub outputs: OutputPins,
}

impl Default for PinLayout {
    /// Revision-A wiring (BCM numbering).
    fn default() -> Self {
        Self {
            inputs: InputPins {
                water: 4,
                coffee_grounds_container: 17,
                one_dose: 27,
                two_doses: 22,
                warning: 5,
                steam: 6,
                maintenance: 13,
                eco: 19,
            },
            outputs: OutputPins {
                one_dose: 23,
                two_doses: 24,
                power: 25,
                steam: 12,
                maintenance: 16,
                eco: 26,
                relais: 18,
            },
        }
    }
}

impl PinLayout {
    /// Physical number of an input line.
    #[must_use]
    pub fn input_line(&self, line: InputLine) -> u8 {
        match line {
            InputLine::Water => self.inputs.water,
            InputLine::CoffeeGroundsContainer => self.inputs.coffee_grounds_container,
            InputLine::OneDose => self.inputs.one_dose,
            InputLine::TwoDoses => self.inputs.two_doses,
            InputLine::Warning => self.inputs.warning,
            InputLine::Steam => self.inputs.steam,
            InputLine::Maintenance => self.inputs.maintenance,
            InputLine::Eco => self.inputs.eco,
        }
    }

    /// Physical number of an output line.
    #[must_use]
    pub fn output_line(&self, line: OutputLine) -> u8 {
        match line {
            OutputLine::OneDose => self.outputs.one_dose,
            OutputLine::TwoDoses => self.outputs.two_doses,
            OutputLine::Power => self.outputs.power,
            OutputLine::Steam => self.outputs.steam,
            OutputLine::Maintenance => self.outputs.maintenance,
            OutputLine::Eco => self.outputs.eco,
            OutputLine::Relais => self.outputs.relais,
        }
    }

    /// All input lines, in the fixed sampling order.
    #[must_use]
    pub fn input_lines(&self) -> [u8; 8] {
        [
            self.inputs.water,
            self.inputs.coffee_grounds_container,
            self.inputs.one_dose,
            self.inputs.two_doses,
            self.inputs.warning,
            self.inputs.steam,
            self.inputs.maintenance,
            self.inputs.eco,
        ]
    }

    /// All output lines.
    #[must_use]
    pub fn output_lines(&self) -> [u8; 7] {
        [
            self.outputs.one_dose,
            self.outputs.two_doses,
            self.outputs.power,
            self.outputs.steam,
            self.outputs.maintenance,
            self.outputs.eco,
            self.outputs.relais,
        ]
    }
}

/// Tuning of one consensus read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Polls per line within one cycle.
    pub samples_per_line: u32,

    /// Independent cycles per consensus read. Must be at least 1; higher
    /// values increase confidence monotonically at linear cost.
    pub check_cycles: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples_per_line: DEFAULT_SAMPLES_PER_LINE,
            check_cycles: DEFAULT_CHECK_CYCLES,
        }
    }
}

impl SamplingConfig {
    /// Set the per-line sample budget.
    #[must_use]
    pub fn samples_per_line(mut self, samples: u32) -> Self {
        self.samples_per_line = samples;
        self
    }

    /// Set the number of cycles per consensus read.
    #[must_use]
    pub fn check_cycles(mut self, cycles: u32) -> Self {
        self.check_cycles = cycles;
        self
    }
}

/// Tuning of button presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorConfig {
    /// How long an output line is held at its active value.
    pub press_duration: Duration,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            press_duration: DEFAULT_PRESS_DURATION,
        }
    }
}

impl ActuatorConfig {
    /// Set the press duration.
    #[must_use]
    pub fn press_duration(mut self, duration: Duration) -> Self {
        self.press_duration = duration;
        self
    }
}

/// Tuning of the deferred session release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseConfig {
    /// Period between readiness polls.
    pub poll_interval: Duration,

    /// Hard bound on the total wait.
    pub timeout: Duration,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_RELEASE_POLL_INTERVAL,
            timeout: DEFAULT_RELEASE_TIMEOUT,
        }
    }
}

impl ReleaseConfig {
    /// Set the readiness poll interval.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the hard timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One addressed analog output channel.
///
/// A channel without an address is disabled: some physical variants of the
/// appliance simply do not expose that analog line, and level writes to it
/// are a documented no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogChannel {
    /// Logical channel name, used in logs.
    pub name: String,

    /// I2C bus id.
    pub bus: u8,

    /// Device address on the bus; `None` disables the channel.
    pub address: Option<u8>,

    /// Pause after each level write.
    pub settle_delay: Duration,
}

impl AnalogChannel {
    /// Create an enabled channel.
    pub fn new(name: impl Into<String>, bus: u8, address: u8) -> Self {
        Self {
            name: name.into(),
            bus,
            address: Some(address),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Create a disabled channel (no address on this hardware variant).
    pub fn disabled(name: impl Into<String>, bus: u8) -> Self {
        Self {
            name: name.into(),
            bus,
            address: None,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Set the settle delay.
    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// True if the channel has an address and can be written.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.address.is_some()
    }
}

/// The analog channel table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogChannels {
    /// Water amount channel.
    pub water: AnalogChannel,

    /// Coffee strength channel.
    pub coffee_strength: AnalogChannel,
}

impl Default for AnalogChannels {
    fn default() -> Self {
        Self {
            water: AnalogChannel::new("WATER", 1, 0x60),
            coffee_strength: AnalogChannel::new("COFFEE_STRENGTH", 1, 0x61),
        }
    }
}

/// Complete configuration of one appliance.
#[derive(Debug, Clone, Default)]
pub struct MachineConfig {
    pub layout: PinLayout,
    pub channels: AnalogChannels,
    pub sampling: SamplingConfig,
    pub actuator: ActuatorConfig,
    pub release: ReleaseConfig,
    pub fallbacks: StatusFallbacks,
}
