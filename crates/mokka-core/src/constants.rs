//! Shared constants for the mokka remote control service.
//!
//! This module centralizes the tunable timing values used by the hardware
//! coordination layer. All of them can be overridden through the
//! corresponding config structs in `mokka-hardware`; the values here are the
//! defaults that match the reference wiring of the appliance.
//!
//! # Timing model
//!
//! | Constant | Governs | Default |
//! |----------|---------|---------|
//! | `DEFAULT_SAMPLES_PER_LINE` | polls per line within one read cycle | 100 |
//! | `DEFAULT_CHECK_CYCLES` | independent cycles per consensus read | 2 |
//! | `DEFAULT_PRESS_DURATION` | how long a button line is held active | 2 s |
//! | `DEFAULT_SETTLE_DELAY` | pause after a DAC register write | 100 ms |
//! | `DEFAULT_RELEASE_POLL_INTERVAL` | deferred-close readiness poll period | 2 s |
//! | `DEFAULT_RELEASE_TIMEOUT` | hard bound on a deferred close | 45 s |
//!
//! The signal LEDs of the appliance blink rather than stay lit, so a single
//! momentary poll would miss most of them. `DEFAULT_SAMPLES_PER_LINE` bounds
//! the busy-poll window per line and `DEFAULT_CHECK_CYCLES` trades latency for
//! glitch rejection (see `mokka-hardware::sampler`).

use std::time::Duration;

/// Polls per input line within a single read cycle.
pub const DEFAULT_SAMPLES_PER_LINE: u32 = 100;

/// Independent read cycles per consensus read.
pub const DEFAULT_CHECK_CYCLES: u32 = 2;

/// How long an output line is held at its active value for a button press.
pub const DEFAULT_PRESS_DURATION: Duration = Duration::from_secs(2);

/// Pause after writing a new level code to an analog output channel.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Period between readiness polls of a deferred session close.
pub const DEFAULT_RELEASE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Upper bound on the total wait of a deferred session close.
pub const DEFAULT_RELEASE_TIMEOUT: Duration = Duration::from_secs(45);

/// Largest supported percent accuracy exponent.
///
/// An accuracy of `n` means values are expressed in `10^-n` percent units;
/// anything beyond micro-percent precision is a caller bug.
pub const MAX_PERCENT_ACCURACY: u32 = 6;

/// Unconfigured marker for settings fields.
///
/// The settings record is created before the operator has assigned machine
/// and product ids; `-1` marks a field that has not been configured yet.
pub const UNCONFIGURED: i64 = -1;
