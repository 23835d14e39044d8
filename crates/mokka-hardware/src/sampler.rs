//! Digital input sampling and consensus voting.
//!
//! The appliance reports its state through signal LEDs that blink rather
//! than stay lit, so a single momentary poll of a line would miss most
//! signals. One *read cycle* therefore busy-polls each line up to a sample
//! budget and latches the first high observation; a *consensus read* runs
//! several independent cycles and keeps only the `(line, value)` pairs every
//! cycle agreed on. Requiring unanimous agreement is a cheap debounce: it
//! trades latency (cycles × budget polls) for immunity against flickers and
//! timing-edge reads.

use crate::config::SamplingConfig;
use crate::error::{HardwareError, Result};
use crate::traits::PinController;
use crate::types::{AggregatedReadings, LineReading, PinAccess};
use tracing::{debug, warn};

/// Perform one read cycle over `lines`.
///
/// Each line is polled up to `samples_per_line` times; it is recorded `true`
/// with the timestamp of the first high observation (polling for that line
/// stops immediately), or `false` with the timestamp of the last poll once
/// the budget is exhausted. All-false is a normal outcome, not an error.
///
/// With [`PinAccess::Transient`] the lines are configured as inputs before
/// the cycle and released afterwards; with [`PinAccess::SessionHeld`] the
/// open session already owns the configuration and both steps are skipped.
///
/// # Errors
///
/// Fails fast on configuration errors and on a failing read; a release
/// failure during cleanup is logged and ignored.
pub async fn read_cycle<C: PinController>(
    controller: &mut C,
    lines: &[u8],
    samples_per_line: u32,
    access: PinAccess,
) -> Result<Vec<LineReading>> {
    if access == PinAccess::Transient {
        for &line in lines {
            controller.configure_input(line).await?;
        }
    }

    let outcome = sample_lines(controller, lines, samples_per_line).await;

    if access == PinAccess::Transient {
        for &line in lines {
            if let Err(err) = controller.release(line).await {
                warn!(line, error = %err, "failed to release line after sampling");
            }
        }
    }

    outcome
}

async fn sample_lines<C: PinController>(
    controller: &mut C,
    lines: &[u8],
    samples_per_line: u32,
) -> Result<Vec<LineReading>> {
    let mut readings = Vec::with_capacity(lines.len());
    for &line in lines {
        let mut reading = None;
        for _ in 0..samples_per_line {
            if controller.read(line).await? {
                reading = Some(LineReading::high(line));
                break;
            }
        }
        readings.push(reading.unwrap_or_else(|| LineReading::low(line)));
    }
    Ok(readings)
}

/// Read `lines` with consensus voting across `check_cycles` cycles.
///
/// A reading survives only if every cycle produced an identical
/// `(line, value)` pair; the surviving readings keep the first cycle's
/// timestamps. A line whose cycles disagreed is absent from the result;
/// the caller resolves it through its fallback policy.
///
/// Higher `check_cycles` increases confidence monotonically at linear cost.
///
/// # Errors
///
/// `check_cycles` must be at least 1; violating this is reported as a
/// validation error before any cycle runs. Cycle failures propagate as-is.
pub async fn read_with_consensus<C: PinController>(
    controller: &mut C,
    lines: &[u8],
    config: &SamplingConfig,
    access: PinAccess,
) -> Result<AggregatedReadings> {
    if config.check_cycles < 1 {
        return Err(HardwareError::invalid_value(format!(
            "check cycles must be at least 1, got {}",
            config.check_cycles
        )));
    }

    let mut cycles = Vec::with_capacity(config.check_cycles as usize);
    for _ in 0..config.check_cycles {
        cycles.push(read_cycle(controller, lines, config.samples_per_line, access).await?);
    }

    let mut agreed = cycles.remove(0);
    agreed.retain(|reading| cycles.iter().all(|cycle| cycle.contains(reading)));

    if agreed.len() < lines.len() {
        debug!(
            agreed = agreed.len(),
            polled = lines.len(),
            "consensus read dropped disagreeing lines"
        );
    }

    Ok(AggregatedReadings::from_readings(agreed))
}
