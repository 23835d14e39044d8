//! Analog level setting through the DAC channels.
//!
//! A percent value becomes a 12-bit code written to the channel's DAC with
//! one two-byte fast write, followed by the channel's settle delay. Channels
//! without a configured address are a documented no-op: some physical
//! variants of the appliance simply omit that analog line.

use crate::config::AnalogChannel;
use crate::error::Result;
use crate::traits::DacBus;
use mokka_core::validate_percent;
use tracing::{debug, warn};

/// DAC register selecting a fast level write (normal power mode).
pub const REG_WRITE_DAC: u8 = 0x40;

/// Largest representable level code.
pub const DAC_MAX_CODE: u16 = 0xFFF;

/// Convert a percent value into a 12-bit level code.
///
/// `accuracy` scales the input: an accuracy of 2 means `value` is given in
/// hundredths of a percent. The value is range-checked against
/// `0..=100 × 10^accuracy` before conversion.
///
/// # Errors
///
/// Returns a validation error naming the offending value when it is out of
/// range.
///
/// # Examples
///
/// ```
/// use mokka_hardware::analog::level_code;
///
/// assert_eq!(level_code(0, 0).unwrap(), 0x000);
/// assert_eq!(level_code(100, 0).unwrap(), 0xFFF);
/// assert_eq!(level_code(5_000, 2).unwrap(), 0x800);
/// assert!(level_code(150, 0).is_err());
/// ```
pub fn level_code(value: i64, accuracy: u32) -> Result<u16> {
    validate_percent(value, accuracy)?;
    let scale = 100.0 * 10f64.powi(accuracy as i32);
    let code = ((value as f64 / scale) * f64::from(DAC_MAX_CODE)).round() as u16;
    Ok(code & DAC_MAX_CODE)
}

/// Set an analog channel to `percent` (whole percent units).
///
/// # Errors
///
/// Returns a validation error for an out-of-range percent (no register is
/// written) and a communication error if the bus write fails. A disabled
/// channel logs a warning and succeeds without writing.
pub async fn set_level<B: DacBus>(bus: &mut B, channel: &AnalogChannel, percent: i64) -> Result<()> {
    set_level_scaled(bus, channel, percent, 0).await
}

/// Set an analog channel to a value in `10^-accuracy` percent units.
///
/// See [`set_level`]; this variant accepts finer-grained inputs.
pub async fn set_level_scaled<B: DacBus>(
    bus: &mut B,
    channel: &AnalogChannel,
    value: i64,
    accuracy: u32,
) -> Result<()> {
    let Some(address) = channel.address else {
        warn!(channel = %channel.name, "analog channel has no bus address configured, skipping");
        return Ok(());
    };

    let code = level_code(value, accuracy)?;

    // MCP4725 fast write: upper 8 bits, then the low nibble shifted high.
    let data = [(code >> 4) as u8, ((code & 0x0F) << 4) as u8];

    debug!(
        channel = %channel.name,
        address,
        code,
        "writing level code ({value} at accuracy {accuracy})"
    );
    bus.write_block(address, REG_WRITE_DAC, &data).await?;
    tokio::time::sleep(channel.settle_delay).await;

    Ok(())
}
