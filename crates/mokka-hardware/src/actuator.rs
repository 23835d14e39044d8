//! Momentary actuation of output lines.
//!
//! Every control of the appliance (power, the mode toggles, the dose
//! triggers) is a button behind one output line, so a single primitive
//! covers them all: drive the line to its active value, hold it for the
//! press duration, drive it back.

use crate::config::{OutputLine, PinLayout};
use crate::error::{HardwareError, Result};
use crate::traits::PinController;
use crate::types::PinAccess;
use std::time::Duration;
use tracing::debug;

/// Press the button behind `line`.
///
/// Asserts `active_value`, waits `duration`, de-asserts. With
/// [`PinAccess::Transient`] the line is configured as output first and
/// restored to the unconfigured state afterwards; with
/// [`PinAccess::SessionHeld`] the open session owns the configuration and
/// both steps are skipped.
///
/// Once started, a press runs to completion; there is no cancellation.
///
/// # Errors
///
/// Returns an error if configuration or a level write fails.
pub async fn press<C: PinController>(
    controller: &mut C,
    line: u8,
    duration: Duration,
    active_value: bool,
    access: PinAccess,
) -> Result<()> {
    if access == PinAccess::Transient {
        controller.configure_output(line).await?;
    }

    debug!(line, active_value, ?duration, "pressing output line");
    controller.write(line, active_value).await?;
    tokio::time::sleep(duration).await;
    controller.write(line, !active_value).await?;

    if access == PinAccess::Transient {
        controller.release(line).await?;
    }

    Ok(())
}

/// Output line for a dose count.
///
/// # Errors
///
/// Any value other than 1 or 2 is a caller error, reported before any
/// hardware is touched.
pub fn dose_line(layout: &PinLayout, doses: i64) -> Result<u8> {
    match doses {
        1 => Ok(layout.output_line(OutputLine::OneDose)),
        2 => Ok(layout.output_line(OutputLine::TwoDoses)),
        _ => Err(HardwareError::invalid_value(format!(
            "doses must be 1 or 2, got {doses}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPinController, PinEvent};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_press_asserts_holds_and_restores() {
        let (mut pins, handle) = MockPinController::new();
        let started = Instant::now();

        press(&mut pins, 23, Duration::from_secs(2), true, PinAccess::Transient)
            .await
            .unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(
            handle.events(),
            vec![
                PinEvent::ConfiguredOutput(23),
                PinEvent::Wrote { line: 23, level: true },
                PinEvent::Wrote { line: 23, level: false },
                PinEvent::Released(23),
            ]
        );
        assert_eq!(handle.mode(23), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_press_with_session_keeps_configuration() {
        let (mut pins, handle) = MockPinController::new();
        pins.configure_output(23).await.unwrap();
        handle.clear_events();

        press(
            &mut pins,
            23,
            Duration::from_millis(100),
            true,
            PinAccess::SessionHeld,
        )
        .await
        .unwrap();

        assert_eq!(
            handle.events(),
            vec![
                PinEvent::Wrote { line: 23, level: true },
                PinEvent::Wrote { line: 23, level: false },
            ]
        );
        assert!(handle.mode(23).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_press_active_low() {
        let (mut pins, handle) = MockPinController::new();
        press(&mut pins, 18, Duration::from_millis(50), false, PinAccess::Transient)
            .await
            .unwrap();

        assert_eq!(handle.writes(18), vec![false, true]);
    }

    #[test]
    fn test_dose_line_selection() {
        let layout = PinLayout::default();
        assert_eq!(dose_line(&layout, 1).unwrap(), layout.outputs.one_dose);
        assert_eq!(dose_line(&layout, 2).unwrap(), layout.outputs.two_doses);
    }

    #[test]
    fn test_invalid_dose_counts() {
        let layout = PinLayout::default();
        for doses in [0, 3, -1] {
            let err = dose_line(&layout, doses).unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains(&doses.to_string()));
        }
    }
}
