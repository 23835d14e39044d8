//! Translation of agreed line readings into a device status.
//!
//! The WATER and COFFEE_GROUNDS_CONTAINER LEDs light when attention is
//! needed (tank empty, container full), so their "ready" flags are the
//! inverted line values. The machine is considered ON exactly when both dose
//! LEDs read high at the same time; STARTUP and SHUTDOWN are never derived
//! from hardware signals and can only be set through the actuation path.

use crate::config::{InputLine, PinLayout};
use crate::types::AggregatedReadings;
use mokka_core::{DeviceStatus, RuntimeState};
use tracing::debug;

/// Per-line fallback values used when a line never reached consensus.
///
/// The bias is fail-safe: the attention LEDs fall back to their lit
/// (not-ready) polarity, the momentary state LEDs to off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFallbacks {
    pub water: bool,
    pub coffee_grounds_container: bool,
    pub one_dose: bool,
    pub two_doses: bool,
    pub eco: bool,
    pub steam: bool,
    pub maintenance: bool,
}

impl Default for StatusFallbacks {
    fn default() -> Self {
        Self {
            water: true,
            coffee_grounds_container: true,
            one_dose: false,
            two_doses: false,
            eco: false,
            steam: false,
            maintenance: false,
        }
    }
}

/// Translate agreed readings into a [`DeviceStatus`].
///
/// Pure with respect to hardware: no pin is touched and nothing is cached;
/// every status request recomputes from a fresh consensus read. Lines absent
/// from `readings` resolve through `fallbacks`, logged at low severity.
#[must_use]
pub fn translate(
    readings: &AggregatedReadings,
    layout: &PinLayout,
    fallbacks: &StatusFallbacks,
) -> DeviceStatus {
    let water_warning = line_value(readings, layout, InputLine::Water, fallbacks.water);
    let grounds_warning = line_value(
        readings,
        layout,
        InputLine::CoffeeGroundsContainer,
        fallbacks.coffee_grounds_container,
    );
    let one_dose = line_value(readings, layout, InputLine::OneDose, fallbacks.one_dose);
    let two_doses = line_value(readings, layout, InputLine::TwoDoses, fallbacks.two_doses);
    let eco = line_value(readings, layout, InputLine::Eco, fallbacks.eco);
    let steam = line_value(readings, layout, InputLine::Steam, fallbacks.steam);
    let maintenance = line_value(readings, layout, InputLine::Maintenance, fallbacks.maintenance);

    let runtime_state = if one_dose && two_doses {
        RuntimeState::On
    } else {
        RuntimeState::Off
    };

    DeviceStatus::derive(
        !water_warning,
        !grounds_warning,
        runtime_state,
        eco,
        maintenance,
        steam,
    )
}

fn line_value(
    readings: &AggregatedReadings,
    layout: &PinLayout,
    line: InputLine,
    fallback: bool,
) -> bool {
    match readings.value(layout.input_line(line)) {
        Some(value) => value,
        None => {
            debug!(%line, fallback, "no consensus for line, using fallback");
            fallback
        }
    }
}
