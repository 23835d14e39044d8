//! Domain types shared by the hardware layer, the settings store and the
//! HTTP surface.
//!
//! The wire format is inherited from the appliance's existing remote API:
//! snake_case JSON fields, integer runtime-state ids and `-1` as the
//! "not configured" marker in the settings record. Types here only carry data
//! and validation; everything that touches pins lives in `mokka-hardware`.

use crate::constants::UNCONFIGURED;
use crate::error::{Error, Result};
use crate::validate::validate_percent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistent device settings.
///
/// Read before every job and written whole-record on edit. All fields default
/// to `-1` until the operator configures them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Machine id in the backing web service.
    pub coffee_machine_id: i64,

    /// Product sold by this machine.
    pub coffee_product_id: i64,

    /// Price per job, in the smallest currency unit.
    pub price: i64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            coffee_machine_id: UNCONFIGURED,
            coffee_product_id: UNCONFIGURED,
            price: UNCONFIGURED,
        }
    }
}

impl DeviceSettings {
    /// True once every field has been configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.coffee_machine_id != UNCONFIGURED
            && self.coffee_product_id != UNCONFIGURED
            && self.price != UNCONFIGURED
    }
}

/// Runtime state of the appliance.
///
/// `Startup` and `Shutdown` exist in the domain model but are never derived
/// from hardware signals; status translation only ever reports `On` or `Off`.
/// On the wire the state travels as its integer id (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeState {
    On,
    Off,
    Startup,
    Shutdown,
}

impl RuntimeState {
    /// Wire id of this state.
    #[must_use]
    pub fn state_id(&self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 2,
            Self::Startup => 3,
            Self::Shutdown => 4,
        }
    }

    /// Look up a state by its wire id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRuntimeState`] for ids outside 1-4.
    pub fn from_state_id(state_id: u8) -> Result<Self> {
        match state_id {
            1 => Ok(Self::On),
            2 => Ok(Self::Off),
            3 => Ok(Self::Startup),
            4 => Ok(Self::Shutdown),
            _ => Err(Error::UnknownRuntimeState { state_id }),
        }
    }

    /// True if the state is [`RuntimeState::On`].
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// True if the state is [`RuntimeState::Off`].
    #[must_use]
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

impl fmt::Display for RuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
            Self::Startup => write!(f, "STARTUP"),
            Self::Shutdown => write!(f, "SHUTDOWN"),
        }
    }
}

impl Serialize for RuntimeState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.state_id())
    }
}

impl<'de> Deserialize<'de> for RuntimeState {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let state_id = u8::deserialize(deserializer)?;
        Self::from_state_id(state_id).map_err(serde::de::Error::custom)
    }
}

/// Snapshot of the appliance status.
///
/// Derived entirely from one consensus read plus the fallback policy;
/// recomputed on every request and never cached. The wire form is always
/// fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// The machine can accept a job right now.
    pub device_ready: bool,

    /// Water tank is filled and seated.
    pub water_tank_ready: bool,

    /// Grounds container is emptied and seated.
    pub coffee_grounds_container_ready: bool,

    /// Current runtime state (only `On`/`Off` are ever derived).
    #[serde(rename = "coffee_machine_runtime_state")]
    pub runtime_state: RuntimeState,

    /// Eco mode toggle.
    pub eco_mode: bool,

    /// Maintenance mode toggle.
    pub maintenance: bool,

    /// Steam mode toggle.
    pub steam: bool,
}

impl DeviceStatus {
    /// Assemble a status from its component flags.
    ///
    /// `device_ready` is not a free field: it holds exactly when the tank and
    /// the grounds container are ready and the machine is on.
    #[must_use]
    pub fn derive(
        water_tank_ready: bool,
        coffee_grounds_container_ready: bool,
        runtime_state: RuntimeState,
        eco_mode: bool,
        maintenance: bool,
        steam: bool,
    ) -> Self {
        Self {
            device_ready: water_tank_ready && coffee_grounds_container_ready && runtime_state.is_on(),
            water_tank_ready,
            coffee_grounds_container_ready,
            runtime_state,
            eco_mode,
            maintenance,
            steam,
        }
    }
}

/// Requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDeviceStatus {
    /// Target runtime state, as a wire id.
    pub coffee_machine_runtime_state: RuntimeState,
}

/// Parameters of a new brew job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeviceJob {
    /// Coffee strength, 0-100.
    pub coffee_strength_in_percent: i64,

    /// Water amount, 0-100.
    pub water_in_percent: i64,

    /// Number of doses to brew (1 or 2).
    pub doses: i64,
}

impl CreateDeviceJob {
    /// Validate the job parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPercent`] for an out-of-range strength or
    /// water value and [`Error::InvalidDoses`] for a dose count other than
    /// 1 or 2. Validation runs before any hardware is touched.
    pub fn validate(&self) -> Result<()> {
        validate_percent(self.coffee_strength_in_percent, 0)?;
        validate_percent(self.water_in_percent, 0)?;
        if !(1..=2).contains(&self.doses) {
            return Err(Error::InvalidDoses { doses: self.doses });
        }
        Ok(())
    }
}

/// A brew job as reported back to the caller.
///
/// Merges the job request with the settings snapshot taken when the job was
/// accepted, so the record is self-contained for billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceJob {
    /// Process-local job id.
    pub id: i64,

    /// Acceptance timestamp, unix milliseconds.
    pub create_date: i64,

    /// Settlement timestamp, unix milliseconds; absent until settled.
    pub square_date: Option<i64>,

    /// Machine id from the settings snapshot.
    pub coffee_machine_id: i64,

    /// Product id from the settings snapshot.
    pub coffee_product_id: i64,

    /// Price from the settings snapshot.
    pub price: i64,

    /// Requested coffee strength.
    pub coffee_strength_in_percent: i64,

    /// Requested water amount.
    pub water_in_percent: i64,

    /// Requested dose count.
    pub doses: i64,
}

impl DeviceJob {
    /// Build the job record from the accepted request and the settings
    /// snapshot.
    #[must_use]
    pub fn assemble(
        id: i64,
        create_date: i64,
        request: &CreateDeviceJob,
        settings: &DeviceSettings,
    ) -> Self {
        Self {
            id,
            create_date,
            square_date: None,
            coffee_machine_id: settings.coffee_machine_id,
            coffee_product_id: settings.coffee_product_id,
            price: settings.price,
            coffee_strength_in_percent: request.coffee_strength_in_percent,
            water_in_percent: request.water_in_percent,
            doses: request.doses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_settings_default_to_unconfigured() {
        let settings = DeviceSettings::default();
        assert_eq!(settings.coffee_machine_id, -1);
        assert_eq!(settings.coffee_product_id, -1);
        assert_eq!(settings.price, -1);
        assert!(!settings.is_configured());
    }

    #[rstest]
    #[case(RuntimeState::On, 1)]
    #[case(RuntimeState::Off, 2)]
    #[case(RuntimeState::Startup, 3)]
    #[case(RuntimeState::Shutdown, 4)]
    fn test_runtime_state_ids_round_trip(#[case] state: RuntimeState, #[case] id: u8) {
        assert_eq!(state.state_id(), id);
        assert_eq!(RuntimeState::from_state_id(id).unwrap(), state);
    }

    #[test]
    fn test_unknown_runtime_state_id() {
        let err = RuntimeState::from_state_id(5).unwrap_err();
        assert!(matches!(err, Error::UnknownRuntimeState { state_id: 5 }));
    }

    #[test]
    fn test_runtime_state_serializes_as_wire_id() {
        let json = serde_json::to_string(&RuntimeState::Off).unwrap();
        assert_eq!(json, "2");

        let state: RuntimeState = serde_json::from_str("1").unwrap();
        assert_eq!(state, RuntimeState::On);

        assert!(serde_json::from_str::<RuntimeState>("9").is_err());
    }

    #[test]
    fn test_device_ready_requires_tank_grounds_and_on() {
        let ready = DeviceStatus::derive(true, true, RuntimeState::On, false, false, false);
        assert!(ready.device_ready);

        let tank_missing = DeviceStatus::derive(false, true, RuntimeState::On, false, false, false);
        assert!(!tank_missing.device_ready);

        let off = DeviceStatus::derive(true, true, RuntimeState::Off, false, false, false);
        assert!(!off.device_ready);
    }

    #[test]
    fn test_device_ready_ignores_mode_toggles() {
        let status = DeviceStatus::derive(true, true, RuntimeState::On, true, true, true);
        assert!(status.device_ready);
    }

    #[test]
    fn test_status_wire_field_names() {
        let status = DeviceStatus::derive(true, false, RuntimeState::On, false, true, false);
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["coffee_machine_runtime_state"], 1);
        assert_eq!(json["water_tank_ready"], true);
        assert_eq!(json["coffee_grounds_container_ready"], false);
        assert_eq!(json["device_ready"], false);
    }

    #[rstest]
    #[case(50, 80, 1)]
    #[case(0, 0, 2)]
    #[case(100, 100, 2)]
    fn test_valid_job_requests(#[case] strength: i64, #[case] water: i64, #[case] doses: i64) {
        let request = CreateDeviceJob {
            coffee_strength_in_percent: strength,
            water_in_percent: water,
            doses,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_job_request_rejects_bad_percent() {
        let request = CreateDeviceJob {
            coffee_strength_in_percent: 150,
            water_in_percent: 50,
            doses: 1,
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidPercent { value: 150, .. }));
    }

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(-1)]
    fn test_job_request_rejects_bad_doses(#[case] doses: i64) {
        let request = CreateDeviceJob {
            coffee_strength_in_percent: 50,
            water_in_percent: 50,
            doses,
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidDoses { .. }));
    }

    #[test]
    fn test_job_assembles_request_and_settings() {
        let request = CreateDeviceJob {
            coffee_strength_in_percent: 60,
            water_in_percent: 40,
            doses: 2,
        };
        let settings = DeviceSettings {
            coffee_machine_id: 7,
            coffee_product_id: 3,
            price: 250,
        };

        let job = DeviceJob::assemble(1, 1_700_000_000_000, &request, &settings);

        assert_eq!(job.id, 1);
        assert_eq!(job.square_date, None);
        assert_eq!(job.coffee_machine_id, 7);
        assert_eq!(job.price, 250);
        assert_eq!(job.doses, 2);
        assert_eq!(job.coffee_strength_in_percent, 60);
    }
}
