//! High-level operations on one coffee machine.
//!
//! [`CoffeeMachine`] is the single entry point used by the transport layer:
//! it owns the hardware backends, the wiring tables and the exclusion gate,
//! and runs each operation inside its own [`Session`].
//!
//! # Concurrency
//!
//! The facade is cheap to clone and safe to share across request handlers.
//! Every operation acquires the session gate with a checked, non-blocking
//! acquire; concurrent callers get [`HardwareError::DeviceBusy`] instead of
//! queueing. Operations performed by the gate holder are strictly ordered
//! relative to each other; a deferred close keeps the gate held until its
//! watcher releases it.

use crate::actuator;
use crate::analog;
use crate::config::{AnalogChannel, MachineConfig, OutputLine};
use crate::devices::{AnyDacBus, AnyPinController};
use crate::error::{HardwareError, Result};
use crate::session::{Session, SessionGate, SharedController};
use crate::types::PinAccess;
use mokka_core::{CreateDeviceJob, DeviceStatus, RuntimeState};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Coordinated access to one physical coffee machine.
///
/// # Examples
///
/// ```no_run
/// use mokka_hardware::config::MachineConfig;
/// use mokka_hardware::devices::{AnyDacBus, AnyPinController};
/// use mokka_hardware::mock::{MockDacBus, MockPinController};
/// use mokka_hardware::CoffeeMachine;
/// use mokka_core::CreateDeviceJob;
///
/// # async fn example() -> mokka_hardware::Result<()> {
/// let (pins, _pin_handle) = MockPinController::new();
/// let (dac, _dac_handle) = MockDacBus::new();
/// let machine = CoffeeMachine::new(
///     AnyPinController::Mock(pins),
///     AnyDacBus::Mock(dac),
///     MachineConfig::default(),
/// );
///
/// let status = machine.status().await?;
/// if status.device_ready {
///     machine
///         .start_job(&CreateDeviceJob {
///             coffee_strength_in_percent: 60,
///             water_in_percent: 80,
///             doses: 1,
///         })
///         .await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CoffeeMachine {
    controller: SharedController,
    dac: Arc<Mutex<AnyDacBus>>,
    config: MachineConfig,
    gate: Arc<SessionGate>,
    shutdown: CancellationToken,
}

impl CoffeeMachine {
    /// Create a machine over the given hardware backends.
    #[must_use]
    pub fn new(controller: AnyPinController, dac: AnyDacBus, config: MachineConfig) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            dac: Arc::new(Mutex::new(dac)),
            config,
            gate: Arc::new(SessionGate::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Attach the process lifecycle token; deferred-close watchers release
    /// immediately when it is cancelled.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Open the exclusive session.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::DeviceBusy`] while any other session is
    /// open.
    pub async fn open_session(&self) -> Result<Session> {
        Session::open(
            Arc::clone(&self.controller),
            Arc::clone(&self.gate),
            self.config.layout,
            self.config.sampling,
            self.config.fallbacks,
        )
        .await
    }

    /// Read the current device status.
    ///
    /// Opens a session, performs one consensus read, translates it and
    /// closes synchronously. Nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::DeviceBusy`] while another operation holds
    /// the lines, or the underlying sampling failure.
    pub async fn status(&self) -> Result<DeviceStatus> {
        let session = self.open_session().await?;
        let outcome = session.read_status().await;
        session.close().await;
        outcome
    }

    /// Start a brew job.
    ///
    /// Validates the request, then sets the strength and water levels,
    /// presses the dose trigger and defers the session release until the
    /// machine has finished (or the release timeout elapses). A failed
    /// level write is logged and skipped rather than aborting the job:
    /// brewing with the previous level is preferable to no coffee at all.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad percents or dose counts (before
    /// any hardware is touched), [`HardwareError::DeviceBusy`] while another
    /// operation holds the lines, or the press failure.
    pub async fn start_job(&self, request: &CreateDeviceJob) -> Result<()> {
        request.validate()?;
        let dose_line = actuator::dose_line(&self.config.layout, request.doses)?;

        let session = self.open_session().await?;
        info!(
            doses = request.doses,
            strength = request.coffee_strength_in_percent,
            water = request.water_in_percent,
            "starting brew job"
        );

        self.apply_level(
            &self.config.channels.coffee_strength,
            request.coffee_strength_in_percent,
        )
        .await;
        self.apply_level(&self.config.channels.water, request.water_in_percent)
            .await;

        if let Err(err) = self.press_line(dose_line).await {
            session.close().await;
            return Err(err);
        }

        session.close_deferred(self.config.release, self.shutdown.clone());
        Ok(())
    }

    /// Switch the machine on or off.
    ///
    /// Reads the current status first and does nothing when the machine is
    /// already in the requested state. Powering on defers the session
    /// release until the machine reports ready; powering off releases
    /// immediately.
    ///
    /// # Errors
    ///
    /// `Startup` and `Shutdown` cannot be requested directly; doing so is a
    /// validation error. Otherwise propagates busy, sampling and press
    /// failures.
    pub async fn set_runtime_state(&self, target: RuntimeState) -> Result<()> {
        if !(target.is_on() || target.is_off()) {
            return Err(HardwareError::invalid_value(format!(
                "runtime state {target} cannot be requested directly"
            )));
        }

        let session = self.open_session().await?;
        let current = match session.read_status().await {
            Ok(status) => status,
            Err(err) => {
                session.close().await;
                return Err(err);
            }
        };

        if current.runtime_state == target {
            debug!(%target, "device already in requested runtime state");
            session.close().await;
            return Ok(());
        }

        info!(from = %current.runtime_state, to = %target, "toggling power");
        let power_line = self.config.layout.output_line(OutputLine::Power);
        if let Err(err) = self.press_line(power_line).await {
            session.close().await;
            return Err(err);
        }

        if target.is_on() {
            // Warm-up takes a while; hand the lines back once the machine
            // reports ready.
            session.close_deferred(self.config.release, self.shutdown.clone());
        } else {
            session.close().await;
        }
        Ok(())
    }

    /// Press one of the mode toggle buttons (eco, steam, maintenance).
    ///
    /// # Errors
    ///
    /// RELAIS is session-managed and cannot be pressed; propagates busy and
    /// press failures.
    pub async fn press_control(&self, control: OutputLine) -> Result<()> {
        if control == OutputLine::Relais {
            return Err(HardwareError::invalid_value(
                "RELAIS is session-managed and cannot be pressed",
            ));
        }

        let session = self.open_session().await?;
        let line = self.config.layout.output_line(control);
        let outcome = self.press_line(line).await;
        session.close().await;
        outcome
    }

    async fn press_line(&self, line: u8) -> Result<()> {
        let mut controller = self.controller.lock().await;
        actuator::press(
            &mut *controller,
            line,
            self.config.actuator.press_duration,
            true,
            PinAccess::SessionHeld,
        )
        .await
    }

    /// Write one analog level, logging and continuing on failure.
    ///
    /// Percent values were validated up front, so failures here are bus
    /// transients; the previous level simply stays in effect.
    async fn apply_level(&self, channel: &AnalogChannel, percent: i64) {
        let mut dac = self.dac.lock().await;
        if let Err(err) = analog::set_level(&mut *dac, channel, percent).await {
            warn!(
                channel = %channel.name,
                percent,
                error = %err,
                "level write failed, continuing with previous level"
            );
        }
    }
}
