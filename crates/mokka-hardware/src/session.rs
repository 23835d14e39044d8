//! Exclusive hardware session.
//!
//! All physical pin access is serialized through one session: at most one
//! logical operation (a job, a status change, a status read) holds the lines
//! at a time. Opening a session acquires the gate, configures every mapped
//! line and asserts the RELAIS line that powers the control interface;
//! closing reverses all of that, either immediately or through a detached
//! watcher that waits for the device to become ready again, bounded by a
//! hard timeout.
//!
//! The gate is a checked acquire, never a blocking wait: a caller that finds
//! the gate held gets [`HardwareError::DeviceBusy`] and decides for itself
//! whether to retry. Exclusivity is enforced by the gate alone, not by any
//! per-caller token, so any open session blocks all other callers regardless
//! of identity.

use crate::config::{OutputLine, PinLayout, ReleaseConfig, SamplingConfig};
use crate::devices::AnyPinController;
use crate::error::{HardwareError, Result};
use crate::sampler;
use crate::status::{self, StatusFallbacks};
use crate::traits::PinController;
use crate::types::PinAccess;
use mokka_core::DeviceStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Shared ownership of the pin controller.
pub type SharedController = Arc<Mutex<AnyPinController>>;

/// The system-wide exclusion gate.
///
/// Atomic test-and-set semantics: acquiring either succeeds immediately or
/// fails immediately; it never blocks.
#[derive(Debug, Default)]
pub struct SessionGate {
    held: AtomicBool,
}

impl SessionGate {
    /// Create a new, unheld gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a session holds the gate.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    pub(crate) fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn release(&self) {
        self.held.store(false, Ordering::Release);
    }
}

/// An open exclusive session over the hardware lines.
///
/// Obtained from [`CoffeeMachine::open_session`](crate::CoffeeMachine::open_session).
/// While the session is open, every mapped line is configured and RELAIS is
/// asserted; operations run with [`PinAccess::SessionHeld`] and must not
/// touch the pin configuration.
#[derive(Debug)]
pub struct Session {
    controller: SharedController,
    gate: Arc<SessionGate>,
    layout: PinLayout,
    sampling: SamplingConfig,
    fallbacks: StatusFallbacks,
    closed: bool,
}

impl Session {
    /// Acquire the gate and take over the lines.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::DeviceBusy`] when another session is open,
    /// and a configuration error (with the gate released again) when the
    /// lines cannot be claimed.
    pub(crate) async fn open(
        controller: SharedController,
        gate: Arc<SessionGate>,
        layout: PinLayout,
        sampling: SamplingConfig,
        fallbacks: StatusFallbacks,
    ) -> Result<Self> {
        if !gate.try_acquire() {
            return Err(HardwareError::DeviceBusy);
        }

        let session = Self {
            controller,
            gate,
            layout,
            sampling,
            fallbacks,
            closed: false,
        };

        if let Err(err) = session.configure_lines().await {
            // Hand the lines back before reporting the failure.
            session.close().await;
            return Err(err);
        }

        debug!("session opened, relay asserted");
        Ok(session)
    }

    async fn configure_lines(&self) -> Result<()> {
        let mut controller = self.controller.lock().await;
        for line in self.layout.input_lines() {
            controller.configure_input(line).await?;
        }
        for line in self.layout.output_lines() {
            controller.configure_output(line).await?;
        }
        controller
            .write(self.layout.output_line(OutputLine::Relais), true)
            .await
    }

    /// One consensus read and translation, using the session-held lines.
    ///
    /// # Errors
    ///
    /// Propagates sampling failures; translation itself cannot fail.
    pub async fn read_status(&self) -> Result<DeviceStatus> {
        let mut controller = self.controller.lock().await;
        let readings = sampler::read_with_consensus(
            &mut *controller,
            &self.layout.input_lines(),
            &self.sampling,
            PinAccess::SessionHeld,
        )
        .await?;
        Ok(status::translate(&readings, &self.layout, &self.fallbacks))
    }

    /// Synchronously de-assert the relay, release every line and free the
    /// gate.
    ///
    /// Teardown failures are logged, not propagated; the gate is freed in
    /// every case.
    pub async fn close(mut self) {
        {
            let mut controller = self.controller.lock().await;
            if let Err(err) = controller
                .write(self.layout.output_line(OutputLine::Relais), false)
                .await
            {
                warn!(error = %err, "failed to de-assert relay on close");
            }
            if let Err(err) = controller.release_all().await {
                warn!(error = %err, "failed to release lines on close");
            }
        }
        self.closed = true;
        self.gate.release();
        debug!("session closed");
    }

    /// Close in the background once the device reports ready, or at the
    /// timeout, whichever comes first.
    ///
    /// Returns immediately; the spawned watcher polls `device_ready` every
    /// `config.poll_interval`, suppressing poll failures (a failed read
    /// counts as "not ready yet"). Cancelling `shutdown` closes the session
    /// right away so the watcher cannot outlive the process lifecycle.
    pub fn close_deferred(
        self,
        config: ReleaseConfig,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let deadline = Instant::now() + config.timeout;
            loop {
                if self.device_ready().await {
                    debug!("device ready, releasing deferred session");
                    break;
                }
                let now = Instant::now();
                if now >= deadline {
                    debug!("deferred release timeout elapsed, releasing session");
                    break;
                }
                let wait = config.poll_interval.min(deadline - now);
                tokio::select! {
                    () = shutdown.cancelled() => {
                        debug!("shutdown requested, releasing deferred session");
                        break;
                    }
                    () = tokio::time::sleep(wait) => {}
                }
            }
            self.close().await;
        })
    }

    async fn device_ready(&self) -> bool {
        match self.read_status().await {
            Ok(status) => status.device_ready,
            Err(err) => {
                debug!(error = %err, "readiness poll failed, treating as not ready");
                false
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            // Dropped without close(): free the gate so the device is not
            // wedged, even though the lines could not be torn down.
            self.gate.release();
            warn!("session dropped without close, lines may remain configured");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPinController, MockPinHandle};
    use std::time::Duration;

    struct Fixture {
        controller: SharedController,
        gate: Arc<SessionGate>,
        layout: PinLayout,
        handle: MockPinHandle,
    }

    fn fixture() -> Fixture {
        let (pins, handle) = MockPinController::new();
        Fixture {
            controller: Arc::new(Mutex::new(AnyPinController::Mock(pins))),
            gate: Arc::new(SessionGate::new()),
            layout: PinLayout::default(),
            handle,
        }
    }

    impl Fixture {
        async fn open(&self) -> Result<Session> {
            Session::open(
                Arc::clone(&self.controller),
                Arc::clone(&self.gate),
                self.layout,
                SamplingConfig::default().samples_per_line(1).check_cycles(1),
                StatusFallbacks::default(),
            )
            .await
        }

        /// Light the LEDs of a machine that is on and has nothing to report.
        fn make_ready(&self) {
            self.handle.set_levels(&[
                (self.layout.inputs.one_dose, true),
                (self.layout.inputs.two_doses, true),
            ]);
        }

        fn release_config() -> ReleaseConfig {
            ReleaseConfig::default()
                .poll_interval(Duration::from_secs(2))
                .timeout(Duration::from_secs(45))
        }
    }

    #[tokio::test]
    async fn test_open_configures_lines_and_asserts_relay() {
        let fx = fixture();
        let session = fx.open().await.unwrap();

        assert!(fx.gate.is_held());
        assert!(fx.handle.mode(fx.layout.inputs.water).is_some());
        assert!(fx.handle.mode(fx.layout.outputs.power).is_some());
        assert_eq!(fx.handle.writes(fx.layout.outputs.relais), vec![true]);

        session.close().await;
    }

    #[tokio::test]
    async fn test_second_open_is_busy_until_close() {
        let fx = fixture();
        let session = fx.open().await.unwrap();

        let err = fx.open().await.unwrap_err();
        assert!(err.is_busy());

        session.close().await;

        // Immediately after a synchronous close the gate is free again.
        let reopened = fx.open().await.unwrap();
        reopened.close().await;
    }

    #[tokio::test]
    async fn test_close_deasserts_relay_and_releases_lines() {
        let fx = fixture();
        let session = fx.open().await.unwrap();
        session.close().await;

        assert!(!fx.gate.is_held());
        assert_eq!(fx.handle.writes(fx.layout.outputs.relais), vec![true, false]);
        assert_eq!(fx.handle.mode(fx.layout.inputs.water), None);
        assert_eq!(fx.handle.mode(fx.layout.outputs.relais), None);
    }

    #[tokio::test]
    async fn test_failed_open_releases_the_gate() {
        let fx = fixture();
        fx.handle.fail_configuration(fx.layout.inputs.water);

        let err = fx.open().await.unwrap_err();
        assert!(matches!(err, HardwareError::Configuration { .. }));
        assert!(!fx.gate.is_held());
    }

    #[tokio::test]
    async fn test_read_status_uses_session_held_lines() {
        let fx = fixture();
        fx.make_ready();
        let session = fx.open().await.unwrap();
        fx.handle.clear_events();

        let status = session.read_status().await.unwrap();
        assert!(status.device_ready);

        // No configure/release events: sampling ran on the session's lines.
        assert!(fx.handle.events().is_empty());
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_close_releases_when_ready() {
        let fx = fixture();
        fx.make_ready();
        let session = fx.open().await.unwrap();
        let started = Instant::now();

        session
            .close_deferred(Fixture::release_config(), CancellationToken::new())
            .await
            .unwrap();

        assert!(!fx.gate.is_held());
        assert!(started.elapsed() < Duration::from_secs(45));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_close_releases_at_timeout() {
        let fx = fixture();
        // Dose LEDs stay dark: the device never becomes ready.
        let session = fx.open().await.unwrap();
        let started = Instant::now();

        session
            .close_deferred(Fixture::release_config(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(45));
        assert!(!fx.gate.is_held());
        // Relay was de-asserted by the watcher.
        assert_eq!(fx.handle.writes(fx.layout.outputs.relais), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_close_becomes_ready_mid_wait() {
        let fx = fixture();
        let session = fx.open().await.unwrap();
        let started = Instant::now();

        let watcher = session.close_deferred(Fixture::release_config(), CancellationToken::new());

        // Let one poll interval pass, then light the ready LEDs.
        tokio::time::sleep(Duration::from_secs(3)).await;
        fx.make_ready();

        watcher.await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(45));
        assert!(!fx.gate.is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watcher_suppresses_poll_errors() {
        let fx = fixture();
        let session = fx.open().await.unwrap();
        // Every readiness poll fails; the watcher must treat that as "not
        // ready yet" and still release at the timeout.
        fx.handle.fail_reads(fx.layout.inputs.water);
        let started = Instant::now();

        session
            .close_deferred(Fixture::release_config(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(45));
        assert!(!fx.gate.is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watcher_recovers_once_reads_work_again() {
        let fx = fixture();
        let session = fx.open().await.unwrap();
        fx.handle.fail_reads(fx.layout.inputs.water);
        let started = Instant::now();

        let watcher = session.close_deferred(Fixture::release_config(), CancellationToken::new());

        // Reads come back and the device is ready; the next poll releases.
        tokio::time::sleep(Duration::from_secs(10)).await;
        fx.handle.restore_reads(fx.layout.inputs.water);
        fx.make_ready();

        watcher.await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(45));
        assert!(!fx.gate.is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_token_releases_immediately() {
        let fx = fixture();
        let session = fx.open().await.unwrap();
        let token = CancellationToken::new();
        token.cancel();

        session
            .close_deferred(Fixture::release_config(), token)
            .await
            .unwrap();

        assert!(!fx.gate.is_held());
    }

    #[tokio::test]
    async fn test_dropped_session_frees_the_gate() {
        let fx = fixture();
        let session = fx.open().await.unwrap();
        drop(session);
        assert!(!fx.gate.is_held());
    }
}
