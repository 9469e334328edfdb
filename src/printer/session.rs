//! # Printer Sessions
//!
//! The printer is one physical resource. [`PrinterSessions::with_printer`]
//! is the only way to reach it: it opens a session, hands the device to a
//! job, and always puts the printer back to sleep and closes the connection,
//! whatever the job did.
//!
//! ## Lifecycle
//!
//! ```text
//!             present?      connect + online      settle      paper?
//!  Closed ──────────────► ─────────────────► Online ───────► ────────► job
//!    ▲        │ no                                              │ no     │
//!    │        ▼                                                 ▼        │
//!    │   NoPrinterFound                                   NoPaperLeft    │
//!    │                                                          │        │
//!    └──────────── close ◄──────── Offline ◄─────── offline ◄───┴────────┘
//! ```
//!
//! A mutex held across the whole sequence guarantees at most one session at
//! any instant. Waiting callers block until the printer is free; there is no
//! timeout on the wait.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Connector, Printer};
use crate::error::LudivinaError;

/// Pause between going online and asking for the status.
///
/// The printer rejects a status request issued right after `ESC = 1`.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Where an open session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Online,
    Offline,
}

/// Serialized, scoped access to the single printer.
pub struct PrinterSessions<C: Connector> {
    connector: C,
    lock: Mutex<()>,
    settle_delay: Duration,
}

impl<C: Connector> PrinterSessions<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            lock: Mutex::new(()),
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Override the settle delay (tests use zero).
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Run `job` with exclusive access to an online printer that has paper.
    ///
    /// ## Errors
    ///
    /// - [`LudivinaError::NoPrinterFound`] if the device is not plugged in;
    ///   nothing is opened.
    /// - [`LudivinaError::NoPaperLeft`] if the paper tray is empty; the
    ///   printer is still taken offline and closed.
    /// - Any error from connecting or from `job`, after the printer has been
    ///   taken offline and closed.
    pub fn with_printer<T, F>(&self, job: F) -> Result<T, LudivinaError>
    where
        F: FnOnce(&mut C::Device) -> Result<T, LudivinaError>,
    {
        let _exclusive = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.connector.is_present() {
            info!(device = %self.connector.location(), "printer not found");
            return Err(LudivinaError::NoPrinterFound(self.connector.location()));
        }

        let mut session = Session::open(self.connector.connect()?)?;
        thread::sleep(self.settle_delay);

        let result = session.ensure_paper().and_then(|()| job(session.device_mut()));
        let closed = session.close();

        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_error)) => {
                warn!(error = %close_error, "failed to take printer offline after a failed job");
                Err(e)
            }
        }
    }
}

/// One open connection. Dropping it takes the printer offline if that has
/// not happened yet, so a panicking job still releases the device.
struct Session<D: Printer> {
    device: D,
    state: SessionState,
}

impl<D: Printer> Session<D> {
    fn open(device: D) -> Result<Self, LudivinaError> {
        let mut session = Self {
            device,
            state: SessionState::Closed,
        };
        session.device.online()?;
        session.state = SessionState::Online;
        debug!("printer online");
        Ok(session)
    }

    fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    fn ensure_paper(&mut self) -> Result<(), LudivinaError> {
        if self.device.status()?.paper {
            Ok(())
        } else {
            info!("printer has no paper");
            Err(LudivinaError::NoPaperLeft)
        }
    }

    /// Take the printer offline; the connection closes when `self` drops.
    fn close(mut self) -> Result<(), LudivinaError> {
        self.go_offline()
    }

    fn go_offline(&mut self) -> Result<(), LudivinaError> {
        if self.state != SessionState::Online {
            return Ok(());
        }
        self.state = SessionState::Offline;
        let result = self.device.offline();
        debug!("printer offline");
        result
    }
}

impl<D: Printer> Drop for Session<D> {
    fn drop(&mut self) {
        if let Err(e) = self.go_offline() {
            warn!(error = %e, "failed to take printer offline");
        }
        self.state = SessionState::Closed;
    }
}

// ============================================================================
// TESTS
// ============================================================================
