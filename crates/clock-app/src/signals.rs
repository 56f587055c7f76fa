//! Signal handling for the clock's event loop.
//!
//! Handles SIGTERM and SIGINT (shutdown), SIGHUP (reload settings) and
//! SIGUSR1 (toggle pause). The handlers only set static atomic flags;
//! [`SignalHandler::poll`] moves them into shared state between event
//! dispatches, so nothing runs concurrently with the loop.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

static SHUTDOWN_FLAG: AtomicBool = AtomicBool::new(false);
static RELOAD_FLAG: AtomicBool = AtomicBool::new(false);
static PAUSE_FLAG: AtomicBool = AtomicBool::new(false);

/// Signal types that the clock handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// SIGTERM or SIGINT.
    Terminate,
    /// SIGHUP - reload settings from disk.
    Hangup,
    /// SIGUSR1 - pause or resume the work session.
    User1,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Terminate => write!(f, "SIGTERM/SIGINT"),
            SignalKind::Hangup => write!(f, "SIGHUP"),
            SignalKind::User1 => write!(f, "SIGUSR1"),
        }
    }
}

/// Requests waiting for the event loop.
#[derive(Debug, Default)]
pub struct SignalState {
    shutdown_requested: AtomicBool,
    reload_requested: AtomicBool,
    pause_toggle_requested: AtomicBool,
    signal_count: AtomicU32,
}

impl SignalState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[inline]
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Relaxed)
    }

    /// Check if reload has been requested (and clear the flag).
    #[inline]
    pub fn take_reload_request(&self) -> bool {
        self.reload_requested.swap(false, Ordering::Relaxed)
    }

    /// Check if a pause toggle has been requested (and clear the flag).
    #[inline]
    pub fn take_pause_toggle(&self) -> bool {
        self.pause_toggle_requested.swap(false, Ordering::Relaxed)
    }

    /// Request shutdown.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::Relaxed);
    }

    /// Request a settings reload.
    pub fn request_reload(&self) {
        self.reload_requested.store(true, Ordering::Relaxed);
    }

    /// Request a pause toggle.
    pub fn request_pause_toggle(&self) {
        self.pause_toggle_requested.store(true, Ordering::Relaxed);
    }

    fn record_signal(&self, kind: SignalKind) {
        self.signal_count.fetch_add(1, Ordering::Relaxed);
        info!(signal = %kind, "Signal received");
        match kind {
            SignalKind::Terminate => self.request_shutdown(),
            SignalKind::Hangup => self.request_reload(),
            SignalKind::User1 => self.request_pause_toggle(),
        }
    }

    /// Get the total number of signals received.
    pub fn signal_count(&self) -> u32 {
        self.signal_count.load(Ordering::Relaxed)
    }
}

/// Registers process signal handlers and exposes their requests.
#[derive(Debug, Clone)]
pub struct SignalHandler {
    state: Arc<SignalState>,
}

impl SignalHandler {
    /// Create a handler and register the process signal handlers.
    ///
    /// On non-Unix platforms only manual requests are available.
    pub fn new() -> std::io::Result<Self> {
        let handler = Self {
            state: Arc::new(SignalState::new()),
        };

        #[cfg(unix)]
        register_unix_handlers()?;

        Ok(handler)
    }

    /// Move signals caught since the last call into the shared state.
    pub fn poll(&self) {
        if SHUTDOWN_FLAG.swap(false, Ordering::Relaxed) {
            self.state.record_signal(SignalKind::Terminate);
        }
        if RELOAD_FLAG.swap(false, Ordering::Relaxed) {
            self.state.record_signal(SignalKind::Hangup);
        }
        if PAUSE_FLAG.swap(false, Ordering::Relaxed) {
            self.state.record_signal(SignalKind::User1);
        }
    }

    /// Check if shutdown has been requested.
    #[inline]
    pub fn shutdown_requested(&self) -> bool {
        self.state.shutdown_requested()
    }

    /// Check if reload has been requested (clears the flag).
    #[inline]
    pub fn take_reload_request(&self) -> bool {
        self.state.take_reload_request()
    }

    /// Check if a pause toggle has been requested (clears the flag).
    #[inline]
    pub fn take_pause_toggle(&self) -> bool {
        self.state.take_pause_toggle()
    }

    /// Manually request shutdown.
    pub fn request_shutdown(&self) {
        info!("Manual shutdown requested");
        self.state.request_shutdown();
    }

    /// Get the signal state for inspection.
    pub fn state(&self) -> &SignalState {
        &self.state
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn register_unix_handlers() -> std::io::Result<()> {
    use std::os::raw::c_int;

    extern "C" fn shutdown_handler(_: c_int) {
        SHUTDOWN_FLAG.store(true, Ordering::Relaxed);
    }

    extern "C" fn reload_handler(_: c_int) {
        RELOAD_FLAG.store(true, Ordering::Relaxed);
    }

    extern "C" fn pause_handler(_: c_int) {
        PAUSE_FLAG.store(true, Ordering::Relaxed);
    }

    let handlers: [(c_int, extern "C" fn(c_int)); 4] = [
        (libc::SIGTERM, shutdown_handler),
        (libc::SIGINT, shutdown_handler),
        (libc::SIGHUP, reload_handler),
        (libc::SIGUSR1, pause_handler),
    ];

    for (signal, handler) in handlers {
        // SAFETY: the handlers only store to static atomics, which is
        // async-signal-safe.
        let previous = unsafe { libc::signal(signal, handler as libc::sighandler_t) };
        if previous == libc::SIG_ERR {
            return Err(std::io::Error::last_os_error());
        }
    }

    debug!("Unix signal handlers registered");
    Ok(())
}
