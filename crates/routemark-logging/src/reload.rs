//! Runtime verbosity changes

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use routemark_core::Verbosity;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::reload;

/// Handle for swapping the active filter after initialization
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<EnvFilter, tracing_subscriber::Registry>>>,
    verbosity: Mutex<Verbosity>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
            verbosity: Mutex::new(Verbosity::default()),
        }
    }

    /// Get the global reload handle
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    /// Set the reload handle (called during initialization)
    pub fn set_handle(
        &self,
        handle: reload::Handle<EnvFilter, tracing_subscriber::Registry>,
        verbosity: Verbosity,
    ) {
        *self.handle.lock() = Some(handle);
        *self.verbosity.lock() = verbosity;
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Verbosity most recently applied through this handle
    pub fn verbosity(&self) -> Verbosity {
        *self.verbosity.lock()
    }

    /// Replace the active filter with one for `verbosity`
    pub fn reload_verbosity(&self, verbosity: Verbosity) -> Result<(), String> {
        let guard = self.handle.lock();
        let Some(handle) = guard.as_ref() else {
            return Err("Reload handle not initialized".to_string());
        };
        handle
            .reload(EnvFilter::new(verbosity_directive(verbosity)))
            .map_err(|e| format!("Failed to reload filter: {e}"))?;
        *self.verbosity.lock() = verbosity;
        Ok(())
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter directive for a verbosity level
///
/// Silent keeps warnings and errors, normal adds the run summary, verbose
/// adds per-route detail.
pub fn verbosity_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Silent => "warn",
        Verbosity::Normal => "info",
        Verbosity::Verbose => "debug",
    }
}

#[cfg(test)]
#[path = "reload/reload_tests.rs"]
mod reload_tests;
