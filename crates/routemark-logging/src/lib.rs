//! routemark-logging - Tracing setup for the routemark pipeline
//!
//! This crate provides:
//! - [`init_logging`] to install a formatted subscriber at a [`Verbosity`]
//! - [`ReloadHandle`] to change verbosity after initialization
//! - [`CaptureLayer`] to collect events in memory (hosts and tests)

mod layer;
mod reload;

pub use layer::{CaptureLayer, CapturedEvent, init_logging};
pub use reload::{ReloadHandle, verbosity_directive};
pub use routemark_core::Verbosity;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CaptureLayer, ReloadHandle, Verbosity, init_logging};
}
