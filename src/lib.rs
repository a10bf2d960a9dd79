//! Task calendar, inbox and lead-card logic for the travel-agency CRM.

pub mod api;
pub mod config;
pub mod core;

use std::sync::atomic::{AtomicBool, Ordering};

pub use crate::config::CrmConfig;
pub use crate::core::overlay::TasksOverlay;
pub use crate::core::task::Task;

/// Toggled by `--debug` or the `debug_logging` config flag.
static DEBUG_LOGGING: AtomicBool = AtomicBool::new(false);

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.store(enabled, Ordering::Relaxed);
}

pub fn debug_logging() -> bool {
    DEBUG_LOGGING.load(Ordering::Relaxed)
}

/// Most verbose level let through for a log target: our own modules follow
/// the debug toggle, dependencies stay at warn.
pub fn max_level_for(target: &str) -> log::LevelFilter {
    if target.starts_with(env!("CARGO_CRATE_NAME")) {
        if debug_logging() {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    } else {
        log::LevelFilter::Warn
    }
}
