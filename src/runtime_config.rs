//! # Runtime Configuration Module
//!
//! Environment-driven switches for the dispatcher.
//!
//! ## Environment Variables
//!
//! ### `BRRTD_SHOW_INTERNAL_ACTIONS`
//!
//! Enables internal-action diagnostics. Accepts `true`/`1`/`yes`/`on`
//! (case-insensitive); anything else disables it.
//!
//! Default: disabled
//!
//! When enabled:
//! - Registering an action whose `namespace/name` is already taken aborts
//!   setup with [`crate::DispatchError::DuplicateAction`]; the binary exits
//!   with status 1.
//! - Actions whose name starts with `_` (the lifecycle hooks) are included in
//!   the private action table logged after setup.
//!
//! When disabled, duplicates are skipped and logged at debug level.
//!
//! ## Usage
//!
//! ```rust
//! use brrtdispatch::runtime_config::DispatcherConfig;
//!
//! let config = DispatcherConfig::from_env();
//! println!("diagnostics: {}", config.show_internal_actions);
//! ```

use std::env;

/// Environment variable toggling internal-action diagnostics
pub const SHOW_INTERNAL_ACTIONS_ENV: &str = "BRRTD_SHOW_INTERNAL_ACTIONS";

/// Dispatcher configuration loaded at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Treat duplicate registrations as fatal and list internal actions
    pub show_internal_actions: bool,
}

impl DispatcherConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let show_internal_actions = env::var(SHOW_INTERNAL_ACTIONS_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        DispatcherConfig {
            show_internal_actions,
        }
    }

    /// Diagnostics enabled, for tests and tooling
    #[must_use]
    pub fn diagnostics() -> Self {
        DispatcherConfig {
            show_internal_actions: true,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
