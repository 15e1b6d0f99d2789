//! # CLI Module
//!
//! Command-line access to a dispatcher built from a YAML manifest (see
//! [`crate::manifest`]).
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the private action table and every dispatch type listing:
//!
//! ```bash
//! brrtdispatch routes --manifest app.yaml
//! ```
//!
//! ### `resolve`
//!
//! Resolve and dispatch one or more paths, printing the action, its
//! arguments and captures, and the actions that ran:
//!
//! ```bash
//! brrtdispatch resolve --manifest app.yaml /users/42 /missing
//! ```
//!
//! ### `uri`
//!
//! Build the path reaching an action:
//!
//! ```bash
//! brrtdispatch uri --manifest app.yaml --action users/view 42
//! ```
//!
//! Setting `BRRTD_SHOW_INTERNAL_ACTIONS=1` lists lifecycle hooks and makes
//! duplicate registrations fail with exit status 1.

mod commands;

pub use commands::{run, run_cli, Cli, Commands};
