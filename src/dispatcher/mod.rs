//! # Dispatcher Module
//!
//! The dispatcher turns request paths and internal names into actions.
//!
//! ## Overview
//!
//! At startup [`Dispatcher::setup_actions`] walks every controller's actions:
//!
//! - private actions are registered for internal lookup only
//! - every other action is offered to each dispatch type in order; all of
//!   them get a chance to index it
//! - the reverse key `namespace/name` must be unique
//!
//! At request time:
//!
//! 1. [`Dispatcher::prepare_action`] resolves the request path with
//!    longest-prefix backtracking: `a/b/c`, then `a/b` with args `[c]`, then
//!    `a` with args `[b, c]`, then the root with args `[a, b, c]`.
//! 2. [`Dispatcher::dispatch`] forwards to the resolved action's
//!    `<namespace>/_DISPATCH` hook, which runs begin/auto/action/end.
//! 3. Handlers may [`Dispatcher::forward_by_name`] to other actions by
//!    relative name; resolution backtracks from the current namespace to the
//!    root.
//!
//! [`Dispatcher::uri_for_action`] is the inverse mapping used to build links.
//!
//! ## Sharing
//!
//! Once set up, the dispatcher is immutable. Publish it with
//! [`SharedDispatcher`] to hand it to worker threads; the atomic swap is the
//! barrier between setup and the first concurrent read.
//!
//! ## Example
//!
//! ```rust
//! use brrtdispatch::action::Action;
//! use brrtdispatch::context::{Context, Request};
//! use brrtdispatch::controller::ActionController;
//! use brrtdispatch::dispatcher::Dispatcher;
//! use std::sync::Arc;
//!
//! let users = ActionController::new("Users", "users")
//!     .action(Action::builder("show").attributes(":Local :Args(1)"));
//!
//! let mut dispatcher = Dispatcher::default();
//! dispatcher.setup_actions(vec![Arc::new(users)]).unwrap();
//!
//! let mut ctx = Context::new(&dispatcher, Request::new("/users/show/42"));
//! let show = dispatcher.prepare_action(&mut ctx).unwrap();
//! assert_eq!(dispatcher.action(show).unwrap().reverse(), "users/show");
//! assert_eq!(ctx.request().args(), ["42"]);
//! ```

mod core;
mod lineage;
mod registry;
mod shared;

pub use core::Dispatcher;
pub use lineage::clean_namespace;
pub use registry::ActionRegistry;
pub use shared::SharedDispatcher;
