//! # Context Module
//!
//! The request and per-request context consumed by the dispatcher.
//!
//! ## Overview
//!
//! A [`Request`] carries the path being resolved and receives what resolution
//! extracts from it: positional arguments, chained captures, the matched
//! prefix and, for chained matches, the ordered list of chain links.
//!
//! A [`Context`] wraps one request for the duration of its dispatch. It
//! borrows the (immutable, fully set-up) [`crate::dispatcher::Dispatcher`],
//! tracks the resolved action, keeps the stack of executing actions used to
//! resolve relative forward names, and collects errors reported along the way.
//!
//! ## Request Flow
//!
//! ```rust,ignore
//! let mut ctx = Context::new(&dispatcher, Request::new("/users/show/42"));
//! dispatcher.prepare_action(&mut ctx);
//! match dispatcher.dispatch(&mut ctx) {
//!     Ok(ok) => println!("executed, success={ok}"),
//!     Err(e) if e.is_not_found() => println!("404: {e}"),
//!     Err(e) => println!("error: {e}"),
//! }
//! ```

mod core;
mod request;

pub use core::{Context, MAX_EXECUTION_DEPTH};
pub use request::{ArgVec, Request, MAX_INLINE_ARGS};
