//! # brrtdispatch
//!
//! **brrtdispatch** maps request paths and internal action names to the
//! actions declared by application controllers. It is the routing core of a
//! controller/action web framework: paths resolve by longest prefix,
//! internal forwards resolve through the namespace hierarchy, and every
//! routable action can be turned back into a path.
//!
//! ## Architecture
//!
//! - **[`action`]** - Actions, their `:Name(value)` attributes and handlers
//! - **[`controller`]** - Controllers owning actions, with begin/auto/end lifecycle hooks
//! - **[`dispatch_type`]** - Pluggable matchers: literal paths and chained captures
//! - **[`dispatcher`]** - Setup, path resolution, forwarding and reverse URIs
//! - **[`context`]** - Per-request state threaded through action execution
//! - **[`manifest`]** - YAML controller manifests for tooling and tests
//! - **[`runtime_config`]** / **[`logging`]** - Environment-driven configuration
//! - **[`cli`]** - The `brrtdispatch` inspection binary
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Dispatcher
//!     participant Path as PathDispatchType
//!     participant Chained as ChainedDispatchType
//!     participant Ctl as Controller hooks
//!
//!     App->>Dispatcher: prepare_action(ctx) for /users/42/edit
//!     loop longest prefix first
//!         Dispatcher->>Path: match_path("users/42/edit", [])
//!         Path-->>Dispatcher: NoMatch
//!         Dispatcher->>Chained: match_path("users/42/edit", [])
//!         Chained-->>Dispatcher: ExactMatch (captures ["42"])
//!     end
//!     App->>Dispatcher: dispatch(ctx)
//!     Dispatcher->>Ctl: forward "/users/_DISPATCH"
//!     Ctl->>Ctl: _BEGIN, _AUTO, _ACTION, _END
//!     Ctl-->>App: success flag
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtdispatch::{Action, ActionController, Context, Dispatcher, Request};
//! use std::sync::Arc;
//!
//! let users = ActionController::new("Users", "users")
//!     .action(Action::builder("base").attributes(":Chained('/') :PathPart('users') :CaptureArgs(1)"))
//!     .action(Action::builder("edit").attributes(":Chained('base') :PathPart('edit') :Args(0)"));
//!
//! let mut dispatcher = Dispatcher::default();
//! dispatcher.setup_actions(vec![Arc::new(users)]).unwrap();
//!
//! let mut ctx = Context::new(&dispatcher, Request::new("/users/42/edit"));
//! let edit = dispatcher.prepare_action(&mut ctx).unwrap();
//! assert_eq!(ctx.request().captures(), ["42"]);
//! assert!(dispatcher.dispatch(&mut ctx).unwrap());
//!
//! let uri = dispatcher.uri_for_action(edit, &["42".to_string()]);
//! assert_eq!(uri.as_deref(), Some("/users/42/edit"));
//! ```
//!
//! ## Configuration
//!
//! | Variable                      | Effect                                              |
//! |-------------------------------|-----------------------------------------------------|
//! | `BRRTD_SHOW_INTERNAL_ACTIONS` | duplicate registrations are fatal; hooks are listed |
//! | `BRRTD_LOG_LEVEL`             | trace/debug/info/warn/error (default `warn`)        |
//! | `BRRTD_LOG_FORMAT`            | `json` or `pretty`                                  |
//! | `BRRTD_LOG_SAMPLING_MODE`     | `all`, `error-only` or `sampled`                    |
//! | `BRRTD_LOG_SAMPLING_RATE`     | 0.0-1.0, for `sampled`                              |
//! | `BRRTD_LOG_TARGET_FILTER`     | extra filter directives, comma separated            |
//! | `BRRTD_LOG_INCLUDE_LOCATION`  | add file and line to each event                     |
//! | `BRRTD_LOG_ASYNC`             | write logs from a background worker                 |

pub mod action;
pub mod cli;
pub mod context;
pub mod controller;
pub mod dispatch_type;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod ids;
pub mod logging;
pub mod manifest;
pub mod runtime_config;

pub use action::{Action, ActionBuilder, ActionId, Attributes};
pub use context::{Context, Request};
pub use controller::{ActionController, Controller};
pub use dispatch_type::{ChainedDispatchType, DispatchType, MatchType, PathDispatchType};
pub use dispatcher::{Dispatcher, SharedDispatcher};
pub use error::DispatchError;
pub use manifest::Manifest;
pub use runtime_config::DispatcherConfig;
