//! # Controllers
//!
//! A controller groups actions under a namespace and owns them for the life
//! of the application. The dispatcher keeps the controllers (behind `Arc`)
//! and refers to their actions through [`ActionId`] handles.
//!
//! [`ActionController`] is the stock implementation. Besides the actions it
//! is given, it declares the five private lifecycle hooks the dispatcher
//! relies on:
//!
//! | Hook        | Behaviour                                                     |
//! |-------------|---------------------------------------------------------------|
//! | `_DISPATCH` | forwards to `_BEGIN`, `_AUTO`, `_ACTION`, then always `_END`  |
//! | `_BEGIN`    | runs the closest `Begin` action                               |
//! | `_AUTO`     | runs every visible `Auto` action, root first, until one fails |
//! | `_ACTION`   | runs the matched chain links, or the resolved action          |
//! | `_END`      | runs the closest `End` action                                 |
//!
//! "Visible" and "closest" follow the namespace walk of
//! [`Dispatcher::get_actions`]: an `Auto` in the root applies to every
//! controller, one in `admin` to `admin` and `admin/users`.

use crate::action::{Action, ActionBuilder, ActionId, ActionList};
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// An application component declaring actions.
pub trait Controller: Send + Sync {
    fn name(&self) -> &str;

    fn namespace(&self) -> &str;

    /// Actions declared by this controller, in declaration order
    fn actions(&self) -> &[Action];

    /// Called once every controller has been registered
    fn setup_finished(&self, _dispatcher: &Dispatcher) {}
}

#[derive(Debug, Default)]
struct Lifecycle {
    begin: Option<ActionId>,
    autos: ActionList,
    end: Option<ActionId>,
}

/// Controller assembled from [`ActionBuilder`]s
pub struct ActionController {
    name: String,
    namespace: String,
    actions: Vec<Action>,
    lifecycle: Arc<OnceLock<Lifecycle>>,
}

impl ActionController {
    #[must_use]
    pub fn new(name: &str, namespace: &str) -> Self {
        let lifecycle: Arc<OnceLock<Lifecycle>> = Arc::new(OnceLock::new());
        let controller = Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            actions: Vec::new(),
            lifecycle: Arc::clone(&lifecycle),
        };

        let begin = Arc::clone(&lifecycle);
        let auto = Arc::clone(&lifecycle);
        let end = lifecycle;

        controller
            .action(Action::builder("_DISPATCH").private().handler(|ctx| {
                let mut ok = true;
                for step in ["_BEGIN", "_AUTO", "_ACTION"] {
                    if !ctx.forward(step) {
                        ok = false;
                        break;
                    }
                }
                ctx.forward("_END");
                ok && !ctx.has_errors()
            }))
            .action(Action::builder("_BEGIN").private().handler(move |ctx| {
                match begin.get().and_then(|l| l.begin) {
                    Some(id) => ctx.execute(id),
                    None => true,
                }
            }))
            .action(Action::builder("_AUTO").private().handler(move |ctx| {
                let autos = auto.get().map(|l| l.autos.clone()).unwrap_or_default();
                autos.into_iter().all(|id| ctx.execute(id))
            }))
            .action(Action::builder("_ACTION").private().handler(run_resolved))
            .action(Action::builder("_END").private().handler(move |ctx| {
                match end.get().and_then(|l| l.end) {
                    Some(id) => ctx.execute(id),
                    None => true,
                }
            }))
    }

    /// Declare an action in this controller's namespace
    #[must_use]
    pub fn action(mut self, builder: ActionBuilder) -> Self {
        let mut action = builder.build(&self.namespace);
        action.set_class_name(&self.name);
        self.actions.push(action);
        self
    }
}

fn run_resolved(ctx: &mut Context<'_>) -> bool {
    let chain = ctx.request().chain().to_vec();
    if !chain.is_empty() {
        return chain.into_iter().all(|id| ctx.execute(id));
    }
    match ctx.action() {
        Some(id) => ctx.execute(id),
        None => true,
    }
}

impl Controller for ActionController {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn actions(&self) -> &[Action] {
        &self.actions
    }

    fn setup_finished(&self, dispatcher: &Dispatcher) {
        let mut autos = dispatcher.get_actions("Auto", &self.namespace);
        autos.reverse();
        let lifecycle = Lifecycle {
            begin: dispatcher.get_actions("Begin", &self.namespace).first().copied(),
            autos,
            end: dispatcher.get_actions("End", &self.namespace).first().copied(),
        };
        debug!(
            controller = %self.name,
            begin = ?lifecycle.begin,
            autos = ?lifecycle.autos,
            end = ?lifecycle.end,
            "Controller lifecycle resolved"
        );
        if self.lifecycle.set(lifecycle).is_err() {
            debug!(controller = %self.name, "Lifecycle already resolved; keeping the first one");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RESERVED_NAMES;

    #[test]
    fn test_declares_lifecycle_hooks() {
        let controller = ActionController::new("Users", "/users/");
        let names: Vec<&str> = controller.actions().iter().map(Action::name).collect();
        assert_eq!(names, RESERVED_NAMES);
        assert!(controller.actions().iter().all(Action::is_private));
        assert!(controller
            .actions()
            .iter()
            .all(|a| a.namespace() == "users" && a.class_name() == "Users"));
    }

    #[test]
    fn test_actions_take_controller_namespace() {
        let controller =
            ActionController::new("Users", "users").action(Action::builder("show").attributes(":Local"));
        let show = controller.actions().last().expect("show");
        assert_eq!(show.reverse(), "users/show");
        assert_eq!(show.attributes().get("Local"), Some(""));
    }
}
