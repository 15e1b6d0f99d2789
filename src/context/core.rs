use super::request::Request;
use crate::action::{Action, ActionId};
use crate::dispatcher::Dispatcher;
use serde_json::{Map, Value};
use tracing::{debug, error};

/// Nested executions allowed before a context refuses to go deeper.
/// Guards against actions forwarding to themselves.
pub const MAX_EXECUTION_DEPTH: usize = 1000;

/// Per-request dispatch state.
///
/// Borrows the dispatcher for the lifetime `'d`; the dispatcher is immutable
/// once set up, so any number of contexts may share it across threads.
pub struct Context<'d> {
    dispatcher: &'d Dispatcher,
    request: Request,
    action: Option<ActionId>,
    stack: Vec<ActionId>,
    errors: Vec<String>,
    state: bool,
    stash: Map<String, Value>,
}

impl<'d> Context<'d> {
    #[must_use]
    pub fn new(dispatcher: &'d Dispatcher, request: Request) -> Self {
        Self {
            dispatcher,
            request,
            action: None,
            stack: Vec::new(),
            errors: Vec::new(),
            state: false,
            stash: Map::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dispatcher(&self) -> &'d Dispatcher {
        self.dispatcher
    }

    #[inline]
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    #[inline]
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// The action resolved by path resolution, if any
    #[inline]
    #[must_use]
    pub fn action(&self) -> Option<ActionId> {
        self.action
    }

    pub fn set_action(&mut self, action: Option<ActionId>) {
        self.action = action;
    }

    /// Resolved action looked up in the dispatcher
    #[must_use]
    pub fn resolved_action(&self) -> Option<&'d Action> {
        self.action.and_then(|id| self.dispatcher.action(id))
    }

    /// Currently executing actions, most recent last
    #[inline]
    #[must_use]
    pub fn stack(&self) -> &[ActionId] {
        &self.stack
    }

    /// Namespace of the action on top of the stack; root when idle
    #[must_use]
    pub fn namespace(&self) -> &'d str {
        self.stack
            .last()
            .and_then(|id| self.dispatcher.action(*id))
            .map_or("", Action::namespace)
    }

    /// Run one action and report whether it succeeded.
    ///
    /// The action is pushed on the stack for the duration of its handler so
    /// relative forwards resolve against its namespace.
    pub fn execute(&mut self, id: ActionId) -> bool {
        let dispatcher = self.dispatcher;
        let Some(action) = dispatcher.action(id) else {
            error!(action_id = %id, "Execute called with an unknown action handle");
            self.state = false;
            return false;
        };

        if self.stack.len() >= MAX_EXECUTION_DEPTH {
            let message = format!(
                "Deep recursion detected (stack size {}) calling {}",
                self.stack.len(),
                action.reverse()
            );
            error!(
                request_id = %self.request.id(),
                action = %action.reverse(),
                depth = self.stack.len(),
                "Deep recursion detected"
            );
            self.error(message);
            self.state = false;
            return false;
        }

        debug!(
            request_id = %self.request.id(),
            action = %action.reverse(),
            depth = self.stack.len(),
            "Executing action"
        );

        self.stack.push(id);
        let ok = action.run(self);
        self.stack.pop();
        self.state = ok;
        ok
    }

    /// Forward to an action by (possibly relative) name
    pub fn forward(&mut self, name: &str) -> bool {
        let dispatcher = self.dispatcher;
        dispatcher.forward_by_name(self, name)
    }

    /// Record a terminal error for the surrounding pipeline
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Result of the last executed action
    #[must_use]
    pub fn state(&self) -> bool {
        self.state
    }

    /// Data shared between the actions of one request
    #[must_use]
    pub fn stash(&self) -> &Map<String, Value> {
        &self.stash
    }

    pub fn stash_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.stash
    }

    /// Consume the context, keeping the resolved request
    #[must_use]
    pub fn into_request(self) -> Request {
        self.request
    }
}
