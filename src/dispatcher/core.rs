//! Dispatcher core module - setup, path resolution, forwarding and reverse URIs.

use super::lineage::{action_rel_to_abs, namespace_lineage, split_action_path};
use super::registry::ActionRegistry;
use crate::action::{Action, ActionId, ActionList};
use crate::context::{ArgVec, Context};
use crate::controller::Controller;
use crate::dispatch_type::{
    build_table, decode_segment, ChainedDispatchType, DispatchType, MatchType, PathDispatchType,
};
use crate::error::DispatchError;
use crate::runtime_config::DispatcherConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Resolves request paths and internal names to actions.
///
/// Owns the controllers (and through them every action), the ordered list of
/// dispatch types and the action registry. Built and set up once at startup;
/// every request-time method takes `&self`.
pub struct Dispatcher {
    dispatch_types: Vec<Box<dyn DispatchType>>,
    registry: ActionRegistry,
    controllers: Vec<Arc<dyn Controller>>,
    controller_names: HashMap<String, usize>,
    config: DispatcherConfig,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl Dispatcher {
    /// Create a dispatcher with the `Path` and `Chained` dispatch types
    /// registered, in that order.
    #[must_use]
    pub fn new(config: DispatcherConfig) -> Self {
        let mut dispatcher = Self::bare(config);
        dispatcher.register_dispatch_type(Box::new(PathDispatchType::new()));
        dispatcher.register_dispatch_type(Box::new(ChainedDispatchType::new()));
        dispatcher
    }

    /// Create a dispatcher without any dispatch type
    #[must_use]
    pub fn bare(config: DispatcherConfig) -> Self {
        Dispatcher {
            dispatch_types: Vec::new(),
            registry: ActionRegistry::new(),
            controllers: Vec::new(),
            controller_names: HashMap::new(),
            config,
        }
    }

    /// Append a dispatch type; earlier types win both registration listings
    /// and matches.
    pub fn register_dispatch_type(&mut self, dispatch_type: Box<dyn DispatchType>) {
        info!(dispatch_type = dispatch_type.name(), "Dispatch type registered");
        self.dispatch_types.push(dispatch_type);
    }

    /// Register every action of `controllers`.
    ///
    /// Private actions are always registered; the others are offered to every
    /// dispatch type. Keys already present are skipped, or rejected with
    /// [`DispatchError::DuplicateAction`] when internal-action diagnostics are
    /// enabled. Afterwards the root container is snapshotted, each controller
    /// is told setup finished, and dispatch types that claimed nothing are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DuplicateAction`] on the first duplicate key
    /// when `show_internal_actions` is set.
    pub fn setup_actions(&mut self, controllers: Vec<Arc<dyn Controller>>) -> Result<(), DispatchError> {
        for controller in &controllers {
            let slot = self.adopt(controller);
            let mut instance_used = false;

            for (index, action) in controller.actions().iter().enumerate() {
                let id = ActionId::new(slot, index);

                if let Some(existing) = self.registry.get(action.reverse()) {
                    let registered_by = self
                        .action(existing)
                        .map(|a| a.class_name().to_string())
                        .unwrap_or_default();
                    if self.config.show_internal_actions {
                        error!(
                            action = %action.reverse(),
                            controller = %controller.name(),
                            registered_by = %registered_by,
                            "Action was already registered by another controller"
                        );
                        return Err(DispatchError::DuplicateAction {
                            key: action.reverse().to_string(),
                            controller: controller.name().to_string(),
                            registered_by,
                        });
                    }
                    debug!(
                        action = %action.reverse(),
                        controller = %controller.name(),
                        registered_by = %registered_by,
                        "Skipping duplicate action"
                    );
                    continue;
                }

                let claimed = if action.is_private() {
                    true
                } else {
                    let mut claimed = false;
                    for dispatch_type in &mut self.dispatch_types {
                        if dispatch_type.register_action(id, action) {
                            claimed = true;
                        }
                    }
                    claimed
                };

                if !claimed && !action.is_reserved() {
                    info!(
                        action = %action.name(),
                        controller = %controller.name(),
                        "Action was not registered in any dispatch type; it is only reachable internally"
                    );
                }

                self.registry.insert(action.reverse(), action.namespace(), id);
                instance_used = true;
            }

            if instance_used {
                self.controller_names
                    .insert(controller.name().to_string(), slot);
            }
        }

        // Cache root actions before controllers run their own setup
        self.registry.snapshot_root();

        for controller in &controllers {
            controller.setup_finished(self);
        }

        let before = self.dispatch_types.len();
        self.dispatch_types.retain(|dt| dt.in_use());
        info!(
            actions = self.registry.len(),
            controllers = self.controller_names.len(),
            dispatch_types = self.dispatch_types.len(),
            dropped_dispatch_types = before - self.dispatch_types.len(),
            "Dispatcher setup finished"
        );

        self.print_actions();
        Ok(())
    }

    fn adopt(&mut self, controller: &Arc<dyn Controller>) -> usize {
        if let Some(slot) = self
            .controllers
            .iter()
            .position(|c| Arc::ptr_eq(c, controller))
        {
            return slot;
        }
        self.controllers.push(Arc::clone(controller));
        self.controllers.len() - 1
    }

    fn print_actions(&self) {
        debug!("\n{}", self.describe());
    }

    /// Private action table followed by every dispatch type listing
    #[must_use]
    pub fn describe(&self) -> String {
        let mut rows = Vec::new();
        for key in self.registry.sorted_keys() {
            let Some(action) = self.registry.get(key).and_then(|id| self.action(id)) else {
                continue;
            };
            if self.config.show_internal_actions || !action.name().starts_with('_') {
                rows.push(vec![
                    format!("/{key}"),
                    action.class_name().to_string(),
                    action.name().to_string(),
                ]);
            }
        }

        let mut out = build_table(&rows, &["Private", "Class", "Method"], "Loaded Private actions:");
        for dispatch_type in &self.dispatch_types {
            out.push('\n');
            out.push_str(&dispatch_type.list());
        }
        out
    }

    /// Resolve the request path of `ctx` to an action.
    ///
    /// Tries the whole path first, then shorter prefixes, moving each removed
    /// segment (percent-decoded) to the front of the argument list. The first
    /// dispatch type reporting an exact match sets the action and arguments
    /// on the context. Returns the resolved action, `None` when even the root
    /// did not match.
    pub fn prepare_action(&self, ctx: &mut Context<'_>) -> Option<ActionId> {
        let path = ctx.request().path().to_string();
        let mut pos = path.len();
        let mut args = ArgVec::new();

        loop {
            let candidate = &path[..pos];
            for dispatch_type in &self.dispatch_types {
                if dispatch_type.match_path(ctx, candidate, &args) == MatchType::ExactMatch {
                    debug!(
                        request_id = %ctx.request().id(),
                        path = %path,
                        matched = %ctx.request().match_path(),
                        args = ?ctx.request().args(),
                        dispatch_type = dispatch_type.name(),
                        "Path resolved"
                    );
                    return ctx.action();
                }
            }

            if pos == 0 {
                break;
            }

            let (head, segment) = match candidate.rfind('/') {
                Some(i) => (i, &candidate[i + 1..]),
                None => (0, candidate),
            };
            // repeated or trailing slashes produce no argument
            if !segment.is_empty() {
                args.insert(0, decode_segment(segment));
            }
            pos = head;
        }

        debug!(request_id = %ctx.request().id(), path = %path, "No dispatch type matched");
        None
    }

    /// Run the resolved action through its namespace's `_DISPATCH` hook.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NoDefaultAction`] for an unresolved empty path,
    /// [`DispatchError::UnknownResource`] for any other unresolved path. The
    /// message is also recorded on the context.
    pub fn dispatch(&self, ctx: &mut Context<'_>) -> Result<bool, DispatchError> {
        if let Some(action) = ctx.resolved_action() {
            let hook = if action.namespace().is_empty() {
                "/_DISPATCH".to_string()
            } else {
                format!("/{}/_DISPATCH", action.namespace())
            };
            return Ok(self.forward_by_name(ctx, &hook));
        }

        let path = ctx.request().path();
        let err = if path.is_empty() {
            DispatchError::NoDefaultAction
        } else {
            DispatchError::UnknownResource {
                path: path.to_string(),
            }
        };
        warn!(request_id = %ctx.request().id(), path = %path, error = %err, "Dispatch failed");
        ctx.error(err.to_string());
        Err(err)
    }

    /// Execute a component directly, bypassing resolution
    pub fn forward(&self, ctx: &mut Context<'_>, action: ActionId) -> bool {
        ctx.execute(action)
    }

    /// Resolve `name` with [`Dispatcher::command_to_action`] and execute it.
    /// Logs an error and returns `false` when nothing matches.
    pub fn forward_by_name(&self, ctx: &mut Context<'_>, name: &str) -> bool {
        match self.command_to_action(ctx, name) {
            Some(id) => ctx.execute(id),
            None => {
                error!(request_id = %ctx.request().id(), action = %name, "Action not found");
                false
            }
        }
    }

    /// Internal name resolution.
    ///
    /// A name containing `/` that is an exact registry key wins. Otherwise
    /// the name is made absolute against the namespace of the executing
    /// action, its last segment is taken as the action name and the namespace
    /// is shortened one segment at a time down to the root until an action is
    /// found. Bare names therefore always prefer the closest namespace.
    #[must_use]
    pub fn command_to_action(&self, ctx: &Context<'_>, command: &str) -> Option<ActionId> {
        if command.contains('/') {
            if let Some(id) = self.registry.get(command) {
                return Some(id);
            }
        }
        self.invoke_as_path(ctx.namespace(), command)
    }

    fn invoke_as_path(&self, current_namespace: &str, relative: &str) -> Option<ActionId> {
        let path = action_rel_to_abs(current_namespace, relative);
        let (namespace, name) = split_action_path(&path);
        let found = namespace_lineage(namespace)
            .chain(std::iter::once(""))
            .find_map(|ns| self.get_action(name, ns));
        found
    }

    /// Action registered as `namespace/name`
    #[must_use]
    pub fn get_action(&self, name: &str, namespace: &str) -> Option<ActionId> {
        if name.is_empty() {
            return None;
        }
        self.registry.lookup_by_key(namespace, name)
    }

    /// Action registered under `path`, one leading slash ignored
    #[must_use]
    pub fn get_action_by_path(&self, path: &str) -> Option<ActionId> {
        self.registry.lookup_by_path(path)
    }

    /// Every action named `name` visible from `namespace`, closest first
    #[must_use]
    pub fn get_actions(&self, name: &str, namespace: &str) -> ActionList {
        if name.is_empty() {
            return ActionList::new();
        }
        self.registry
            .actions_in_namespace(name, namespace, |id| self.action(id).map(Action::name))
    }

    /// Path reaching `action` with `captures`, from the first dispatch type
    /// owning it. An empty path is reported as `/`.
    #[must_use]
    pub fn uri_for_action(&self, action: ActionId, captures: &[String]) -> Option<String> {
        let action = self.action(action)?;
        self.dispatch_types
            .iter()
            .find_map(|dt| dt.uri_for_action(action, captures))
            .map(|uri| if uri.is_empty() { "/".to_string() } else { uri })
    }

    /// Look up an action by handle
    #[must_use]
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.controllers
            .get(id.controller())?
            .actions()
            .get(id.index())
    }

    /// Dispatch types still in use, in match order
    #[must_use]
    pub fn dispatchers(&self) -> &[Box<dyn DispatchType>] {
        &self.dispatch_types
    }

    /// Controllers that contributed at least one action, by name
    pub fn controllers(&self) -> impl Iterator<Item = (&str, &Arc<dyn Controller>)> {
        self.controller_names
            .iter()
            .filter_map(|(name, slot)| Some((name.as_str(), self.controllers.get(*slot)?)))
    }

    #[must_use]
    pub fn controller(&self, name: &str) -> Option<&Arc<dyn Controller>> {
        self.controllers.get(*self.controller_names.get(name)?)
    }

    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> DispatcherConfig {
        self.config
    }
}
