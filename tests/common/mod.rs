#![allow(dead_code)]

use brrtdispatch::echo::echo_handler;
use brrtdispatch::{Action, ActionBuilder, ActionController, Context, Controller, Dispatcher, DispatcherConfig, Request};
use std::sync::Arc;

/// Action that records itself in the `trail` stash entry
pub fn echo(name: &str, declaration: &str) -> ActionBuilder {
    Action::builder(name)
        .attributes(declaration)
        .handler(echo_handler(false))
}

/// Action that records itself and then fails
pub fn deny(name: &str, declaration: &str) -> ActionBuilder {
    Action::builder(name)
        .attributes(declaration)
        .handler(echo_handler(true))
}

pub fn setup(controllers: Vec<ActionController>) -> Dispatcher {
    setup_with(DispatcherConfig::default(), controllers)
}

pub fn setup_with(config: DispatcherConfig, controllers: Vec<ActionController>) -> Dispatcher {
    let mut dispatcher = Dispatcher::new(config);
    let controllers: Vec<Arc<dyn Controller>> = controllers
        .into_iter()
        .map(|c| Arc::new(c) as Arc<dyn Controller>)
        .collect();
    dispatcher.setup_actions(controllers).expect("setup");
    dispatcher
}

/// Reverse key of the action `path` resolves to, with its arguments
pub fn resolve(dispatcher: &Dispatcher, path: &str) -> Option<(String, Vec<String>)> {
    let mut ctx = Context::new(dispatcher, Request::new(path));
    let id = dispatcher.prepare_action(&mut ctx)?;
    let reverse = dispatcher.action(id)?.reverse().to_string();
    Some((reverse, ctx.request().args().to_vec()))
}

/// A small application: root hooks, a users controller with literal and
/// chained actions, and an admin area.
pub fn app() -> Dispatcher {
    setup(vec![
        ActionController::new("Root", "")
            .action(echo("index", ":Path('/') :Args(0)"))
            .action(echo("Begin", ":Private"))
            .action(echo("Auto", ":Private"))
            .action(echo("End", ":Private")),
        ActionController::new("Users", "users")
            .action(echo("list", ":Path"))
            .action(echo("show", ":Local :Args(1)"))
            .action(echo("Auto", ":Private"))
            .action(echo("base", ":Chained('/') :PathPart('members') :CaptureArgs(0)"))
            .action(echo("load", ":Chained('base') :PathPart('') :CaptureArgs(1)"))
            .action(echo("view", ":Chained('load') :PathPart('') :Args(0)"))
            .action(echo("edit", ":Chained('load') :PathPart('edit') :Args(0)")),
        ActionController::new("Admin", "a/b")
            .action(echo("catchall", ":Path"))
            .action(echo("settings", ":Local :Args(0)")),
    ])
}
