//! Tests for path resolution, internal forwarding and the dispatch lifecycle
//!
//! # Test Coverage
//!
//! - Longest-prefix resolution with trailing segments as arguments
//! - Root fallback for `/` and the empty path
//! - Resolution misses reported as `NoDefaultAction` / `UnknownResource`
//! - Relative forwards walking up the namespace hierarchy
//! - Reverse URIs resolving back to their action
//! - Begin/Auto/End ordering and Auto short-circuiting
//! - Concurrent resolution through `SharedDispatcher`

mod common;

use brrtdispatch::echo::trail;
use brrtdispatch::{Action, ActionController, Context, DispatchError, Request, SharedDispatcher};
use common::{app, deny, echo, resolve, setup};
use std::sync::Arc;
use std::thread;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_longest_prefix_moves_segments_to_args() {
    let dispatcher = app();
    assert_eq!(
        resolve(&dispatcher, "/a/b/extra/segments"),
        Some(("a/b/catchall".to_string(), strings(&["extra", "segments"])))
    );
    assert_eq!(
        resolve(&dispatcher, "/a/b/settings"),
        Some(("a/b/settings".to_string(), vec![]))
    );
}

#[test]
fn test_fixed_arity_falls_back_to_shorter_prefix() {
    let dispatcher = app();
    assert_eq!(
        resolve(&dispatcher, "/users/show/7"),
        Some(("users/show".to_string(), strings(&["7"])))
    );
    // show wants exactly one argument; the users path takes any number
    assert_eq!(
        resolve(&dispatcher, "/users/show/7/8"),
        Some(("users/list".to_string(), strings(&["show", "7", "8"])))
    );
}

#[test]
fn test_args_are_percent_decoded_and_empty_segments_dropped() {
    let dispatcher = app();
    assert_eq!(
        resolve(&dispatcher, "/users/show/a%20b"),
        Some(("users/show".to_string(), strings(&["a b"])))
    );
    assert_eq!(
        resolve(&dispatcher, "/users//x/"),
        Some(("users/list".to_string(), strings(&["x"])))
    );
}

#[test]
fn test_root_fallback() {
    let dispatcher = app();
    for path in ["/", ""] {
        assert_eq!(
            resolve(&dispatcher, path),
            Some(("index".to_string(), vec![])),
            "path {path:?}"
        );
    }
}

#[test]
fn test_no_match_reports_error() {
    let dispatcher = setup(vec![
        ActionController::new("Users", "users").action(echo("list", ":Path"))
    ]);

    let mut ctx = Context::new(&dispatcher, Request::new("/"));
    assert_eq!(dispatcher.prepare_action(&mut ctx), None);
    assert_eq!(dispatcher.dispatch(&mut ctx), Err(DispatchError::NoDefaultAction));
    assert_eq!(ctx.errors(), ["No default action defined"]);

    let mut ctx = Context::new(&dispatcher, Request::new("/nothing/here"));
    assert_eq!(dispatcher.prepare_action(&mut ctx), None);
    let err = dispatcher.dispatch(&mut ctx).expect_err("unknown");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Unknown resource \"nothing/here\".");
    assert_eq!(ctx.errors(), ["Unknown resource \"nothing/here\"."]);
}

#[test]
fn test_unknown_path_under_root_with_fixed_args() {
    let dispatcher = app();
    assert_eq!(resolve(&dispatcher, "/nothing"), None);
}

#[test]
fn test_relative_forward_walks_up_namespaces() {
    let build = |in_nested: bool, in_middle: bool, in_root: bool| {
        let with_sibling = |controller: ActionController, declared: bool| {
            if declared {
                controller.action(echo("sibling", ":Private"))
            } else {
                controller
            }
        };
        let nested = ActionController::new("Nested", "a/b").action(
            Action::builder("trigger")
                .private()
                .handler(|ctx| ctx.forward("sibling")),
        );
        setup(vec![
            with_sibling(nested, in_nested),
            with_sibling(ActionController::new("Middle", "a"), in_middle),
            with_sibling(ActionController::new("Root", ""), in_root),
        ])
    };

    for (in_nested, in_middle, in_root, expected) in [
        (true, true, true, "a/b/sibling"),
        (true, true, false, "a/b/sibling"),
        (true, false, true, "a/b/sibling"),
        (false, true, true, "a/sibling"),
        (false, true, false, "a/sibling"),
        (false, false, true, "sibling"),
    ] {
        let dispatcher = build(in_nested, in_middle, in_root);
        let mut ctx = Context::new(&dispatcher, Request::new("/"));
        assert!(ctx.forward("/a/b/trigger"));
        assert_eq!(trail(&ctx), [expected]);
    }
}

#[test]
fn test_forward_with_slash_takes_exact_key() {
    let dispatcher = setup(vec![
        ActionController::new("Nested", "a/b")
            .action(echo("sibling", ":Private"))
            .action(
                Action::builder("trigger")
                    .private()
                    .handler(|ctx| ctx.forward("x/sibling")),
            ),
        ActionController::new("Other", "x").action(echo("sibling", ":Private")),
    ]);
    let mut ctx = Context::new(&dispatcher, Request::new("/"));
    assert!(ctx.forward("/a/b/trigger"));
    assert_eq!(trail(&ctx), ["x/sibling"]);
}

#[test]
fn test_namespace_auto_runs_alongside_root_auto() {
    let dispatcher = setup(vec![
        ActionController::new("Root", "")
            .action(echo("Begin", ":Private"))
            .action(echo("Auto", ":Private")),
        ActionController::new("Open", "open")
            .action(echo("Auto", ":Private"))
            .action(echo("page", ":Path")),
        ActionController::new("Locked", "locked")
            .action(deny("Auto", ":Private"))
            .action(echo("secret", ":Path")),
    ]);

    let mut ctx = Context::new(&dispatcher, Request::new("/open"));
    dispatcher.prepare_action(&mut ctx).expect("resolved");
    assert_eq!(dispatcher.dispatch(&mut ctx), Ok(true));
    assert_eq!(trail(&ctx), ["Begin", "Auto", "open/Auto", "open/page"]);

    let mut ctx = Context::new(&dispatcher, Request::new("/locked"));
    dispatcher.prepare_action(&mut ctx).expect("resolved");
    assert_eq!(dispatcher.dispatch(&mut ctx), Ok(false));
    assert_eq!(trail(&ctx), ["Begin", "Auto", "locked/Auto"]);
}

#[test]
fn test_forward_to_missing_action_fails() {
    let dispatcher = app();
    let mut ctx = Context::new(&dispatcher, Request::new("/"));
    assert!(!ctx.forward("/does/not/exist"));
    assert!(trail(&ctx).is_empty());
}

#[test]
fn test_uri_round_trip() {
    let dispatcher = app();
    let cases: [(&str, &str, &[&str]); 5] = [
        ("index", "", &[]),
        ("list", "users", &[]),
        ("settings", "a/b", &[]),
        ("view", "users", &["42"]),
        ("edit", "users", &["a b"]),
    ];

    for (name, namespace, captures) in cases {
        let id = dispatcher.get_action(name, namespace).expect("action");
        let captures = strings(captures);
        let uri = dispatcher.uri_for_action(id, &captures).expect("uri");

        let mut ctx = Context::new(&dispatcher, Request::new(&uri));
        assert_eq!(dispatcher.prepare_action(&mut ctx), Some(id), "uri {uri}");
        assert_eq!(ctx.request().captures(), captures.as_slice(), "uri {uri}");
    }
}

#[test]
fn test_uri_for_unroutable_or_mismatched_captures() {
    let dispatcher = app();
    let auto = dispatcher.get_action("Auto", "users").expect("auto");
    assert_eq!(dispatcher.uri_for_action(auto, &[]), None);

    let view = dispatcher.get_action("view", "users").expect("view");
    assert_eq!(dispatcher.uri_for_action(view, &[]), None);
    assert_eq!(dispatcher.uri_for_action(view, &strings(&["1", "2"])), None);

    let load = dispatcher.get_action("load", "users").expect("load");
    assert_eq!(dispatcher.uri_for_action(load, &strings(&["1"])), None);
}

#[test]
fn test_index_uri_is_slash() {
    let dispatcher = app();
    let index = dispatcher.get_action("index", "").expect("index");
    assert_eq!(dispatcher.uri_for_action(index, &[]).as_deref(), Some("/"));
}

#[test]
fn test_dispatch_runs_lifecycle_in_order() {
    let dispatcher = app();
    let mut ctx = Context::new(&dispatcher, Request::new("/users/show/1"));
    dispatcher.prepare_action(&mut ctx).expect("resolved");

    assert_eq!(dispatcher.dispatch(&mut ctx), Ok(true));
    assert_eq!(
        trail(&ctx),
        ["Begin", "Auto", "users/Auto", "users/show", "End"]
    );
}

#[test]
fn test_dispatch_runs_every_chain_link() {
    let dispatcher = app();
    let mut ctx = Context::new(&dispatcher, Request::new("/members/42/edit"));
    dispatcher.prepare_action(&mut ctx).expect("resolved");

    assert_eq!(dispatcher.dispatch(&mut ctx), Ok(true));
    assert_eq!(
        trail(&ctx),
        ["Begin", "Auto", "users/Auto", "users/base", "users/load", "users/edit", "End"]
    );
}

#[test]
fn test_failing_auto_skips_action_but_runs_end() {
    let dispatcher = setup(vec![
        ActionController::new("Root", "")
            .action(echo("Auto", ":Private"))
            .action(echo("End", ":Private")),
        ActionController::new("Locked", "locked")
            .action(deny("Auto", ":Private"))
            .action(echo("secret", ":Path")),
    ]);

    let mut ctx = Context::new(&dispatcher, Request::new("/locked"));
    dispatcher.prepare_action(&mut ctx).expect("resolved");
    assert_eq!(dispatcher.dispatch(&mut ctx), Ok(false));
    assert_eq!(trail(&ctx), ["Auto", "locked/Auto", "End"]);
}

#[test]
fn test_root_controller_hooks_apply_to_root_actions() {
    let dispatcher = app();
    let mut ctx = Context::new(&dispatcher, Request::new("/"));
    dispatcher.prepare_action(&mut ctx).expect("resolved");
    assert_eq!(dispatcher.dispatch(&mut ctx), Ok(true));
    assert_eq!(trail(&ctx), ["Begin", "Auto", "index", "End"]);
}

#[test]
fn test_get_actions_most_specific_first() {
    let dispatcher = app();
    let names: Vec<&str> = dispatcher
        .get_actions("Auto", "/users/")
        .into_iter()
        .filter_map(|id| dispatcher.action(id).map(Action::reverse))
        .collect();
    assert_eq!(names, ["users/Auto", "Auto"]);
}

#[test]
fn test_shared_dispatcher_across_threads() {
    let shared = Arc::new(SharedDispatcher::new());
    assert!(!shared.is_ready());
    assert!(shared.load().is_none());

    shared.publish(app());
    assert!(shared.is_ready());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let dispatcher = shared.load().expect("published");
                let path = format!("/users/show/{i}");
                resolve(&dispatcher, &path)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let resolved = handle.join().expect("thread");
        assert_eq!(resolved, Some(("users/show".to_string(), vec![i.to_string()])));
    }
}
