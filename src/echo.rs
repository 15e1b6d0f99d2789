use crate::context::Context;
use serde_json::{json, Value};

/// Stash key collecting the actions an echo handler ran
pub const TRAIL_KEY: &str = "trail";

// Handler for declared-only actions: records which action ran
pub fn echo_handler(deny: bool) -> impl Fn(&mut Context<'_>) -> bool + Send + Sync + 'static {
    move |ctx| {
        let reverse = ctx
            .stack()
            .last()
            .and_then(|id| ctx.dispatcher().action(*id))
            .map(|a| a.reverse().to_string())
            .unwrap_or_default();

        let trail = ctx
            .stash_mut()
            .entry(TRAIL_KEY)
            .or_insert_with(|| json!([]));
        if let Value::Array(items) = trail {
            items.push(Value::String(reverse));
        }
        !deny
    }
}

/// The trail recorded so far, in execution order
#[must_use]
pub fn trail(ctx: &Context<'_>) -> Vec<String> {
    ctx.stash()
        .get(TRAIL_KEY)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
