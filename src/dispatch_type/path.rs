use super::{build_table, normalize_path, DispatchType, MatchType};
use crate::action::{reverse_key, Action, ActionId};
use crate::context::{ArgVec, Context};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct PathEntry {
    id: ActionId,
    reverse: String,
    num_args: Option<usize>,
}

impl PathEntry {
    fn accepts(&self, count: usize) -> bool {
        self.num_args.is_none_or(|n| n == count)
    }
}

/// Literal path matcher.
///
/// Claims actions declared with `:Path`, `:Local` or `:Global`:
///
/// | Declaration      | Path (namespace `users`, name `show`) |
/// |------------------|---------------------------------------|
/// | `:Path`          | `users`                               |
/// | `:Path('show')`  | `users/show`                          |
/// | `:Path('/show')` | `show`                                |
/// | `:Local`         | `users/show`                          |
/// | `:Global`        | `show`                                |
///
/// Several actions may share a path when their `:Args` differ; fixed arities
/// are tried first (largest first), unlimited last.
#[derive(Debug, Default)]
pub struct PathDispatchType {
    paths: HashMap<String, Vec<PathEntry>>,
    owned: HashMap<String, String>,
}

impl PathDispatchType {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The normalised literal path an action declares, if any
    #[must_use]
    pub fn declared_path(action: &Action) -> Option<String> {
        let attrs = action.attributes();
        let raw = if let Some(path) = attrs.get("Path") {
            if path.starts_with('/') {
                path.to_string()
            } else if path.is_empty() {
                action.namespace().to_string()
            } else {
                reverse_key(action.namespace(), path)
            }
        } else if attrs.contains("Local") {
            action.reverse().to_string()
        } else if attrs.contains("Global") {
            action.name().to_string()
        } else {
            return None;
        };
        Some(normalize_path(&raw))
    }
}

impl DispatchType for PathDispatchType {
    fn name(&self) -> &'static str {
        "Path"
    }

    fn register_action(&mut self, id: ActionId, action: &Action) -> bool {
        let Some(path) = Self::declared_path(action) else {
            return false;
        };
        let num_args = action.number_of_args();

        let entries = self.paths.entry(path.clone()).or_default();
        if let Some(existing) = entries.iter().find(|e| e.num_args == num_args) {
            warn!(
                path = %path,
                action = %action.reverse(),
                registered_by = %existing.reverse,
                "Path already registered with the same argument count"
            );
            return false;
        }

        entries.push(PathEntry {
            id,
            reverse: action.reverse().to_string(),
            num_args,
        });
        entries.sort_by_key(|e| (e.num_args.is_none(), Reverse(e.num_args.unwrap_or(0))));
        self.owned.insert(action.reverse().to_string(), path.clone());

        debug!(path = %path, action = %action.reverse(), args = ?num_args, "Path action registered");
        true
    }

    fn match_path(&self, ctx: &mut Context<'_>, path: &str, args: &ArgVec) -> MatchType {
        let Some(entries) = self.paths.get(path) else {
            return MatchType::NoMatch;
        };
        let Some(entry) = entries.iter().find(|e| e.accepts(args.len())) else {
            return MatchType::NoMatch;
        };

        ctx.set_action(Some(entry.id));
        let request = ctx.request_mut();
        request.set_args(args.clone());
        request.set_match_path(path);
        MatchType::ExactMatch
    }

    fn uri_for_action(&self, action: &Action, captures: &[String]) -> Option<String> {
        if !captures.is_empty() {
            return None;
        }
        self.owned
            .get(action.reverse())
            .map(|path| format!("/{path}"))
    }

    fn in_use(&self) -> bool {
        !self.paths.is_empty()
    }

    fn list(&self) -> String {
        let mut keys: Vec<&String> = self.paths.keys().collect();
        keys.sort();

        let mut rows = Vec::new();
        for key in keys {
            for entry in &self.paths[key] {
                let mut display = format!("/{key}");
                match entry.num_args {
                    Some(n) => {
                        for _ in 0..n {
                            display.push_str(if display.ends_with('/') { "*" } else { "/*" });
                        }
                    }
                    None => display.push_str(if display.ends_with('/') { "..." } else { "/..." }),
                }
                rows.push(vec![display, format!("/{}", entry.reverse)]);
            }
        }
        build_table(&rows, &["Path", "Private"], "Loaded Path actions:")
    }
}
