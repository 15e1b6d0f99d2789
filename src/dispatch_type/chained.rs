use super::{build_table, decode_segment, normalize_path, segments, DispatchType, MatchType};
use crate::action::{reverse_key, Action, ActionId, ActionList};
use crate::context::{ArgVec, Context};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Parent marker for links attached to the chain root
const ROOT: &str = "/";

#[derive(Debug, Clone)]
struct ChainLink {
    id: ActionId,
    /// `/namespace/name`
    private_path: String,
    parent: String,
    part: Vec<String>,
    capture_args: Option<usize>,
    args: Option<usize>,
}

impl ChainLink {
    fn is_endpoint(&self) -> bool {
        self.capture_args.is_none()
    }
}

struct ChainMatch<'a> {
    links: Vec<&'a ChainLink>,
    captures: ArgVec,
    args: ArgVec,
}

/// Multi-part chain matcher.
///
/// Links declare their parent with `:Chained`, the literal segment(s) they
/// consume with `:PathPart` (defaults to the action name) and how many
/// segments they capture with `:CaptureArgs`. A link without `:CaptureArgs`
/// is an endpoint; its `:Args` fixes the trailing argument count.
///
/// ```text
/// /users/42/posts/7  ->  users/load (captures 42) -> posts/load (captures 7) -> posts/view
/// ```
///
/// Chains only match whole request paths: a prefix with pending arguments is
/// never claimed here.
#[derive(Debug, Default)]
pub struct ChainedDispatchType {
    links: HashMap<String, ChainLink>,
    children_of: HashMap<String, Vec<String>>,
    endpoints: Vec<String>,
}

impl ChainedDispatchType {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn parent_path(action: &Action, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() || raw == ROOT {
            ROOT.to_string()
        } else if raw.starts_with('/') {
            format!("/{}", normalize_path(raw))
        } else {
            format!("/{}", normalize_path(&reverse_key(action.namespace(), raw)))
        }
    }

    fn recurse_match<'a>(&'a self, parent: &str, parts: &[&str], depth: usize) -> Option<ChainMatch<'a>> {
        if depth > self.links.len() {
            return None;
        }
        let children = self.children_of.get(parent)?;

        let mut best: Option<ChainMatch<'a>> = None;
        for child_path in children {
            let Some(child) = self.links.get(child_path) else {
                continue;
            };
            if parts.len() < child.part.len()
                || !child
                    .part
                    .iter()
                    .zip(parts)
                    .all(|(want, got)| *want == decode_segment(got))
            {
                continue;
            }
            let remaining = &parts[child.part.len()..];

            let candidate = match child.capture_args {
                Some(n) => {
                    if remaining.len() < n {
                        continue;
                    }
                    let Some(sub) = self.recurse_match(&child.private_path, &remaining[n..], depth + 1)
                    else {
                        continue;
                    };
                    let mut links = Vec::with_capacity(sub.links.len() + 1);
                    links.push(child);
                    links.extend(sub.links);
                    let mut captures: ArgVec = remaining[..n].iter().map(|s| decode_segment(s)).collect();
                    captures.extend(sub.captures);
                    ChainMatch {
                        links,
                        captures,
                        args: sub.args,
                    }
                }
                None => {
                    if child.args.is_some_and(|n| n != remaining.len()) {
                        continue;
                    }
                    ChainMatch {
                        links: vec![child],
                        captures: ArgVec::new(),
                        args: remaining.iter().map(|s| decode_segment(s)).collect(),
                    }
                }
            };

            if best.as_ref().is_none_or(|b| candidate.args.len() < b.args.len()) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Walk from an endpoint to the chain root, endpoint first
    fn lineage<'a>(&'a self, endpoint: &'a ChainLink) -> Option<Vec<&'a ChainLink>> {
        let mut lineage = vec![endpoint];
        let mut current = endpoint;
        while current.parent != ROOT {
            if lineage.len() > self.links.len() {
                return None;
            }
            current = self.links.get(&current.parent)?;
            lineage.push(current);
        }
        Some(lineage)
    }
}

impl DispatchType for ChainedDispatchType {
    fn name(&self) -> &'static str {
        "Chained"
    }

    fn register_action(&mut self, id: ActionId, action: &Action) -> bool {
        let attrs = action.attributes();
        let Some(chained) = attrs.get("Chained") else {
            return false;
        };

        if attrs.contains("CaptureArgs") && attrs.contains("Args") {
            warn!(
                action = %action.reverse(),
                "Chained action declares both CaptureArgs and Args; ignoring it"
            );
            return false;
        }

        let part = match attrs.get("PathPart") {
            Some(part) => segments(part).map(str::to_string).collect(),
            None => vec![action.name().to_string()],
        };
        let link = ChainLink {
            id,
            private_path: format!("/{}", action.reverse()),
            parent: Self::parent_path(action, chained),
            part,
            capture_args: attrs.contains("CaptureArgs").then(|| attrs.count("CaptureArgs").unwrap_or(0)),
            args: action.number_of_args(),
        };

        debug!(
            action = %action.reverse(),
            parent = %link.parent,
            part = %link.part.join("/"),
            capture_args = ?link.capture_args,
            args = ?link.args,
            "Chained action registered"
        );

        let siblings = self.children_of.entry(link.parent.clone()).or_default();
        siblings.push(link.private_path.clone());
        let links = &self.links;
        let part_len = |path: &String| {
            links
                .get(path)
                .map_or(link.part.len(), |l| l.part.len())
        };
        // longest PathPart first so specific parts shadow shorter ones
        siblings.sort_by_key(|p| std::cmp::Reverse(part_len(p)));

        if link.is_endpoint() {
            self.endpoints.push(link.private_path.clone());
        }
        self.links.insert(link.private_path.clone(), link);
        true
    }

    fn match_path(&self, ctx: &mut Context<'_>, path: &str, args: &ArgVec) -> MatchType {
        if !args.is_empty() {
            return MatchType::NoMatch;
        }

        let parts: Vec<&str> = segments(path).collect();
        let Some(found) = self.recurse_match(ROOT, &parts, 0) else {
            return MatchType::NoMatch;
        };
        let Some(endpoint) = found.links.last() else {
            return MatchType::NoMatch;
        };

        ctx.set_action(Some(endpoint.id));
        let chain: ActionList = found.links.iter().map(|l| l.id).collect();
        let request = ctx.request_mut();
        request.set_args(found.args);
        request.set_captures(found.captures);
        request.set_chain(chain);
        request.set_match_path(path);
        MatchType::ExactMatch
    }

    fn uri_for_action(&self, action: &Action, captures: &[String]) -> Option<String> {
        let endpoint = self.links.get(&format!("/{}", action.reverse()))?;
        if !endpoint.is_endpoint() {
            return None;
        }

        let mut remaining = captures;
        let mut pieces: Vec<String> = Vec::new();
        for link in self.lineage(endpoint)? {
            let mut chunk: Vec<String> = link
                .part
                .iter()
                .map(|p| urlencoding::encode(p).into_owned())
                .collect();
            if let Some(n) = link.capture_args {
                if remaining.len() < n {
                    return None;
                }
                let split = remaining.len() - n;
                chunk.extend(
                    remaining[split..]
                        .iter()
                        .map(|c| urlencoding::encode(c).into_owned()),
                );
                remaining = &remaining[..split];
            }
            pieces.splice(0..0, chunk);
        }

        if !remaining.is_empty() {
            return None;
        }
        Some(format!("/{}", pieces.join("/")))
    }

    fn in_use(&self) -> bool {
        !self.endpoints.is_empty()
    }

    fn list(&self) -> String {
        let mut endpoints: Vec<&String> = self.endpoints.iter().collect();
        endpoints.sort();

        let mut rows = Vec::new();
        for key in endpoints {
            let Some(endpoint) = self.links.get(key) else {
                continue;
            };
            let Some(mut lineage) = self.lineage(endpoint) else {
                rows.push(vec!["(unattached)".to_string(), key.clone()]);
                continue;
            };
            lineage.reverse();

            let mut spec = Vec::new();
            for link in &lineage {
                spec.extend(link.part.iter().cloned());
                let stars = link.capture_args.or(link.args);
                match stars {
                    Some(n) => spec.extend(std::iter::repeat_n("*".to_string(), n)),
                    None => spec.push("...".to_string()),
                }
            }
            let private: Vec<&str> = lineage.iter().map(|l| l.private_path.as_str()).collect();
            rows.push(vec![format!("/{}", spec.join("/")), private.join(" -> ")]);
        }
        build_table(&rows, &["Path Spec", "Private"], "Loaded Chained actions:")
    }
}
