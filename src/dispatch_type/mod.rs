//! # Dispatch Types
//!
//! Pluggable path-matching strategies consulted by the dispatcher.
//!
//! ## Overview
//!
//! Every dispatch type owns an index built while actions are registered at
//! startup and answers four questions afterwards:
//!
//! - **register** - does this action belong to me? (`register_action`)
//! - **match** - does this path prefix resolve to one of my actions? (`match_path`)
//! - **reverse** - what path reaches this action? (`uri_for_action`)
//! - **usage** - did I claim anything at all? (`in_use`)
//!
//! Two strategies ship with the crate:
//!
//! - [`PathDispatchType`] - literal paths declared with `:Path`, `:Local` or
//!   `:Global`, with an optional fixed argument count (`:Args(N)`).
//! - [`ChainedDispatchType`] - multi-part chains declared with `:Chained`,
//!   `:PathPart` and `:CaptureArgs`, capturing segments along the way.
//!
//! The dispatcher keeps them in registration order; the first type to report
//! [`MatchType::ExactMatch`] wins.

mod chained;
mod path;

pub use chained::ChainedDispatchType;
pub use path::PathDispatchType;

use crate::action::{Action, ActionId};
use crate::context::{ArgVec, Context};
use std::borrow::Cow;

/// Outcome of offering a path prefix to a dispatch type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    NoMatch,
    ExactMatch,
}

/// A path-matching strategy.
///
/// Implementations are mutated only during setup (`register_action`); every
/// other method takes `&self` and is called concurrently afterwards.
pub trait DispatchType: Send + Sync {
    /// Short name used in logs and listings
    fn name(&self) -> &'static str;

    /// Index `action` if it belongs to this strategy. Returns whether it was claimed.
    fn register_action(&mut self, id: ActionId, action: &Action) -> bool;

    /// Test a path prefix. `args` holds the segments already peeled off the
    /// end of the request path, in path order. On a match the implementation
    /// sets the resolved action and the final arguments on `ctx`.
    fn match_path(&self, ctx: &mut Context<'_>, path: &str, args: &ArgVec) -> MatchType;

    /// Inverse of `match_path`. `None` when the action is not owned here or
    /// the captures do not fit.
    fn uri_for_action(&self, action: &Action, captures: &[String]) -> Option<String>;

    /// Whether any action was ever claimed
    fn in_use(&self) -> bool;

    /// Human-readable table of the claimed actions
    fn list(&self) -> String;
}

/// Percent-decode one path segment. Invalid UTF-8 escapes keep the raw text.
pub(crate) fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string())
}

/// Split a path into its non-empty segments
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Normalise a path: no leading, trailing or repeated slashes
pub(crate) fn normalize_path(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

/// Render rows as a boxed text table for diagnostics
#[must_use]
pub fn build_table(rows: &[Vec<String>], headers: &[&str], title: &str) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(title);
        out.push('\n');
    }
    out.push_str(&table_border(&widths, '.'));
    out.push_str(&table_line(&widths, headers));
    out.push_str(&table_border(&widths, '+'));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&table_line(&widths, &cells));
    }
    out.push_str(&table_border(&widths, '\''));
    out
}

fn table_border(widths: &[usize], corner: char) -> String {
    let inner: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("{corner}{}{corner}\n", inner.join("+"))
}

fn table_line(widths: &[usize], cells: &[&str]) -> String {
    let inner: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).copied().unwrap_or("");
            let pad = w.saturating_sub(cell.chars().count());
            format!(" {cell}{} ", " ".repeat(pad))
        })
        .collect();
    format!("|{}|\n", inner.join("|"))
}
