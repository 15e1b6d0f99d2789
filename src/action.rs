//! # Actions
//!
//! An [`Action`] is a single invocable handler bound to a namespace and a name.
//! Actions are declared by controllers at startup and never change afterwards;
//! the dispatcher only keeps lightweight [`ActionId`] handles to them.
//!
//! Routing behaviour is driven by attributes written in the declaration style
//! used by controller annotations:
//!
//! ```rust
//! use brrtdispatch::action::Attributes;
//!
//! let attrs = Attributes::parse(":Path('show') :Args(1)");
//! assert_eq!(attrs.get("Path"), Some("show"));
//! assert_eq!(attrs.get("Args"), Some("1"));
//! ```

use crate::context::Context;
use crate::dispatcher::clean_namespace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Attribute marking an action as reachable only through internal lookup
pub const PRIVATE: &str = "Private";

/// Lifecycle hook names every controller may declare. They are internal and
/// never reported as unroutable.
pub const RESERVED_NAMES: [&str; 5] = ["_DISPATCH", "_BEGIN", "_AUTO", "_ACTION", "_END"];

/// Handler invoked when an action executes. Returning `false` stops the
/// surrounding lifecycle chain.
pub type ActionHandler = Arc<dyn Fn(&mut Context<'_>) -> bool + Send + Sync>;

/// Ordered list of action handles; order decides lookup precedence
pub type ActionList = Vec<ActionId>;

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#":(\w+)(?:\(\s*(?:'([^']*)'|"([^"]*)"|([^)]*?))\s*\))?"#)
        .expect("attribute regex should be valid")
});

/// Handle to an action owned by a controller.
///
/// The first component indexes the dispatcher's controller list, the second
/// the controller's action slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId {
    controller: usize,
    index: usize,
}

impl ActionId {
    #[must_use]
    pub fn new(controller: usize, index: usize) -> Self {
        Self { controller, index }
    }

    #[inline]
    #[must_use]
    pub fn controller(self) -> usize {
        self.controller
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.controller, self.index)
    }
}

/// Ordered `name -> value` attribute pairs.
///
/// Duplicated names are kept; [`Attributes::get`] returns the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration such as `:Path('/users') :Args(1) :Private`.
    ///
    /// Values may be bare or quoted with `'` or `"`. Text outside of
    /// `:Name(...)` groups is ignored.
    #[must_use]
    pub fn parse(declaration: &str) -> Self {
        let mut attrs = Self::new();
        for caps in ATTRIBUTE_RE.captures_iter(declaration) {
            let name = &caps[1];
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().trim())
                .unwrap_or("");
            attrs.insert(name, value);
        }
        attrs
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a numeric attribute. Missing, empty or non-numeric values yield
    /// `None`, which callers treat as "unlimited".
    #[must_use]
    pub fn count(&self, name: &str) -> Option<usize> {
        self.get(name).and_then(|v| v.trim().parse().ok())
    }
}

/// A single invocable handler bound to `namespace/name`
#[derive(Clone)]
pub struct Action {
    name: String,
    namespace: String,
    reverse: String,
    class_name: String,
    attributes: Attributes,
    handler: Option<ActionHandler>,
}

impl Action {
    /// Create an action without attributes or handler.
    ///
    /// The namespace is cleaned: leading, trailing and repeated slashes are
    /// removed.
    #[must_use]
    pub fn new(namespace: &str, name: &str) -> Self {
        let namespace = clean_namespace(namespace);
        let reverse = reverse_key(&namespace, name);
        Self {
            name: name.to_string(),
            namespace,
            reverse,
            class_name: String::new(),
            attributes: Attributes::new(),
            handler: None,
        }
    }

    /// Start declaring an action; the namespace is supplied when the
    /// declaring controller builds it.
    #[must_use]
    pub fn builder(name: &str) -> ActionBuilder {
        ActionBuilder {
            name: name.to_string(),
            attributes: Attributes::new(),
            handler: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `namespace/name`, or just `name` for root actions
    #[inline]
    #[must_use]
    pub fn reverse(&self) -> &str {
        &self.reverse
    }

    /// Name of the declaring controller, used in diagnostics
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.attributes.contains(PRIVATE)
    }

    /// One of the five lifecycle hook names
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        RESERVED_NAMES.contains(&self.name.as_str())
    }

    /// Declared argument count, `None` meaning any number
    #[must_use]
    pub fn number_of_args(&self) -> Option<usize> {
        self.attributes.count("Args")
    }

    /// Whether `count` trailing arguments satisfy the `Args` declaration
    #[must_use]
    pub fn accepts_args(&self, count: usize) -> bool {
        self.number_of_args().is_none_or(|n| n == count)
    }

    /// Run the handler. Actions without a handler succeed.
    pub fn run(&self, ctx: &mut Context<'_>) -> bool {
        match &self.handler {
            Some(handler) => handler(ctx),
            None => true,
        }
    }

    pub(crate) fn set_class_name(&mut self, class_name: &str) {
        self.class_name = class_name.to_string();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("reverse", &self.reverse)
            .field("class_name", &self.class_name)
            .field("attributes", &self.attributes)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Builder returned by [`Action::builder`]
#[derive(Clone)]
pub struct ActionBuilder {
    name: String,
    attributes: Attributes,
    handler: Option<ActionHandler>,
}

impl ActionBuilder {
    #[must_use]
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Append every attribute of a `:Name(value)` declaration
    #[must_use]
    pub fn attributes(mut self, declaration: &str) -> Self {
        for (k, v) in Attributes::parse(declaration).iter() {
            self.attributes.insert(k, v);
        }
        self
    }

    #[must_use]
    pub fn private(self) -> Self {
        self.attribute(PRIVATE, "")
    }

    #[must_use]
    pub fn path(self, path: &str) -> Self {
        self.attribute("Path", path)
    }

    #[must_use]
    pub fn args(self, count: usize) -> Self {
        self.attribute("Args", &count.to_string())
    }

    #[must_use]
    pub fn chained(self, parent: &str) -> Self {
        self.attribute("Chained", parent)
    }

    #[must_use]
    pub fn path_part(self, part: &str) -> Self {
        self.attribute("PathPart", part)
    }

    #[must_use]
    pub fn capture_args(self, count: usize) -> Self {
        self.attribute("CaptureArgs", &count.to_string())
    }

    #[must_use]
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> bool + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the declaration to a namespace
    #[must_use]
    pub fn build(self, namespace: &str) -> Action {
        let mut action = Action::new(namespace, &self.name);
        action.attributes = self.attributes;
        action.handler = self.handler;
        action
    }
}

/// Join a cleaned namespace and a name into a registry key
#[must_use]
pub fn reverse_key(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}/{name}")
    }
}
