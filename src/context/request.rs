use crate::action::ActionList;
use crate::ids::RequestId;
use smallvec::SmallVec;

/// Maximum number of arguments or captures before heap allocation.
/// Most action paths carry no more than a handful of trailing segments.
pub const MAX_INLINE_ARGS: usize = 8;

/// Inline storage for positional arguments and chained captures
pub type ArgVec = SmallVec<[String; MAX_INLINE_ARGS]>;

/// The request abstraction resolution reads from and writes into
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    path: String,
    args: ArgVec,
    captures: ArgVec,
    match_path: String,
    chain: ActionList,
}

impl Request {
    /// Create a request for `path`. Leading slashes are dropped, so `/` and
    /// the empty string both address the root.
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self::with_id(RequestId::new(), path)
    }

    #[must_use]
    pub fn with_id(id: RequestId, path: &str) -> Self {
        Self {
            id,
            path: path.trim_start_matches('/').to_string(),
            args: ArgVec::new(),
            captures: ArgVec::new(),
            match_path: String::new(),
            chain: ActionList::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Path without its leading slash
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Positional arguments left over after the matched prefix
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn set_args(&mut self, args: ArgVec) {
        self.args = args;
    }

    /// Values captured by chained links, in chain order
    #[inline]
    #[must_use]
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    pub fn set_captures(&mut self, captures: ArgVec) {
        self.captures = captures;
    }

    /// The prefix a dispatch type recognised
    #[inline]
    #[must_use]
    pub fn match_path(&self) -> &str {
        &self.match_path
    }

    pub fn set_match_path(&mut self, path: &str) {
        self.match_path = path.to_string();
    }

    /// Chain links to execute in order when a chained action matched
    #[inline]
    #[must_use]
    pub fn chain(&self) -> &[crate::action::ActionId] {
        &self.chain
    }

    pub fn set_chain(&mut self, chain: ActionList) {
        self.chain = chain;
    }
}
