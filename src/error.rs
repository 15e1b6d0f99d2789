use std::fmt;

/// Errors raised by the dispatcher
///
/// Setup produces [`DispatchError::DuplicateAction`] only when internal-action
/// diagnostics are enabled. The two resolution misses are returned by
/// [`crate::dispatcher::Dispatcher::dispatch`] and are never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Two controllers declared the same `namespace/name`
    DuplicateAction {
        /// The reverse key both actions share
        key: String,
        /// Controller whose action was rejected
        controller: String,
        /// Controller that registered the key first
        registered_by: String,
    },
    /// The request path was empty and no root action matched
    NoDefaultAction,
    /// No dispatch type recognised any prefix of the request path
    UnknownResource {
        /// The request path as received
        path: String,
    },
}

impl DispatchError {
    /// Whether this error is a request-time resolution miss (HTTP 404 territory)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DispatchError::NoDefaultAction | DispatchError::UnknownResource { .. }
        )
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::DuplicateAction {
                key,
                controller,
                registered_by,
            } => write!(
                f,
                "The action '{key}' of controller '{controller}' was already registered by \
                 controller '{registered_by}'"
            ),
            DispatchError::NoDefaultAction => write!(f, "No default action defined"),
            DispatchError::UnknownResource { path } => write!(f, "Unknown resource \"{path}\"."),
        }
    }
}

impl std::error::Error for DispatchError {}
