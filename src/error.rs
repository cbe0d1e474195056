//! Error types for anchor-vdom.
//!
//! Reconciliation itself never fails: these errors are raised at the
//! construction, mount and state-update boundaries, before any host mutation.

use thiserror::Error;

use crate::id::HostId;

/// Errors that can occur while building, mounting or updating a tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VdomError {
    /// A prop value does not fit its name (event prop without a callback,
    /// or a callback under a plain attribute name)
    #[error("invalid prop `{name}`: {reason}")]
    InvalidProp {
        /// Prop name as written by the caller
        name: String,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// The host does not know the given node
    #[error("unknown host node {0}")]
    UnknownNode(HostId),

    /// The component is already bound to a region of the output medium
    #[error("component is already mounted")]
    AlreadyMounted,

    /// A non-mapping state patch was applied to mapping state
    #[error("cannot merge a non-object patch into object state")]
    UnmergeablePatch,

    /// The component behind a state handle has been dropped
    #[error("component has been dropped")]
    Detached,

    /// An update was requested while another patch pass was running
    #[error("an update is already in progress")]
    UpdateInProgress,

    /// Component nesting exceeded the configured depth
    #[error("component render depth exceeded ({depth})")]
    RenderDepthExceeded {
        /// Depth at which rendering stopped
        depth: usize,
    },
}

/// Result type alias for VDOM operations.
pub type VdomResult<T> = Result<T, VdomError>;

impl VdomError {
    /// Create an invalid prop error.
    pub fn invalid_prop(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidProp {
            name: name.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VdomError::invalid_prop("onClick", "expected a callback");
        assert_eq!(err.to_string(), "invalid prop `onClick`: expected a callback");

        let err = VdomError::UnknownNode(HostId::from_raw(7));
        assert_eq!(err.to_string(), "unknown host node #7");

        let err = VdomError::RenderDepthExceeded { depth: 64 };
        assert_eq!(err.to_string(), "component render depth exceeded (64)");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VdomError>();
    }
}
