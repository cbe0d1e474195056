//! Prelude module for common imports.
//!
//! ```
//! use anchor_vdom::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Component, ComponentRef, Element, Node, Scope, StateHandle, Text};

// Snapshots
pub use crate::vnode::{VNode, snapshot};

// Output medium
pub use crate::anchor::Anchor;
pub use crate::host::{Document, Host, SharedHost, dispatch_event};
pub use crate::id::HostId;

// Attributes
pub use crate::attr::{Callback, Event, PropValue, Props, PropsExt, SharedValue};

// Algorithms
pub use crate::algo::{DiffConfig, DiffStats};
pub use crate::mount::{Root, mount, mount_with_config};

// Construction
pub use crate::build::{Child, NodeType, build, component};
pub use crate::h;

// Error
pub use crate::error::{VdomError, VdomResult};
