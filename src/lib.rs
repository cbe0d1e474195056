//! anchor-vdom - Virtual DOM reconciliation over anchored host regions
//!
//! ## Core Concepts
//!
//! **Anchors**: every bound virtual node owns one [`Anchor`], a region of a
//! host container's children. Patching writes through anchors only, so a
//! change at one position never disturbs its siblings.
//!
//! **Snapshots**: author-level trees ([`Node`]) are snapshotted into plain
//! element/text trees ([`VNode`]) before anything reaches the host.
//! Components collapse out of the snapshot; the instances that rendered a
//! node are recorded on it.
//!
//! **Same-node reconciliation**: a component update diffs its new snapshot
//! against the one last bound. Nodes with equal type, props and text are
//! kept in place; anything else has its region replaced wholesale. Children
//! are compared by index.
//!
//! ## Modules
//! - `anchor`: region handles
//! - `host`: output medium trait and the in-memory [`Document`]
//! - `node`: Element/Text/Component author-level nodes
//! - `vnode`: virtual snapshots
//! - `build`: tree construction factory and the [`h!`] macro
//! - `algo`: binding and reconciliation
//! - `state`: component state merging
//! - `render`: HTML serialization
//!
//! ## Usage
//!
//! ```
//! use anchor_vdom::prelude::*;
//! use serde_json::json;
//!
//! struct Greeting;
//!
//! impl Component for Greeting {
//!     fn render(&self, scope: &Scope<'_>) -> Node {
//!         let name = scope.state_at("/name").and_then(|v| v.as_str()).unwrap_or("world");
//!         Element::new("p").text(format!("hello {name}")).into()
//!     }
//! }
//!
//! let doc = Document::new().shared();
//! let host: SharedHost = doc.clone();
//! let body = doc.borrow().body();
//!
//! let greeting = ComponentRef::new(Greeting);
//! let _root = mount(&greeting.clone().into(), &host, body)?;
//! greeting.set_state(json!({ "name": "anchors" }))?;
//!
//! assert_eq!(doc.borrow().text_content(body), "hello anchors");
//! # Ok::<(), VdomError>(())
//! ```

#[macro_use]
mod macros;

// =============================================================================
// Core modules
// =============================================================================

/// Error types
pub mod error;

/// Host node identity
pub mod id;

/// Prop types and naming conventions
pub mod attr;

/// Anchors into the output medium
pub mod anchor;

/// Output medium trait and in-memory document
pub mod host;

/// Node types: Element, Text, Component
pub mod node;

/// Virtual snapshots
pub mod vnode;

/// Component state merging
pub mod state;

/// Tree construction factory
pub mod build;

/// Algorithms: binding and reconciliation
pub mod algo;

/// Mount entry point
pub mod mount;

/// HTML rendering
pub mod render;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Component, ComponentRef, Element, Node, Scope, StateHandle, Text};

// Snapshots
pub use vnode::{VElement, VNode, VText, snapshot};

// Output medium
pub use anchor::Anchor;
pub use host::{Document, Host, SharedHost};
pub use id::HostId;

// Attribute types
pub use attr::{Callback, Event, PropKey, PropValue, Props, SharedValue, Tag};

// Algorithms
pub use algo::{DiffConfig, DiffStats};
pub use mount::{Root, mount, mount_with_config};

// Construction
pub use build::{Child, NodeType, build};

// Error types
pub use error::{VdomError, VdomResult};
