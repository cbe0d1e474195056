//! Output medium capability set.
//!
//! The reconciliation core writes to the output medium exclusively through
//! the [`Host`] trait. Any tree that can create nodes, set attributes, bind
//! listeners and splice children can back the core; [`Document`] is the
//! in-memory implementation shipped with the crate.

mod document;

pub use document::{DomData, DomNode, Document, HostStats, dispatch_event};

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use crate::attr::Callback;
use crate::id::HostId;

/// Host capabilities required by the core.
///
/// Operations are assumed to succeed on live nodes; hosts decide how to
/// treat unknown ids (the in-memory [`Document`] ignores them with a warning).
pub trait Host {
    /// Create a detached container node.
    fn create_element(&mut self, tag: &str) -> HostId;

    /// Create a detached text node.
    fn create_text(&mut self, content: &str) -> HostId;

    /// Set an attribute on a container node.
    fn set_attribute(&mut self, node: HostId, name: &str, value: &str);

    /// Register a listener for `event` on a node.
    fn add_event_listener(&mut self, node: HostId, event: &str, handler: Callback);

    /// Whether the host knows this node.
    fn contains(&self, node: HostId) -> bool;

    /// Number of children of a node.
    fn child_count(&self, parent: HostId) -> usize;

    /// Child at `index`, if any.
    fn child_at(&self, parent: HostId, index: usize) -> Option<HostId>;

    /// Insert `child` at `index` among `parent`'s children, detaching it from
    /// any previous parent first.
    fn insert_child(&mut self, parent: HostId, index: usize, child: HostId);

    /// Detach the children in `range` from `parent`. The engine never
    /// reinserts removed nodes, so a host may free them.
    fn remove_children(&mut self, parent: HostId, range: Range<usize>);
}

/// Host shared between the mount entry point and mounted components.
pub type SharedHost = Rc<RefCell<dyn Host>>;
