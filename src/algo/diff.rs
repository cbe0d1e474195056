//! Render target binding and reconciliation.
//!
//! Both halves write straight to the host through anchors; there is no
//! intermediate patch list.
//!
//! # Algorithm
//!
//! `diff_patch(old, new)` walks two snapshots in lockstep:
//!
//! 1. If `old` and `new` are not the same node (type, props, text content),
//!    `new` is materialized into `old`'s anchor, replacing the whole region.
//! 2. Otherwise `new` takes over `old`'s anchor and children are compared
//!    pairwise by index. Extra new children are materialized after the last
//!    paired child; extra old children are pruned (configurable).
//!
//! Children are never moved or matched by key: a change at index `i` only
//! ever touches the region at index `i`.
//!
//! # Nested components
//!
//! Every snapshot node records the component instances that rendered it.
//! Binding a node binds those instances to its anchor, so each can later
//! re-diff its own region. When an ancestor re-diffs, the old side of a
//! component-owned region is taken from the instance's latest snapshot
//! rather than the ancestor's possibly stale copy.

use std::borrow::Cow;
use std::cell::RefMut;

use crate::anchor::Anchor;
use crate::attr::{PropTarget, PropValue, classify_prop};
use crate::error::{VdomError, VdomResult};
use crate::host::{Host, SharedHost};
use crate::id::HostId;
use crate::node::Binding;
use crate::vnode::VNode;

/// Default maximum depth for recursive diffing before fallback to full replace.
const DEFAULT_MAX_DIFF_DEPTH: usize = 500;

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Maximum recursion depth; deeper subtrees are replaced wholesale.
    /// Default: 500
    pub max_depth: usize,
    /// Remove old trailing children the new snapshot no longer has.
    /// Default: true
    pub prune_stale_children: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DIFF_DEPTH,
            prune_stale_children: true,
        }
    }
}

impl DiffConfig {
    /// Create config with custom settings.
    pub fn new(max_depth: usize, prune_stale_children: bool) -> Self {
        Self {
            max_depth,
            prune_stale_children,
        }
    }

    /// Leave stale trailing children in place, and skip child
    /// reconciliation entirely when the new node has no children.
    pub fn keep_stale() -> Self {
        Self {
            prune_stale_children: false,
            ..Self::default()
        }
    }

    /// Set the recursion limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Statistics from a binding or diff pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Number of elements compared
    pub elements_compared: usize,
    /// Number of text nodes compared
    pub text_nodes_compared: usize,
    /// Number of nodes kept in place
    pub nodes_kept: usize,
    /// Number of regions replaced wholesale
    pub nodes_replaced: usize,
    /// Number of trailing children appended
    pub nodes_inserted: usize,
    /// Number of stale trailing children removed
    pub nodes_pruned: usize,
    /// Number of host nodes materialized
    pub nodes_materialized: usize,
}

impl DiffStats {
    /// Check if the pass touched the output medium
    pub fn has_changes(&self) -> bool {
        self.nodes_replaced + self.nodes_inserted + self.nodes_pruned > 0
    }
}

// =============================================================================
// Patcher
// =============================================================================

/// Exclusive writer to a host for the duration of one pass.
///
/// Holding a `Patcher` keeps the host mutably borrowed, which is what rules
/// out interleaved patch passes.
pub struct Patcher<'a> {
    shared: &'a SharedHost,
    host: RefMut<'a, dyn Host>,
    config: DiffConfig,
    stats: DiffStats,
    depth: usize,
}

impl<'a> Patcher<'a> {
    /// Start a pass on `shared`.
    ///
    /// Fails with [`VdomError::UpdateInProgress`] if another pass holds the host.
    pub fn new(shared: &'a SharedHost, config: DiffConfig) -> VdomResult<Self> {
        let host = shared
            .try_borrow_mut()
            .map_err(|_| VdomError::UpdateInProgress)?;
        Ok(Self {
            shared,
            host,
            config,
            stats: DiffStats::default(),
            depth: 0,
        })
    }

    /// The host being patched.
    pub fn host(&self) -> &dyn Host {
        &*self.host
    }

    /// Mutable access to the host being patched.
    pub fn host_mut(&mut self) -> &mut dyn Host {
        &mut *self.host
    }

    /// Finish the pass and release the host.
    pub fn finish(self) -> DiffStats {
        self.stats
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding
    // ─────────────────────────────────────────────────────────────────────────

    /// Materialize `node` into `anchor`, replacing whatever the anchor covered.
    ///
    /// Not idempotent: every call creates fresh host nodes.
    pub fn render_to_target(&mut self, node: &mut VNode, mut anchor: Anchor) {
        match node {
            VNode::Element(elem) => {
                let container = self.host.create_element(&elem.tag);
                for (name, value) in &elem.props {
                    self.apply_prop(container, name, value);
                }
                for child in &mut elem.children {
                    let child_anchor = Anchor::end_of(&*self.host, container);
                    self.render_to_target(child, child_anchor);
                }
                anchor.insert_content(&mut *self.host, container);
                elem.anchor = Some(anchor);
            }
            VNode::Text(text) => {
                let id = self.host.create_text(&text.content);
                anchor.insert_content(&mut *self.host, id);
                text.anchor = Some(anchor);
            }
        }
        self.stats.nodes_materialized += 1;
        self.bind_owners(node);
    }

    fn apply_prop(&mut self, container: HostId, name: &str, value: &PropValue) {
        match classify_prop(name) {
            PropTarget::Listener(event) => match value.as_callback() {
                Some(callback) => self.host.add_event_listener(container, &event, callback.clone()),
                None => tracing::warn!(prop = name, "event prop without a callback skipped"),
            },
            PropTarget::Attribute(attr) => match value.to_attr_value() {
                Some(text) => self.host.set_attribute(container, attr, &text),
                None => tracing::warn!(prop = name, "prop has no attribute form, skipped"),
            },
        }
    }

    /// Bind the instances that rendered `node` to its anchor.
    fn bind_owners(&self, node: &VNode) {
        let Some(anchor) = node.anchor() else { return };
        for (index, owner) in node.owners().iter().enumerate() {
            owner.bind(Binding {
                host: self.shared.clone(),
                anchor,
                vdom: node.clone_for_owner(index),
            });
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reconciliation
    // ─────────────────────────────────────────────────────────────────────────

    /// Bring the region bound to `old` in line with `new`.
    ///
    /// `old` must be a snapshot previously bound to this host; on return
    /// `new` (and every descendant) carries the anchor it is bound to.
    pub fn diff_patch(&mut self, old: &VNode, new: &mut VNode) {
        let original = old;
        let current = resolve(old);
        let old = current.as_ref();

        let Some(anchor) = old.anchor() else {
            tracing::warn!(node_type = old.node_type(), "old snapshot was never bound, skipping");
            return;
        };

        match old {
            VNode::Element(_) => self.stats.elements_compared += 1,
            VNode::Text(_) => self.stats.text_nodes_compared += 1,
        }

        if !old.is_same(new) || self.depth >= self.config.max_depth {
            tracing::trace!(from = old.node_type(), to = new.node_type(), "replacing region");
            release(original);
            release(old);
            self.render_to_target(new, anchor);
            self.stats.nodes_replaced += 1;
            return;
        }

        new.set_anchor(anchor);
        self.stats.nodes_kept += 1;
        release_superseded(original, old, new, anchor);

        self.depth += 1;
        self.diff_children(old, new);
        self.depth -= 1;

        self.bind_owners(new);
    }

    fn diff_children(&mut self, old: &VNode, new: &mut VNode) {
        let old_children = old.children();
        let new_len = new.children().len();

        if new_len == 0 && !self.config.prune_stale_children {
            self.detach(old_children);
            return;
        }

        let paired = old_children.len().min(new_len);
        for (old_child, new_child) in old_children.iter().zip(new.children_mut()) {
            self.diff_patch(old_child, new_child);
        }

        if old_children.len() > new_len {
            if self.config.prune_stale_children {
                self.prune(&old_children[new_len..]);
            } else {
                self.detach(&old_children[new_len..]);
            }
            return;
        }
        if new_len == paired {
            return;
        }

        let mut next = if paired == 0 {
            let Some(container) = new.host_node(&*self.host) else {
                tracing::warn!(node_type = new.node_type(), "container missing, children not appended");
                return;
            };
            Anchor::end_of(&*self.host, container)
        } else {
            match new.children()[paired - 1].anchor() {
                Some(tail) => tail.after(),
                None => return,
            }
        };

        for child in &mut new.children_mut()[paired..] {
            tracing::trace!(node_type = child.node_type(), offset = next.offset(), "appending child");
            self.render_to_target(child, next);
            self.stats.nodes_inserted += 1;
            match child.anchor() {
                Some(bound) => next = bound.after(),
                None => break,
            }
        }
    }

    /// Remove stale trailing children, last first so earlier offsets hold.
    fn prune(&mut self, stale: &[VNode]) {
        for child in stale.iter().rev() {
            let Some(mut anchor) = child.anchor() else { continue };
            tracing::trace!(node_type = child.node_type(), offset = anchor.offset(), "pruning child");
            release(child);
            anchor.delete_contents(&mut *self.host);
            self.stats.nodes_pruned += 1;
        }
    }

    /// Leave stale children in the host but unbind the instances in them.
    fn detach(&mut self, stale: &[VNode]) {
        for child in stale {
            tracing::trace!(node_type = child.node_type(), "leaving stale child");
            release(child);
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// The freshest snapshot of the region bound to `node`.
///
/// The innermost owner still bound to the region has the latest copy; nodes
/// without a bound owner are already current.
fn resolve(node: &VNode) -> Cow<'_, VNode> {
    if let Some(anchor) = node.anchor() {
        for owner in node.owners() {
            if let Some(current) = owner.current_vdom(anchor) {
                return Cow::Owned(current);
            }
        }
    }
    Cow::Borrowed(node)
}

/// Unbind every instance rendered into `node`'s subtree.
fn release(node: &VNode) {
    let current = resolve(node);
    for view in [node, current.as_ref()] {
        if let Some(anchor) = view.anchor() {
            for owner in view.owners() {
                owner.release(anchor);
            }
        }
    }
    for child in current.children() {
        release(child);
    }
}

/// Unbind instances that rendered the old node but not the new one.
fn release_superseded(original: &VNode, current: &VNode, new: &VNode, anchor: Anchor) {
    for owner in original.owners().iter().chain(current.owners()) {
        if !new.owners().iter().any(|kept| kept.ptr_eq(owner)) {
            owner.release(anchor);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Callback;
    use crate::host::{Document, DomNode};
    use crate::node::{Element, Node};
    use crate::vnode::snapshot;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (Rc<RefCell<Document>>, SharedHost) {
        let doc = Document::new().shared();
        let host: SharedHost = doc.clone();
        (doc, host)
    }

    /// Bind `node` into the body and return its snapshot.
    fn bind(host: &SharedHost, body: HostId, node: Node) -> VNode {
        let mut vnode = snapshot(&node).unwrap();
        let mut patcher = Patcher::new(host, DiffConfig::default()).unwrap();
        let anchor = Anchor::end_of(patcher.host(), body);
        patcher.render_to_target(&mut vnode, anchor);
        let _ = patcher.finish();
        vnode
    }

    fn patch(host: &SharedHost, old: &VNode, node: Node, config: DiffConfig) -> (VNode, DiffStats) {
        let mut vnode = snapshot(&node).unwrap();
        let mut patcher = Patcher::new(host, config).unwrap();
        patcher.diff_patch(old, &mut vnode);
        (vnode, patcher.finish())
    }

    fn list(items: &[&str]) -> Node {
        let mut ul = Element::new("ul");
        for item in items {
            ul.append_child(Element::new("li").text(*item).into());
        }
        ul.into()
    }

    #[test]
    fn test_render_to_target_materializes_tree() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let vnode = bind(
            &host,
            body,
            Element::new("div")
                .with_class("box")
                .prop("id", "main")
                .child(Element::new("span").text("hi"))
                .into(),
        );

        let doc = doc.borrow();
        let div = vnode.host_node(&*doc).unwrap();
        let node = doc.node(div).unwrap();
        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.attr("class"), Some("box"));
        assert_eq!(node.attr("className"), None);
        assert_eq!(node.attr("id"), Some("main"));
        assert_eq!(doc.text_content(div), "hi");
        assert_eq!(doc.children(body), &[div]);

        let span = vnode.children()[0].host_node(&*doc).unwrap();
        assert_eq!(doc.node(span).and_then(DomNode::parent), Some(div));
    }

    #[test]
    fn test_event_prop_binds_listener_not_attribute() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let log = clicked.clone();
        let vnode = bind(
            &host,
            body,
            Element::new("button")
                .prop("onClick", Callback::new(move |e| log.borrow_mut().push(e.name.clone())))
                .into(),
        );

        let button = vnode.host_node(&*doc.borrow()).unwrap();
        {
            let doc = doc.borrow();
            let node = doc.node(button).unwrap();
            assert!(node.attrs().is_empty());
            assert_eq!(doc.listeners(button, "click").len(), 1);
        }
        crate::host::dispatch_event(&doc, button, "click");
        assert_eq!(clicked.borrow().as_slice(), ["click"]);
    }

    #[test]
    fn test_identical_snapshot_keeps_host_nodes() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, list(&["a", "b"]));
        let before: Vec<HostId> = old.children().iter().map(|c| c.host_node(&*doc.borrow()).unwrap()).collect();
        doc.borrow_mut().reset_stats();

        let (new, stats) = patch(&host, &old, list(&["a", "b"]), DiffConfig::default());

        assert!(!stats.has_changes());
        assert_eq!(stats.nodes_kept, 5);
        assert_eq!(doc.borrow().stats().nodes_created(), 0);
        let after: Vec<HostId> = new.children().iter().map(|c| c.host_node(&*doc.borrow()).unwrap()).collect();
        assert_eq!(before, after);
        assert_eq!(new.anchor(), old.anchor());
    }

    #[test]
    fn test_type_change_replaces_region() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, Element::new("div").child(Element::new("span")).into());
        let div = old.host_node(&*doc.borrow()).unwrap();
        let span = old.children()[0].host_node(&*doc.borrow()).unwrap();

        let (new, stats) = patch(&host, &old, Node::text("x"), DiffConfig::default());

        assert_eq!(stats.nodes_replaced, 1);
        let doc = doc.borrow();
        let children = doc.children(body);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node(children[0]).and_then(DomNode::text), Some("x"));
        assert_eq!(new.host_node(&*doc), Some(children[0]));
        assert!(!doc.is_attached(div));
        assert!(!doc.is_attached(span));
    }

    #[test]
    fn test_prop_change_replaces_only_that_node() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(
            &host,
            body,
            Element::new("div")
                .child(Element::new("p").prop("id", "a"))
                .child(Element::new("p").prop("id", "b"))
                .into(),
        );
        let first = old.children()[0].host_node(&*doc.borrow()).unwrap();
        let second = old.children()[1].host_node(&*doc.borrow()).unwrap();

        let (new, stats) = patch(
            &host,
            &old,
            Element::new("div")
                .child(Element::new("p").prop("id", "a"))
                .child(Element::new("p").prop("id", "c"))
                .into(),
            DiffConfig::default(),
        );

        assert_eq!(stats.nodes_replaced, 1);
        let doc = doc.borrow();
        assert_eq!(new.children()[0].host_node(&*doc), Some(first));
        let replaced = new.children()[1].host_node(&*doc).unwrap();
        assert_ne!(replaced, second);
        assert_eq!(doc.node(replaced).and_then(|n| n.attr("id")), Some("c"));
        assert_eq!(doc.children(old.host_node(&*doc).unwrap()), &[first, replaced]);
    }

    #[test]
    fn test_child_append_materializes_only_new_children() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, list(&["a"]));
        let first = old.children()[0].host_node(&*doc.borrow()).unwrap();
        doc.borrow_mut().reset_stats();

        let (new, stats) = patch(&host, &old, list(&["a", "b", "c"]), DiffConfig::default());

        assert_eq!(stats.nodes_inserted, 2);
        assert_eq!(stats.nodes_replaced, 0);
        let doc = doc.borrow();
        // two <li> plus their two text nodes
        assert_eq!(doc.stats().nodes_created(), 4);
        let ul = new.host_node(&*doc).unwrap();
        let items = doc.children(ul);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], first);
        let texts: Vec<String> = items.iter().map(|id| doc.text_content(*id)).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn test_append_into_empty_container() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, list(&[]));

        let (new, stats) = patch(&host, &old, list(&["a", "b"]), DiffConfig::default());

        assert_eq!(stats.nodes_inserted, 2);
        let doc = doc.borrow();
        let ul = new.host_node(&*doc).unwrap();
        assert_eq!(doc.text_content(ul), "ab");
    }

    #[test]
    fn test_stale_children_are_pruned() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, list(&["a", "b", "c"]));
        let stale = old.children()[2].host_node(&*doc.borrow()).unwrap();

        let (new, stats) = patch(&host, &old, list(&["a"]), DiffConfig::default());

        assert_eq!(stats.nodes_pruned, 2);
        let doc = doc.borrow();
        let ul = new.host_node(&*doc).unwrap();
        assert_eq!(doc.text_content(ul), "a");
        assert!(!doc.is_attached(stale));
    }

    #[test]
    fn test_all_children_pruned_when_new_is_empty() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, list(&["a", "b"]));

        let (new, stats) = patch(&host, &old, list(&[]), DiffConfig::default());

        assert_eq!(stats.nodes_pruned, 2);
        let doc = doc.borrow();
        assert!(doc.children(new.host_node(&*doc).unwrap()).is_empty());
    }

    #[test]
    fn test_keep_stale_leaves_trailing_children() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, list(&["a", "b", "c"]));

        let (new, stats) = patch(&host, &old, list(&["z"]), DiffConfig::keep_stale());
        assert_eq!(stats.nodes_pruned, 0);
        let ul = new.host_node(&*doc.borrow()).unwrap();
        assert_eq!(doc.borrow().text_content(ul), "zbc");

        let (_, stats) = patch(&host, &new, list(&[]), DiffConfig::keep_stale());
        assert!(!stats.has_changes());
        assert_eq!(doc.borrow().text_content(ul), "zbc");
    }

    #[test]
    fn test_max_depth_falls_back_to_replace() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(&host, body, list(&["a"]));
        let ul = old.host_node(&*doc.borrow()).unwrap();

        let (new, stats) = patch(&host, &old, list(&["a"]), DiffConfig::default().with_max_depth(0));

        assert_eq!(stats.nodes_replaced, 1);
        assert_ne!(new.host_node(&*doc.borrow()), Some(ul));
    }

    #[test]
    fn test_sibling_regions_do_not_overlap() {
        let (doc, host) = setup();
        let body = doc.borrow().body();
        let old = bind(
            &host,
            body,
            Element::new("div").text("one").child(Element::new("b")).text("three").into(),
        );

        let (new, _) = patch(
            &host,
            &old,
            Element::new("div").child(Element::new("i")).child(Element::new("b")).text("3").into(),
            DiffConfig::default(),
        );

        let offsets: Vec<usize> = new.children().iter().map(|c| c.anchor().unwrap().offset()).collect();
        assert_eq!(offsets, [0, 1, 2]);
        assert!(new.children().iter().all(|c| c.anchor().unwrap().len() == 1));
        let doc = doc.borrow();
        let div = new.host_node(&*doc).unwrap();
        let tags: Vec<Option<String>> = doc
            .children(div)
            .iter()
            .map(|id| doc.node(*id).and_then(DomNode::tag).map(str::to_string))
            .collect();
        assert_eq!(tags, [Some("i".to_string()), Some("b".to_string()), None]);
        assert_eq!(doc.text_content(div), "3");
    }

    #[test]
    fn test_patcher_rejects_busy_host() {
        let (_doc, host) = setup();
        let _first = Patcher::new(&host, DiffConfig::default()).unwrap();
        assert!(matches!(
            Patcher::new(&host, DiffConfig::default()),
            Err(VdomError::UpdateInProgress)
        ));
    }
}
