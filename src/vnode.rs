//! Virtual snapshots.
//!
//! A snapshot is the plain element/text tree a node renders to at one point
//! in time. Components do not appear in it: a component's snapshot is the
//! snapshot of its render output. The instances that produced a snapshot
//! node are recorded on it as *owners* (innermost first), which is how the
//! engine binds nested components to the region they rendered.
//!
//! Snapshots are computed on demand by [`snapshot`]; anchors are filled in by
//! the engine when a snapshot is bound to the output medium.

use smallvec::SmallVec;

use crate::anchor::Anchor;
use crate::attr::{Props, Tag, props_match};
use crate::error::{VdomError, VdomResult};
use crate::host::Host;
use crate::id::HostId;
use crate::node::{ComponentRef, Node, TEXT_TYPE};

/// Maximum component nesting while snapshotting.
pub const MAX_COMPONENT_DEPTH: usize = 256;

/// Component instances that rendered a snapshot node, innermost first.
pub type Owners = SmallVec<[ComponentRef; 1]>;

// =============================================================================
// VNode
// =============================================================================

/// Snapshot element: tag, props and the snapshotted children (`vchildren`).
#[derive(Debug, Clone)]
pub struct VElement {
    pub tag: Tag,
    pub props: Props,
    pub children: Vec<VNode>,
    pub(crate) anchor: Option<Anchor>,
    pub(crate) owners: Owners,
}

/// Snapshot text node.
#[derive(Debug, Clone)]
pub struct VText {
    pub content: String,
    pub(crate) anchor: Option<Anchor>,
    pub(crate) owners: Owners,
}

/// Node of a virtual snapshot.
#[derive(Debug, Clone)]
pub enum VNode {
    Element(Box<VElement>),
    Text(VText),
}

impl VNode {
    impl_enum_accessors!(V; element, text);

    /// Tag for elements, `#text` for text nodes.
    pub fn node_type(&self) -> &str {
        match self {
            VNode::Element(e) => &e.tag,
            VNode::Text(_) => TEXT_TYPE,
        }
    }

    /// Snapshot children (empty for text nodes).
    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(e) => &e.children,
            VNode::Text(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [VNode] {
        match self {
            VNode::Element(e) => &mut e.children,
            VNode::Text(_) => &mut [],
        }
    }

    /// Anchor of the region this node is bound to, once materialized.
    pub fn anchor(&self) -> Option<Anchor> {
        match self {
            VNode::Element(e) => e.anchor,
            VNode::Text(t) => t.anchor,
        }
    }

    pub(crate) fn set_anchor(&mut self, anchor: Anchor) {
        match self {
            VNode::Element(e) => e.anchor = Some(anchor),
            VNode::Text(t) => t.anchor = Some(anchor),
        }
    }

    /// Component instances that rendered this node, innermost first.
    pub fn owners(&self) -> &[ComponentRef] {
        match self {
            VNode::Element(e) => &e.owners,
            VNode::Text(t) => &t.owners,
        }
    }

    pub(crate) fn owners_mut(&mut self) -> &mut Owners {
        match self {
            VNode::Element(e) => &mut e.owners,
            VNode::Text(t) => &mut t.owners,
        }
    }

    /// Host node currently materializing this snapshot node.
    pub fn host_node(&self, host: &dyn Host) -> Option<HostId> {
        self.anchor()?.content(host)
    }

    /// Same-node test: identical type and props, and identical content for
    /// text nodes. Children are not considered.
    pub fn is_same(&self, other: &VNode) -> bool {
        match (self, other) {
            (VNode::Element(old), VNode::Element(new)) => {
                old.tag == new.tag && props_match(&old.props, &new.props)
            }
            (VNode::Text(old), VNode::Text(new)) => old.content == new.content,
            _ => false,
        }
    }

    /// Recursive same-node test over the whole subtree.
    pub fn structurally_eq(&self, other: &VNode) -> bool {
        self.is_same(other)
            && self.children().len() == other.children().len()
            && self
                .children()
                .iter()
                .zip(other.children())
                .all(|(a, b)| a.structurally_eq(b))
    }

    /// Clone without the given outer owners on the root: a component keeps
    /// only the instances nested inside it, never itself or its ancestors.
    pub(crate) fn clone_for_owner(&self, inner: usize) -> VNode {
        let mut copy = self.clone();
        copy.owners_mut().truncate(inner);
        copy
    }
}

// =============================================================================
// Snapshotting
// =============================================================================

/// Compute the virtual snapshot of a node.
///
/// Element and text nodes map one to one; a component contributes the
/// snapshot of its render output, recursively.
pub fn snapshot(node: &Node) -> VdomResult<VNode> {
    snapshot_at(node, 0)
}

fn snapshot_at(node: &Node, depth: usize) -> VdomResult<VNode> {
    match node {
        Node::Element(elem) => {
            let children = elem
                .children
                .iter()
                .map(|child| snapshot_at(child, depth))
                .collect::<VdomResult<Vec<_>>>()?;
            Ok(VNode::Element(Box::new(VElement {
                tag: elem.tag.clone(),
                props: elem.props.clone(),
                children,
                anchor: None,
                owners: Owners::new(),
            })))
        }
        Node::Text(text) => Ok(VNode::Text(VText {
            content: text.content.clone(),
            anchor: None,
            owners: Owners::new(),
        })),
        Node::Component(component) => snapshot_component(component, depth),
    }
}

/// Render a component and snapshot the output, recording the instance as
/// the outermost owner of the resulting root.
pub(crate) fn snapshot_component(component: &ComponentRef, depth: usize) -> VdomResult<VNode> {
    if depth >= MAX_COMPONENT_DEPTH {
        return Err(VdomError::RenderDepthExceeded { depth });
    }
    let rendered = component.render_node()?;
    let mut vnode = snapshot_at(&rendered, depth + 1)?;
    vnode.owners_mut().push(component.clone());
    Ok(vnode)
}

// =============================================================================
// Tests
// =============================================================================
