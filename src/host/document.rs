//! In-memory output medium.
//!
//! An arena of nodes addressed by [`HostId`]. Removing children frees their
//! subtrees; freed slots are reused under a new generation, so the id of a
//! removed node stays unknown for good.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{Callback, Event, Tag};
use crate::id::HostId;

use super::Host;

// =============================================================================
// DomNode
// =============================================================================

/// Payload of a document node.
#[derive(Debug, Clone)]
pub enum DomData {
    Element {
        tag: Tag,
        attrs: Vec<(CompactString, CompactString)>,
        listeners: SmallVec<[(CompactString, Callback); 2]>,
    },
    Text(String),
}

/// Node stored in the document arena.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub data: DomData,
    parent: Option<HostId>,
    children: SmallVec<[HostId; 8]>,
}

impl DomNode {
    fn new(data: DomData) -> Self {
        Self {
            data,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Parent node, `None` when detached.
    pub fn parent(&self) -> Option<HostId> {
        self.parent
    }

    /// Child ids in order.
    pub fn children(&self) -> &[HostId] {
        &self.children
    }

    /// Tag name for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.data {
            DomData::Element { tag, .. } => Some(tag),
            DomData::Text(_) => None,
        }
    }

    /// Content for text nodes.
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            DomData::Text(content) => Some(content),
            DomData::Element { .. } => None,
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.data {
            DomData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            DomData::Text(_) => None,
        }
    }

    /// Attributes in emission order (empty for text nodes).
    pub fn attrs(&self) -> &[(CompactString, CompactString)] {
        match &self.data {
            DomData::Element { attrs, .. } => attrs,
            DomData::Text(_) => &[],
        }
    }
}

/// Counters of host mutations, used to observe how much work a patch did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostStats {
    /// Container nodes created
    pub elements_created: usize,
    /// Text nodes created
    pub texts_created: usize,
    /// Nodes inserted into a parent
    pub inserts: usize,
    /// Nodes detached from a parent
    pub removals: usize,
    /// Nodes freed with a removed subtree
    pub frees: usize,
}

impl HostStats {
    /// Total nodes created.
    pub fn nodes_created(&self) -> usize {
        self.elements_created + self.texts_created
    }
}

// =============================================================================
// Document
// =============================================================================

/// Arena slot. The generation is bumped each time the slot is freed.
#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<DomNode>,
}

/// In-memory document tree implementing [`Host`].
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    /// Ids the freed slots will be reused under
    free: Vec<HostId>,
    body: HostId,
    stats: HostStats,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding an empty `body` container.
    pub fn new() -> Self {
        let body = DomNode::new(DomData::Element {
            tag: "body".into(),
            attrs: Vec::new(),
            listeners: SmallVec::new(),
        });
        Self {
            slots: vec![Slot { generation: 0, node: Some(body) }],
            free: Vec::new(),
            body: HostId::from_parts(0, 0),
            stats: HostStats::default(),
        }
    }

    /// Wrap the document for sharing with mounted components.
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// The root container.
    pub fn body(&self) -> HostId {
        self.body
    }

    /// Mutation counters since creation or the last [`reset_stats`](Self::reset_stats).
    pub fn stats(&self) -> HostStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = HostStats::default();
    }

    /// Number of live nodes, `body` included.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Arena slots ever allocated, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Look up a live node.
    pub fn node(&self, id: HostId) -> Option<&DomNode> {
        let slot = self.slots.get(id.index()?)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: HostId) -> Option<&mut DomNode> {
        let node = id
            .index()
            .and_then(|index| self.slots.get_mut(index))
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut());
        if node.is_none() {
            tracing::warn!(node = %id, "unknown host node");
        }
        node
    }

    /// # Panics
    ///
    /// Panics once `u32::MAX` slots are live.
    fn alloc(&mut self, data: DomData) -> HostId {
        if let Some(id) = self.free.pop() {
            if let Some(slot) = id.index().and_then(|index| self.slots.get_mut(index)) {
                slot.node = Some(DomNode::new(data));
                return id;
            }
        }
        let Ok(index) = u32::try_from(self.slots.len()) else {
            panic!("document arena exhausted");
        };
        self.slots.push(Slot { generation: 0, node: Some(DomNode::new(data)) });
        HostId::from_parts(index, 0)
    }

    /// Free `id` and everything below it.
    fn free_subtree(&mut self, id: HostId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(index) = id.index() else { continue };
            let Some(slot) = self.slots.get_mut(index) else { continue };
            if slot.generation != id.generation() {
                continue;
            }
            let Some(node) = slot.node.take() else { continue };
            slot.generation = slot.generation.wrapping_add(1);
            pending.extend(node.children);
            // low half of the raw id is the slot index
            self.free.push(HostId::from_parts(id.as_raw() as u32, slot.generation));
            self.stats.frees += 1;
        }
    }

    /// Children of a node (empty for unknown ids).
    pub fn children(&self, id: HostId) -> &[HostId] {
        self.node(id).map(DomNode::children).unwrap_or(&[])
    }

    /// Whether the node is reachable from `body`.
    pub fn is_attached(&self, id: HostId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == self.body {
                return true;
            }
            current = self.node(node_id).and_then(DomNode::parent);
        }
        false
    }

    /// Append a child, DOM `appendChild` style.
    pub fn append_child(&mut self, parent: HostId, child: HostId) {
        let index = self.child_count(parent);
        self.insert_child(parent, index, child);
    }

    /// Concatenated text of a subtree.
    pub fn text_content(&self, id: HostId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: HostId, buf: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.data {
            DomData::Text(content) => buf.push_str(content),
            DomData::Element { .. } => {
                for child in node.children() {
                    self.collect_text(*child, buf);
                }
            }
        }
    }

    /// Find the first attached element matching a predicate (depth-first).
    pub fn find_element<F>(&self, predicate: F) -> Option<HostId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.find_in(self.body, &predicate)
    }

    fn find_in<F>(&self, id: HostId, predicate: &F) -> Option<HostId>
    where
        F: Fn(&DomNode) -> bool,
    {
        let node = self.node(id)?;
        if node.tag().is_some() && predicate(node) {
            return Some(id);
        }
        node.children()
            .iter()
            .find_map(|child| self.find_in(*child, predicate))
    }

    /// Listeners registered on `node` for `event`.
    pub fn listeners(&self, node: HostId, event: &str) -> Vec<Callback> {
        match self.node(node).map(|n| &n.data) {
            Some(DomData::Element { listeners, .. }) => listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, cb)| cb.clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Host for Document {
    fn create_element(&mut self, tag: &str) -> HostId {
        self.stats.elements_created += 1;
        self.alloc(DomData::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            listeners: SmallVec::new(),
        })
    }

    fn create_text(&mut self, content: &str) -> HostId {
        self.stats.texts_created += 1;
        self.alloc(DomData::Text(content.to_string()))
    }

    fn set_attribute(&mut self, node: HostId, name: &str, value: &str) {
        if let Some(DomData::Element { attrs, .. }) = self.node_mut(node).map(|n| &mut n.data) {
            if let Some(attr) = attrs.iter_mut().find(|(k, _)| k == name) {
                attr.1 = value.into();
            } else {
                attrs.push((name.into(), value.into()));
            }
        }
    }

    fn add_event_listener(&mut self, node: HostId, event: &str, handler: Callback) {
        if let Some(DomData::Element { listeners, .. }) = self.node_mut(node).map(|n| &mut n.data) {
            listeners.push((event.into(), handler));
        }
    }

    fn contains(&self, node: HostId) -> bool {
        self.node(node).is_some()
    }

    fn child_count(&self, parent: HostId) -> usize {
        self.children(parent).len()
    }

    fn child_at(&self, parent: HostId, index: usize) -> Option<HostId> {
        self.children(parent).get(index).copied()
    }

    fn insert_child(&mut self, parent: HostId, index: usize, child: HostId) {
        if !self.contains(parent) || !self.contains(child) {
            tracing::warn!(%parent, %child, "insert with unknown host node");
            return;
        }
        let old_parent = self.node(child).and_then(DomNode::parent);
        if let Some(siblings) = old_parent.and_then(|p| self.node_mut(p)).map(|n| &mut n.children) {
            if let Some(pos) = siblings.iter().position(|c| *c == child) {
                siblings.remove(pos);
            }
        }
        if let Some(children) = self.node_mut(parent).map(|n| &mut n.children) {
            let index = index.min(children.len());
            children.insert(index, child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        self.stats.inserts += 1;
    }

    fn remove_children(&mut self, parent: HostId, range: Range<usize>) {
        let Some(node) = self.node_mut(parent) else { return };
        let end = range.end.min(node.children.len());
        let start = range.start.min(end);
        let removed: SmallVec<[HostId; 8]> = node.children.drain(start..end).collect();
        self.stats.removals += removed.len();
        for child in removed {
            self.free_subtree(child);
        }
    }
}

/// Dispatch an event to the listeners of `target`.
///
/// Listeners are collected before any of them runs, so a handler may borrow
/// the document (for instance through a component update). Returns the number
/// of listeners invoked.
pub fn dispatch_event(document: &RefCell<Document>, target: HostId, event: &str) -> usize {
    let handlers = document.borrow().listeners(target, event);
    let event = Event::new(event, target);
    for handler in &handlers {
        handler.call(&event);
    }
    handlers.len()
}

// =============================================================================
// Tests
// =============================================================================
