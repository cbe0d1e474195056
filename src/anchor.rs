//! Anchors: handles to regions of the output medium.
//!
//! An anchor names a contiguous run of children of one host container:
//! `parent`, the index of the first child, and the number of children it
//! covers. Each bound virtual node owns exactly one anchor and siblings never
//! overlap. Since every materialized node occupies exactly one host child,
//! replacing a region keeps its length at one and sibling offsets stay valid.
//!
//! Anchors are `Copy`: splitting produces a new value rather than a second
//! writer into the same region.

use crate::host::Host;
use crate::id::HostId;

/// Region of a host container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    parent: HostId,
    offset: usize,
    len: usize,
}

impl Anchor {
    /// Anchor with an explicit position and span.
    pub fn new(parent: HostId, offset: usize, len: usize) -> Self {
        Self {
            parent,
            offset,
            len,
        }
    }

    /// Anchor covering the entire current content of `container`.
    pub fn spanning(host: &dyn Host, container: HostId) -> Self {
        Self::new(container, 0, host.child_count(container))
    }

    /// Zero-width anchor at the end of `parent`'s current content.
    pub fn end_of(host: &dyn Host, parent: HostId) -> Self {
        Self::new(parent, host.child_count(parent), 0)
    }

    /// Zero-width anchor positioned immediately after this anchor's end.
    #[must_use]
    pub fn after(&self) -> Self {
        Self::new(self.parent, self.offset + self.len, 0)
    }

    /// Container whose children this anchor covers.
    pub fn parent(&self) -> HostId {
        self.parent
    }

    /// Index of the first covered child.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of covered children.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the anchor covers nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The host node at the start of the region.
    pub fn content(&self, host: &dyn Host) -> Option<HostId> {
        if self.is_empty() {
            return None;
        }
        host.child_at(self.parent, self.offset)
    }

    /// Remove everything inside the region. The anchor stays usable as a
    /// zero-width insertion point.
    pub fn delete_contents(&mut self, host: &mut dyn Host) {
        if self.len > 0 {
            host.remove_children(self.parent, self.offset..self.offset + self.len);
            self.len = 0;
        }
    }

    /// Replace the region's contents with `node` and collapse the anchor to
    /// wrap exactly that node.
    pub fn insert_content(&mut self, host: &mut dyn Host, node: HostId) {
        self.delete_contents(host);
        host.insert_child(self.parent, self.offset, node);
        self.len = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Document;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Anchor: Copy, Send, Sync);

    fn doc_with_children(n: usize) -> (Document, Vec<HostId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let ids: Vec<_> = (0..n).map(|_| doc.create_element("li")).collect();
        for id in &ids {
            doc.append_child(body, *id);
        }
        (doc, ids)
    }

    #[test]
    fn test_spanning_covers_all_children() {
        let (doc, _) = doc_with_children(3);
        let anchor = Anchor::spanning(&doc, doc.body());
        assert_eq!(anchor.offset(), 0);
        assert_eq!(anchor.len(), 3);
    }

    #[test]
    fn test_insert_content_replaces_and_collapses() {
        let (mut doc, ids) = doc_with_children(3);
        let body = doc.body();
        let mut anchor = Anchor::spanning(&doc, body);

        let p = doc.create_element("p");
        anchor.insert_content(&mut doc, p);

        assert_eq!(doc.children(body), &[p]);
        assert_eq!(anchor.len(), 1);
        assert_eq!(anchor.content(&doc), Some(p));
        assert!(!doc.is_attached(ids[0]));
    }

    #[test]
    fn test_delete_contents_keeps_anchor_usable() {
        let (mut doc, ids) = doc_with_children(3);
        let body = doc.body();
        let mut middle = Anchor::new(body, 1, 1);

        middle.delete_contents(&mut doc);
        assert!(middle.is_empty());
        assert_eq!(doc.children(body), &[ids[0], ids[2]]);

        let span = doc.create_element("span");
        middle.insert_content(&mut doc, span);
        assert_eq!(doc.children(body), &[ids[0], span, ids[2]]);
    }

    #[test]
    fn test_after_inserts_behind_region() {
        let (mut doc, ids) = doc_with_children(2);
        let body = doc.body();
        let first = Anchor::new(body, 0, 1);

        let mut tail = first.after();
        assert_eq!(tail.offset(), 1);
        assert!(tail.is_empty());

        let em = doc.create_element("em");
        tail.insert_content(&mut doc, em);
        assert_eq!(doc.children(body), &[ids[0], em, ids[1]]);
    }

    #[test]
    fn test_end_of_appends() {
        let (mut doc, ids) = doc_with_children(2);
        let body = doc.body();
        let mut end = Anchor::end_of(&doc, body);
        let b = doc.create_element("b");
        end.insert_content(&mut doc, b);
        assert_eq!(doc.children(body), &[ids[0], ids[1], b]);
        assert_eq!(end.content(&doc), Some(b));
    }
}
