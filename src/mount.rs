//! Mount entry point.
//!
//! ```
//! use anchor_vdom::prelude::*;
//! use anchor_vdom::render::{RenderConfig, inner_html};
//!
//! let doc = Document::new().shared();
//! let host: SharedHost = doc.clone();
//! let body = doc.borrow().body();
//!
//! let root = mount(&Element::new("p").text("hi").into(), &host, body)?;
//! assert_eq!(inner_html(&doc.borrow(), body, &RenderConfig::PROD), "<p>hi</p>");
//! assert_eq!(root.anchor().map(|a| a.len()), Some(1));
//! # Ok::<(), VdomError>(())
//! ```

use crate::algo::{DiffConfig, DiffStats, Patcher};
use crate::anchor::Anchor;
use crate::error::{VdomError, VdomResult};
use crate::host::SharedHost;
use crate::id::HostId;
use crate::node::Node;
use crate::vnode::{VNode, snapshot};

/// A tree mounted into a container.
///
/// Owns the snapshot bound at the top level, and through it every component
/// instance rendered into the container. Dropping the root does not touch
/// the output medium, but detaches components whose only owner it was.
pub struct Root {
    host: SharedHost,
    vdom: VNode,
    config: DiffConfig,
}

impl Root {
    /// Anchor of the mounted region.
    pub fn anchor(&self) -> Option<Anchor> {
        self.vdom.anchor()
    }

    /// Snapshot bound by the last mount or render.
    pub fn vdom(&self) -> &VNode {
        &self.vdom
    }

    /// Reconcile the mounted region against a new tree.
    pub fn render(&mut self, node: &Node) -> VdomResult<DiffStats> {
        let mut next = snapshot(node)?;
        let mut patcher = Patcher::new(&self.host, self.config)?;
        patcher.diff_patch(&self.vdom, &mut next);
        let stats = patcher.finish();
        self.vdom = next;
        tracing::debug!(replaced = stats.nodes_replaced, inserted = stats.nodes_inserted, "root rendered");
        Ok(stats)
    }
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("anchor", &self.anchor())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Mount `root` into `container`, replacing the container's content.
pub fn mount(root: &Node, host: &SharedHost, container: HostId) -> VdomResult<Root> {
    mount_with_config(root, host, container, DiffConfig::default())
}

/// [`mount`] with a diff configuration for later [`Root::render`] passes.
pub fn mount_with_config(
    root: &Node,
    host: &SharedHost,
    container: HostId,
    config: DiffConfig,
) -> VdomResult<Root> {
    if let Node::Component(component) = root
        && component.is_mounted()
    {
        return Err(VdomError::AlreadyMounted);
    }

    let mut vnode = snapshot(root)?;
    let mut patcher = Patcher::new(host, config)?;
    if !patcher.host().contains(container) {
        return Err(VdomError::UnknownNode(container));
    }

    let mut anchor = Anchor::spanning(patcher.host(), container);
    anchor.delete_contents(patcher.host_mut());
    patcher.render_to_target(&mut vnode, anchor);
    let stats = patcher.finish();

    tracing::debug!(
        %container,
        node_type = vnode.node_type(),
        materialized = stats.nodes_materialized,
        "mounted"
    );
    Ok(Root {
        host: host.clone(),
        vdom: vnode,
        config,
    })
}

// =============================================================================
// Tests
// =============================================================================
