//! Algorithm implementations for VDOM operations.
//!
//! - `diff`: render target binding and same-node reconciliation

mod diff;

pub use diff::{DiffConfig, DiffStats, Patcher};

use crate::error::VdomResult;
use crate::node::ComponentRef;
use crate::vnode::snapshot_component;

/// Re-render a mounted component and patch its region in place.
///
/// The new snapshot is diffed against the snapshot last bound for the
/// component. Unmounted components are left alone.
pub(crate) fn update_component(component: &ComponentRef) -> VdomResult<DiffStats> {
    let Some(binding) = component.binding() else {
        tracing::debug!(component = component.name(), "update skipped, component is not mounted");
        return Ok(DiffStats::default());
    };

    let mut next = snapshot_component(component, 0)?;
    let mut patcher = Patcher::new(&binding.host, component.config())?;
    patcher.diff_patch(&binding.vdom, &mut next);
    let stats = patcher.finish();
    component.record_update();

    tracing::debug!(
        component = component.name(),
        kept = stats.nodes_kept,
        replaced = stats.nodes_replaced,
        inserted = stats.nodes_inserted,
        pruned = stats.nodes_pruned,
        "component updated"
    );
    Ok(stats)
}
