//! User-defined components and their runtime instances.
//!
//! A [`Component`] only describes how to render. The instance around it
//! ([`ComponentRef`]) carries props, children, state and, once mounted, the
//! binding to the output medium: the host, the anchor of the region it
//! rendered into and the snapshot last bound there.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::algo::{DiffConfig, DiffStats};
use crate::anchor::Anchor;
use crate::attr::{PropKey, PropValue, Props, PropsExt};
use crate::error::{VdomError, VdomResult};
use crate::host::SharedHost;
use crate::state::merge_state;
use crate::vnode::VNode;

use super::{Children, Node};

// =============================================================================
// Component trait
// =============================================================================

/// A user-defined component.
///
/// `render` returns exactly one root node; the [`Scope`] exposes the
/// instance's props, children and state.
///
/// # Example
///
/// ```
/// use anchor_vdom::prelude::*;
/// use serde_json::json;
///
/// struct Counter;
///
/// impl Component for Counter {
///     fn initial_state(&self) -> Option<serde_json::Value> {
///         Some(json!({ "count": 0 }))
///     }
///
///     fn render(&self, scope: &Scope<'_>) -> Node {
///         let count = scope.state_at("/count").and_then(|v| v.as_i64()).unwrap_or(0);
///         Element::new("span").text(count.to_string()).into()
///     }
/// }
///
/// let counter = ComponentRef::new(Counter);
/// assert_eq!(counter.state(), Some(json!({ "count": 0 })));
/// ```
pub trait Component: 'static {
    /// Produce the component's tree for the current props and state.
    fn render(&self, scope: &Scope<'_>) -> Node;

    /// State the instance starts with.
    fn initial_state(&self) -> Option<Value> {
        None
    }

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// =============================================================================
// Scope
// =============================================================================

/// View of a component instance handed to [`Component::render`].
pub struct Scope<'a> {
    props: &'a Props,
    children: &'a [Node],
    state: Option<&'a Value>,
    handle: StateHandle,
}

impl<'a> Scope<'a> {
    /// All props.
    pub fn props(&self) -> &'a Props {
        self.props
    }

    /// Prop by name.
    pub fn prop(&self, name: &str) -> Option<&'a PropValue> {
        self.props.get_prop(name)
    }

    /// Children declared by the caller.
    pub fn children(&self) -> &'a [Node] {
        self.children
    }

    /// Current state, `None` while absent.
    pub fn state(&self) -> Option<&'a Value> {
        self.state
    }

    /// State value at a JSON pointer, e.g. `/user/name`.
    pub fn state_at(&self, pointer: &str) -> Option<&'a Value> {
        self.state.and_then(|state| state.pointer(pointer))
    }

    /// Weak handle for callbacks that update this component later.
    pub fn handle(&self) -> StateHandle {
        self.handle.clone()
    }
}

// =============================================================================
// Instance
// =============================================================================

/// Where a mounted instance lives in the output medium.
#[derive(Clone)]
pub(crate) struct Binding {
    pub host: SharedHost,
    pub anchor: Anchor,
    pub vdom: VNode,
}

struct Instance {
    component: Box<dyn Component>,
    props: Props,
    children: Children,
    state: Option<Value>,
    binding: Option<Binding>,
    config: DiffConfig,
    updates: u64,
}

/// Shared handle to a component instance.
///
/// Cloning shares the instance. Nodes hold instances strongly; callbacks
/// should capture a [`StateHandle`] instead.
#[derive(Clone)]
pub struct ComponentRef(Rc<RefCell<Instance>>);

impl ComponentRef {
    /// Create an instance, seeding state from [`Component::initial_state`].
    pub fn new<C: Component>(component: C) -> Self {
        let state = component.initial_state();
        Self::from_boxed(Box::new(component), state)
    }

    pub(crate) fn from_boxed(component: Box<dyn Component>, state: Option<Value>) -> Self {
        Self(Rc::new(RefCell::new(Instance {
            component,
            props: Props::new(),
            children: Children::new(),
            state,
            binding: None,
            config: DiffConfig::default(),
            updates: 0,
        })))
    }

    /// Use a custom diff configuration for this instance's updates.
    ///
    /// Skipped with a warning while the instance is rendering.
    pub fn with_config(self, config: DiffConfig) -> Self {
        match self.0.try_borrow_mut() {
            Ok(mut inst) => inst.config = config,
            Err(_) => tracing::warn!("instance busy, diff config not set"),
        }
        self
    }

    /// Component name.
    pub fn name(&self) -> &'static str {
        self.0
            .try_borrow()
            .map(|inst| inst.component.name())
            .unwrap_or("<busy>")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Factory protocol
    // ─────────────────────────────────────────────────────────────────────────

    /// Set a prop (factory `setAttribute`).
    ///
    /// Fails with [`VdomError::UpdateInProgress`] from inside this
    /// component's own `render`.
    pub fn set_attribute(&self, name: impl Into<PropKey>, value: impl Into<PropValue>) -> VdomResult<()> {
        self.0
            .try_borrow_mut()
            .map_err(|_| VdomError::UpdateInProgress)?
            .props
            .set_prop(name, value);
        Ok(())
    }

    /// Append a child (factory `appendChild`). Fails like
    /// [`set_attribute`](Self::set_attribute).
    pub fn append_child(&self, child: Node) -> VdomResult<()> {
        self.0
            .try_borrow_mut()
            .map_err(|_| VdomError::UpdateInProgress)?
            .children
            .push(child);
        Ok(())
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn prop(self, name: impl Into<PropKey>, value: impl Into<PropValue>) -> Self {
        let name = name.into();
        if let Err(err) = self.set_attribute(name.clone(), value) {
            tracing::warn!(prop = %name, %err, "prop not set");
        }
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    /// Prop by name.
    pub fn prop_value(&self, name: &str) -> Option<PropValue> {
        self.0.try_borrow().ok()?.props.get_prop(name).cloned()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Option<Value> {
        self.0.try_borrow().ok()?.state.clone()
    }

    /// Deep-merge `patch` into the state, then re-render and patch the
    /// output medium if the instance is mounted.
    ///
    /// Runs synchronously: the output medium reflects the new state when this
    /// returns. Before mount only the merge happens.
    pub fn set_state(&self, patch: Value) -> VdomResult<()> {
        {
            let mut inst = self
                .0
                .try_borrow_mut()
                .map_err(|_| VdomError::UpdateInProgress)?;
            merge_state(&mut inst.state, patch)?;
        }
        if self.is_mounted() {
            let _ = self.update()?;
        }
        Ok(())
    }

    /// Re-render and reconcile against the last bound snapshot.
    ///
    /// Does nothing on an unmounted instance.
    pub fn update(&self) -> VdomResult<DiffStats> {
        crate::algo::update_component(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether the instance is bound to the output medium.
    pub fn is_mounted(&self) -> bool {
        self.0.try_borrow().map(|inst| inst.binding.is_some()).unwrap_or(false)
    }

    /// Anchor of the bound region.
    pub fn anchor(&self) -> Option<Anchor> {
        self.0.try_borrow().ok()?.binding.as_ref().map(|b| b.anchor)
    }

    /// Snapshot most recently bound to the output medium.
    pub fn vdom(&self) -> Option<VNode> {
        self.0.try_borrow().ok()?.binding.as_ref().map(|b| b.vdom.clone())
    }

    /// Number of completed update passes.
    pub fn update_count(&self) -> u64 {
        self.0.try_borrow().map(|inst| inst.updates).unwrap_or(0)
    }

    /// Weak handle for use in callbacks.
    pub fn handle(&self) -> StateHandle {
        StateHandle(Rc::downgrade(&self.0))
    }

    /// Whether both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Engine hooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Run the component's `render`.
    pub(crate) fn render_node(&self) -> VdomResult<Node> {
        let inst = self
            .0
            .try_borrow()
            .map_err(|_| VdomError::UpdateInProgress)?;
        let scope = Scope {
            props: &inst.props,
            children: &inst.children,
            state: inst.state.as_ref(),
            handle: self.handle(),
        };
        Ok(inst.component.render(&scope))
    }

    pub(crate) fn config(&self) -> DiffConfig {
        self.0
            .try_borrow()
            .map(|inst| inst.config)
            .unwrap_or_default()
    }

    pub(crate) fn binding(&self) -> Option<Binding> {
        self.0.try_borrow().ok()?.binding.clone()
    }

    pub(crate) fn bind(&self, binding: Binding) {
        match self.0.try_borrow_mut() {
            Ok(mut inst) => inst.binding = Some(binding),
            Err(_) => tracing::warn!(component = self.name(), "cannot bind busy component"),
        }
    }

    /// Drop the binding if the instance is still bound to `anchor`.
    pub(crate) fn release(&self, anchor: Anchor) {
        if let Ok(mut inst) = self.0.try_borrow_mut()
            && inst.binding.as_ref().is_some_and(|b| b.anchor == anchor)
        {
            tracing::trace!(component = inst.component.name(), "unbinding component");
            inst.binding = None;
        }
    }

    /// Latest snapshot if the instance is bound to `anchor`.
    pub(crate) fn current_vdom(&self, anchor: Anchor) -> Option<VNode> {
        let inst = self.0.try_borrow().ok()?;
        inst.binding
            .as_ref()
            .filter(|b| b.anchor == anchor)
            .map(|b| b.vdom.clone())
    }

    pub(crate) fn record_update(&self) {
        if let Ok(mut inst) = self.0.try_borrow_mut() {
            inst.updates += 1;
        }
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("name", &self.name())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

// =============================================================================
// StateHandle
// =============================================================================

/// Weak handle to a component instance.
///
/// Captured by callbacks so that rendered output never keeps its own
/// component alive.
#[derive(Clone)]
pub struct StateHandle(Weak<RefCell<Instance>>);

impl StateHandle {
    /// Upgrade to a strong handle if the instance still exists.
    pub fn component(&self) -> Option<ComponentRef> {
        self.0.upgrade().map(ComponentRef)
    }

    /// [`ComponentRef::set_state`] through the weak handle.
    pub fn set_state(&self, patch: Value) -> VdomResult<()> {
        self.component()
            .ok_or(VdomError::Detached)?
            .set_state(patch)
    }
}

impl fmt::Debug for StateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateHandle")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}
