//! Component Registry - id allocation and lookup for live components.
//!
//! The registry is the indirection that lets markup text address a live
//! component: handler expressions carry an id, dispatch resolves it here.
//!
//! - Ids start at 1, increase monotonically and are never reused
//! - Entries are non-owning (`Weak`); the host's element tree owns components
//! - Slot keys come from one counter per registry, shared by all components
//!
//! [`ComponentRegistry::global`] is the default instance the top-level wiring
//! uses. Everything else takes a registry handle, so tests run against
//! isolated registries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::types::{ComponentId, Event, Param, SlotKey};

use super::handler_ref::HandlerRef;

// =============================================================================
// Registered component
// =============================================================================

/// What the registry needs from a component to route a dispatch.
pub trait RegisteredComponent {
    /// Id currently assigned to the component.
    fn component_id(&self) -> Option<ComponentId>;

    /// Whether a handler with this name is installed.
    fn has_handler(&self, handler: &str) -> bool;

    /// Value stored in a parameter slot of a handler.
    fn slot_value(&self, handler: &str, slot: SlotKey) -> Option<Param>;

    /// Invoke a handler with the event followed by the values of `slots`.
    fn invoke_handler(self: Rc<Self>, handler: &str, event: &Event, slots: &[SlotKey]) -> Result<()>;

    /// Upcast for downcasting back to the concrete component.
    fn into_any(self: Rc<Self>) -> Rc<dyn std::any::Any>;
}

// =============================================================================
// Registry
// =============================================================================

/// Callable a host attaches to an event in place of handler text.
pub type BoundHandler = Box<dyn Fn(&Event) -> Result<()>>;

struct RegistryState {
    entries: HashMap<ComponentId, Weak<dyn RegisteredComponent>>,
    /// Last id handed out (0 = none yet).
    last_id: u64,
    /// Last slot key handed out.
    last_slot: u64,
}

/// Shared handle to a component registry. Clones address the same registry.
#[derive(Clone)]
pub struct ComponentRegistry {
    state: Rc<RefCell<RegistryState>>,
    config: Rc<RegistryConfig>,
}

thread_local! {
    /// Default registry. The execution model is single-threaded, so the
    /// main thread's instance is the process-wide one.
    static GLOBAL: ComponentRegistry = ComponentRegistry::new();
}

impl ComponentRegistry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(RegistryConfig::default())
    }

    /// Create an empty registry with a validated configuration.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: RegistryConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState {
                entries: HashMap::new(),
                last_id: 0,
                last_slot: 0,
            })),
            config: Rc::new(config),
        }
    }

    /// The default registry for this thread.
    pub fn global() -> Self {
        GLOBAL.with(|registry| registry.clone())
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// True if both handles address the same registry.
    pub fn same_registry(&self, other: &ComponentRegistry) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    // -------------------------------------------------------------------------
    // Entries
    // -------------------------------------------------------------------------

    /// Insert a component under the next id.
    pub fn register(&self, component: Weak<dyn RegisteredComponent>) -> ComponentId {
        let mut state = self.state.borrow_mut();
        state.last_id += 1;
        let id = ComponentId::from_raw(state.last_id);
        state.entries.insert(id, component);
        log::debug!("registered component {id} ({} live)", state.entries.len());
        id
    }

    /// Look up a live component.
    pub fn resolve(&self, id: ComponentId) -> Option<Rc<dyn RegisteredComponent>> {
        let weak = self.state.borrow().entries.get(&id).cloned();
        weak.and_then(|weak| weak.upgrade())
    }

    /// Remove an entry. Unknown ids are a no-op and return false.
    pub fn unregister(&self, id: ComponentId) -> bool {
        let removed = self.state.borrow_mut().entries.remove(&id).is_some();
        if removed {
            log::debug!("unregistered component {id}");
        } else {
            log::trace!("unregister of unknown component {id} ignored");
        }
        removed
    }

    /// Unregister from a drop path, where the registry may already be borrowed.
    pub(crate) fn release(&self, id: ComponentId) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => {
                state.entries.remove(&id);
            }
            Err(_) => log::warn!("registry busy, stale entry for component {id} left behind"),
        }
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.resolve(id).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<ComponentId> {
        let mut ids: Vec<_> = self.state.borrow().entries.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Allocate a parameter slot key. Keys are unique across all components.
    pub fn next_slot_key(&self) -> SlotKey {
        let mut state = self.state.borrow_mut();
        state.last_slot += 1;
        SlotKey::from_raw(state.last_slot)
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Invoke the handler a reference names.
    pub fn dispatch(&self, handler_ref: &HandlerRef, event: &Event) -> Result<()> {
        let Some(component) = self.resolve(handler_ref.component) else {
            log::debug!(
                "dispatch of `{}` missed: component {} not registered",
                handler_ref.handler,
                handler_ref.component
            );
            return Err(Error::UnknownComponent(handler_ref.component));
        };
        component.invoke_handler(&handler_ref.handler, event, &handler_ref.slots)
    }

    /// Parse a handler expression and dispatch it.
    pub fn dispatch_expression(&self, expression: &str, event: &Event) -> Result<()> {
        let handler_ref = HandlerRef::parse(expression, &self.config)?;
        self.dispatch(&handler_ref, event)
    }

    /// Bind a reference to a callable for hosts that attach closures to events.
    pub fn bind(&self, handler_ref: HandlerRef) -> BoundHandler {
        let registry = self.clone();
        Box::new(move |event| registry.dispatch(&handler_ref, event))
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("ids", &self.ids())
            .field("config", &self.config)
            .finish()
    }
}
