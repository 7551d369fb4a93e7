//! Component Module - a host element upgraded into a reactive component.
//!
//! - **Properties** - typed accessors over observed attributes (via the codec)
//! - **Lifecycle glue** - attribute change forwarding, disconnect handling
//! - **State** - shallow-merge updates followed by a render
//! - **Handlers** - named callables that markup addresses through the registry
//! - **Markup** - `html()` on hosts that can parse and reconcile children
//!
//! # Example
//!
//! ```ignore
//! use reactive_elements::{extend, param, Event, State};
//!
//! let class = extend::<MyElement>(&["count"]);
//! let counter = class.instantiate(MyElement::new());
//! counter.register_component();
//!
//! counter.define_handler("onStep", |c, _event, args| {
//!     let step = args[0].downcast_ref::<i64>().copied().unwrap_or(1);
//!     let count = c.property_as::<i64>("count")?;
//!     c.set_property_from("count", &(count + step))
//! })?;
//!
//! // Inside render: embed as the body of an onclick attribute
//! let onclick = counter.get_handler_ref("onStep", [param(5_i64)])?;
//! ```

mod class;
mod host;
mod markup;

pub use class::*;
pub use host::*;
pub use markup::*;

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec;
use crate::config::is_identifier;
use crate::engine::{ComponentRegistry, HandlerRef, RegisteredComponent};
use crate::error::{Error, Result};
use crate::types::{ComponentId, Event, Hooks, Param, SlotKey, State};

/// Named handler: receives the component, the dispatch-time event and the
/// extra arguments captured when the reference was rendered.
pub type Handler<H> = Rc<dyn Fn(&Component<H>, &Event, &[Param]) -> Result<()>>;

/// Wrap a value as a handler argument.
pub fn param<T: 'static>(value: T) -> Param {
    Rc::new(value)
}

// =============================================================================
// Component
// =============================================================================

struct ComponentInner<H: Element> {
    host: H,
    class: ComponentClass<H>,
    registry: ComponentRegistry,
    id: Cell<Option<ComponentId>>,
    unregister_on_disconnect: Cell<bool>,
    /// Created on first state update.
    state: RefCell<Option<State>>,
    handlers: RefCell<HashMap<String, Handler<H>>>,
    /// handler name -> slot key -> argument
    slots: RefCell<HashMap<String, BTreeMap<SlotKey, Param>>>,
}

/// Handle to a live component. Clones refer to the same component.
pub struct Component<H: Element> {
    inner: Rc<ComponentInner<H>>,
}

impl<H: Element> Component<H> {
    pub(crate) fn new(class: ComponentClass<H>, host: H, registry: ComponentRegistry) -> Self {
        Self {
            inner: Rc::new(ComponentInner {
                host,
                class,
                registry,
                id: Cell::new(None),
                unregister_on_disconnect: Cell::new(false),
                state: RefCell::new(None),
                handlers: RefCell::new(HashMap::new()),
                slots: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Recover a typed handle from a registry entry.
    pub fn from_registered(component: Rc<dyn RegisteredComponent>) -> Option<Self> {
        component
            .into_any()
            .downcast::<ComponentInner<H>>()
            .ok()
            .map(|inner| Self { inner })
    }

    /// Look up a component of this type in a registry.
    pub fn resolve(registry: &ComponentRegistry, id: ComponentId) -> Option<Self> {
        registry.resolve(id).and_then(Self::from_registered)
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn class(&self) -> &ComponentClass<H> {
        &self.inner.class
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.inner.registry
    }

    pub fn observed_attributes(&self) -> &[String] {
        self.inner.class.observed_attributes()
    }

    /// Registry id, if registered.
    pub fn id(&self) -> Option<ComponentId> {
        self.inner.id.get()
    }

    pub fn is_registered(&self) -> bool {
        self.id().is_some()
    }

    pub fn scoped_css_class(&self, class: &str) -> String {
        self.inner.class.scoped_css_class(class)
    }

    fn hooks(&self) -> Hooks {
        self.inner.host.hooks()
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn check_accessor(&self, name: &str) -> Result<()> {
        if self.inner.class.has_accessor(name) {
            Ok(())
        } else {
            Err(Error::UnobservedAttribute(name.to_string()))
        }
    }

    /// Read a property. Re-reads the attribute on every call; an absent
    /// attribute reads as `Null`.
    pub fn property(&self, name: &str) -> Result<Value> {
        self.check_accessor(name)?;
        let raw = self.inner.host.get_attribute(name);
        Ok(codec::decode_optional(raw.as_deref()))
    }

    /// Read a property into a concrete type.
    pub fn property_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        Ok(serde_json::from_value(self.property(name)?)?)
    }

    /// Write a property through to its attribute.
    pub fn set_property(&self, name: &str, value: &Value) -> Result<()> {
        self.check_accessor(name)?;
        self.inner.host.set_attribute(name, &codec::encode(value));
        Ok(())
    }

    /// Write any serializable value as a property.
    pub fn set_property_from<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_property(name, &value)
    }

    // -------------------------------------------------------------------------
    // Lifecycle glue
    // -------------------------------------------------------------------------

    /// Host notification that an observed attribute changed.
    ///
    /// Forwards decoded values to `property_changed` when the host has that
    /// hook. Absent values decode to `Null`.
    pub fn attribute_changed_callback(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        if !self.hooks().contains(Hooks::PROPERTY_CHANGED) {
            return;
        }
        let old = codec::decode_optional(old);
        let new = codec::decode_optional(new);
        self.inner.host.property_changed(self, name, &old, &new);
    }

    /// Host notification that the element left the document.
    ///
    /// Runs the host's own hook, then unregisters if registration wired it.
    pub fn disconnected_callback(&self) {
        if self.hooks().contains(Hooks::DISCONNECTED) {
            self.inner.host.disconnected(self);
        }
        if self.inner.unregister_on_disconnect.replace(false) {
            self.unregister_component();
        }
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Snapshot of the current state. `None` before the first update.
    pub fn state(&self) -> Option<State> {
        self.inner.state.borrow().clone()
    }

    /// One state entry.
    pub fn state_value(&self, key: &str) -> Option<Value> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .and_then(|state| state.get(key).cloned())
    }

    /// Merge `partial` into the state and render.
    ///
    /// Shallow merge: keys in `partial` replace the same keys, other keys are
    /// kept. Render errors are returned after the state has been stored.
    pub fn set_state(&self, partial: State) -> Result<()> {
        {
            let mut state = self.inner.state.borrow_mut();
            let current = state.get_or_insert_with(State::new);
            for (key, value) in partial {
                current.insert(key, value);
            }
        }
        self.render()
    }

    /// Call the host's render hook, if it has one.
    pub fn render(&self) -> Result<()> {
        if !self.hooks().contains(Hooks::RENDER) {
            log::trace!("component {:?} has no render hook", self.id());
            return Ok(());
        }
        if self.inner.registry.config().release_slots_on_render {
            self.clear_handler_slots();
        }
        self.inner.host.render(self)
    }

    // -------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------

    /// Insert this component into its registry and wire disconnect to
    /// unregister. Returns the existing id if already registered.
    pub fn register_component(&self) -> ComponentId {
        if let Some(id) = self.id() {
            return id;
        }
        let weak: Weak<dyn RegisteredComponent> =
            Rc::downgrade(&self.inner) as Weak<dyn RegisteredComponent>;
        let id = self.inner.registry.register(weak);
        self.inner.id.set(Some(id));
        self.inner.unregister_on_disconnect.set(true);
        id
    }

    /// Remove this component from its registry and release its slots.
    /// Does nothing if not registered.
    pub fn unregister_component(&self) {
        self.inner.unregister_on_disconnect.set(false);
        if let Some(id) = self.inner.id.take() {
            self.inner.registry.unregister(id);
            self.clear_handler_slots();
        }
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    /// Install a handler under `name`. Replaces any handler of that name.
    pub fn define_handler<F>(&self, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&Component<H>, &Event, &[Param]) -> Result<()> + 'static,
    {
        if !is_identifier(name) {
            return Err(Error::InvalidHandlerName(name.to_string()));
        }
        self.inner
            .handlers
            .borrow_mut()
            .insert(name.to_string(), Rc::new(handler));
        Ok(())
    }

    pub fn remove_handler(&self, name: &str) -> bool {
        self.inner.handlers.borrow_mut().remove(name).is_some()
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.inner.handlers.borrow().contains_key(name)
    }

    /// Call a handler directly with already-resolved arguments.
    pub fn invoke_handler(&self, name: &str, event: &Event, args: &[Param]) -> Result<()> {
        // Clone out so the handler may redefine handlers or re-render
        let handler = self.inner.handlers.borrow().get(name).cloned();
        let Some(handler) = handler else {
            log::debug!("component {:?} has no handler `{name}`", self.id());
            return Err(Error::UnknownHandler(name.to_string()));
        };
        handler(self, event, args)
    }

    /// Build a reference to `handler`, storing each of `params` in a fresh
    /// parameter slot.
    ///
    /// Fails with [`Error::NotRegistered`] before registration. The handler
    /// itself only has to exist at dispatch time.
    pub fn handler_ref<I>(&self, handler: &str, params: I) -> Result<HandlerRef>
    where
        I: IntoIterator<Item = Param>,
    {
        let id = self.id().ok_or(Error::NotRegistered)?;
        if !is_identifier(handler) {
            return Err(Error::InvalidHandlerName(handler.to_string()));
        }

        let mut slots = Vec::new();
        for value in params {
            let key = self.inner.registry.next_slot_key();
            self.inner
                .slots
                .borrow_mut()
                .entry(handler.to_string())
                .or_default()
                .insert(key, value);
            slots.push(key);
        }

        Ok(HandlerRef {
            component: id,
            handler: handler.to_string(),
            slots,
        })
    }

    /// Handler attribute body invoking `handler` with the event and `params`.
    pub fn get_handler_ref<I>(&self, handler: &str, params: I) -> Result<String>
    where
        I: IntoIterator<Item = Param>,
    {
        let handler_ref = self.handler_ref(handler, params)?;
        Ok(handler_ref.to_expression(self.inner.registry.config()))
    }

    /// Argument stored in a parameter slot.
    pub fn slot(&self, handler: &str, key: SlotKey) -> Option<Param> {
        self.inner.slot_value(handler, key)
    }

    /// Number of stored parameter slots across all handlers.
    pub fn slot_count(&self) -> usize {
        self.inner.slots.borrow().values().map(BTreeMap::len).sum()
    }

    /// Drop every parameter slot. References rendered earlier stop resolving.
    pub fn clear_handler_slots(&self) {
        self.inner.slots.borrow_mut().clear();
    }
}

impl<H: Element> RegisteredComponent for ComponentInner<H> {
    fn component_id(&self) -> Option<ComponentId> {
        self.id.get()
    }

    fn has_handler(&self, handler: &str) -> bool {
        self.handlers.borrow().contains_key(handler)
    }

    fn slot_value(&self, handler: &str, slot: SlotKey) -> Option<Param> {
        self.slots
            .borrow()
            .get(handler)
            .and_then(|slots| slots.get(&slot))
            .cloned()
    }

    fn invoke_handler(self: Rc<Self>, handler: &str, event: &Event, slots: &[SlotKey]) -> Result<()> {
        let component = Component { inner: self };
        let id = component.id().ok_or(Error::NotRegistered)?;

        let args = slots
            .iter()
            .map(|&slot| {
                component.slot(handler, slot).ok_or_else(|| Error::MissingSlot {
                    component: id,
                    handler: handler.to_string(),
                    slot,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        component.invoke_handler(handler, event, &args)
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn std::any::Any> {
        self
    }
}

impl<H: Element> Drop for ComponentInner<H> {
    fn drop(&mut self) {
        if let Some(id) = self.id.get() {
            self.registry.release(id);
        }
    }
}

impl<H: Element> Clone for Component<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Element> PartialEq for Component<H> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<H: Element> Eq for Component<H> {}

impl<H: Element> fmt::Debug for Component<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id())
            .field("class", &self.inner.class)
            .field("state", &self.inner.state.borrow())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
