//! Core types for reactive-elements.
//!
//! Identifiers handed out by the registry, the event passed to handlers,
//! the state map and the host capability flags.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

// =============================================================================
// Identifiers
// =============================================================================

/// Registry id of a component.
///
/// Assigned on registration, starting at 1. Never reused by the registry
/// that handed it out.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of a parameter slot.
///
/// Allocated from a counter shared by every component of a registry, so two
/// handler references rendered at the same time never collide.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(u64);

impl SlotKey {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// State
// =============================================================================

/// Component state: string keys to arbitrary serializable values.
pub type State = Map<String, Value>;

/// Extra argument captured at render time and handed to a handler at dispatch.
///
/// Not required to be serializable; handlers downcast to the type they expect.
pub type Param = Rc<dyn Any>;

// =============================================================================
// Event
// =============================================================================

/// Event delivered by the host's dispatch to a handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    /// Event type (e.g., "click", "input")
    pub name: String,
    /// Host-specific payload
    pub detail: Value,
}

impl Event {
    /// Create an event with no payload
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: Value::Null,
        }
    }

    /// Create an event carrying a payload
    pub fn with_detail(name: impl Into<String>, detail: Value) -> Self {
        Self {
            name: name.into(),
            detail,
        }
    }
}

// =============================================================================
// Host capabilities
// =============================================================================

bitflags::bitflags! {
    /// Optional hooks a host element implements.
    ///
    /// Components only call a hook whose flag the host advertises.
    /// Combine with bitwise OR: `Hooks::RENDER | Hooks::DID_UPDATE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Hooks: u8 {
        const RENDER = 1 << 0;
        const PROPERTY_CHANGED = 1 << 1;
        const WILL_UPDATE = 1 << 2;
        const DID_UPDATE = 1 << 3;
        const DISCONNECTED = 1 << 4;
    }
}
