//! # reactive-elements
//!
//! Reactive custom elements for Rust.
//!
//! Upgrades a host element into a component that keeps typed properties in
//! sync with string attributes, merges state updates and re-renders, applies
//! markup through the host's reconciler, and lets generated markup call live
//! handlers with arbitrary (non-string) arguments.
//!
//! ## Architecture
//!
//! ```text
//! host lifecycle → Component glue → codec (attribute reads/writes)
//!                                 → registry (addressing)
//!                                 → set_state → render → html → host reconcile
//! render → get_handler_ref → handler text in markup
//! host event → registry.dispatch_expression → handler(event, slot values...)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ids, events, state map, host capability flags
//! - [`codec`] - Attribute string <-> property value coercion
//! - [`engine`] - Component registry and handler references
//! - [`component`] - `extend`, component classes and instances, markup
//! - [`state`] - Animation class state machine
//! - [`config`] - Registry configuration

pub mod codec;
pub mod component;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, Result};

pub use config::RegistryConfig;

pub use codec::{decode, decode_optional, encode};

pub use engine::{BoundHandler, ComponentRegistry, HandlerRef, RegisteredComponent};

pub use component::{
    Component, ComponentClass, Element, Handler, MarkupTarget, escape_html, extend, param,
};

pub use state::{AnimationPhase, VisibilityTracker, animation_class};
