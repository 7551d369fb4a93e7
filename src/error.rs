//! Error type shared by the registry, components and host collaborators.
//!
//! The codec never fails (it degrades to passthrough), so nothing here
//! describes attribute decoding.

use thiserror::Error;

use crate::types::{ComponentId, SlotKey};

#[derive(Debug, Error)]
pub enum Error {
    #[error("attribute `{0}` has no property accessor on this component")]
    UnobservedAttribute(String),

    #[error("component is not registered")]
    NotRegistered,

    #[error("component {0} is not in the registry")]
    UnknownComponent(ComponentId),

    #[error("no handler named `{0}`")]
    UnknownHandler(String),

    #[error("handler name `{0}` is not a valid identifier")]
    InvalidHandlerName(String),

    #[error("slot {slot} of handler `{handler}` is not stored on component {component}")]
    MissingSlot {
        component: ComponentId,
        handler: String,
        slot: SlotKey,
    },

    #[error("malformed handler reference: {0}")]
    MalformedHandlerRef(String),

    #[error("markup parse failed: {0}")]
    Markup(String),

    #[error("reconciliation failed: {0}")]
    Reconcile(String),

    #[error("handler `{handler}` failed: {message}")]
    Handler { handler: String, message: String },

    #[error("property conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
