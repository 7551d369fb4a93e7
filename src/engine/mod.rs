//! Engine - component registry and handler addressing.
//!
//! - Registry: id allocation, non-owning lookup, slot key allocation, dispatch
//! - HandlerRef: the token markup carries to reach a live handler
//!
//! # Dispatch path
//!
//! ```text
//! render → get_handler_ref → text in markup → host event → dispatch_expression
//!        → registry.resolve(id) → component handler(event, slot values...)
//! ```

mod handler_ref;
mod registry;

pub use handler_ref::*;
pub use registry::*;
