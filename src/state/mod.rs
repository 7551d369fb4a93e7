//! State Module - derived visual state helpers.
//!
//! - **Animate** - show/hide transition phases and their css classes

mod animate;

pub use animate::*;
