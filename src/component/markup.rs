//! Markup application - replace a component's children from a markup string.
//!
//! ```text
//! componentWillUpdate → parse_fragment → morph_children → componentDidUpdate
//! ```
//!
//! Parse and reconcile errors propagate to the caller. Hooks run only for the
//! phases that completed, so `component_did_update` is skipped on failure.

use crate::error::Result;
use crate::types::Hooks;

use super::{Component, MarkupTarget};

impl<H: MarkupTarget> Component<H> {
    /// Apply `markup` as this element's children.
    pub fn html(&self, markup: &str) -> Result<()> {
        let host = self.host();
        let hooks = host.hooks();

        if hooks.contains(Hooks::WILL_UPDATE) {
            host.component_will_update(self);
        }

        let fragment = host.parse_fragment(markup)?;
        host.morph_children(fragment)?;

        if hooks.contains(Hooks::DID_UPDATE) {
            host.component_did_update(self);
        }
        Ok(())
    }
}

/// Escape text for embedding in markup, as content or inside a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
