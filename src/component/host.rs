//! Host element capabilities.
//!
//! The host runtime owns element registration and lifecycle signalling; a
//! component only needs the attribute primitives plus whichever optional
//! hooks the host advertises through [`Element::hooks`].

use serde_json::Value;

use crate::error::Result;
use crate::types::Hooks;

use super::Component;

/// Base element a component is built on.
///
/// Hook methods default to no-ops. A component calls a hook only if the
/// matching [`Hooks`] flag is set, so overriding a hook without advertising
/// it has no effect.
pub trait Element: Sized + 'static {
    /// Read an attribute. `None` when the attribute is absent.
    fn get_attribute(&self, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attribute(&self, name: &str, value: &str);

    /// Hooks this element implements.
    fn hooks(&self) -> Hooks {
        Hooks::empty()
    }

    /// Render entry point, called after every state update.
    fn render(&self, _component: &Component<Self>) -> Result<()> {
        Ok(())
    }

    /// An observed attribute changed; values are already decoded.
    fn property_changed(
        &self,
        _component: &Component<Self>,
        _name: &str,
        _old: &Value,
        _new: &Value,
    ) {
    }

    fn component_will_update(&self, _component: &Component<Self>) {}

    fn component_did_update(&self, _component: &Component<Self>) {}

    /// The element left the document.
    fn disconnected(&self, _component: &Component<Self>) {}
}

/// Element whose children can be replaced from markup.
///
/// Parsing and structural reconciliation are supplied by the host; the
/// component only sequences them between its update hooks.
pub trait MarkupTarget: Element {
    /// Detached subtree produced by parsing.
    type Fragment;

    /// Parse markup into a detached subtree.
    fn parse_fragment(&self, markup: &str) -> Result<Self::Fragment>;

    /// Reconcile this element's children against the fragment's children.
    /// The element's own tag and attributes are left alone.
    fn morph_children(&self, fragment: Self::Fragment) -> Result<()>;
}
