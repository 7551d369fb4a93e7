//! Handler references - addressing live handlers from markup text.
//!
//! Markup is plain text, so a handler cannot be embedded by reference.
//! A [`HandlerRef`] names the handler instead: component id, handler name and
//! the parameter slots holding the extra arguments captured at render time.
//!
//! Rendered as an expression it reads
//!
//! ```text
//! return document.componentRegistry[3].onSelect(event, document.componentRegistry[3].onSelect[17])
//! ```
//!
//! which a text-evaluating host can run as the body of an inline handler
//! attribute. Hosts that bind callables to events directly skip the text and
//! use [`ComponentRegistry::bind`](super::ComponentRegistry::bind).

use crate::config::{RegistryConfig, is_identifier};
use crate::error::{Error, Result};
use crate::types::{ComponentId, SlotKey};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    pub component: ComponentId,
    pub handler: String,
    pub slots: Vec<SlotKey>,
}

impl HandlerRef {
    /// Reference to a handler invoked with the event only.
    pub fn new(component: ComponentId, handler: impl Into<String>) -> Self {
        Self {
            component,
            handler: handler.into(),
            slots: Vec::new(),
        }
    }

    /// Render the handler attribute body.
    pub fn to_expression(&self, config: &RegistryConfig) -> String {
        let target = format!(
            "{}[{}].{}",
            config.registry_path, self.component, self.handler
        );

        let mut args = Vec::with_capacity(self.slots.len() + 1);
        args.push(config.event_binding.clone());
        args.extend(self.slots.iter().map(|slot| format!("{target}[{slot}]")));

        format!("return {target}({})", args.join(", "))
    }

    /// Read back an expression produced by [`to_expression`](Self::to_expression)
    /// with the same configuration.
    pub fn parse(text: &str, config: &RegistryConfig) -> Result<Self> {
        let mut cursor = Cursor::new(text);

        cursor.skip_ws();
        cursor.expect("return")?;
        if !cursor.skip_ws() {
            return Err(cursor.malformed("whitespace after `return`"));
        }

        let (component, handler) = cursor.target(config)?;
        cursor.expect("(")?;
        cursor.skip_ws();
        cursor.expect(&config.event_binding)?;
        cursor.skip_ws();

        let mut slots = Vec::new();
        while cursor.eat(",") {
            cursor.skip_ws();
            let (slot_component, slot_handler) = cursor.target(config)?;
            if slot_component != component || slot_handler != handler {
                return Err(cursor.malformed("slot of the invoked handler"));
            }
            cursor.expect("[")?;
            let slot = cursor.number().ok_or_else(|| cursor.malformed("slot key"))?;
            cursor.expect("]")?;
            cursor.skip_ws();
            slots.push(SlotKey::from_raw(slot));
        }

        cursor.expect(")")?;
        cursor.skip_ws();
        cursor.eat(";");
        cursor.skip_ws();
        if !cursor.rest.is_empty() {
            return Err(cursor.malformed("end of expression"));
        }

        Ok(Self {
            component,
            handler: handler.to_string(),
            slots,
        })
    }
}

// =============================================================================
// Parsing
// =============================================================================

struct Cursor<'a> {
    text: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, rest: text }
    }

    /// Returns true if any whitespace was skipped.
    fn skip_ws(&mut self) -> bool {
        let trimmed = self.rest.trim_start();
        let skipped = trimmed.len() != self.rest.len();
        self.rest = trimmed;
        skipped
    }

    fn eat(&mut self, token: &str) -> bool {
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.malformed(&format!("`{token}`")))
        }
    }

    fn number(&mut self) -> Option<u64> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let value = self.rest[..end].parse().ok()?;
        self.rest = &self.rest[end..];
        Some(value)
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(self.rest.len());
        let ident = &self.rest[..end];
        if !is_identifier(ident) {
            return None;
        }
        self.rest = &self.rest[end..];
        Some(ident)
    }

    /// `<registry_path>[<id>].<handler>`
    fn target(&mut self, config: &RegistryConfig) -> Result<(ComponentId, &'a str)> {
        self.expect(&config.registry_path)?;
        self.expect("[")?;
        let id = self.number().ok_or_else(|| self.malformed("component id"))?;
        self.expect("]")?;
        self.expect(".")?;
        let handler = self.identifier().ok_or_else(|| self.malformed("handler name"))?;
        Ok((ComponentId::from_raw(id), handler))
    }

    fn malformed(&self, expected: &str) -> Error {
        let offset = self.text.len() - self.rest.len();
        Error::MalformedHandlerRef(format!(
            "expected {expected} at offset {offset} in `{}`",
            self.text
        ))
    }
}
