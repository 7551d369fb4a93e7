//! Registry configuration.
//!
//! Controls the shape of the handler expressions embedded in markup and how
//! long parameter slots live.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Global name under which the host exposes the registry to markup.
pub const DEFAULT_REGISTRY_PATH: &str = "document.componentRegistry";

/// Name the host binds the triggering event to inside handler attributes.
pub const DEFAULT_EVENT_BINDING: &str = "event";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Dotted path of the registry as seen by host-evaluated text.
    pub registry_path: String,
    /// Identifier of the event inside the handler body.
    pub event_binding: String,
    /// Drop a component's parameter slots each time it renders.
    ///
    /// Off by default: slots live as long as the component stays registered.
    pub release_slots_on_render: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_path: DEFAULT_REGISTRY_PATH.to_string(),
            event_binding: DEFAULT_EVENT_BINDING.to_string(),
            release_slots_on_render: false,
        }
    }
}

impl RegistryConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both names can appear in generated handler text.
    pub fn validate(&self) -> Result<()> {
        if self.registry_path.is_empty()
            || !self.registry_path.split('.').all(is_identifier)
        {
            return Err(Error::Config(format!(
                "registry_path `{}` must be a dotted identifier path",
                self.registry_path
            )));
        }
        if !is_identifier(&self.event_binding) {
            return Err(Error::Config(format!(
                "event_binding `{}` must be an identifier",
                self.event_binding
            )));
        }
        Ok(())
    }
}

/// True for names usable as a property or variable in handler text.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.registry_path, "document.componentRegistry");
        assert_eq!(config.event_binding, "event");
        assert!(!config.release_slots_on_render);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = RegistryConfig::from_json(r#"{"release_slots_on_render": true}"#).unwrap();
        assert!(config.release_slots_on_render);
        assert_eq!(config.registry_path, DEFAULT_REGISTRY_PATH);
    }

    #[test]
    fn test_from_json_rejects_bad_names() {
        assert!(matches!(
            RegistryConfig::from_json(r#"{"registry_path": "window..reg"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RegistryConfig::from_json(r#"{"event_binding": "1e"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(RegistryConfig::from_json("not json"), Err(Error::Config(_))));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("onClick"));
        assert!(is_identifier("_private$"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("on-click"));
    }
}
