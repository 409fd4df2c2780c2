//! Injector settings

use serde::{Deserialize, Serialize};

/// Default attribute carrying the record id on injected scripts
pub const DEFAULT_ID_ATTRIBUTE: &str = "data-tracking-code-id";

/// Default attribute carrying the record name on injected scripts
pub const DEFAULT_NAME_ATTRIBUTE: &str = "data-tracking-code-name";

/// Attributes used to tag injected script elements
///
/// The id attribute doubles as the marker identifying elements this
/// injector owns; teardown removes every script carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorSettings {
    pub id_attribute: String,
    pub name_attribute: String,
}

impl Default for InjectorSettings {
    fn default() -> Self {
        Self {
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            name_attribute: DEFAULT_NAME_ATTRIBUTE.to_string(),
        }
    }
}
