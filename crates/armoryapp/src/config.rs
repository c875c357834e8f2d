//! # Configuration
//!
//! Armory configuration is managed by [`clapfig`], which handles layered loading from
//! TOML files and programmatic overrides. See [`crate::init`] for the search paths.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Data Config**: `<data dir>/armory.toml`, applies to one world.
//! 2. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `tag_namespace` | `armory` | Flag namespace holding the provenance tag |
//! | `tag_key` | `attachmentSource` | Key of the tag inside the namespace |
//! | `fallback_name` | `Unknown Item` | Shown for attachments that no longer resolve |
//! | `fallback_icon` | `icons/svg/item-bag.svg` | Icon for attachments that no longer resolve |
//!
//! The loaded values are converted once into [`TagConfig`] and [`ContextConfig`] and
//! handed to the synchronizer; nothing consults configuration after construction.

use crate::provenance::{TagConfig, DEFAULT_KEY, DEFAULT_NAMESPACE};
use confique::Config;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FALLBACK_NAME: &str = "Unknown Item";
pub const DEFAULT_FALLBACK_ICON: &str = "icons/svg/item-bag.svg";

/// Configuration for armory, stored in `armory.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ArmoryConfig {
    /// Flag namespace under which derived effects carry their provenance tag
    #[config(default = "armory")]
    pub tag_namespace: String,

    /// Key of the provenance tag inside the namespace
    #[config(default = "attachmentSource")]
    pub tag_key: String,

    /// Display name used when an attachment reference cannot be resolved
    #[config(default = "Unknown Item")]
    pub fallback_name: String,

    /// Display icon used when an attachment reference cannot be resolved
    #[config(default = "icons/svg/item-bag.svg")]
    pub fallback_icon: String,
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            tag_namespace: DEFAULT_NAMESPACE.to_string(),
            tag_key: DEFAULT_KEY.to_string(),
            fallback_name: DEFAULT_FALLBACK_NAME.to_string(),
            fallback_icon: DEFAULT_FALLBACK_ICON.to_string(),
        }
    }
}

impl ArmoryConfig {
    /// Blank values fall back to the defaults.
    pub fn tag_config(&self) -> TagConfig {
        TagConfig::new(
            non_blank(&self.tag_namespace, DEFAULT_NAMESPACE),
            non_blank(&self.tag_key, DEFAULT_KEY),
        )
    }

    pub fn context_config(&self) -> ContextConfig {
        ContextConfig {
            fallback_name: non_blank(&self.fallback_name, DEFAULT_FALLBACK_NAME),
            fallback_icon: non_blank(&self.fallback_icon, DEFAULT_FALLBACK_ICON),
        }
    }
}

fn non_blank(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.trim().to_string()
    }
}

/// Display fallbacks for the attachment context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    pub fallback_name: String,
    pub fallback_icon: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        ArmoryConfig::default().context_config()
    }
}
