//! # Provenance Tags
//!
//! Every effect armory materializes on an actor is stamped with a [`ProvenanceTag`]
//! recording the (carrier, attached item, source effect) triple that produced it. The tag
//! is the only link between an actor's effects and the attachment relation, so all
//! cleanup works by filtering on it.
//!
//! ## Wire Shape
//!
//! The tag is a flat record keyed under a namespaced field of the effect's flags:
//!
//! ```text
//! flags: {
//!   "<namespace>": {
//!     "<key>": { "carrierRef": "...", "itemRef": "...", "originalEffectId": "..." },
//!     ...other keys in the namespace are preserved...
//!   }
//! }
//! ```
//!
//! Namespace and key come from [`TagConfig`], which is passed to the synchronizer at
//! construction.

use crate::error::Result;
use crate::model::{ActiveEffect, EffectId, Flags, ItemRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_NAMESPACE: &str = "armory";
pub const DEFAULT_KEY: &str = "attachmentSource";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceTag {
    pub carrier_ref: ItemRef,
    pub item_ref: ItemRef,
    pub original_effect_id: EffectId,
}

impl ProvenanceTag {
    pub fn new(carrier_ref: &ItemRef, item_ref: &ItemRef, original_effect_id: &EffectId) -> Self {
        Self {
            carrier_ref: carrier_ref.clone(),
            item_ref: item_ref.clone(),
            original_effect_id: original_effect_id.clone(),
        }
    }

    /// The `origin` string written next to the tag: `"{carrier}:{item}"`.
    pub fn origin(&self) -> String {
        format!("{}:{}", self.carrier_ref, self.item_ref)
    }
}

/// Where in an effect's flags the tag lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    pub namespace: String,
    pub key: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl TagConfig {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// Write `tag` into `flags`, keeping any other keys already in the namespace.
    pub fn stamp(&self, flags: &mut Flags, tag: &ProvenanceTag) -> Result<()> {
        let value = serde_json::to_value(tag)?;
        let slot = flags
            .entry(self.namespace.clone())
            .or_insert_with(|| Value::Object(Flags::new()));
        if !slot.is_object() {
            *slot = Value::Object(Flags::new());
        }
        if let Value::Object(namespace) = slot {
            namespace.insert(self.key.clone(), value);
        }
        Ok(())
    }

    /// Read the tag back. Absent or malformed tags read as `None`.
    pub fn read(&self, flags: &Flags) -> Option<ProvenanceTag> {
        let raw = flags.get(&self.namespace)?.get(&self.key)?;
        serde_json::from_value(raw.clone()).ok()
    }

    pub fn tag_of(&self, effect: &ActiveEffect) -> Option<ProvenanceTag> {
        self.read(&effect.flags)
    }

    /// Effects whose tag passes `filter`, in store order.
    pub fn select<'a>(
        &self,
        effects: &'a [ActiveEffect],
        filter: TagFilter<'_>,
    ) -> Vec<&'a ActiveEffect> {
        effects
            .iter()
            .filter(|effect| {
                self.tag_of(effect)
                    .is_some_and(|tag| filter.matches(&tag))
            })
            .collect()
    }
}

/// Equality filter over provenance tags.
#[derive(Debug, Clone, Copy)]
pub enum TagFilter<'a> {
    /// Everything a carrier produced, whichever item it came from.
    Carrier(&'a ItemRef),
    /// Everything produced by one attachment on one carrier.
    Link(&'a ItemRef, &'a ItemRef),
}

impl TagFilter<'_> {
    pub fn matches(&self, tag: &ProvenanceTag) -> bool {
        match self {
            TagFilter::Carrier(carrier) => tag.carrier_ref == **carrier,
            TagFilter::Link(carrier, item) => {
                tag.carrier_ref == **carrier && tag.item_ref == **item
            }
        }
    }
}
