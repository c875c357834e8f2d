//! # Domain Model
//!
//! Core data types for armory: items, actors, effects and the attachment relation that
//! links them.
//!
//! ## Carriers
//!
//! A carrier is an item that can hold other items (armor, weapons). Rather than layering
//! carrier behavior over a base item type, every concrete carrier kind implements the
//! [`Carrier`] capability trait. The synchronization commands are generic over
//! `C: Carrier + ?Sized`, so they work equally on `&mut Armor`, `&mut Weapon` or a
//! `&mut dyn Carrier` obtained from [`Item::as_carrier_mut`].
//!
//! ## The Attachment Relation
//!
//! [`Attachments`] is the persisted per-carrier state: the ordered list of attached item
//! references and the equipped flag. It guarantees:
//!
//! - **Uniqueness**: no reference appears twice. Enforced on construction and on
//!   deserialization (documents written by older versions may contain duplicates or
//!   null entries; both are dropped, the first occurrence wins).
//! - **Attach order**: new references are appended, never reordered.
//!
//! Its mutators are crate-private. Outside code reads the relation; only the commands in
//! [`crate::commands`] change it.
//!
//! ## Ownership
//!
//! A carrier is equipment *of* an actor. Ownership is a single explicit field
//! (`owner: Option<ActorRef>`) resolved once here, never re-derived by walking parents.
//! A carrier without an owner cannot propagate effects.
//!
//! ## Effects
//!
//! Effects are opaque to this crate: [`SourceEffect::data`] is copied verbatim. The only
//! structure armory adds is the provenance tag stamped into [`EffectPayload::flags`]
//! (see [`crate::provenance`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Namespaced free-form metadata attached to an effect.
pub type Flags = Map<String, Value>;

macro_rules! string_ref {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_ref!(
    /// Opaque reference to an item, resolvable through a [`crate::store::ReferenceResolver`].
    ItemRef
);
string_ref!(
    /// Opaque reference to an actor.
    ActorRef
);
string_ref!(
    /// Identity of an effect, either on its source item or on an actor.
    EffectId
);

// --- Attachment Relation ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachments {
    equipped: bool,
    attached: Vec<ItemRef>,
}

impl Attachments {
    /// Build a relation, dropping empty and repeated references.
    pub fn new(equipped: bool, attached: impl IntoIterator<Item = ItemRef>) -> Self {
        let mut relation = Self {
            equipped,
            attached: Vec::new(),
        };
        for item in attached {
            relation.push(item);
        }
        relation
    }

    pub fn equipped(&self) -> bool {
        self.equipped
    }

    pub fn attached(&self) -> &[ItemRef] {
        &self.attached
    }

    pub fn contains(&self, item: &ItemRef) -> bool {
        self.attached.contains(item)
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    /// Appends `item`. Returns false (and leaves the list untouched) if it is blank or
    /// already present.
    pub(crate) fn push(&mut self, item: ItemRef) -> bool {
        if item.is_empty() || self.contains(&item) {
            return false;
        }
        self.attached.push(item);
        true
    }

    /// Removes `item`. Returns false if it was not present.
    pub(crate) fn remove(&mut self, item: &ItemRef) -> bool {
        let before = self.attached.len();
        self.attached.retain(|existing| existing != item);
        self.attached.len() != before
    }

    pub(crate) fn set_equipped(&mut self, equipped: bool) {
        self.equipped = equipped;
    }
}

// Legacy documents may carry null entries or repeated references in `attached`.
impl<'de> Deserialize<'de> for Attachments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = AttachmentsHelper::deserialize(deserializer)?;
        Ok(Attachments::new(
            helper.equipped,
            helper.attached.into_iter().flatten(),
        ))
    }
}

#[derive(Deserialize)]
struct AttachmentsHelper {
    #[serde(default)]
    equipped: bool,
    #[serde(default)]
    attached: Vec<Option<ItemRef>>,
}

// --- Carriers ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierKind {
    Armor,
    Weapon,
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarrierKind::Armor => f.write_str("armor"),
            CarrierKind::Weapon => f.write_str("weapon"),
        }
    }
}

/// Capability shared by every item kind that can hold attachments.
pub trait Carrier {
    fn item_ref(&self) -> &ItemRef;

    fn kind(&self) -> CarrierKind;

    /// The actor this carrier is equipment of, if any.
    fn owner(&self) -> Option<&ActorRef>;

    fn attachments(&self) -> &Attachments;

    fn attachments_mut(&mut self) -> &mut Attachments;

    fn attached(&self) -> &[ItemRef] {
        self.attachments().attached()
    }

    fn is_equipped(&self) -> bool {
        self.attachments().equipped()
    }
}

fn default_tier() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub id: ItemRef,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    // Host game data, carried through unchanged.
    #[serde(default = "default_tier")]
    pub tier: u8,
    #[serde(default)]
    pub base_score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ActorRef>,
    #[serde(default)]
    pub attachments: Attachments,
    #[serde(default)]
    pub effects: Vec<SourceEffect>,
}

impl Armor {
    pub fn new(id: impl Into<ItemRef>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            img: None,
            tier: default_tier(),
            base_score: 0,
            owner: None,
            attachments: Attachments::default(),
            effects: Vec::new(),
        }
    }

    pub fn owned_by(mut self, owner: impl Into<ActorRef>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }
}

impl Carrier for Armor {
    fn item_ref(&self) -> &ItemRef {
        &self.id
    }

    fn kind(&self) -> CarrierKind {
        CarrierKind::Armor
    }

    fn owner(&self) -> Option<&ActorRef> {
        self.owner.as_ref()
    }

    fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attachments
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Burden {
    #[default]
    OneHanded,
    TwoHanded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: ItemRef,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    // Host game data, carried through unchanged.
    #[serde(default = "default_tier")]
    pub tier: u8,
    #[serde(default)]
    pub burden: Burden,
    #[serde(default)]
    pub secondary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ActorRef>,
    #[serde(default)]
    pub attachments: Attachments,
    #[serde(default)]
    pub effects: Vec<SourceEffect>,
}

impl Weapon {
    pub fn new(id: impl Into<ItemRef>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            img: None,
            tier: default_tier(),
            burden: Burden::default(),
            secondary: false,
            owner: None,
            attachments: Attachments::default(),
            effects: Vec::new(),
        }
    }

    pub fn owned_by(mut self, owner: impl Into<ActorRef>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }
}

impl Carrier for Weapon {
    fn item_ref(&self) -> &ItemRef {
        &self.id
    }

    fn kind(&self) -> CarrierKind {
        CarrierKind::Weapon
    }

    fn owner(&self) -> Option<&ActorRef> {
        self.owner.as_ref()
    }

    fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attachments
    }
}

/// A plain item with no attachment capability (rings, runes, trinkets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    pub id: ItemRef,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default)]
    pub effects: Vec<SourceEffect>,
}

impl Loot {
    pub fn new(id: impl Into<ItemRef>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            img: None,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: SourceEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Anything a reference can resolve to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Armor(Armor),
    Weapon(Weapon),
    Loot(Loot),
}

impl Item {
    pub fn item_ref(&self) -> &ItemRef {
        match self {
            Item::Armor(armor) => &armor.id,
            Item::Weapon(weapon) => &weapon.id,
            Item::Loot(loot) => &loot.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Armor(armor) => &armor.name,
            Item::Weapon(weapon) => &weapon.name,
            Item::Loot(loot) => &loot.name,
        }
    }

    pub fn img(&self) -> Option<&str> {
        match self {
            Item::Armor(armor) => armor.img.as_deref(),
            Item::Weapon(weapon) => weapon.img.as_deref(),
            Item::Loot(loot) => loot.img.as_deref(),
        }
    }

    pub fn effects(&self) -> &[SourceEffect] {
        match self {
            Item::Armor(armor) => &armor.effects,
            Item::Weapon(weapon) => &weapon.effects,
            Item::Loot(loot) => &loot.effects,
        }
    }

    pub fn as_carrier(&self) -> Option<&dyn Carrier> {
        match self {
            Item::Armor(armor) => Some(armor),
            Item::Weapon(weapon) => Some(weapon),
            Item::Loot(_) => None,
        }
    }

    pub fn as_carrier_mut(&mut self) -> Option<&mut dyn Carrier> {
        match self {
            Item::Armor(armor) => Some(armor),
            Item::Weapon(weapon) => Some(weapon),
            Item::Loot(_) => None,
        }
    }

    pub fn into_carrier(self) -> Option<Box<dyn Carrier>> {
        match self {
            Item::Armor(armor) => Some(Box::new(armor)),
            Item::Weapon(weapon) => Some(Box::new(weapon)),
            Item::Loot(_) => None,
        }
    }
}

impl From<Armor> for Item {
    fn from(armor: Armor) -> Self {
        Item::Armor(armor)
    }
}

impl From<Weapon> for Item {
    fn from(weapon: Weapon) -> Self {
        Item::Weapon(weapon)
    }
}

impl From<Loot> for Item {
    fn from(loot: Loot) -> Self {
        Item::Loot(loot)
    }
}

// --- Effects ---

/// A modifier an item carries intrinsically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEffect {
    pub id: EffectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Game-rule payload. Never inspected, only copied.
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub flags: Flags,
}

impl SourceEffect {
    pub fn new(id: impl Into<EffectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            img: None,
            data: Value::Null,
            flags: Flags::new(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Creation request for an effect on an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub flags: Flags,
}

impl EffectPayload {
    /// Copy a source effect as-is. Provenance is stamped separately.
    pub fn copy_of(source: &SourceEffect) -> Self {
        Self {
            name: source.name.clone(),
            img: source.img.clone(),
            origin: None,
            data: source.data.clone(),
            flags: source.flags.clone(),
        }
    }
}

/// An effect living on an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub id: EffectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub flags: Flags,
}

impl ActiveEffect {
    pub fn from_payload(id: EffectId, payload: EffectPayload) -> Self {
        Self {
            id,
            name: payload.name,
            img: payload.img,
            origin: payload.origin,
            data: payload.data,
            flags: payload.flags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorRef,
    pub name: String,
    #[serde(default)]
    pub effects: Vec<ActiveEffect>,
}

impl Actor {
    pub fn new(id: impl Into<ActorRef>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            effects: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs(values: &[&str]) -> Vec<ItemRef> {
        values.iter().map(|v| ItemRef::from(*v)).collect()
    }

    #[test]
    fn attachments_drop_duplicates_and_keep_order() {
        let relation = Attachments::new(false, refs(&["b", "a", "b", "c", "a"]));
        assert_eq!(relation.attached(), refs(&["b", "a", "c"]).as_slice());
    }

    #[test]
    fn push_refuses_duplicates() {
        let mut relation = Attachments::new(true, refs(&["a"]));
        assert!(!relation.push("a".into()));
        assert!(relation.push("b".into()));
        assert_eq!(relation.len(), 2);
    }

    #[test]
    fn push_refuses_blank_refs() {
        let mut relation = Attachments::new(true, refs(&["a"]));
        assert!(!relation.push("".into()));
        assert!(!relation.push("  ".into()));
        assert_eq!(relation.attached(), refs(&["a"]).as_slice());
    }

    #[test]
    fn remove_reports_absence() {
        let mut relation = Attachments::new(false, refs(&["a", "b"]));
        assert!(relation.remove(&"a".into()));
        assert!(!relation.remove(&"a".into()));
        assert_eq!(relation.attached(), refs(&["b"]).as_slice());
    }

    #[test]
    fn legacy_attachments_are_cleaned_on_load() {
        let raw = json!({ "attached": ["ring", null, "ring", "", "rune"] });
        let relation: Attachments = serde_json::from_value(raw).unwrap();
        assert!(!relation.equipped());
        assert_eq!(relation.attached(), refs(&["ring", "rune"]).as_slice());
    }

    #[test]
    fn item_is_tagged_by_type() {
        let raw = json!({
            "type": "weapon",
            "id": "sword",
            "name": "Longsword",
            "burden": "twoHanded",
            "attachments": { "equipped": true, "attached": ["gem"] }
        });
        let item: Item = serde_json::from_value(raw).unwrap();
        let carrier = item.as_carrier().unwrap();
        assert_eq!(carrier.kind(), CarrierKind::Weapon);
        assert!(carrier.is_equipped());
        assert_eq!(carrier.attached(), refs(&["gem"]).as_slice());
        match item {
            Item::Weapon(weapon) => assert_eq!(weapon.burden, Burden::TwoHanded),
            other => panic!("expected weapon, got {:?}", other),
        }
    }

    #[test]
    fn loot_is_not_a_carrier() {
        let mut item = Item::from(Loot::new("ring", "Ring"));
        assert!(item.as_carrier().is_none());
        assert!(item.as_carrier_mut().is_none());
        assert!(item.into_carrier().is_none());
    }

    #[test]
    fn payload_copies_opaque_data() {
        let source = SourceEffect::new("glow", "Glow").with_data(json!({ "changes": [1, 2] }));
        let payload = EffectPayload::copy_of(&source);
        assert_eq!(payload.name, "Glow");
        assert_eq!(payload.data, json!({ "changes": [1, 2] }));
        assert!(payload.origin.is_none());
    }
}
