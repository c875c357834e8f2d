use super::mem_backend::MemBackend;
use super::world_store::WorldStore;

pub type InMemoryStore = WorldStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        WorldStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Actor, Armor, Attachments, ItemRef, Loot, SourceEffect, Weapon};
    use serde_json::json;

    pub const HERO: &str = "actor#1";
    pub const ARMOR: &str = "armor#1";
    pub const SWORD: &str = "sword#1";
    pub const RING: &str = "ring#9";
    pub const RUNE: &str = "rune#3";
    pub const PLAIN: &str = "pebble#1";
    /// An actor reference nothing in the world resolves to.
    pub const NOBODY: &str = "actor#404";

    pub struct WorldFixture {
        pub store: InMemoryStore,
    }

    impl Default for WorldFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WorldFixture {
        /// An empty world with one actor, [`HERO`].
        pub fn new() -> Self {
            let store = InMemoryStore::new();
            store.put_actor(Actor::new(HERO, "Hero")).unwrap();
            Self { store }
        }

        /// Attachable loot: [`RING`] (one effect), [`RUNE`] (two effects), [`PLAIN`] (none).
        pub fn with_loot(self) -> Self {
            self.store
                .put_item(Loot::new(RING, "Ring of Glowing").with_effect(glow()))
                .unwrap();
            self.store
                .put_item(
                    Loot::new(RUNE, "Rune of Warding")
                        .with_effect(SourceEffect::new("ward", "Ward").with_data(json!({ "armor": 1 })))
                        .with_effect(SourceEffect::new("calm", "Calm").with_data(json!({ "stress": -1 }))),
                )
                .unwrap();
            self.store.put_item(Loot::new(PLAIN, "Pebble")).unwrap();
            self
        }

        pub fn with_armor(self, equipped: bool, attached: &[&str]) -> Self {
            let armor = Armor::new(ARMOR, "Chainmail")
                .owned_by(HERO)
                .with_attachments(relation(equipped, attached));
            self.store.put_item(armor).unwrap();
            self
        }

        pub fn with_unowned_armor(self, equipped: bool, attached: &[&str]) -> Self {
            let armor = Armor::new(ARMOR, "Chainmail").with_attachments(relation(equipped, attached));
            self.store.put_item(armor).unwrap();
            self
        }

        /// Armor whose `owner` names [`NOBODY`].
        pub fn with_dangling_owner_armor(self, equipped: bool, attached: &[&str]) -> Self {
            let armor = Armor::new(ARMOR, "Chainmail")
                .owned_by(NOBODY)
                .with_attachments(relation(equipped, attached));
            self.store.put_item(armor).unwrap();
            self
        }

        pub fn with_sword(self, equipped: bool, attached: &[&str]) -> Self {
            let sword = Weapon::new(SWORD, "Longsword")
                .owned_by(HERO)
                .with_attachments(relation(equipped, attached));
            self.store.put_item(sword).unwrap();
            self
        }

        pub fn armor(&self) -> Armor {
            match self.store.get_item(&ARMOR.into()).unwrap() {
                Some(crate::model::Item::Armor(armor)) => armor,
                other => panic!("fixture armor missing: {:?}", other),
            }
        }

        pub fn sword(&self) -> Weapon {
            match self.store.get_item(&SWORD.into()).unwrap() {
                Some(crate::model::Item::Weapon(weapon)) => weapon,
                other => panic!("fixture sword missing: {:?}", other),
            }
        }

        pub fn hero_effects(&self) -> Vec<crate::model::ActiveEffect> {
            self.store.get_actor(&HERO.into()).unwrap().unwrap().effects
        }
    }

    pub fn glow() -> SourceEffect {
        SourceEffect::new("glow", "Glow").with_data(json!({ "light": 10 }))
    }

    fn relation(equipped: bool, attached: &[&str]) -> Attachments {
        Attachments::new(equipped, attached.iter().map(|r| ItemRef::from(*r)))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::model::Carrier;

    #[test]
    fn fixture_builds_owned_armor() {
        let fixture = WorldFixture::new().with_loot().with_armor(false, &[RING]);
        let armor = fixture.armor();
        assert_eq!(armor.owner().map(|o| o.as_str()), Some(HERO));
        assert_eq!(armor.attached().len(), 1);
        assert!(fixture.hero_effects().is_empty());
    }
}
