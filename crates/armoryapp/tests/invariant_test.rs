//! Random attach/detach/equip sequences over two carriers owned by one actor. After every
//! step the actor's tagged effects must be exactly the set implied by the relations, with
//! no tag appearing twice.

use armoryapp::api::AttachmentSynchronizer;
use armoryapp::model::{Actor, Armor, Carrier, Loot, SourceEffect, Weapon};
use armoryapp::provenance::{ProvenanceTag, TagConfig};
use armoryapp::store::memory::InMemoryStore;
use armoryapp::store::ReferenceResolver;
use futures::executor::block_on;
use proptest::prelude::*;
use std::collections::HashSet;

const CARRIERS: [&str; 2] = ["armor", "sword"];
const POOL: [&str; 4] = ["ring", "rune", "pebble", "ghost"];

#[derive(Debug, Clone)]
enum Op {
    Attach(usize, usize),
    Detach(usize, usize),
    Equip(usize, bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CARRIERS.len(), 0..POOL.len()).prop_map(|(c, i)| Op::Attach(c, i)),
        (0..CARRIERS.len(), 0..POOL.len()).prop_map(|(c, i)| Op::Detach(c, i)),
        (0..CARRIERS.len(), any::<bool>()).prop_map(|(c, e)| Op::Equip(c, e)),
    ]
}

fn world() -> AttachmentSynchronizer<InMemoryStore> {
    let store = InMemoryStore::new();
    store.put_actor(Actor::new("hero", "Hero")).unwrap();
    store
        .put_item(Loot::new("ring", "Ring").with_effect(SourceEffect::new("glow", "Glow")))
        .unwrap();
    store
        .put_item(
            Loot::new("rune", "Rune")
                .with_effect(SourceEffect::new("ward", "Ward"))
                .with_effect(SourceEffect::new("calm", "Calm")),
        )
        .unwrap();
    store.put_item(Loot::new("pebble", "Pebble")).unwrap();
    store
        .put_item(Armor::new("armor", "Chainmail").owned_by("hero"))
        .unwrap();
    store
        .put_item(Weapon::new("sword", "Longsword").owned_by("hero"))
        .unwrap();
    AttachmentSynchronizer::new(store, TagConfig::default())
}

fn expected_tags(
    api: &AttachmentSynchronizer<InMemoryStore>,
    carriers: &[Box<dyn Carrier>],
) -> HashSet<ProvenanceTag> {
    let mut expected = HashSet::new();
    for carrier in carriers.iter().filter(|c| c.is_equipped()) {
        for item_ref in carrier.attached() {
            if let Some(item) = block_on(api.host().resolve(item_ref)).unwrap() {
                for source in item.effects() {
                    expected.insert(ProvenanceTag::new(carrier.item_ref(), item_ref, &source.id));
                }
            }
        }
    }
    expected
}

proptest! {
    #[test]
    fn derived_effects_track_relations(ops in prop::collection::vec(op(), 1..40)) {
        let api = world();
        let mut carriers: Vec<Box<dyn Carrier>> = CARRIERS
            .iter()
            .map(|c| block_on(api.carrier(&(*c).into())).unwrap())
            .collect();

        for op in ops {
            let outcome = match op {
                Op::Attach(c, i) => block_on(api.attach(&mut *carriers[c], &POOL[i].into())),
                Op::Detach(c, i) => block_on(api.detach(&mut *carriers[c], &POOL[i].into())),
                Op::Equip(c, e) => block_on(api.set_equipped(&mut *carriers[c], e)),
            };
            if let Err(err) = outcome {
                prop_assert!(err.is_user_warning(), "unexpected error: {}", err);
            }

            let effects = block_on(api.effects(&"hero".into())).unwrap();
            let actual: Vec<ProvenanceTag> =
                effects.iter().filter_map(|e| api.tags().tag_of(e)).collect();
            let unique: HashSet<ProvenanceTag> = actual.iter().cloned().collect();

            prop_assert_eq!(actual.len(), unique.len());
            prop_assert_eq!(unique, expected_tags(&api, &carriers));
        }

        for carrier in &carriers {
            let stored = block_on(api.carrier(carrier.item_ref())).unwrap();
            prop_assert_eq!(stored.attachments(), carrier.attachments());
        }
    }
}
