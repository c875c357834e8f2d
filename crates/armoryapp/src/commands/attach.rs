use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ArmoryError, Result};
use crate::model::{ActiveEffect, ActorRef, Carrier, Item, ItemRef};
use crate::provenance::TagConfig;
use crate::store::{CarrierPatch, Host};
use std::collections::HashSet;
use tracing::{debug, info};

use super::helpers::{existing_tags, live_owner, materialize, restore_relation};

/// Link `candidate` to `carrier`.
///
/// A blank or unresolvable candidate aborts without touching anything (the drop is ignored and
/// the reference is listed in [`CmdResult::unresolved`]). A candidate already in the
/// list fails with [`ArmoryError::DuplicateAttachment`].
///
/// When the carrier is equipped and owned, the candidate's source effects are
/// materialized on the owner in one batch. If that batch fails the stored relation is
/// put back and the error returned, leaving `carrier` unchanged.
pub async fn run<H, C>(
    host: &H,
    tags: &TagConfig,
    carrier: &mut C,
    candidate: &ItemRef,
) -> Result<CmdResult>
where
    H: Host + ?Sized,
    C: Carrier + ?Sized,
{
    let mut result = CmdResult::default();

    if candidate.is_empty() {
        debug!("dropped item has a blank reference, ignoring");
        result.unresolved.push(candidate.clone());
        return Ok(result);
    }

    let item = match host.resolve(candidate).await? {
        Some(item) => item,
        None => {
            debug!(candidate = %candidate, "dropped item does not resolve, ignoring");
            result.unresolved.push(candidate.clone());
            return Ok(result);
        }
    };

    if carrier.attachments().contains(candidate) {
        return Err(ArmoryError::DuplicateAttachment {
            carrier: carrier.item_ref().clone(),
            item: candidate.clone(),
            name: item.name().to_string(),
            kind: carrier.kind(),
        });
    }

    let owner = if carrier.is_equipped() {
        live_owner(host, &*carrier).await?
    } else {
        None
    };

    let previous = carrier.attached().to_vec();
    let mut updated = previous.clone();
    updated.push(candidate.clone());
    let patch = CarrierPatch::attached(&updated);
    host.persist_carrier(carrier.item_ref(), &patch).await?;

    if let Some(actor) = &owner {
        match propagate(host, tags, carrier.item_ref(), actor, candidate, &item).await {
            Ok(created) => result.created_effects = created,
            Err(err) => {
                restore_relation(host, carrier.item_ref(), &CarrierPatch::attached(&previous))
                    .await;
                return Err(err);
            }
        }
    }

    patch.apply_to(carrier.attachments_mut());

    result.add_message(CmdMessage::success(format!(
        "Attached {} to {}",
        item.name(),
        carrier.item_ref()
    )));
    if let Some(actor) = owner.as_ref().filter(|_| !result.created_effects.is_empty()) {
        result.add_message(CmdMessage::info(format!(
            "Applied {} effect(s) to {}",
            result.created_effects.len(),
            actor
        )));
    }

    Ok(result)
}

async fn propagate<H: Host + ?Sized>(
    host: &H,
    tags: &TagConfig,
    carrier: &ItemRef,
    actor: &ActorRef,
    candidate: &ItemRef,
    item: &Item,
) -> Result<Vec<ActiveEffect>> {
    if item.effects().is_empty() {
        return Ok(Vec::new());
    }

    let mut existing: HashSet<_> = existing_tags(host, tags, actor, carrier).await?;
    let payloads = materialize(tags, carrier, candidate, item, &mut existing)?;
    if payloads.is_empty() {
        return Ok(Vec::new());
    }

    let created = host.create_effects(actor, payloads).await?;
    info!(actor = %actor, carrier = %carrier, count = created.len(), "created attachment effects");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Loot;
    use crate::store::memory::fixtures::*;

    #[tokio::test]
    async fn attach_to_unequipped_defers_effects() {
        let fixture = WorldFixture::new().with_loot().with_armor(false, &[]);
        let mut armor = fixture.armor();

        let result = run(&fixture.store, &TagConfig::default(), &mut armor, &RING.into())
            .await
            .unwrap();

        assert!(result.created_effects.is_empty());
        assert_eq!(armor.attached(), &[ItemRef::from(RING)]);
        assert_eq!(fixture.armor().attached(), &[ItemRef::from(RING)]);
        assert!(fixture.hero_effects().is_empty());
    }

    #[tokio::test]
    async fn attach_to_equipped_creates_tagged_effects() {
        let fixture = WorldFixture::new().with_loot().with_armor(true, &[]);
        let mut armor = fixture.armor();
        let tags = TagConfig::default();

        let result = run(&fixture.store, &tags, &mut armor, &RUNE.into())
            .await
            .unwrap();

        assert_eq!(result.created_effects.len(), 2);
        let effects = fixture.hero_effects();
        assert_eq!(effects.len(), 2);
        for effect in &effects {
            let tag = tags.tag_of(effect).unwrap();
            assert_eq!(tag.carrier_ref, ItemRef::from(ARMOR));
            assert_eq!(tag.item_ref, ItemRef::from(RUNE));
            assert_eq!(effect.origin.as_deref(), Some("armor#1:rune#3"));
        }
    }

    #[tokio::test]
    async fn attach_appends_in_order() {
        let fixture = WorldFixture::new().with_loot().with_armor(false, &[RUNE]);
        let mut armor = fixture.armor();

        run(&fixture.store, &TagConfig::default(), &mut armor, &RING.into())
            .await
            .unwrap();

        assert_eq!(
            fixture.armor().attached(),
            &[ItemRef::from(RUNE), ItemRef::from(RING)]
        );
    }

    #[tokio::test]
    async fn attaching_twice_is_a_duplicate() {
        let fixture = WorldFixture::new().with_loot().with_armor(true, &[]);
        let mut armor = fixture.armor();
        let tags = TagConfig::default();

        run(&fixture.store, &tags, &mut armor, &RING.into())
            .await
            .unwrap();
        let err = run(&fixture.store, &tags, &mut armor, &RING.into())
            .await
            .unwrap_err();

        assert!(err.is_user_warning());
        assert_eq!(
            err.to_string(),
            "Ring of Glowing is already attached to this armor."
        );
        assert_eq!(armor.attached().len(), 1);
        assert_eq!(fixture.armor().attached().len(), 1);
        assert_eq!(fixture.hero_effects().len(), 1);
    }

    #[tokio::test]
    async fn unresolvable_candidate_changes_nothing() {
        let fixture = WorldFixture::new().with_loot().with_armor(true, &[RING]);
        let mut armor = fixture.armor();

        let result = run(&fixture.store, &TagConfig::default(), &mut armor, &"ghost#0".into())
            .await
            .unwrap();

        assert_eq!(result.unresolved, vec![ItemRef::from("ghost#0")]);
        assert!(result.messages.is_empty());
        assert_eq!(fixture.armor().attached(), &[ItemRef::from(RING)]);
    }

    #[tokio::test]
    async fn unowned_carrier_still_links() {
        let fixture = WorldFixture::new().with_loot().with_unowned_armor(true, &[]);
        let mut armor = fixture.armor();

        let result = run(&fixture.store, &TagConfig::default(), &mut armor, &RING.into())
            .await
            .unwrap();

        assert!(result.created_effects.is_empty());
        assert_eq!(fixture.armor().attached(), &[ItemRef::from(RING)]);
        assert!(fixture.hero_effects().is_empty());
    }

    #[tokio::test]
    async fn item_without_effects_links_quietly() {
        let fixture = WorldFixture::new().with_loot().with_armor(true, &[]);
        let mut armor = fixture.armor();

        let result = run(&fixture.store, &TagConfig::default(), &mut armor, &PLAIN.into())
            .await
            .unwrap();

        assert!(result.is_effect_noop());
        assert_eq!(armor.attached(), &[ItemRef::from(PLAIN)]);
    }

    #[tokio::test]
    async fn failed_effect_batch_rolls_back_relation() {
        let fixture = WorldFixture::new().with_loot().with_armor(true, &[RUNE]);
        let mut armor = fixture.armor();

        fixture.store.backend.set_simulate_actor_write_error(true);
        let result = run(&fixture.store, &TagConfig::default(), &mut armor, &RING.into()).await;
        fixture.store.backend.set_simulate_actor_write_error(false);

        assert!(result.is_err());
        assert_eq!(armor.attached(), &[ItemRef::from(RUNE)]);
        assert_eq!(fixture.armor().attached(), &[ItemRef::from(RUNE)]);
        assert!(fixture.hero_effects().is_empty());
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let fixture = WorldFixture::new().with_loot().with_sword(true, &[]);
        let mut item = Item::from(fixture.sword());
        let carrier = item.as_carrier_mut().unwrap();

        run(&fixture.store, &TagConfig::default(), carrier, &RING.into())
            .await
            .unwrap();

        assert_eq!(fixture.sword().attached(), &[ItemRef::from(RING)]);
        assert_eq!(fixture.hero_effects().len(), 1);
    }

    #[tokio::test]
    async fn blank_candidate_changes_nothing() {
        let fixture = WorldFixture::new().with_armor(true, &[]);
        fixture
            .store
            .put_item(Loot::new(" ", "Nameless Charm").with_effect(glow()))
            .unwrap();
        let mut armor = fixture.armor();

        let result = run(&fixture.store, &TagConfig::default(), &mut armor, &" ".into())
            .await
            .unwrap();

        assert_eq!(result.unresolved, vec![ItemRef::from(" ")]);
        assert!(armor.attached().is_empty());
        assert!(fixture.armor().attached().is_empty());
        assert!(fixture.hero_effects().is_empty());
    }

    #[tokio::test]
    async fn dangling_owner_still_links() {
        let fixture = WorldFixture::new()
            .with_loot()
            .with_dangling_owner_armor(true, &[]);
        let mut armor = fixture.armor();

        let result = run(&fixture.store, &TagConfig::default(), &mut armor, &RING.into())
            .await
            .unwrap();

        assert!(result.created_effects.is_empty());
        assert_eq!(armor.attached(), &[ItemRef::from(RING)]);
        assert_eq!(fixture.armor().attached(), &[ItemRef::from(RING)]);
        assert!(fixture.hero_effects().is_empty());
    }
}
