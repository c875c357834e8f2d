use crate::error::{ArmoryError, Result};
use crate::model::{ActorRef, Carrier, EffectId, EffectPayload, Item, ItemRef};
use crate::provenance::{ProvenanceTag, TagConfig, TagFilter};
use crate::store::{CarrierPatch, CarrierStore, EffectStore, ReferenceResolver};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Copy every source effect of `item` into a payload tagged `(carrier, item_ref, effect.id)`.
///
/// Tags already in `existing` are skipped, and each produced tag is added to it, so a set
/// threaded through several calls never yields two payloads with the same tag.
pub fn materialize(
    tags: &TagConfig,
    carrier: &ItemRef,
    item_ref: &ItemRef,
    item: &Item,
    existing: &mut HashSet<ProvenanceTag>,
) -> Result<Vec<EffectPayload>> {
    let mut payloads = Vec::new();
    for source in item.effects() {
        let tag = ProvenanceTag::new(carrier, item_ref, &source.id);
        if existing.contains(&tag) {
            continue;
        }

        let mut payload = EffectPayload::copy_of(source);
        payload.origin = Some(tag.origin());
        tags.stamp(&mut payload.flags, &tag)?;
        payloads.push(payload);
        existing.insert(tag);
    }
    Ok(payloads)
}

/// The carrier's owner, provided the host still knows that actor.
///
/// An owner reference that no longer resolves is treated like having no owner: effect
/// propagation is skipped and the relation update goes ahead.
pub async fn live_owner<E, C>(store: &E, carrier: &C) -> Result<Option<ActorRef>>
where
    E: EffectStore + ?Sized,
    C: Carrier + ?Sized,
{
    let Some(actor) = carrier.owner() else {
        debug!(carrier = %carrier.item_ref(), "carrier has no owning actor, skipping effects");
        return Ok(None);
    };

    match store.effects(actor).await {
        Ok(_) => Ok(Some(actor.clone())),
        Err(ArmoryError::ActorNotFound(_)) => {
            debug!(
                carrier = %carrier.item_ref(),
                actor = %actor,
                "owning actor does not exist, skipping effects"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Provenance tags already on `actor` that were produced by `carrier`.
pub async fn existing_tags<E: EffectStore + ?Sized>(
    store: &E,
    tags: &TagConfig,
    actor: &ActorRef,
    carrier: &ItemRef,
) -> Result<HashSet<ProvenanceTag>> {
    let effects = store.effects(actor).await?;
    Ok(effects
        .iter()
        .filter_map(|effect| tags.tag_of(effect))
        .filter(|tag| TagFilter::Carrier(carrier).matches(tag))
        .collect())
}

/// Delete, in a single batch, every effect on `actor` whose tag passes `filter`.
/// Returns the deleted ids.
pub async fn remove_tagged<E: EffectStore + ?Sized>(
    store: &E,
    tags: &TagConfig,
    actor: &ActorRef,
    filter: TagFilter<'_>,
) -> Result<Vec<EffectId>> {
    let effects = store.effects(actor).await?;
    let ids: Vec<EffectId> = tags
        .select(&effects, filter)
        .into_iter()
        .map(|effect| effect.id.clone())
        .collect();

    if !ids.is_empty() {
        store.delete_effects(actor, &ids).await?;
        info!(actor = %actor, count = ids.len(), "removed attachment effects");
    }
    Ok(ids)
}

/// Put a carrier's stored relation back after effect propagation failed.
/// A failure here is logged; the caller reports the original error.
pub async fn restore_relation<S: CarrierStore + ?Sized>(
    store: &S,
    carrier: &ItemRef,
    patch: &CarrierPatch,
) {
    if let Err(err) = store.persist_carrier(carrier, patch).await {
        warn!(carrier = %carrier, error = %err, "failed to restore attachment relation");
    }
}

/// Resolve a reference, treating host failures like a missing item.
/// Used where one broken reference must not block the others.
pub async fn resolve_quietly<R: ReferenceResolver + ?Sized>(
    resolver: &R,
    item: &ItemRef,
) -> Option<Item> {
    match resolver.resolve(item).await {
        Ok(Some(found)) => Some(found),
        Ok(None) => {
            warn!(item = %item, "attachment reference does not resolve");
            None
        }
        Err(err) => {
            warn!(item = %item, error = %err, "failed to resolve attachment reference");
            None
        }
    }
}
