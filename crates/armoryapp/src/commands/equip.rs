use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Carrier;
use crate::provenance::{TagConfig, TagFilter};
use crate::store::{CarrierPatch, Host};
use tracing::info;

use super::helpers::{
    existing_tags, live_owner, materialize, remove_tagged, resolve_quietly, restore_relation,
};

/// React to the carrier's equipped flag having become `equipped`.
///
/// Equipping materializes the effects of every attachment in one batch. References that
/// fail to resolve are skipped and reported in [`CmdResult::unresolved`]. Effects already
/// present for a (carrier, item, effect) triple are not created again.
///
/// Unequipping deletes every effect the carrier produced, whichever item it came from.
///
/// Does nothing for carriers without attachments, or whose owner is missing or unknown
/// to the host.
pub async fn on_equip_change<H, C>(
    host: &H,
    tags: &TagConfig,
    carrier: &C,
    equipped: bool,
) -> Result<CmdResult>
where
    H: Host + ?Sized,
    C: Carrier + ?Sized,
{
    let mut result = CmdResult::default();
    let carrier_ref = carrier.item_ref();

    if carrier.attachments().is_empty() {
        return Ok(result);
    }
    let Some(actor) = live_owner(host, carrier).await? else {
        return Ok(result);
    };
    let actor = &actor;

    if !equipped {
        result.removed_effects =
            remove_tagged(host, tags, actor, TagFilter::Carrier(carrier_ref)).await?;
        return Ok(result);
    }

    let mut existing = existing_tags(host, tags, actor, carrier_ref).await?;
    let mut payloads = Vec::new();
    for item_ref in carrier.attached() {
        match resolve_quietly(host, item_ref).await {
            Some(item) => {
                payloads.extend(materialize(tags, carrier_ref, item_ref, &item, &mut existing)?)
            }
            None => result.unresolved.push(item_ref.clone()),
        }
    }

    if !payloads.is_empty() {
        result.created_effects = host.create_effects(actor, payloads).await?;
        info!(
            actor = %actor,
            carrier = %carrier_ref,
            count = result.created_effects.len(),
            "created attachment effects"
        );
    }

    Ok(result)
}

/// Persist a new equipped flag and propagate the transition.
///
/// Setting the flag to its current value changes nothing. If propagation fails the
/// stored flag is put back and the error returned.
pub async fn set_equipped<H, C>(
    host: &H,
    tags: &TagConfig,
    carrier: &mut C,
    equipped: bool,
) -> Result<CmdResult>
where
    H: Host + ?Sized,
    C: Carrier + ?Sized,
{
    let state = if equipped { "equipped" } else { "unequipped" };

    if carrier.is_equipped() == equipped {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!(
            "{} is already {}",
            carrier.item_ref(),
            state
        )));
        return Ok(result);
    }

    let patch = CarrierPatch::equipped(equipped);
    host.persist_carrier(carrier.item_ref(), &patch).await?;
    patch.apply_to(carrier.attachments_mut());

    let propagated = on_equip_change(host, tags, &*carrier, equipped).await;
    let mut result = match propagated {
        Ok(result) => result,
        Err(err) => {
            let rollback = CarrierPatch::equipped(!equipped);
            restore_relation(host, carrier.item_ref(), &rollback).await;
            rollback.apply_to(carrier.attachments_mut());
            return Err(err);
        }
    };

    result.add_message(CmdMessage::success(format!(
        "{} {}",
        capitalize(state),
        carrier.item_ref()
    )));
    let skipped: Vec<CmdMessage> = result
        .unresolved
        .iter()
        .map(|item| {
            CmdMessage::warning(format!(
                "Attachment {} could not be found; its effects were skipped",
                item
            ))
        })
        .collect();
    result.messages.extend(skipped);

    Ok(result)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
