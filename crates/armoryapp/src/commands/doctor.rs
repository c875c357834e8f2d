use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Carrier, EffectId, Item, ItemRef};
use crate::provenance::{ProvenanceTag, TagConfig, TagFilter};
use crate::store::Host;
use std::collections::HashSet;
use tracing::info;

use super::helpers::{live_owner, materialize, resolve_quietly};

/// Audit one carrier's derived effects on its owner and repair drift.
///
/// - Effects tagged for the carrier that no current attachment accounts for are deleted.
/// - When two effects carry the same tag, all but the first are deleted.
/// - Missing effects for an equipped carrier's attachments are created.
///
/// Effects of attachments that do not resolve are kept, since there is no way to tell
/// what they should be.
pub async fn run<H, C>(host: &H, tags: &TagConfig, carrier: &C) -> Result<CmdResult>
where
    H: Host + ?Sized,
    C: Carrier + ?Sized,
{
    let mut result = CmdResult::default();
    let carrier_ref = carrier.item_ref();

    let Some(actor) = live_owner(host, carrier).await? else {
        result.add_message(CmdMessage::info(format!(
            "{} has no owning actor; nothing to check.",
            carrier_ref
        )));
        return Ok(result);
    };
    let actor = &actor;

    let mut resolved: Vec<(&ItemRef, Item)> = Vec::new();
    let mut unverifiable: HashSet<&ItemRef> = HashSet::new();
    if carrier.is_equipped() {
        for item_ref in carrier.attached() {
            match resolve_quietly(host, item_ref).await {
                Some(item) => resolved.push((item_ref, item)),
                None => {
                    unverifiable.insert(item_ref);
                    result.unresolved.push(item_ref.clone());
                }
            }
        }
    }

    let expected: HashSet<ProvenanceTag> = resolved
        .iter()
        .flat_map(|(item_ref, item)| {
            item.effects()
                .iter()
                .map(move |source| ProvenanceTag::new(carrier_ref, item_ref, &source.id))
        })
        .collect();

    let effects = host.effects(actor).await?;
    let mut kept: HashSet<ProvenanceTag> = HashSet::new();
    let mut orphans: Vec<EffectId> = Vec::new();
    let mut duplicates: Vec<EffectId> = Vec::new();

    for effect in tags.select(&effects, TagFilter::Carrier(carrier_ref)) {
        let Some(tag) = tags.tag_of(effect) else {
            continue;
        };
        if kept.contains(&tag) {
            duplicates.push(effect.id.clone());
        } else if expected.contains(&tag) || unverifiable.contains(&tag.item_ref) {
            kept.insert(tag);
        } else {
            orphans.push(effect.id.clone());
        }
    }

    let stale: Vec<EffectId> = orphans.iter().chain(&duplicates).cloned().collect();
    if !stale.is_empty() {
        host.delete_effects(actor, &stale).await?;
        info!(actor = %actor, carrier = %carrier_ref, count = stale.len(), "doctor removed stale effects");
        result.removed_effects = stale;
    }

    let mut payloads = Vec::new();
    for (item_ref, item) in &resolved {
        payloads.extend(materialize(tags, carrier_ref, item_ref, item, &mut kept)?);
    }
    if !payloads.is_empty() {
        result.created_effects = host.create_effects(actor, payloads).await?;
        info!(
            actor = %actor,
            carrier = %carrier_ref,
            count = result.created_effects.len(),
            "doctor created missing effects"
        );
    }

    if result.is_effect_noop() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if !orphans.is_empty() {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} effect(s) with no matching attachment.",
                orphans.len()
            )));
        }
        if !duplicates.is_empty() {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} duplicate effect(s).",
                duplicates.len()
            )));
        }
        if !result.created_effects.is_empty() {
            result.add_message(CmdMessage::success(format!(
                "  - Restored {} missing effect(s).",
                result.created_effects.len()
            )));
        }
    }
    if !result.unresolved.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "{} attachment(s) could not be resolved; their effects were left as-is.",
            result.unresolved.len()
        )));
    }

    Ok(result)
}
