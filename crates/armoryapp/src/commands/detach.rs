use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Carrier, ItemRef};
use crate::provenance::{TagConfig, TagFilter};
use crate::store::{CarrierPatch, Host};

use super::helpers::{live_owner, remove_tagged, restore_relation};

/// Unlink `item` from `carrier` and delete every effect the link produced.
///
/// The relation update is skipped when `item` is not attached, but the effect cleanup
/// always runs (whatever the equipped flag says), so detaching twice or detaching a
/// stale reference still clears strays.
///
/// If the effect cleanup fails the stored relation is put back and the error returned,
/// leaving `carrier` unchanged.
pub async fn run<H, C>(
    host: &H,
    tags: &TagConfig,
    carrier: &mut C,
    item: &ItemRef,
) -> Result<CmdResult>
where
    H: Host + ?Sized,
    C: Carrier + ?Sized,
{
    let mut result = CmdResult::default();
    let owner = live_owner(host, &*carrier).await?;

    let was_attached = carrier.attachments().contains(item);
    let previous = carrier.attached().to_vec();
    let remaining: Vec<ItemRef> = previous
        .iter()
        .filter(|existing| *existing != item)
        .cloned()
        .collect();
    let patch = CarrierPatch::attached(&remaining);
    if was_attached {
        host.persist_carrier(carrier.item_ref(), &patch).await?;
    }

    if let Some(actor) = &owner {
        let filter = TagFilter::Link(carrier.item_ref(), item);
        match remove_tagged(host, tags, actor, filter).await {
            Ok(removed) => result.removed_effects = removed,
            Err(err) => {
                if was_attached {
                    restore_relation(host, carrier.item_ref(), &CarrierPatch::attached(&previous))
                        .await;
                }
                return Err(err);
            }
        }
    }

    if was_attached {
        patch.apply_to(carrier.attachments_mut());
        result.add_message(CmdMessage::success(format!(
            "Detached {} from {}",
            item,
            carrier.item_ref()
        )));
    } else if !result.removed_effects.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "{} was not attached; removed {} stray effect(s)",
            item,
            result.removed_effects.len()
        )));
    }

    Ok(result)
}
