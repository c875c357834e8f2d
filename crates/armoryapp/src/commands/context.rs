use crate::commands::AttachmentEntry;
use crate::config::ContextConfig;
use crate::model::Carrier;
use crate::store::ReferenceResolver;
use futures::future::join_all;

use super::helpers::resolve_quietly;

/// One entry per attached reference, in attach order.
///
/// References are resolved concurrently. Any that fail get the fallback name and icon
/// from `config`; this never returns an error and never writes.
pub async fn build<R, C>(resolver: &R, config: &ContextConfig, carrier: &C) -> Vec<AttachmentEntry>
where
    R: ReferenceResolver + ?Sized,
    C: Carrier + ?Sized,
{
    let lookups = carrier
        .attached()
        .iter()
        .map(|reference| async move { (reference, resolve_quietly(resolver, reference).await) });

    join_all(lookups)
        .await
        .into_iter()
        .map(|(reference, item)| match item {
            Some(item) => AttachmentEntry {
                reference: reference.clone(),
                display_name: item.name().to_string(),
                display_icon: item
                    .img()
                    .unwrap_or(config.fallback_icon.as_str())
                    .to_string(),
                resolved: true,
            },
            None => AttachmentEntry {
                reference: reference.clone(),
                display_name: config.fallback_name.clone(),
                display_icon: config.fallback_icon.clone(),
                resolved: false,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArmoryError, Result};
    use crate::model::{Item, ItemRef, Loot};
    use crate::store::memory::fixtures::*;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait(?Send)]
    impl ReferenceResolver for Unreachable {
        async fn resolve(&self, _item: &ItemRef) -> Result<Option<Item>> {
            Err(ArmoryError::Store("host offline".into()))
        }
    }

    #[tokio::test]
    async fn lists_attachments_in_order() {
        let fixture = WorldFixture::new().with_loot().with_armor(false, &[RUNE, RING]);
        let entries = build(&fixture.store, &ContextConfig::default(), &fixture.armor()).await;

        let names: Vec<_> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Rune of Warding", "Ring of Glowing"]);
        assert!(entries.iter().all(|e| e.resolved));
    }

    #[tokio::test]
    async fn item_icon_is_used_when_present() {
        let fixture = WorldFixture::new().with_armor(false, &["gem#1"]);
        let mut gem = Loot::new("gem#1", "Gem");
        gem.img = Some("icons/gem.webp".to_string());
        fixture.store.put_item(gem).unwrap();

        let entries = build(&fixture.store, &ContextConfig::default(), &fixture.armor()).await;
        assert_eq!(entries[0].display_icon, "icons/gem.webp");
    }

    #[tokio::test]
    async fn missing_items_get_fallbacks() {
        let fixture = WorldFixture::new().with_loot().with_armor(false, &[RING, "ghost#0"]);
        let entries = build(&fixture.store, &ContextConfig::default(), &fixture.armor()).await;

        assert_eq!(entries.len(), 2);
        assert!(entries[0].resolved);
        assert_eq!(entries[1].reference, ItemRef::from("ghost#0"));
        assert_eq!(entries[1].display_name, "Unknown Item");
        assert_eq!(entries[1].display_icon, "icons/svg/item-bag.svg");
        assert!(!entries[1].resolved);
    }

    #[tokio::test]
    async fn deleted_item_falls_back() {
        let fixture = WorldFixture::new().with_loot().with_armor(false, &[RING]);
        assert!(fixture.store.remove_item(&RING.into()).unwrap());

        let entries = build(&fixture.store, &ContextConfig::default(), &fixture.armor()).await;

        assert_eq!(entries[0].reference, ItemRef::from(RING));
        assert_eq!(entries[0].display_name, "Unknown Item");
    }

    #[tokio::test]
    async fn total_resolution_failure_still_lists_everything() {
        let fixture = WorldFixture::new().with_armor(false, &[RING, RUNE, PLAIN]);
        let config = ContextConfig {
            fallback_name: "???".to_string(),
            fallback_icon: "missing.svg".to_string(),
        };

        let entries = build(&Unreachable, &config, &fixture.armor()).await;

        assert_eq!(entries.len(), 3);
        assert!(entries
            .iter()
            .all(|e| !e.resolved && e.display_name == "???" && e.display_icon == "missing.svg"));
    }

    #[tokio::test]
    async fn empty_carrier_has_empty_context() {
        let fixture = WorldFixture::new().with_armor(false, &[]);
        let entries = build(&fixture.store, &ContextConfig::default(), &fixture.armor()).await;
        assert!(entries.is_empty());
    }
}
