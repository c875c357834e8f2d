use super::backend::StorageBackend;
use super::{CarrierPatch, CarrierStore, EffectStore, ReferenceResolver};
use crate::error::{ArmoryError, Result};
use crate::model::{ActiveEffect, Actor, ActorRef, EffectId, EffectPayload, Item, ItemRef};
use async_trait::async_trait;
use uuid::Uuid;

/// Host collaborators over a raw document backend.
///
/// Every mutating call is a single load-modify-save of one document set, so a batch either
/// lands whole or not at all (provided the backend's save is atomic).
pub struct WorldStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> WorldStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Insert or replace an item document.
    pub fn put_item(&self, item: impl Into<Item>) -> Result<()> {
        let item = item.into();
        let mut items = self.backend.load_items()?;
        items.insert(item.item_ref().clone(), item);
        self.backend.save_items(&items)
    }

    /// Remove an item document. Returns false if it did not exist.
    /// References to it from carriers are left dangling.
    pub fn remove_item(&self, item: &ItemRef) -> Result<bool> {
        let mut items = self.backend.load_items()?;
        if items.remove(item).is_none() {
            return Ok(false);
        }
        self.backend.save_items(&items)?;
        Ok(true)
    }

    pub fn get_item(&self, item: &ItemRef) -> Result<Option<Item>> {
        Ok(self.backend.load_items()?.get(item).cloned())
    }

    /// Insert or replace an actor document.
    pub fn put_actor(&self, actor: Actor) -> Result<()> {
        let mut actors = self.backend.load_actors()?;
        actors.insert(actor.id.clone(), actor);
        self.backend.save_actors(&actors)
    }

    pub fn get_actor(&self, actor: &ActorRef) -> Result<Option<Actor>> {
        Ok(self.backend.load_actors()?.get(actor).cloned())
    }
}

#[async_trait(?Send)]
impl<B: StorageBackend> ReferenceResolver for WorldStore<B> {
    async fn resolve(&self, item: &ItemRef) -> Result<Option<Item>> {
        self.get_item(item)
    }
}

#[async_trait(?Send)]
impl<B: StorageBackend> EffectStore for WorldStore<B> {
    async fn effects(&self, actor: &ActorRef) -> Result<Vec<ActiveEffect>> {
        self.get_actor(actor)?
            .map(|a| a.effects)
            .ok_or_else(|| ArmoryError::ActorNotFound(actor.clone()))
    }

    async fn create_effects(
        &self,
        actor: &ActorRef,
        payloads: Vec<EffectPayload>,
    ) -> Result<Vec<ActiveEffect>> {
        if payloads.is_empty() {
            return Ok(Vec::new());
        }

        let mut actors = self.backend.load_actors()?;
        let target = actors
            .get_mut(actor)
            .ok_or_else(|| ArmoryError::ActorNotFound(actor.clone()))?;

        let created: Vec<ActiveEffect> = payloads
            .into_iter()
            .map(|payload| {
                ActiveEffect::from_payload(EffectId::new(Uuid::new_v4().to_string()), payload)
            })
            .collect();
        target.effects.extend(created.iter().cloned());

        self.backend.save_actors(&actors)?;
        Ok(created)
    }

    async fn delete_effects(&self, actor: &ActorRef, ids: &[EffectId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut actors = self.backend.load_actors()?;
        let target = actors
            .get_mut(actor)
            .ok_or_else(|| ArmoryError::ActorNotFound(actor.clone()))?;

        let before = target.effects.len();
        target.effects.retain(|effect| !ids.contains(&effect.id));
        if target.effects.len() == before {
            return Ok(());
        }

        self.backend.save_actors(&actors)
    }
}

#[async_trait(?Send)]
impl<B: StorageBackend> CarrierStore for WorldStore<B> {
    async fn persist_carrier(&self, carrier: &ItemRef, patch: &CarrierPatch) -> Result<()> {
        let mut items = self.backend.load_items()?;
        let item = items
            .get_mut(carrier)
            .ok_or_else(|| ArmoryError::ItemNotFound(carrier.clone()))?;
        let record = item
            .as_carrier_mut()
            .ok_or_else(|| ArmoryError::NotACarrier(carrier.clone()))?;

        patch.apply_to(record.attachments_mut());
        self.backend.save_items(&items)
    }
}
