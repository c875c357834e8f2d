//! # Storage Layer
//!
//! Armory does not own the documents it synchronizes. Items, actors and effects belong to
//! a host, and the engine talks to that host through three collaborator traits:
//!
//! - [`ReferenceResolver`]: turn an opaque [`ItemRef`] into an [`Item`].
//! - [`EffectStore`]: an actor's effect collection with batch create and batch delete.
//! - [`CarrierStore`]: persist changes to a carrier's attachment relation.
//!
//! [`Host`] is the union of the three; anything implementing all of them can drive the
//! [`crate::api::AttachmentSynchronizer`].
//!
//! ## Execution Model
//!
//! The traits are async because host persistence is. The host is single-threaded and
//! event-driven, so futures are not required to be `Send` (`#[async_trait(?Send)]`), and
//! implementations may use `RefCell` for interior mutability.
//!
//! Operations against the same carrier are **not** serialized here. Hosts must deliver one
//! user gesture at a time per document and keep the triggering control disabled until the
//! operation resolves.
//!
//! ## Batch Semantics
//!
//! `create_effects` and `delete_effects` are all-or-nothing per call. The engine keeps no
//! partial-success bookkeeping and has no compensation for a host that violates this.
//!
//! ## Implementations
//!
//! [`world_store::WorldStore`] implements all three traits over a raw [`backend::StorageBackend`]:
//!
//! - [`fs::FileStore`]: JSON documents on disk.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── items.json      # ItemRef -> Item (carriers and attachable loot)
//! ├── actors.json     # ActorRef -> Actor (with its effects)
//! └── armory.toml     # Optional configuration
//! ```

use crate::error::Result;
use crate::model::{ActiveEffect, ActorRef, Attachments, EffectId, EffectPayload, Item, ItemRef};
use async_trait::async_trait;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod world_store;

#[async_trait(?Send)]
pub trait ReferenceResolver {
    /// Resolve a reference.
    /// Returns Ok(None) if nothing answers to it.
    /// Returns Err only on actual host failures (I/O, corrupt documents).
    async fn resolve(&self, item: &ItemRef) -> Result<Option<Item>>;
}

#[async_trait(?Send)]
pub trait EffectStore {
    /// All effects currently on the actor.
    async fn effects(&self, actor: &ActorRef) -> Result<Vec<ActiveEffect>>;

    /// Create every payload in one batch. Returns the stored effects with their new ids.
    async fn create_effects(
        &self,
        actor: &ActorRef,
        payloads: Vec<EffectPayload>,
    ) -> Result<Vec<ActiveEffect>>;

    /// Delete by identity in one batch. Unknown ids are ignored.
    async fn delete_effects(&self, actor: &ActorRef, ids: &[EffectId]) -> Result<()>;
}

#[async_trait(?Send)]
pub trait CarrierStore {
    /// Persist the fields set in `patch` on the carrier's stored record.
    async fn persist_carrier(&self, carrier: &ItemRef, patch: &CarrierPatch) -> Result<()>;
}

pub trait Host: ReferenceResolver + EffectStore + CarrierStore {}

impl<T: ReferenceResolver + EffectStore + CarrierStore> Host for T {}

/// Partial update of a carrier's attachment relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierPatch {
    pub attached: Option<Vec<ItemRef>>,
    pub equipped: Option<bool>,
}

impl CarrierPatch {
    pub fn attached(attached: &[ItemRef]) -> Self {
        Self {
            attached: Some(attached.to_vec()),
            equipped: None,
        }
    }

    pub fn equipped(equipped: bool) -> Self {
        Self {
            attached: None,
            equipped: Some(equipped),
        }
    }

    /// Apply to a relation. The uniqueness invariant survives any patch.
    pub fn apply_to(&self, attachments: &mut Attachments) {
        if let Some(attached) = &self.attached {
            *attachments = Attachments::new(attachments.equipped(), attached.iter().cloned());
        }
        if let Some(equipped) = self.equipped {
            attachments.set_equipped(equipped);
        }
    }
}
