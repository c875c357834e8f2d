//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single entry point
//! for attachment synchronization, whatever client drives it.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Holds the wiring**: the host collaborators and the [`TagConfig`] / [`ContextConfig`]
//!   chosen at construction
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`, `Vec<AttachmentEntry>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O to the terminal**: No stdout or stderr
//! - **Configuration lookup**: Settings are passed in, never read from process-wide state
//!
//! ## Generic Over Host
//!
//! `AttachmentSynchronizer<H: Host>` is generic over the collaborators:
//! - Production: `AttachmentSynchronizer<FileStore>`
//! - Testing: `AttachmentSynchronizer<InMemoryStore>`
//! - Embedding: any type implementing the three store traits
//!
//! ## Carriers
//!
//! Every mutating method takes `&mut C` where `C: Carrier + ?Sized`. The carrier's
//! relation is updated in place once the host has accepted the change, so callers can keep
//! using the same value. [`AttachmentSynchronizer::carrier`] loads one by reference.

use crate::commands::{self, AttachmentEntry, CmdResult};
use crate::config::{ArmoryConfig, ContextConfig};
use crate::error::{ArmoryError, Result};
use crate::model::{ActiveEffect, ActorRef, Carrier, ItemRef};
use crate::provenance::TagConfig;
use crate::store::Host;

/// The main API facade for armory operations.
pub struct AttachmentSynchronizer<H: Host> {
    host: H,
    tags: TagConfig,
    context: ContextConfig,
}

impl<H: Host> AttachmentSynchronizer<H> {
    pub fn new(host: H, tags: TagConfig) -> Self {
        Self {
            host,
            tags,
            context: ContextConfig::default(),
        }
    }

    pub fn from_config(host: H, config: &ArmoryConfig) -> Self {
        Self::new(host, config.tag_config()).with_context_config(config.context_config())
    }

    pub fn with_context_config(mut self, context: ContextConfig) -> Self {
        self.context = context;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn tags(&self) -> &TagConfig {
        &self.tags
    }

    pub async fn attach<C: Carrier + ?Sized>(
        &self,
        carrier: &mut C,
        candidate: &ItemRef,
    ) -> Result<CmdResult> {
        commands::attach::run(&self.host, &self.tags, carrier, candidate).await
    }

    pub async fn detach<C: Carrier + ?Sized>(
        &self,
        carrier: &mut C,
        item: &ItemRef,
    ) -> Result<CmdResult> {
        commands::detach::run(&self.host, &self.tags, carrier, item).await
    }

    /// Propagate an equipped-state transition the host has already stored.
    pub async fn on_equip_change<C: Carrier + ?Sized>(
        &self,
        carrier: &C,
        equipped: bool,
    ) -> Result<CmdResult> {
        commands::equip::on_equip_change(&self.host, &self.tags, carrier, equipped).await
    }

    /// Store a new equipped flag and propagate it.
    pub async fn set_equipped<C: Carrier + ?Sized>(
        &self,
        carrier: &mut C,
        equipped: bool,
    ) -> Result<CmdResult> {
        commands::equip::set_equipped(&self.host, &self.tags, carrier, equipped).await
    }

    pub async fn build_attachment_context<C: Carrier + ?Sized>(
        &self,
        carrier: &C,
    ) -> Vec<AttachmentEntry> {
        commands::context::build(&self.host, &self.context, carrier).await
    }

    pub async fn doctor<C: Carrier + ?Sized>(&self, carrier: &C) -> Result<CmdResult> {
        commands::doctor::run(&self.host, &self.tags, carrier).await
    }

    /// Load a carrier by reference.
    pub async fn carrier(&self, item: &ItemRef) -> Result<Box<dyn Carrier>> {
        let found = self
            .host
            .resolve(item)
            .await?
            .ok_or_else(|| ArmoryError::ItemNotFound(item.clone()))?;
        found
            .into_carrier()
            .ok_or_else(|| ArmoryError::NotACarrier(item.clone()))
    }

    pub async fn effects(&self, actor: &ActorRef) -> Result<Vec<ActiveEffect>> {
        self.host.effects(actor).await
    }
}
