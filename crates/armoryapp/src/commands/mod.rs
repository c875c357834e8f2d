//! # Command Layer
//!
//! This module contains the **attachment synchronization engine**. Each operation lives in
//! its own submodule as plain async functions over the host collaborators.
//!
//! ## The Invariant
//!
//! For every carrier `C` owned by actor `A`, every reference `R` in `C.attached` and every
//! source effect `S` on the item at `R`: an effect tagged `(C, R, S.id)` exists on `A`
//! **iff** `C` is equipped and `R` is attached. No two effects share a tag.
//!
//! The commands are the only code that mutates the attachment relation, and each one
//! restores the invariant before returning.
//!
//! ## Per-link State Machine
//!
//! ```text
//! Detached        --attach(unequipped)--> Linked-Inactive
//! Detached        --attach(equipped)----> Linked-Active    (creates effects)
//! Linked-Inactive --equip---------------> Linked-Active    (creates effects)
//! Linked-Active   --unequip-------------> Linked-Inactive  (removes effects)
//! Linked-Inactive --detach--------------> Detached
//! Linked-Active   --detach--------------> Detached         (removes effects)
//! ```
//!
//! ## Failure Policy
//!
//! - **Unresolvable or blank reference**: never an error. `attach` ignores the drop; equip skips that
//!   one attachment; the context shows a fallback entry. Listed in [`CmdResult::unresolved`].
//! - **No owning actor**, or an owner the host does not know: the relation is still updated,
//!   effect propagation is skipped.
//! - **Duplicate attach**: [`crate::error::ArmoryError::DuplicateAttachment`], nothing changes.
//! - **Host failure** (I/O, missing documents): propagated. `attach`, `set_equipped` and `detach`
//!   put the relation back before returning the error.
//!
//! ## Command Modules
//!
//! - [`attach`]: Link an item to a carrier
//! - [`detach`]: Unlink an item and remove its effects
//! - [`equip`]: React to equipped-state transitions
//! - [`context`]: Read-only attachment listing for presentation layers
//! - [`doctor`]: Audit and repair one carrier's derived effects
//! - [`helpers`]: Materialization and tag queries shared by the above

use crate::model::{ActiveEffect, EffectId, ItemRef};
use serde::Serialize;

pub mod attach;
pub mod context;
pub mod detach;
pub mod doctor;
pub mod equip;
pub mod helpers;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What an operation did.
#[derive(Debug, Default)]
pub struct CmdResult {
    /// Effects materialized on the owning actor.
    pub created_effects: Vec<ActiveEffect>,
    /// Ids of effects deleted from the owning actor.
    pub removed_effects: Vec<EffectId>,
    /// References that failed to resolve and were skipped.
    pub unresolved: Vec<ItemRef>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    /// True if the operation changed nothing on the actor.
    pub fn is_effect_noop(&self) -> bool {
        self.created_effects.is_empty() && self.removed_effects.is_empty()
    }
}

/// One row of the attachment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentEntry {
    pub reference: ItemRef,
    pub display_name: String,
    pub display_icon: String,
    /// False when the fallback name and icon were substituted.
    pub resolved: bool,
}
