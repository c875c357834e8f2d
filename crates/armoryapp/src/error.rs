//! Error types.
//!
//! Only conditions a caller can act on are errors. An attachment reference that no longer
//! resolves and a carrier without an owning actor are handled inside the commands (they show
//! up in [`crate::commands::CmdResult::unresolved`] and in the log) and never reach this enum.

use crate::model::{ActorRef, CarrierKind, ItemRef};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArmoryError {
    #[error("Item not found: {0}")]
    ItemNotFound(ItemRef),

    #[error("Actor not found: {0}")]
    ActorNotFound(ActorRef),

    #[error("Item {0} cannot hold attachments")]
    NotACarrier(ItemRef),

    #[error("{name} is already attached to this {kind}.")]
    DuplicateAttachment {
        carrier: ItemRef,
        item: ItemRef,
        name: String,
        kind: CarrierKind,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl ArmoryError {
    /// True for errors caused by a user action that simply had no effect.
    /// Clients should show these as warnings rather than failures.
    pub fn is_user_warning(&self) -> bool {
        matches!(self, ArmoryError::DuplicateAttachment { .. })
    }
}

pub type Result<T> = std::result::Result<T, ArmoryError>;
