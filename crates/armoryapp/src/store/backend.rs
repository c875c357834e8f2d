use crate::error::Result;
use crate::model::{Actor, ActorRef, Item, ItemRef};
use std::collections::BTreeMap;

/// Abstract interface for raw world document I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while WorldStore handles the "what" (resolution, batches, carrier patches).
pub trait StorageBackend {
    // --- Item Documents ---

    /// Load every item document (items.json).
    /// Returns an empty map if nothing has been written yet.
    fn load_items(&self) -> Result<BTreeMap<ItemRef, Item>>;

    /// Save every item document.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_items(&self, items: &BTreeMap<ItemRef, Item>) -> Result<()>;

    // --- Actor Documents ---

    /// Load every actor document, effects included (actors.json).
    fn load_actors(&self) -> Result<BTreeMap<ActorRef, Actor>>;

    /// Save every actor document.
    /// MUST be atomic: a failed save leaves the previous effects in place.
    fn save_actors(&self, actors: &BTreeMap<ActorRef, Actor>) -> Result<()>;
}
