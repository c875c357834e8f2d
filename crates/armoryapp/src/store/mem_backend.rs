use super::backend::StorageBackend;
use crate::error::{ArmoryError, Result};
use crate::model::{Actor, ActorRef, Item, ItemRef};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the host is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    items: RefCell<BTreeMap<ItemRef, Item>>,
    actors: RefCell<BTreeMap<ActorRef, Actor>>,
    simulate_write_error: RefCell<bool>,
    simulate_actor_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Fail only actor writes, so item patches succeed while effect batches fail.
    pub fn set_simulate_actor_write_error(&self, simulate: bool) {
        *self.simulate_actor_write_error.borrow_mut() = simulate;
    }

    fn check_write(&self, actors: bool) -> Result<()> {
        let actor_failure = actors && *self.simulate_actor_write_error.borrow();
        if *self.simulate_write_error.borrow() || actor_failure {
            return Err(ArmoryError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_items(&self) -> Result<BTreeMap<ItemRef, Item>> {
        Ok(self.items.borrow().clone())
    }

    fn save_items(&self, items: &BTreeMap<ItemRef, Item>) -> Result<()> {
        self.check_write(false)?;
        *self.items.borrow_mut() = items.clone();
        Ok(())
    }

    fn load_actors(&self) -> Result<BTreeMap<ActorRef, Actor>> {
        Ok(self.actors.borrow().clone())
    }

    fn save_actors(&self, actors: &BTreeMap<ActorRef, Actor>) -> Result<()> {
        self.check_write(true)?;
        *self.actors.borrow_mut() = actors.clone();
        Ok(())
    }
}
