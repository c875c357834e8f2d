use super::backend::StorageBackend;
use crate::error::{ArmoryError, Result};
use crate::model::{Actor, ActorRef, Item, ItemRef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const ITEMS_FILE: &str = "items.json";
pub const ACTORS_FILE: &str = "actors.json";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ArmoryError::Io)?;
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path).map_err(ArmoryError::Io)?;
        serde_json::from_str(&content).map_err(ArmoryError::Serialization)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(value).map_err(ArmoryError::Serialization)?;

        // Atomic write
        let stem = name.trim_end_matches(".json");
        let tmp_file = self.root.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(ArmoryError::Io)?;
        fs::rename(&tmp_file, self.root.join(name)).map_err(ArmoryError::Io)?;
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_items(&self) -> Result<BTreeMap<ItemRef, Item>> {
        self.read_json(ITEMS_FILE)
    }

    fn save_items(&self, items: &BTreeMap<ItemRef, Item>) -> Result<()> {
        self.write_json(ITEMS_FILE, items)
    }

    fn load_actors(&self) -> Result<BTreeMap<ActorRef, Actor>> {
        self.read_json(ACTORS_FILE)
    }

    fn save_actors(&self, actors: &BTreeMap<ActorRef, Actor>) -> Result<()> {
        self.write_json(ACTORS_FILE, actors)
    }
}
