use super::fs_backend::FsBackend;
use super::world_store::WorldStore;
use std::path::PathBuf;

/// Production store: one JSON document per collection under a data directory.
pub type FileStore = WorldStore<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        WorldStore::with_backend(FsBackend::new(root))
    }
}
