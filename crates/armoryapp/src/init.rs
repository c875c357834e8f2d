//! # Initialization
//!
//! Builds a ready-to-use [`AttachmentSynchronizer`] over a file-backed world.
//!
//! ## Data Directory Resolution
//!
//! The world (items and actors) lives in one data directory, chosen in order:
//! 1. `data_override` (the CLI's `--data` flag).
//! 2. The `ARMORY_DATA` environment variable. Primarily used by tests to isolate state.
//! 3. The OS-appropriate data directory (via the `directories` crate).
//!
//! ## Configuration
//!
//! `armory.toml` is searched in the global config directory and then in the data
//! directory, merged so that the data directory wins. A missing or unreadable file falls
//! back to compiled defaults. The result is converted once into explicit settings for the
//! synchronizer.

use crate::api::AttachmentSynchronizer;
use crate::config::ArmoryConfig;
use crate::error::{ArmoryError, Result};
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub const DATA_ENV: &str = "ARMORY_DATA";
pub const CONFIG_FILE: &str = "armory.toml";

pub struct ArmoryContext {
    pub api: AttachmentSynchronizer<FileStore>,
    pub config: ArmoryConfig,
    pub data_dir: PathBuf,
}

/// Initialize the armory context: resolve the data directory, load configuration and
/// open the file store.
///
/// # Environment Variables
///
/// * `ARMORY_DATA` - If set, overrides the default data directory. Ignored when
///   `data_override` is given.
pub fn initialize(data_override: Option<PathBuf>) -> Result<ArmoryContext> {
    let dirs = ProjectDirs::from("com", "armory", "armory");
    let data_dir = match data_override {
        Some(path) => path,
        None => std::env::var(DATA_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs.as_ref().map(|d| d.data_dir().to_path_buf()))
            .ok_or_else(|| ArmoryError::Api("Could not determine data directory".to_string()))?,
    };

    let mut search_paths = Vec::new();
    if let Some(dirs) = &dirs {
        search_paths.push(SearchPath::Path(dirs.config_dir().to_path_buf()));
    }
    search_paths.push(SearchPath::Path(data_dir.clone()));

    let config: ArmoryConfig = Clapfig::builder()
        .app_name("armory")
        .file_name(CONFIG_FILE)
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default();
    debug!(data_dir = %data_dir.display(), ?config, "armory initialized");

    let store = FileStore::new(data_dir.clone());
    let api = AttachmentSynchronizer::from_config(store, &config);

    Ok(ArmoryContext {
        api,
        config,
        data_dir,
    })
}
