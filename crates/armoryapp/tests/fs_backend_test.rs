use armoryapp::model::{Actor, Armor, Attachments, Carrier, Item, ItemRef, Loot, SourceEffect};
use armoryapp::store::backend::StorageBackend;
use armoryapp::store::fs_backend::{FsBackend, ACTORS_FILE, ITEMS_FILE};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[test]
fn test_fs_backend_empty_dir_loads_empty() {
    let (_dir, backend) = setup();
    assert!(backend.load_items().unwrap().is_empty());
    assert!(backend.load_actors().unwrap().is_empty());
}

#[test]
fn test_fs_backend_items_io() {
    let (_dir, backend) = setup();

    let mut items = BTreeMap::new();
    let armor = Armor::new("armor", "Chainmail")
        .owned_by("hero")
        .with_attachments(Attachments::new(true, vec![ItemRef::from("ring")]));
    let ring = Loot::new("ring", "Ring").with_effect(SourceEffect::new("glow", "Glow"));
    items.insert(ItemRef::from("armor"), Item::from(armor.clone()));
    items.insert(ItemRef::from("ring"), Item::from(ring));

    backend.save_items(&items).unwrap();
    let loaded = backend.load_items().unwrap();

    assert_eq!(loaded, items);
    assert_eq!(loaded[&ItemRef::from("armor")], Item::from(armor));
}

#[test]
fn test_fs_backend_actors_io() {
    let (dir, backend) = setup();

    let mut actors = BTreeMap::new();
    actors.insert("hero".into(), Actor::new("hero", "Hero"));
    backend.save_actors(&actors).unwrap();

    assert!(dir.path().join(ACTORS_FILE).exists());
    assert_eq!(backend.load_actors().unwrap(), actors);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();
    let mut items = BTreeMap::new();
    items.insert(ItemRef::from("ring"), Item::from(Loot::new("ring", "Ring")));

    backend.save_items(&items).unwrap();
    backend.save_items(&items).unwrap();

    assert!(dir.path().join(ITEMS_FILE).exists());
    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_creates_missing_root() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("worlds").join("campaign");
    let backend = FsBackend::new(nested.clone());

    backend.save_actors(&BTreeMap::new()).unwrap();
    assert!(nested.join(ACTORS_FILE).exists());
}

#[test]
fn test_fs_backend_cleans_legacy_attachments() {
    let (dir, backend) = setup();
    let legacy = r#"{
        "armor": {
            "type": "armor",
            "id": "armor",
            "name": "Chainmail",
            "attachments": { "equipped": false, "attached": ["ring", null, "ring"] }
        }
    }"#;
    fs::write(dir.path().join(ITEMS_FILE), legacy).unwrap();

    let items = backend.load_items().unwrap();
    let carrier = items[&ItemRef::from("armor")].as_carrier().unwrap();
    assert_eq!(carrier.attached(), &[ItemRef::from("ring")]);
}

#[test]
fn test_fs_backend_corrupt_file_is_an_error() {
    let (dir, backend) = setup();
    fs::write(dir.path().join(ACTORS_FILE), "{ not json").unwrap();
    assert!(backend.load_actors().is_err());
}
