//! The embedding flow: logger, store handle, baseless id, create, print location.

use pimstore_lib::header::HeaderExt;
use pimstore_lib::{Store, StoreError, StoreId, init_logger};

use super::common::TestStore;

#[test]
fn create_entry_from_baseless_id() {
  let _ = init_logger(true, true, false);
  let t = TestStore::new();

  let id = StoreId::new_baseless("test").unwrap();
  assert!(!id.has_base());

  let entry = t.store.create(id).unwrap();
  let location = entry.location().to_str().unwrap();
  tracing::info!("Created {} from Rust", location);

  assert_eq!(location, t.path().join("test").to_str().unwrap());
  drop(entry);
  assert!(t.path().join("test").is_file());
}

#[test]
fn entries_survive_reopening() {
  let t = TestStore::new();
  {
    let mut entry = t.store.create("notes/a".parse().unwrap()).unwrap();
    entry.set_content("persisted");
    entry
      .header_mut()
      .set("note.tags.[0]", toml::Value::String("x".into()))
      .unwrap();
  }

  let other = t.reopen();
  let entry = other.get("notes/a".parse().unwrap()).unwrap().unwrap();
  assert_eq!(entry.content(), "persisted");
  assert_eq!(
    entry.header().read("note.tags.[0]").unwrap(),
    Some(&toml::Value::String("x".into()))
  );
}

#[test]
fn second_handle_sees_existing_entry() {
  let t = TestStore::new();
  drop(t.store.create("dup".parse().unwrap()).unwrap());

  let other = t.reopen();
  assert!(matches!(
    other.create("dup".parse().unwrap()),
    Err(StoreError::EntryAlreadyExists(_))
  ));
}

#[test]
fn store_path_that_is_a_file_is_rejected() {
  let t = TestStore::new();
  let file = t.temp.path().join("plain-file");
  std::fs::write(&file, "").unwrap();

  assert!(matches!(Store::open(false, &file), Err(StoreError::StorePathIsFile(_))));
}

#[test]
fn in_memory_handle_touches_nothing() {
  let temp = tempfile::TempDir::new().unwrap();
  let path = temp.path().join("store");

  let store = Store::open(true, &path).unwrap();
  drop(store.create("test".parse().unwrap()).unwrap());

  assert!(store.exists(&"test".parse().unwrap()).unwrap());
  assert!(!path.exists());
}

#[test]
fn entry_deleted_by_another_handle_is_gone() {
  let t = TestStore::new();
  {
    let mut entry = t.store.create("shared".parse().unwrap()).unwrap();
    entry.set_content("original");
  }

  t.reopen().delete("shared".parse().unwrap()).unwrap();

  assert!(!t.store.exists(&"shared".parse().unwrap()).unwrap());
  assert!(t.store.get("shared".parse().unwrap()).unwrap().is_none());
  assert!(!t.path().join("shared").exists());
}

#[test]
fn dot_ids_cannot_shadow_store_files() {
  let t = TestStore::new();
  {
    let mut entry = t.store.create("x".parse().unwrap()).unwrap();
    entry.set_content("kept");
  }

  for raw in [".x.tmp", "notes/.secret", ".pim.lock"] {
    assert!(matches!(
      raw.parse::<StoreId>(),
      Err(StoreError::HiddenStoreIdComponent(_))
    ));
  }

  let entries = t.store.entries().unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(t.store.get("x".parse().unwrap()).unwrap().unwrap().content(), "kept");
}
