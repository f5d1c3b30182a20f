use todo_core::{KvStore, MemoryKvStore, StoreError, ViewMode, ViewModeStore, MODE_STORAGE_KEY};

#[test]
fn missing_mode_defaults_to_work() {
    let storage = MemoryKvStore::new();
    assert_eq!(ViewModeStore::new(&storage).load().unwrap(), ViewMode::Work);
}

#[test]
fn set_travel_survives_restart() {
    let storage = MemoryKvStore::new();
    ViewModeStore::new(&storage).set(ViewMode::Travel).unwrap();

    let fresh = ViewModeStore::new(&storage);
    assert_eq!(fresh.load().unwrap(), ViewMode::Travel);
    assert_eq!(storage.raw(MODE_STORAGE_KEY).unwrap(), b"\"travel\"".to_vec());
}

#[test]
fn unparseable_mode_falls_back_to_work() {
    let storage = MemoryKvStore::new();
    storage.set(MODE_STORAGE_KEY, b"{oops").unwrap();

    assert_eq!(ViewModeStore::new(&storage).load().unwrap(), ViewMode::Work);
}

#[test]
fn legacy_working_flag_is_understood() {
    let storage = MemoryKvStore::new();
    storage.set(MODE_STORAGE_KEY, b"false").unwrap();

    assert_eq!(ViewModeStore::new(&storage).load().unwrap(), ViewMode::Travel);
}

#[test]
fn toggle_alternates_and_persists() {
    let storage = MemoryKvStore::new();
    let modes = ViewModeStore::new(&storage);

    assert_eq!(modes.toggle().unwrap(), ViewMode::Travel);
    assert_eq!(modes.toggle().unwrap(), ViewMode::Work);
    assert_eq!(ViewModeStore::new(&storage).load().unwrap(), ViewMode::Work);
}

#[test]
fn storage_failures_surface_as_storage_errors() {
    let storage = MemoryKvStore::new();
    let modes = ViewModeStore::new(&storage);

    storage.set_fail_writes(true);
    assert!(matches!(
        modes.set(ViewMode::Travel),
        Err(StoreError::Storage(_))
    ));

    storage.set_fail_writes(false);
    storage.set_fail_reads(true);
    assert!(matches!(modes.load(), Err(StoreError::Storage(_))));
}
