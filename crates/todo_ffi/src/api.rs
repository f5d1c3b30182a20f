//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, screen-level functions to Dart via FRB.
//! - Translate store errors into stable `error_code` strings.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls are serialized; no call observes another call's in-flight write.
//! - Delete is unconditional; the Dart side shows the confirmation dialog.

use log::warn;
use std::path::PathBuf;
use std::sync::Mutex;
use todo_core::db::open_db;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Item, ItemKey, SqliteKvStore, StoreError, TodoService, ViewMode,
};

const ENTRY_DB_FILE_NAME: &str = "todo_entry.sqlite3";
const DB_PATH_ENV: &str = "TODO_DB_PATH";

/// Configured DB path; the lock also serializes every DB-backed call.
static ENTRY_STATE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Sets the SQLite file used by all following calls.
///
/// Typically called once at startup with the app documents directory.
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let mut state = lock_state();
    *state = Some(PathBuf::from(trimmed));
    String::new()
}

/// Item projection for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    pub key: String,
    pub text: String,
    /// `work` or `travel`.
    pub mode: String,
    pub completed: bool,
}

impl From<&Item> for TodoItemView {
    fn from(item: &Item) -> Self {
        Self {
            key: item.key.to_string(),
            text: item.text.clone(),
            mode: item.mode.as_str().to_string(),
            completed: item.completed,
        }
    }
}

/// Envelope for single-item mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    pub ok: bool,
    /// Item after the mutation (the removed item for delete).
    pub item: Option<TodoItemView>,
    pub message: String,
    /// `empty_input|not_found|corrupt_state|invalid_item|storage_io|invalid_argument`.
    pub error_code: Option<String>,
}

/// Envelope for list reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    pub mode: String,
    pub items: Vec<TodoItemView>,
    pub completed_count: u32,
    pub message: String,
    pub error_code: Option<String>,
}

/// Envelope for view-mode reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModeResponse {
    pub ok: bool,
    pub mode: String,
    pub message: String,
    pub error_code: Option<String>,
}

#[derive(Debug)]
enum EntryError {
    InvalidArgument(String),
    Open(String),
    Store(StoreError),
}

impl EntryError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Open(_) => "storage_io",
            Self::Store(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::InvalidArgument(message) | Self::Open(message) => message.clone(),
            Self::Store(err) => err.to_string(),
        }
    }
}

impl From<StoreError> for EntryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl TodoActionResponse {
    fn success(message: &str, item: &Item) -> Self {
        Self {
            ok: true,
            item: Some(TodoItemView::from(item)),
            message: message.to_string(),
            error_code: None,
        }
    }

    fn failure(call: &str, err: &EntryError) -> Self {
        warn!(
            "event=ffi_call module=ffi call={call} status=error error_code={}",
            err.code()
        );
        Self {
            ok: false,
            item: None,
            message: format!("{call} failed: {}", err.message()),
            error_code: Some(err.code().to_string()),
        }
    }
}

/// Lists items of `mode`, or of the selected mode when `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list(mode: Option<String>) -> TodoListResponse {
    let result = parse_optional_mode(mode).and_then(|requested| {
        with_service(|service| {
            let mode = requested.unwrap_or_else(|| service.mode());
            let items = service
                .items(mode)
                .into_iter()
                .map(TodoItemView::from)
                .collect::<Vec<_>>();
            Ok((mode, items))
        })
    });

    match result {
        Ok((mode, items)) => {
            let completed_count =
                u32::try_from(items.iter().filter(|item| item.completed).count())
                    .unwrap_or(u32::MAX);
            let message = if items.is_empty() {
                "No items.".to_string()
            } else {
                format!("{} item(s).", items.len())
            };
            TodoListResponse {
                ok: true,
                mode: mode.as_str().to_string(),
                items,
                completed_count,
                message,
                error_code: None,
            }
        }
        Err(err) => {
            warn!(
                "event=ffi_call module=ffi call=todo_list status=error error_code={}",
                err.code()
            );
            TodoListResponse {
                ok: false,
                mode: String::new(),
                items: Vec::new(),
                completed_count: 0,
                message: format!("todo_list failed: {}", err.message()),
                error_code: Some(err.code().to_string()),
            }
        }
    }
}

/// Adds an item to the selected list.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(text: String) -> TodoActionResponse {
    match with_service(|service| service.add(&text)) {
        Ok(item) => TodoActionResponse::success("Item added.", &item),
        Err(err) => TodoActionResponse::failure("todo_add", &err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(key: String) -> TodoActionResponse {
    let key = ItemKey::new(key.trim());
    match with_service(|service| service.toggle_completed(&key)) {
        Ok(item) => TodoActionResponse::success("Item updated.", &item),
        Err(err) => TodoActionResponse::failure("todo_toggle", &err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_edit(key: String, text: String) -> TodoActionResponse {
    let key = ItemKey::new(key.trim());
    match with_service(|service| service.edit_text(&key, &text)) {
        Ok(item) => TodoActionResponse::success("Item updated.", &item),
        Err(err) => TodoActionResponse::failure("todo_edit", &err),
    }
}

/// Deletes an item without further confirmation.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(key: String) -> TodoActionResponse {
    let key = ItemKey::new(key.trim());
    match with_service(|service| service.delete(&key)) {
        Ok(item) => TodoActionResponse::success("Item deleted.", &item),
        Err(err) => TodoActionResponse::failure("todo_delete", &err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn view_mode_get() -> ViewModeResponse {
    mode_response("view_mode_get", with_service(|service| Ok(service.mode())))
}

#[flutter_rust_bridge::frb(sync)]
pub fn view_mode_set(mode: String) -> ViewModeResponse {
    let result =
        parse_mode(&mode).and_then(|mode| with_service(|service| service.switch_mode(mode)));
    mode_response("view_mode_set", result)
}

fn mode_response(call: &str, result: Result<ViewMode, EntryError>) -> ViewModeResponse {
    match result {
        Ok(mode) => ViewModeResponse {
            ok: true,
            mode: mode.as_str().to_string(),
            message: String::new(),
            error_code: None,
        },
        Err(err) => {
            warn!(
                "event=ffi_call module=ffi call={call} status=error error_code={}",
                err.code()
            );
            ViewModeResponse {
                ok: false,
                mode: String::new(),
                message: format!("{call} failed: {}", err.message()),
                error_code: Some(err.code().to_string()),
            }
        }
    }
}

fn parse_mode(value: &str) -> Result<ViewMode, EntryError> {
    ViewMode::parse(value).ok_or_else(|| {
        EntryError::InvalidArgument(format!("unknown mode `{value}`; expected work|travel"))
    })
}

fn parse_optional_mode(value: Option<String>) -> Result<Option<ViewMode>, EntryError> {
    match value {
        Some(value) if !value.trim().is_empty() => parse_mode(&value).map(Some),
        _ => Ok(None),
    }
}

fn lock_state() -> std::sync::MutexGuard<'static, Option<PathBuf>> {
    ENTRY_STATE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn resolve_db_path(configured: &Option<PathBuf>) -> PathBuf {
    if let Some(path) = configured {
        return path.clone();
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
}

fn with_service<T>(
    f: impl FnOnce(&mut TodoService<'_, SqliteKvStore<'_>>) -> Result<T, StoreError>,
) -> Result<T, EntryError> {
    let state = lock_state();
    let db_path = resolve_db_path(&state);
    let conn =
        open_db(&db_path).map_err(|err| EntryError::Open(format!("DB open failed: {err}")))?;
    let kv = SqliteKvStore::try_new(&conn)
        .map_err(|err| EntryError::Open(format!("storage init failed: {err}")))?;
    let mut service = TodoService::open(&kv)?;
    Ok(f(&mut service)?)
}

#[cfg(test)]
mod tests {
    use super::{
        configure_db_path, core_version, init_logging, ping, todo_add, todo_delete, todo_edit,
        todo_list, todo_toggle, view_mode_get, view_mode_set,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    fn use_test_db() {
        static DIR: OnceLock<TempDir> = OnceLock::new();
        let dir = DIR.get_or_init(|| tempfile::tempdir().expect("create temp dir"));
        let path = dir.path().join("todo_ffi_test.sqlite3");
        let error = configure_db_path(path.to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_or_relative_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn configure_db_path_rejects_empty_path() {
        assert!(!configure_db_path("  ".to_string()).is_empty());
    }

    #[test]
    fn todo_lifecycle_through_ffi() {
        use_test_db();
        let text = unique_token("ffi-item");

        let added = todo_add(text.clone());
        assert!(added.ok, "{}", added.message);
        let item = added.item.expect("add should return item");
        assert_eq!(item.text, text);
        assert!(!item.completed);

        let toggled = todo_toggle(item.key.clone());
        assert!(toggled.ok, "{}", toggled.message);
        assert!(toggled.item.as_ref().is_some_and(|view| view.completed));

        let edited = todo_edit(item.key.clone(), format!("{text} edited"));
        assert!(edited.ok, "{}", edited.message);

        let listed = todo_list(Some(item.mode.clone()));
        assert!(listed.ok, "{}", listed.message);
        assert!(listed
            .items
            .iter()
            .any(|view| view.key == item.key && view.completed));

        let deleted = todo_delete(item.key.clone());
        assert!(deleted.ok, "{}", deleted.message);

        let again = todo_delete(item.key);
        assert!(!again.ok);
        assert_eq!(again.error_code.as_deref(), Some("not_found"));
    }

    #[test]
    fn blank_add_reports_empty_input() {
        use_test_db();
        let response = todo_add("   ".to_string());
        assert!(!response.ok);
        assert_eq!(response.error_code.as_deref(), Some("empty_input"));
    }

    #[test]
    fn view_mode_set_and_get_roundtrip() {
        use_test_db();
        let set = view_mode_set("TRAVEL".to_string());
        assert!(set.ok, "{}", set.message);
        assert_eq!(set.mode, "travel");
        assert_eq!(view_mode_get().mode, "travel");

        let invalid = view_mode_set("home".to_string());
        assert_eq!(invalid.error_code.as_deref(), Some("invalid_argument"));

        let list = todo_list(Some("beach".to_string()));
        assert!(!list.ok);
        assert_eq!(list.error_code.as_deref(), Some("invalid_argument"));
    }
}
