use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

/// Durable key-value collaborator. The engine persists each record
/// collection as one serialized blob keyed by collection name; anything that
/// can hold that mapping durably satisfies the contract.
pub trait Store: Send {
    fn load(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;
    fn save(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()>;
}

/// SQLite-backed store: one `records` table inside the selected workspace
/// directory.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(workspace)?;
        let db_path = workspace.join("quizdesk.sqlite3");
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS records(
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
            [],
        )?;

        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?", [key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO records(key, value) VALUES(?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, bytes),
        )?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral embedders. Clones share the same
/// backing map, so a test can keep a handle after the engine takes ownership
/// of another. `fail_next_save` makes exactly one upcoming save fail, which
/// is how the all-or-nothing ledger contract gets exercised.
#[derive(Clone, Default)]
pub struct MemStore {
    records: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_next_save: Arc<Mutex<bool>>,
    fail_next_save_for: Arc<Mutex<Option<String>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_save(&self) {
        *self.fail_next_save.lock().unwrap() = true;
    }

    /// Like `fail_next_save`, but only the next save of `key` fails; saves
    /// of other keys pass through untouched.
    pub fn fail_next_save_for(&self, key: &str) {
        *self.fail_next_save_for.lock().unwrap() = Some(key.to_string());
    }

    /// Raw bytes currently stored under `key`, for persistence assertions.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.records.lock().unwrap().get(key).cloned()
    }
}

impl Store for MemStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let mut fail = self.fail_next_save.lock().unwrap();
        if *fail {
            *fail = false;
            anyhow::bail!("injected save failure for key '{key}'");
        }
        let mut fail_for = self.fail_next_save_for.lock().unwrap();
        if fail_for.as_deref() == Some(key) {
            *fail_for = None;
            anyhow::bail!("injected save failure for key '{key}'");
        }
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
