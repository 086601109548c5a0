use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::error::ServiceError;
use crate::model::{Quiz, Session, Submission};
use crate::store::{SqliteStore, Store};

pub(crate) const QUIZZES_KEY: &str = "quizzes";
pub(crate) const SUBMISSIONS_KEY: &str = "submissions";
pub(crate) const SESSIONS_KEY: &str = "sessions";

/// Evaluation engine over one workspace. All record collections live behind
/// a single lock: reads see a consistent snapshot, and every mutation holds
/// the write guard across validate, mutate, and persist, so a submission is
/// either fully recorded or absent.
pub struct Engine {
    inner: RwLock<EngineInner>,
}

pub(crate) struct EngineInner {
    pub(crate) quizzes: Vec<Quiz>,
    pub(crate) submissions: Vec<Submission>,
    pub(crate) sessions: Vec<Session>,
    store: Box<dyn Store>,
    clock: Box<dyn Clock>,
}

impl Engine {
    /// Load all collections from the store. A key that was never written is
    /// an empty collection; bytes that fail to decode are a storage error,
    /// not silently dropped data.
    pub fn open(store: Box<dyn Store>, clock: Box<dyn Clock>) -> Result<Self, ServiceError> {
        let quizzes = load_collection(store.as_ref(), QUIZZES_KEY)?;
        let submissions = load_collection(store.as_ref(), SUBMISSIONS_KEY)?;
        let sessions = load_collection(store.as_ref(), SESSIONS_KEY)?;
        Ok(Self {
            inner: RwLock::new(EngineInner {
                quizzes,
                submissions,
                sessions,
                store,
                clock,
            }),
        })
    }

    /// Standard production wiring: SQLite file inside the workspace
    /// directory, wall-clock time.
    pub fn open_workspace(dir: &Path) -> Result<Self, ServiceError> {
        let store = SqliteStore::open(dir)
            .map_err(|e| ServiceError::storage(format!("open workspace store: {e}")))?;
        Self::open(Box::new(store), Box::new(SystemClock))
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, EngineInner> {
        self.inner.read().unwrap()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, EngineInner> {
        self.inner.write().unwrap()
    }
}

impl EngineInner {
    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    pub(crate) fn save_quizzes(&self) -> Result<(), ServiceError> {
        save_collection(self.store.as_ref(), QUIZZES_KEY, &self.quizzes)
    }

    pub(crate) fn save_submissions(&self) -> Result<(), ServiceError> {
        save_collection(self.store.as_ref(), SUBMISSIONS_KEY, &self.submissions)
    }

    pub(crate) fn save_sessions(&self) -> Result<(), ServiceError> {
        save_collection(self.store.as_ref(), SESSIONS_KEY, &self.sessions)
    }
}

fn load_collection<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> Result<Vec<T>, ServiceError> {
    let Some(bytes) = store
        .load(key)
        .map_err(|e| ServiceError::storage(format!("load {key}: {e}")))?
    else {
        return Ok(Vec::new());
    };
    serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::storage(format!("decode {key}: {e}")))
}

fn save_collection<T: Serialize>(
    store: &dyn Store,
    key: &str,
    records: &[T],
) -> Result<(), ServiceError> {
    let bytes = serde_json::to_vec(records)
        .map_err(|e| ServiceError::storage(format!("encode {key}: {e}")))?;
    store
        .save(key, &bytes)
        .map_err(|e| ServiceError::storage(format!("save {key}: {e}")))
}
