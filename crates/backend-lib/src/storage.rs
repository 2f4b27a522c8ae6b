// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Credential storage abstraction with in-memory and flat-file backends.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::Mutex};
use uuid::Uuid;

use authgate_common::PublicUser;

/// A stored account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub identity: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    fn new(identity: &str, password_hash: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            identity: identity.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }

    /// The view of this record that may leave the server
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            identity: self.identity.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("identity already exists")]
    Duplicate,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
}

/// Trait for credential store backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a record by its exact identity
    async fn find_by_identity(&self, identity: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Create a record. Fails with [`StoreError::Duplicate`] if the identity
    /// is taken; the check and insert happen as one step.
    async fn create(&self, identity: &str, password_hash: &str) -> Result<UserRecord, StoreError>;
}

/// Open the store named by a connection string.
///
/// * `memory://` keeps records in process memory
/// * `file://<dir>` keeps them in `<dir>/users.jsonl`
pub async fn open_store(database_url: &str) -> Result<Arc<dyn CredentialStore>, StoreError> {
    if database_url == "memory://" || database_url == "memory" {
        return Ok(Arc::new(MemoryStore::new()));
    }

    match database_url.strip_prefix("file://") {
        Some(dir) if !dir.is_empty() => Ok(Arc::new(FlatFileStore::open(dir).await?)),
        _ => Err(StoreError::UnsupportedUrl(database_url.to_string())),
    }
}

/// In-memory store keyed by identity
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn insert(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        match self.users.entry(record.identity.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            },
        }
    }

    fn remove(&self, identity: &str) {
        self.users.remove(identity);
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(identity).map(|entry| entry.value().clone()))
    }

    async fn create(&self, identity: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        self.insert(UserRecord::new(identity, password_hash))
    }
}

/// Flat-file store: an append-only JSON-lines log, indexed in memory.
///
/// Uniqueness is decided by the in-memory index before anything is written,
/// so the log never holds two records for one identity.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
    index: MemoryStore,
    writer: Arc<Mutex<()>>,
}

impl FlatFileStore {
    /// Open (or create) the store under `root`, loading existing records
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        tokio_fs::create_dir_all(&root).await?;
        let path = root.join("users.jsonl");

        let index = MemoryStore::new();
        if tokio_fs::try_exists(&path).await? {
            let content = tokio_fs::read_to_string(&path).await?;
            for (number, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let record: UserRecord = match serde_json::from_str(line) {
                    Ok(record) => record,
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            line = number + 1,
                            error = %e,
                            "unreadable line in user log skipped"
                        );
                        continue;
                    },
                };
                // First record wins if the log was edited by hand
                if index.insert(record).is_err() {
                    tracing::warn!(path = %path.display(), "duplicate identity in user log ignored");
                }
            }

            // Terminate a torn last line so the next append starts fresh
            if !content.is_empty() && !content.ends_with('\n') {
                let mut file = tokio_fs::OpenOptions::new().append(true).open(&path).await?;
                file.write_all(b"\n").await?;
                file.flush().await?;
            }
        }

        tracing::debug!(path = %path.display(), users = index.len(), "opened flat-file store");

        Ok(Self {
            path,
            index,
            writer: Arc::new(Mutex::new(())),
        })
    }

    async fn append(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.writer.lock().await;
        let mut file = tokio_fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let committed = file.metadata().await?.len();

        let written = async {
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            // Drop any partial line
            if let Err(truncate) = file.set_len(committed).await {
                tracing::error!(path = %self.path.display(), error = %truncate, "failed to truncate user log");
            }
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FlatFileStore {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<UserRecord>, StoreError> {
        self.index.find_by_identity(identity).await
    }

    async fn create(&self, identity: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        let record = self.index.insert(UserRecord::new(identity, password_hash))?;

        if let Err(e) = self.append(&record).await {
            self.index.remove(identity);
            return Err(e);
        }

        Ok(record)
    }
}
