//! # Authorized Registry
//!
//! The set of user ids allowed to print. The admin id is always authorized,
//! whether or not it is stored in the set, and can never be removed.
//!
//! Every mutation is persisted before it becomes visible: the new set is
//! computed on a copy, written through the [`RegistryStore`], and only then
//! swapped in. A failed write leaves both the file and the in-memory set
//! as they were.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use tracing::info;

use crate::error::LudivinaError;

/// A numeric chat user id.
pub type UserId = i64;

/// Persistence for the registry.
pub trait RegistryStore: Send + Sync {
    /// Load the stored ids, or `None` on first run.
    fn load(&self) -> Result<Option<BTreeSet<UserId>>, LudivinaError>;

    /// Replace the stored ids.
    fn save(&self, ids: &BTreeSet<UserId>) -> Result<(), LudivinaError>;
}

/// Stores the ids as a sorted JSON array.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Result<Option<BTreeSet<UserId>>, LudivinaError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            LudivinaError::Registry(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let ids = serde_json::from_str(&raw).map_err(|e| {
            LudivinaError::Registry(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(ids))
    }

    fn save(&self, ids: &BTreeSet<UserId>) -> Result<(), LudivinaError> {
        let json = serde_json::to_string_pretty(ids)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            LudivinaError::Registry(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

/// Keeps the ids in memory only; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ids: Mutex<Option<BTreeSet<UserId>>>,
}

impl MemoryStore {
    /// A store that already holds `ids`, as if loaded from an earlier run.
    pub fn with_ids(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            ids: Mutex::new(Some(ids.into_iter().collect())),
        }
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> Result<Option<BTreeSet<UserId>>, LudivinaError> {
        Ok(self.ids.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, ids: &BTreeSet<UserId>) -> Result<(), LudivinaError> {
        *self.ids.lock().unwrap_or_else(PoisonError::into_inner) = Some(ids.clone());
        Ok(())
    }
}

/// Result of a `remove` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The ids were removed; carries the resulting set.
    Removed(BTreeSet<UserId>),
    /// The request included the admin id; nothing changed.
    AdminProtected,
}

/// The lock-guarded set of authorized ids.
pub struct AuthorizedRegistry {
    admin: UserId,
    ids: RwLock<BTreeSet<UserId>>,
    store: Box<dyn RegistryStore>,
}

impl AuthorizedRegistry {
    /// Load the registry, bootstrapping `{admin}` on first run.
    pub fn open(admin: UserId, store: impl RegistryStore + 'static) -> Result<Self, LudivinaError> {
        let ids = match store.load()? {
            Some(ids) => ids,
            None => {
                let ids = BTreeSet::from([admin]);
                store.save(&ids)?;
                info!(admin, "created authorized registry");
                ids
            }
        };

        Ok(Self {
            admin,
            ids: RwLock::new(ids),
            store: Box::new(store),
        })
    }

    /// The admin id.
    pub fn admin(&self) -> UserId {
        self.admin
    }

    pub fn is_admin(&self, id: UserId) -> bool {
        id == self.admin
    }

    /// Whether `id` may use the bot. The admin always may.
    pub fn contains(&self, id: UserId) -> bool {
        self.is_admin(id) || self.read().contains(&id)
    }

    /// A copy of the stored ids.
    pub fn snapshot(&self) -> BTreeSet<UserId> {
        self.read().clone()
    }

    /// Authorize `ids`; returns the resulting set.
    pub fn add(&self, ids: &[UserId]) -> Result<BTreeSet<UserId>, LudivinaError> {
        let mut current = self.ids.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = current.clone();
        next.extend(ids.iter().copied());

        self.store.save(&next)?;
        *current = next.clone();
        info!(?ids, "authorized users");
        Ok(next)
    }

    /// Deauthorize `ids`. Refuses, without changing anything, if the admin
    /// id is among them.
    pub fn remove(&self, ids: &[UserId]) -> Result<Removal, LudivinaError> {
        if ids.contains(&self.admin) {
            return Ok(Removal::AdminProtected);
        }

        let mut current = self.ids.write().unwrap_or_else(PoisonError::into_inner);
        let next: BTreeSet<UserId> = current.iter().copied().filter(|id| !ids.contains(id)).collect();

        self.store.save(&next)?;
        *current = next.clone();
        info!(?ids, "deauthorized users");
        Ok(Removal::Removed(next))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeSet<UserId>> {
        self.ids.read().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// TESTS
// ============================================================================
