//! Saved-plan library on top of a key/value document store.
//!
//! Layout inside the store:
//!
//! | Key | Value |
//! |-----|-------|
//! | `store-floor-plans` | JSON array of [`FloorPlan`] |
//! | `active-floor-plan` | id of the plan the editor reopens |
//!
//! Saving an existing id overwrites its elements and name and bumps
//! `updatedAt`; saving a new id appends with both timestamps set.

use crate::error::PersistError;
use crate::model::{FloorPlan, SpatialElement};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;

pub const PLANS_KEY: &str = "store-floor-plans";
pub const ACTIVE_KEY: &str = "active-floor-plan";

/// Minimal string key/value persistence, modeled on browser local storage.
pub trait DocumentStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-memory store, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a directory (`<dir>/<key>.json`).
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn io_error(key: &str, err: std::io::Error) -> PersistError {
        PersistError::Store {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl DocumentStore for DirectoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(key, err)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.root).map_err(|e| Self::io_error(key, e))?;
        std::fs::write(self.path(key), value).map_err(|e| Self::io_error(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(key, err)),
        }
    }
}

/// Saved floor plans plus the active-plan pointer.
pub struct PlanLibrary<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> PlanLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Every saved plan, in save order.
    pub fn list(&self) -> Result<Vec<FloorPlan>, PersistError> {
        let Some(raw) = self.store.read(PLANS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| PersistError::Corrupt {
            key: PLANS_KEY.to_string(),
            message: e.to_string(),
        })
    }

    pub fn load(&self, id: &str) -> Result<FloorPlan, PersistError> {
        self.list()?
            .into_iter()
            .find(|plan| plan.id == id)
            .ok_or_else(|| PersistError::NotFound { id: id.to_string() })
    }

    /// Save (overwrite or append) and return the stored plan.
    pub fn save(
        &mut self,
        id: &str,
        name: &str,
        elements: &[SpatialElement],
        now: DateTime<Utc>,
    ) -> Result<FloorPlan, PersistError> {
        let mut plans = self.list()?;
        let saved = match plans.iter_mut().find(|plan| plan.id == id) {
            Some(existing) => {
                existing.name = name.to_string();
                existing.elements = elements.to_vec();
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let plan = FloorPlan::new(id, name, elements.to_vec(), now);
                plans.push(plan.clone());
                plan
            }
        };
        self.write_plans(&plans)?;
        log::debug!("library: saved plan {id} ({} elements)", elements.len());
        Ok(saved)
    }

    /// Delete a plan; clears the active pointer when it pointed here.
    pub fn delete(&mut self, id: &str) -> Result<(), PersistError> {
        let mut plans = self.list()?;
        let before = plans.len();
        plans.retain(|plan| plan.id != id);
        if plans.len() == before {
            return Err(PersistError::NotFound { id: id.to_string() });
        }
        self.write_plans(&plans)?;
        if self.active()?.as_deref() == Some(id) {
            self.store.remove(ACTIVE_KEY)?;
        }
        Ok(())
    }

    pub fn active(&self) -> Result<Option<String>, PersistError> {
        self.store.read(ACTIVE_KEY)
    }

    pub fn set_active(&mut self, id: &str) -> Result<(), PersistError> {
        self.store.write(ACTIVE_KEY, id)
    }

    fn write_plans(&mut self, plans: &[FloorPlan]) -> Result<(), PersistError> {
        let raw = serde_json::to_string(plans).map_err(|e| PersistError::Store {
            key: PLANS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.write(PLANS_KEY, &raw)
    }
}
