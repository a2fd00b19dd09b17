//! Browser `localStorage` as a plan library backend.

use sp_core::error::PersistError;
use sp_core::library::DocumentStore;
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// The window's `localStorage`. Fails in workers and when the browser
    /// blocks storage.
    pub fn open() -> Result<Self, PersistError> {
        let unavailable = |message: String| PersistError::Store {
            key: "localStorage".to_string(),
            message,
        };
        let window = web_sys::window().ok_or_else(|| unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|err| unavailable(describe(&err)))?
            .ok_or_else(|| unavailable("storage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn store_error(key: &str, err: &JsValue) -> PersistError {
    PersistError::Store {
        key: key.to_string(),
        message: describe(err),
    }
}

impl DocumentStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage.get_item(key).map_err(|e| store_error(key, &e))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage.set_item(key, value).map_err(|e| store_error(key, &e))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.storage.remove_item(key).map_err(|e| store_error(key, &e))
    }
}
