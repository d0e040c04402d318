use orb_core::{StorageBackend, StorageError};
use web_sys as web;

/// `localStorage` or `sessionStorage` behind the core's storage trait.
pub struct WebStorage {
    storage: web::Storage,
}

impl WebStorage {
    /// `None` when storage is disabled (private mode, sandboxed iframe).
    pub fn local() -> Option<Self> {
        let storage = web::window()?.local_storage().ok()??;
        Some(Self { storage })
    }

    pub fn session() -> Option<Self> {
        let storage = web::window()?.session_storage().ok()??;
        Some(Self { storage })
    }
}

fn unavailable(e: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", e))
}

impl StorageBackend for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(unavailable)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // quota errors land here too
        self.storage.set_item(key, value).map_err(unavailable)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(unavailable)
    }
}
