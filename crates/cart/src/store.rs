//! Durable cart persistence with best-effort semantics.
//!
//! The cart survives restarts through a single serialized JSON document
//! (the browser build kept it under one `localStorage` key; here the
//! equivalent is one file on disk). Durability is deliberately
//! best-effort: a cart that cannot be read is an empty cart, and a cart
//! that cannot be written stays authoritative in memory for the rest of
//! the session. Neither condition is surfaced to the user.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::cart::CartItem;

/// Default file name for the durable cart document.
pub const DEFAULT_STORE_FILE: &str = "mage_cart.json";

/// Raw storage behind the cart store.
///
/// Implementations hold exactly one serialized document. `read` returns
/// `Ok(None)` when nothing has been stored yet.
pub trait StoreBackend: Send + Sync {
    /// Read the stored document, if any.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the stored document.
    fn write(&self, payload: &str) -> io::Result<()>;
}

/// File-backed storage: one JSON document at a fixed path.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend storing the cart at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoreBackend for FileBackend {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, payload: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, payload)
    }
}

/// In-memory storage for tests and non-durable sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with a stored document.
    #[must_use]
    pub fn seeded(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
        }
    }
}

impl StoreBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| io::Error::other("store mutex poisoned"))?;
        Ok(slot.clone())
    }

    fn write(&self, payload: &str) -> io::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| io::Error::other("store mutex poisoned"))?;
        *slot = Some(payload.to_string());
        Ok(())
    }
}

/// The persistent store adapter for cart line items.
///
/// `load` and `save` never propagate storage or serialization faults;
/// they degrade to an empty cart or a non-durable session and log the
/// condition at warn level.
pub struct CartStore {
    backend: Box<dyn StoreBackend>,
}

impl CartStore {
    /// Create a store over an arbitrary backend.
    #[must_use]
    pub fn new(backend: Box<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Create a file-backed store at `path`.
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::new(Box::new(FileBackend::new(path.as_ref())))
    }

    /// Create a non-durable in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Load the persisted cart.
    ///
    /// An absent, unreadable, or malformed document yields an empty
    /// cart. Quantities below 1 from a hand-edited document are floored
    /// to 1 so the repository invariant holds from the first read.
    #[must_use]
    pub fn load(&self) -> Vec<CartItem> {
        let payload = match self.backend.read() {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart store, starting with empty cart");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<CartItem>>(&payload) {
            Ok(mut items) => {
                for item in &mut items {
                    item.quantity = item.quantity.max(1);
                }
                items
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed cart store content, treating as empty cart");
                Vec::new()
            }
        }
    }

    /// Persist the cart, best-effort.
    ///
    /// A failed write (quota, permissions, disabled storage) is logged
    /// and swallowed; the in-memory cart remains the source of truth
    /// for the current session.
    pub fn save(&self, items: &[CartItem]) {
        let payload = match serde_json::to_string(items) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart, skipping persist");
                return;
            }
        };

        if let Err(e) = self.backend.write(&payload) {
            tracing::warn!(error = %e, "Failed to persist cart, continuing without durability");
        }
    }
}
