//! Durable bearer-token persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token is the only session datum that survives a page reload. Its
//! presence at startup is what makes `SessionStore::bootstrap` hit the
//! profile endpoint; its absence means "logged out".

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::sync::{Mutex, PoisonError};

/// Read/write access to the single persisted token key.
pub trait TokenStorage: Send + Sync {
    /// Current persisted token, if any. Empty strings count as absent.
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    /// Remove the persisted token. Safe to call when nothing is stored.
    fn clear(&self);
}

// =============================================================================
// BROWSER STORAGE
// =============================================================================

/// `localStorage`-backed storage. Outside the browser every call is a no-op.
#[derive(Clone, Debug)]
pub struct LocalTokenStorage {
    key: String,
}

impl LocalTokenStorage {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl TokenStorage for LocalTokenStorage {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let raw = local_storage()?.get_item(&self.key).ok().flatten()?;
            (!raw.is_empty()).then_some(raw)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                log::warn!("localStorage unavailable; token not persisted");
                return;
            };
            if storage.set_item(&self.key, token).is_err() {
                log::warn!("localStorage write rejected; token not persisted");
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                log::warn!("localStorage unavailable; token not cleared");
                return;
            };
            if storage.remove_item(&self.key).is_err() {
                log::warn!("localStorage delete rejected; token not cleared");
            }
        }
    }
}

// =============================================================================
// IN-MEMORY STORAGE
// =============================================================================

/// Process-local storage for SSR and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a token, as after a previous visit.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
