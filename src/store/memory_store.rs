use std::sync::Mutex;

use super::{AccessToken, TokenStore, TokenStoreError};

/// Keeps the access token in memory only; nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a store pre-populated with `token`.
    pub fn with_token(token: AccessToken) -> Self {
        Self { token: Mutex::new(Some(token)) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AccessToken>, TokenStoreError> {
        Ok(self.token.lock().map_err(|_| TokenStoreError::LockPoisoned)?.clone())
    }

    fn save(&self, token: &AccessToken) -> Result<(), TokenStoreError> {
        *self.token.lock().map_err(|_| TokenStoreError::LockPoisoned)? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().map_err(|_| TokenStoreError::LockPoisoned)? = None;
        Ok(())
    }
}
