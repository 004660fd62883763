//! Persistence of the platform access token.
//!
//! The client keeps no state besides its bearer token. [TokenStore] abstracts where that token
//! lives so the authenticator can be backed by a flat file ([FileTokenStore]) or by memory
//! ([MemoryTokenStore]).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

mod errors;
pub use errors::TokenStoreError;

mod file_store;
pub use file_store::FileTokenStore;

mod memory_store;
pub use memory_store::MemoryTokenStore;

// ACCESS TOKEN
// ================================================================================================

/// A bearer token issued by the platform.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(access_token: String, expires_at: DateTime<Utc>) -> Self {
        Self { access_token, expires_at }
    }

    /// Returns true if the token has expired or will within `skew` of `now`.
    pub fn expires_within(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.expires_at <= now + skew
    }
}

// TOKEN STORE
// ================================================================================================

/// Storage for the cached access token.
pub trait TokenStore: Send + Sync {
    /// Returns the cached token, or `None` if nothing has been cached yet.
    fn load(&self) -> Result<Option<AccessToken>, TokenStoreError>;

    /// Replaces the cached token.
    fn save(&self, token: &AccessToken) -> Result<(), TokenStoreError>;

    /// Removes the cached token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

// TESTS
// ================================================================================================
