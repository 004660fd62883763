use core::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum TokenStoreError {
    IoError(PathBuf, std::io::Error),
    JsonDataDeserializationError(serde_json::Error),
    InputSerializationError(serde_json::Error),
    LockPoisoned,
}

impl fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenStoreError::*;
        match self {
            IoError(path, err) => {
                write!(f, "failed to access the token cache at {}: {err}", path.display())
            },
            JsonDataDeserializationError(err) => {
                write!(f, "error deserializing the cached token: {err}")
            },
            InputSerializationError(err) => {
                write!(f, "error trying to serialize the token for the cache: {err}")
            },
            LockPoisoned => write!(f, "token cache lock was poisoned"),
        }
    }
}

impl std::error::Error for TokenStoreError {}
