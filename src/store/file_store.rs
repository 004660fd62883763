use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{AccessToken, TokenStore, TokenStoreError};

// FILE TOKEN STORE
// ================================================================================================

/// Caches the access token as a JSON document in a single file.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AccessToken>, TokenStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(TokenStoreError::IoError(self.path.clone(), err)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(TokenStoreError::JsonDataDeserializationError)
    }

    fn save(&self, token: &AccessToken) -> Result<(), TokenStoreError> {
        let contents =
            serde_json::to_string_pretty(token).map_err(TokenStoreError::InputSerializationError)?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| TokenStoreError::IoError(parent.to_path_buf(), err))?;
        }

        debug!("Writing access token cache at: {:?}", self.path);
        fs::write(&self.path, contents).map_err(|err| TokenStoreError::IoError(self.path.clone(), err))
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TokenStoreError::IoError(self.path.clone(), err)),
        }
    }
}
