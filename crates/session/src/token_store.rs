//! Durable persistence of the session token.
//!
//! Exactly one value is persisted: the bearer token. Its absence means the
//! client is logged out.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};

pub trait TokenStore: Send + Sync + 'static {
    fn load(&self) -> SessionResult<Option<String>>;
    fn save(&self, token: &str) -> SessionResult<()>;
    fn remove(&self) -> SessionResult<()>;
}

/// Token kept in a single file.
#[derive(Debug, Clone)]
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
    fn load(&self) -> SessionResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_owned()))
                }
            }
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SessionError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, token: &str) -> SessionResult<()> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let persist_error = |source| SessionError::Persist {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persist_error)?;
        }

        fs::write(&self.path, token).map_err(persist_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(persist_error)?;
        }

        debug!(path = %self.path.display(), "session token persisted");
        Ok(())
    }

    fn remove(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token removed");
                Ok(())
            }
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            // An empty file loads as "no token", so blanking it still logs out.
            Err(source) => match fs::write(&self.path, "") {
                Ok(()) => {
                    warn!(
                        path = %self.path.display(),
                        error = %source,
                        "could not delete session token, blanked it instead"
                    );
                    Ok(())
                }
                Err(_) => Err(SessionError::Remove {
                    path: self.path.clone(),
                    source,
                }),
            },
        }
    }
}

/// In-process token storage for tests and throwaway runs.
///
/// Clones share the same slot, so a test can keep one to inspect what the
/// session persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    pub fn peek(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> SessionResult<Option<String>> {
        Ok(self.peek())
    }

    fn save(&self, token: &str) -> SessionResult<()> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn remove(&self) -> SessionResult<()> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryTokenStore::default();
        assert_eq!(store.load().unwrap(), None);

        store.save("T1").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("T1"));

        store.remove().unwrap();
        store.remove().unwrap();
        assert_eq!(store.peek(), None);
    }

    #[test]
    fn empty_tokens_are_refused() {
        let store = MemoryTokenStore::default();
        assert!(matches!(store.save("  "), Err(SessionError::EmptyToken)));
    }
}
