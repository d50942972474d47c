//! Observable session state.
//!
//! `load` splits the state into a read handle that any component may clone
//! and a single `SessionWriter`. Only the holder of the writer can change the
//! session, and every change is pushed to subscribers as it happens.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::SessionResult;
use crate::session::{Session, SessionStatus};
use crate::token_store::TokenStore;
use crate::user::User;

/// Read side of the session state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    rx: watch::Receiver<Session>,
}

/// Write side of the session state. Not `Clone`: there is one writer.
pub struct SessionWriter {
    tx: watch::Sender<Session>,
    tokens: Box<dyn TokenStore>,
}

/// Read any persisted token and build the session handles.
///
/// A persisted token yields `Unknown` pending verification; no token yields
/// `Unauthenticated`. An unreadable token store is treated as empty.
pub fn load<T: TokenStore>(tokens: T) -> (SessionStore, SessionWriter) {
    let initial = match tokens.load() {
        Ok(Some(token)) => {
            debug!("found persisted session token, verification pending");
            Session::unknown(token)
        }
        Ok(None) => Session::unauthenticated(),
        Err(error) => {
            warn!(%error, "could not read persisted session token, starting signed out");
            Session::unauthenticated()
        }
    };

    let (tx, rx) = watch::channel(initial);
    let writer = SessionWriter {
        tx,
        tokens: Box::new(tokens),
    };

    (SessionStore { rx }, writer)
}

impl SessionStore {
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.rx.borrow().status()
    }

    pub fn token(&self) -> Option<String> {
        self.rx.borrow().token().map(str::to_owned)
    }

    pub fn user(&self) -> Option<User> {
        self.rx.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_authenticated()
    }

    /// A receiver that only wakes for changes made after this call.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        let mut rx = self.rx.clone();
        rx.borrow_and_update();
        rx
    }

    /// Wait for the next change and return the new state. `None` once the
    /// writer is gone.
    pub async fn changed(&mut self) -> Option<Session> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl SessionWriter {
    /// Another read handle onto the state this writer controls.
    pub fn store(&self) -> SessionStore {
        SessionStore {
            rx: self.tx.subscribe(),
        }
    }

    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Persist `token` and mark the session authenticated as `user`.
    ///
    /// When persistence fails the in-memory session is left as it was.
    pub fn set(&self, token: &str, user: User) -> SessionResult<()> {
        self.tokens.save(token)?;
        debug!(user = %user.id, "session authenticated");
        self.tx.send_replace(Session::authenticated(token, user));
        Ok(())
    }

    /// Drop the persisted token and mark the session unauthenticated.
    pub fn clear(&self) {
        if let Err(error) = self.tokens.remove() {
            warn!(%error, "failed to remove persisted session token");
        }
        self.tx.send_replace(Session::unauthenticated());
        debug!("session cleared");
    }

    /// Move an `Unknown` session to `Authenticating`. Returns the token to
    /// verify, or `None` when there is nothing pending.
    pub fn begin_verification(&self) -> Option<String> {
        let mut pending = None;
        self.tx.send_if_modified(|session| {
            if session.status() != SessionStatus::Unknown {
                return false;
            }
            let Some(token) = session.token().map(str::to_owned) else {
                return false;
            };
            *session = Session::authenticating(token.clone());
            pending = Some(token);
            true
        });
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::MemoryTokenStore;
    use crate::user::EntityId;

    fn staff() -> User {
        User {
            id: EntityId::from(1),
            name: Some("A".into()),
            email: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn changed_yields_the_next_mutation() {
        let (mut store, writer) = load(MemoryTokenStore::with_token("T1"));

        let waiter = tokio::spawn(async move { store.changed().await });
        writer.set("T1", staff()).unwrap();

        let session = waiter.await.unwrap().expect("writer still alive");
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn changed_ends_when_the_writer_is_dropped() {
        let (mut store, writer) = load(MemoryTokenStore::default());
        drop(writer);
        assert!(store.changed().await.is_none());
    }

    #[test]
    fn load_without_token_is_unauthenticated() {
        let (store, _writer) = load(MemoryTokenStore::default());
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert!(store.token().is_none());
    }

    #[test]
    fn load_with_token_is_unknown() {
        let (store, _writer) = load(MemoryTokenStore::with_token("T1"));
        assert_eq!(store.status(), SessionStatus::Unknown);
        assert_eq!(store.token().as_deref(), Some("T1"));
        assert!(store.user().is_none());
    }

    #[test]
    fn set_persists_and_clear_removes() {
        let tokens = MemoryTokenStore::default();
        let (store, writer) = load(tokens.clone());

        writer.set("T1", staff()).unwrap();
        assert_eq!(tokens.peek().as_deref(), Some("T1"));
        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().id, EntityId::from(1));

        writer.clear();
        assert_eq!(tokens.peek(), None);
        assert_eq!(store.current(), Session::unauthenticated());
    }

    #[test]
    fn begin_verification_only_moves_unknown_sessions() {
        let (store, writer) = load(MemoryTokenStore::with_token("T1"));
        assert_eq!(writer.begin_verification().as_deref(), Some("T1"));
        assert_eq!(store.status(), SessionStatus::Authenticating);
        assert_eq!(writer.begin_verification(), None);

        let (store, writer) = load(MemoryTokenStore::default());
        assert_eq!(writer.begin_verification(), None);
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn subscribers_observe_each_mutation() {
        let (store, writer) = load(MemoryTokenStore::default());
        let mut rx = store.subscribe();

        writer.set("T1", staff()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status(), SessionStatus::Authenticated);

        writer.clear();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status(), SessionStatus::Unauthenticated);
    }
}
