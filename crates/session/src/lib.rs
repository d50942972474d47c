//! # Frontdesk Session Crate
//!
//! Process-wide holder of the authentication state for the Frontdesk client:
//! the bearer token, the signed-in user and the session status.
//!
//! ## Architecture
//!
//! - **Session**: immutable snapshot whose constructors enforce that a user is
//!   present exactly when the status is `Authenticated`
//! - **Store**: a `tokio::sync::watch` channel split into a cloneable read
//!   handle (`SessionStore`) and a single write handle (`SessionWriter`)
//! - **Token store**: durable persistence of the token behind the
//!   `TokenStore` trait (file backed or in memory)
//!
//! ## Usage
//!
//! ```rust
//! use frontdesk_session::{load, MemoryTokenStore, SessionStatus};
//!
//! let (store, _writer) = load(MemoryTokenStore::default());
//! assert_eq!(store.status(), SessionStatus::Unauthenticated);
//! ```

pub mod error;
pub mod session;
pub mod store;
pub mod token_store;
pub mod user;

pub use error::{SessionError, SessionResult};
pub use session::{Session, SessionStatus};
pub use store::{load, SessionStore, SessionWriter};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use user::{EntityId, User};
