//! # Frontdesk Auth Crate
//!
//! Authentication flow for the Frontdesk client: the controller that signs
//! staff in and out, the guard in front of protected screens, and the
//! navigation history both of them drive.
//!
//! ```rust
//! use frontdesk_auth::{GuardDecision, Route};
//! use frontdesk_session::SessionStatus;
//!
//! let decision = GuardDecision::for_status(SessionStatus::Unauthenticated, &Route::Guests);
//! assert_eq!(decision, GuardDecision::Redirect { to: Route::Login, replace: true });
//! ```

pub mod controller;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod route;

pub use controller::AuthController;
pub use error::{AuthError, AuthResult, INVALID_CREDENTIALS, SERVER_UNREACHABLE};
pub use guard::{GuardDecision, RouteGuard};
pub use navigator::Navigator;
pub use route::Route;
