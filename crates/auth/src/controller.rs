use frontdesk_gateway::{ApiClient, ApiError, LoginRequest, LoginResponse, RegisterRequest};
use frontdesk_session::{SessionStatus, SessionStore, SessionWriter, User};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};
use crate::navigator::Navigator;
use crate::route::Route;

/// Owns the session writer; every authentication state change goes through here.
pub struct AuthController {
    client: ApiClient,
    writer: SessionWriter,
    navigator: Navigator,
    startup: OnceCell<()>,
}

impl AuthController {
    pub fn new(client: ApiClient, writer: SessionWriter, navigator: Navigator) -> Self {
        Self {
            client,
            writer,
            navigator,
            startup: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> SessionStore {
        self.writer.store()
    }

    pub fn current_user(&self) -> Option<User> {
        self.writer.current().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.writer.current().is_authenticated()
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let LoginResponse { token, user } = self
            .client
            .login(&request)
            .await
            .map_err(AuthError::from_login)?;

        self.writer.set(&token, user.clone())?;
        info!(user = %user.id, "signed in");
        Ok(user)
    }

    /// Create an account. The new user still has to sign in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthResult<User> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .register(&request)
            .await
            .map_err(AuthError::from_registration)?;

        let user = response.into_user();
        info!(user = %user.id, "account registered");
        Ok(user)
    }

    /// Check a persisted token against the backend and settle the session.
    ///
    /// Returns the resulting status. Without a pending token nothing is sent.
    pub async fn verify(&self) -> SessionStatus {
        let Some(token) = self.writer.begin_verification() else {
            return self.writer.current().status();
        };

        match self.client.current_user().await {
            Ok(user) => match self.writer.set(&token, user) {
                Ok(()) => debug!("persisted session verified"),
                Err(error) => {
                    warn!(%error, "could not store verified session");
                    self.writer.clear();
                }
            },
            Err(error) => {
                warn!(%error, "persisted session rejected");
                self.writer.clear();
            }
        }

        self.writer.current().status()
    }

    /// `verify` at most once per process; concurrent callers share the
    /// same outcome.
    pub async fn verify_once(&self) -> SessionStatus {
        self.startup
            .get_or_init(|| async {
                self.verify().await;
            })
            .await;
        self.writer.current().status()
    }

    pub fn logout(&self) {
        let was_signed_in = self.is_authenticated();
        self.writer.clear();
        self.navigator.replace(Route::Login);
        if was_signed_in {
            info!("signed out");
        }
    }

    /// Sign out when `error` says the session expired. Returns whether it did.
    pub fn handle_api_error(&self, error: &ApiError) -> bool {
        if !error.is_session_expired() {
            return false;
        }
        warn!("session expired, signing out");
        self.logout();
        true
    }
}
