//! Authentication endpoints

use frontdesk_session::User;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{ApiClient, RequestKind};
use crate::error::GatewayResult;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    user: UserEnvelope,
}

impl RegisterResponse {
    pub fn user(&self) -> &User {
        self.user.as_user()
    }

    pub fn into_user(self) -> User {
        self.user.into_user()
    }
}

/// The backend answers either `{"user": {...}}` or the bare user document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelope {
    fn as_user(&self) -> &User {
        match self {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        }
    }

    fn into_user(self) -> User {
        match self {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        }
    }
}

impl ApiClient {
    /// Exchange credentials for a token. A 401 here is always `Unauthorized`.
    pub async fn login(&self, request: &LoginRequest) -> GatewayResult<LoginResponse> {
        debug!(email = %request.email, "logging in");
        self.post("auth/login", request, RequestKind::Credentials)
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> GatewayResult<RegisterResponse> {
        debug!(email = %request.email, "registering account");
        self.post("auth/register", request, RequestKind::Credentials)
            .await
    }

    /// Resolve the user behind the current session token.
    pub async fn current_user(&self) -> GatewayResult<User> {
        let envelope: UserEnvelope = self.get(self.verify_path()).await?;
        Ok(envelope.into_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_response_accepts_wrapped_user() {
        let response: RegisterResponse = serde_json::from_str(
            r#"{"message": "User registered successfully", "user": {"_id": "u1", "name": "A"}}"#,
        )
        .unwrap();
        assert_eq!(response.message.as_deref(), Some("User registered successfully"));
        assert_eq!(response.user().id.as_str(), "u1");
    }

    #[test]
    fn register_response_accepts_bare_user() {
        let response: RegisterResponse =
            serde_json::from_str(r#"{"id": 7, "email": "a@b.com"}"#).unwrap();
        assert!(response.message.is_none());
        assert_eq!(response.into_user().id.as_str(), "7");
    }
}
