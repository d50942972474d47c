use frontdesk_gateway::ApiError;
use frontdesk_session::SessionError;
use thiserror::Error;

/// Shown whenever the backend cannot be reached at all.
pub const SERVER_UNREACHABLE: &str = "Unable to reach the server. Please try again.";

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    /// The backend refused the request; the message is safe to show.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to store session: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Text for the banner on the login and registration screens.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            AuthError::Rejected(message) => message.clone(),
            AuthError::Api(error) if error.is_transport() => SERVER_UNREACHABLE.to_string(),
            AuthError::Api(error) => error.message().to_string(),
            AuthError::Session(_) => "Unable to save your session. Please try again.".to_string(),
        }
    }

    pub(crate) fn from_login(error: ApiError) -> Self {
        match error {
            // the backend answers 404 for an unknown email
            ApiError::Unauthorized { .. } | ApiError::NotFound { .. } => {
                AuthError::InvalidCredentials
            }
            ApiError::Validation { message, .. } | ApiError::Server { message, .. } => {
                AuthError::Rejected(message)
            }
            ApiError::Decode { .. } => AuthError::Rejected("Login failed".to_string()),
            other => AuthError::Api(other),
        }
    }

    pub(crate) fn from_registration(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized { message }
            | ApiError::NotFound { message }
            | ApiError::Validation { message, .. }
            | ApiError::Server { message, .. } => AuthError::Rejected(message),
            ApiError::Decode { .. } => AuthError::Rejected("Registration failed".to_string()),
            other => AuthError::Api(other),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_not_found_reads_as_bad_credentials() {
        let error = AuthError::from_login(ApiError::NotFound {
            message: "User not found".into(),
        });
        assert!(matches!(error, AuthError::InvalidCredentials));
        assert_eq!(error.user_message(), "Invalid email or password");
    }

    #[test]
    fn transport_failures_get_the_retry_message() {
        let error = AuthError::from_registration(ApiError::Transport {
            message: "connection refused".into(),
        });
        assert_eq!(error.user_message(), SERVER_UNREACHABLE);
    }

    #[test]
    fn registration_keeps_the_server_message() {
        let error = AuthError::from_registration(ApiError::Validation {
            status: 400,
            message: "Email already exists".into(),
            fields: Default::default(),
        });
        assert_eq!(error.user_message(), "Email already exists");
    }
}
