//! Sign-in and registration screens.

use std::sync::Arc;

use frontdesk_auth::{AuthController, AuthError, Route};
use frontdesk_session::User;
use tracing::debug;

use crate::form::FieldErrors;
use crate::mount::MountHandle;
use crate::notice::Notice;

pub const REGISTERED: &str = "Registration successful! Please sign in.";

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
}

pub struct LoginScreen {
    auth: Arc<AuthController>,
    mount: MountHandle,
    pub email: String,
    pub password: String,
    notice: Option<Notice>,
    field_errors: FieldErrors,
    submitting: bool,
}

impl LoginScreen {
    pub fn new(auth: Arc<AuthController>) -> Self {
        Self {
            auth,
            mount: MountHandle::new(),
            email: String::new(),
            password: String::new(),
            notice: None,
            field_errors: FieldErrors::new(),
            submitting: false,
        }
    }

    /// Open the screen with a banner carried over from another screen.
    pub fn with_notice(auth: Arc<AuthController>, notice: Notice) -> Self {
        let mut screen = Self::new(auth);
        screen.notice = Some(notice);
        screen
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Send an already signed-in user to the dashboard. Returns whether it did.
    pub fn redirect_if_signed_in(&self) -> bool {
        if !self.auth.is_authenticated() {
            return false;
        }
        self.auth.navigator().replace(Route::Dashboard);
        true
    }

    pub async fn submit(&mut self) -> Option<User> {
        self.field_errors.clear();
        require(&mut self.field_errors, "email", &self.email, "Email is required");
        require(&mut self.field_errors, "password", &self.password, "Password is required");
        if !self.field_errors.is_empty() {
            return None;
        }

        self.notice = None;
        self.submitting = true;
        let result = self.auth.login(&self.email, &self.password).await;
        if !self.mount.is_mounted() {
            return None;
        }
        self.submitting = false;

        match result {
            Ok(user) => {
                self.password.clear();
                self.auth.navigator().replace(Route::Dashboard);
                Some(user)
            }
            Err(error) => {
                debug!(%error, "sign-in failed");
                if matches!(error, AuthError::InvalidCredentials) {
                    self.password.clear();
                }
                self.notice = Some(Notice::error(error.user_message()));
                None
            }
        }
    }
}

pub struct RegisterScreen {
    auth: Arc<AuthController>,
    mount: MountHandle,
    pub name: String,
    pub email: String,
    pub password: String,
    notice: Option<Notice>,
    field_errors: FieldErrors,
    submitting: bool,
}

impl RegisterScreen {
    pub fn new(auth: Arc<AuthController>) -> Self {
        Self {
            auth,
            mount: MountHandle::new(),
            name: String::new(),
            email: String::new(),
            password: String::new(),
            notice: None,
            field_errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    /// Register, then hand back the notice the login screen should open with.
    pub async fn submit(&mut self) -> Option<Notice> {
        self.field_errors.clear();
        require(&mut self.field_errors, "name", &self.name, "Full name is required");
        require(&mut self.field_errors, "email", &self.email, "Email is required");
        require(&mut self.field_errors, "password", &self.password, "Password is required");
        if !self.field_errors.is_empty() {
            return None;
        }

        self.notice = None;
        self.submitting = true;
        let result = self
            .auth
            .register(&self.name, &self.email, &self.password)
            .await;
        if !self.mount.is_mounted() {
            return None;
        }
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                self.auth.navigator().push(Route::Login);
                Some(Notice::success(REGISTERED))
            }
            Err(error) => {
                let message = error.user_message();
                self.notice = Some(Notice::error(if message.is_empty() {
                    "Registration failed".to_string()
                } else {
                    message
                }));
                None
            }
        }
    }
}
