//! List, edit and delete screen shared by guests, rooms and bookings.

use std::sync::Arc;

use frontdesk_auth::{AuthController, SERVER_UNREACHABLE};
use frontdesk_gateway::{ApiError, EntityId, Guest, Resource, Room};
use tracing::{debug, warn};

use crate::form::{FieldErrors, GuestForm, ResourceForm, RoomForm};
use crate::mount::MountHandle;
use crate::notice::Notice;

/// A collection that has a screen.
pub trait ScreenResource: Resource {
    /// Singular, capitalised: `Guest`.
    const LABEL: &'static str;
    /// Plural, lower case: `guests`.
    const PLURAL: &'static str;

    type Form: ResourceForm<Record = Self, Draft = <Self as Resource>::Draft>;
}

impl ScreenResource for Guest {
    const LABEL: &'static str = "Guest";
    const PLURAL: &'static str = "guests";
    type Form = GuestForm;
}

impl ScreenResource for Room {
    const LABEL: &'static str = "Room";
    const PLURAL: &'static str = "rooms";
    type Form = RoomForm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Fetch,
    Save,
    Delete,
}

/// Requests currently in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loading {
    pub fetch: bool,
    pub save: bool,
    pub delete: bool,
}

pub struct ResourceScreen<R: ScreenResource> {
    auth: Arc<AuthController>,
    mount: MountHandle,
    items: Vec<R>,
    editing: Option<R>,
    pending_delete: Option<EntityId>,
    notice: Option<Notice>,
    loading: Loading,
    field_errors: FieldErrors,
}

pub type GuestsScreen = ResourceScreen<Guest>;
pub type RoomsScreen = ResourceScreen<Room>;

impl<R: ScreenResource> ResourceScreen<R> {
    pub fn new(auth: Arc<AuthController>) -> Self {
        Self {
            auth,
            mount: MountHandle::new(),
            items: Vec::new(),
            editing: None,
            pending_delete: None,
            notice: None,
            loading: Loading::default(),
            field_errors: FieldErrors::new(),
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn editing(&self) -> Option<&R> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&EntityId> {
        self.pending_delete.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn loading(&self) -> Loading {
        self.loading
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    pub(crate) fn auth(&self) -> &Arc<AuthController> {
        &self.auth
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    /// Fetch the collection. On failure the previous list stays.
    pub async fn refresh(&mut self) -> bool {
        self.loading.fetch = true;
        let result = self.auth.client().list::<R>().await;
        if !self.mount.is_mounted() {
            return false;
        }
        self.loading.fetch = false;

        match result {
            Ok(items) => {
                debug!(collection = R::COLLECTION, count = items.len(), "fetched");
                self.items = items;
                true
            }
            Err(error) => {
                self.fail(error, Action::Fetch);
                false
            }
        }
    }

    /// Select a listed record for editing and return the prefilled form.
    pub fn begin_edit(&mut self, id: &EntityId) -> Option<R::Form> {
        let Some(record) = self.items.iter().find(|item| item.id() == id).cloned() else {
            self.notice = Some(Notice::error(format!(
                "Invalid {} data for editing",
                R::LABEL.to_lowercase()
            )));
            return None;
        };
        self.field_errors.clear();
        let form = R::Form::from_record(&record);
        self.editing = Some(record);
        Some(form)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.field_errors.clear();
    }

    /// Create, or update the record being edited, then re-fetch.
    pub async fn submit(&mut self, form: &R::Form) -> bool {
        self.field_errors.clear();
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                self.field_errors = errors;
                return false;
            }
        };

        self.loading.save = true;
        let client = self.auth.client();
        let (result, verb) = match &self.editing {
            Some(record) => (client.update::<R>(record.id(), &draft).await, "updated"),
            None => (client.create::<R>(&draft).await, "created"),
        };
        if !self.mount.is_mounted() {
            return false;
        }
        self.loading.save = false;

        match result {
            Ok(saved) => {
                debug!(collection = R::COLLECTION, id = %saved.id(), verb, "saved");
                self.editing = None;
                self.notice = Some(Notice::success(format!("{} {verb} successfully!", R::LABEL)));
                self.refresh().await;
                true
            }
            Err(error) => {
                self.fail(error, Action::Save);
                false
            }
        }
    }

    /// First step of a delete: remember what to delete until confirmed.
    pub fn request_delete(&mut self, id: &EntityId) -> bool {
        if !self.items.iter().any(|item| item.id() == id) {
            self.notice = Some(Notice::error(format!("Invalid {} ID", R::LABEL.to_lowercase())));
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };

        self.loading.delete = true;
        let result = self.auth.client().delete_item::<R>(&id).await;
        if !self.mount.is_mounted() {
            return false;
        }
        self.loading.delete = false;

        match result {
            Ok(()) => {
                debug!(collection = R::COLLECTION, %id, "deleted");
                if self.editing.as_ref().is_some_and(|record| record.id() == &id) {
                    self.editing = None;
                }
                self.notice = Some(Notice::success(format!("{} deleted successfully!", R::LABEL)));
                self.refresh().await;
                true
            }
            Err(error) => {
                self.fail(error, Action::Delete);
                false
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Show `error` the way this screen shows failures.
    ///
    /// An expired session signs out instead. Rejected saves and deletes
    /// show the server's message; everything else gets a generic retry hint.
    pub(crate) fn fail(&mut self, error: ApiError, action: Action) {
        if self.auth.handle_api_error(&error) {
            self.notice = None;
            return;
        }
        warn!(collection = R::COLLECTION, ?action, %error, "request failed");

        let label = R::LABEL.to_lowercase();
        let fallback = match action {
            Action::Fetch => format!("Failed to fetch {}. Please try again.", R::PLURAL),
            Action::Save => format!("Failed to save {label}. Please try again."),
            Action::Delete => format!("Failed to delete {label}. Please try again."),
        };

        let message = match (&error, action) {
            (ApiError::Transport { .. }, _) => SERVER_UNREACHABLE.to_string(),
            (_, Action::Fetch) => fallback,
            (ApiError::Validation { message, fields, .. }, Action::Save) => {
                self.field_errors = fields.clone();
                message.clone()
            }
            (ApiError::Validation { message, .. } | ApiError::NotFound { message }, _) => {
                message.clone()
            }
            _ => fallback,
        };
        self.notice = Some(Notice::error(message));
    }
}
