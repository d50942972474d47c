use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use frontdesk_auth::AuthController;
use frontdesk_gateway::{Booking, EntityId, Guest, Room};

use crate::form::BookingForm;
use crate::resource::{Action, ResourceScreen, ScreenResource};

impl ScreenResource for Booking {
    const LABEL: &'static str = "Booking";
    const PLURAL: &'static str = "bookings";
    type Form = BookingForm;
}

/// Bookings list plus the guests and rooms the booking form picks from.
pub struct BookingsScreen {
    inner: ResourceScreen<Booking>,
    guests: Vec<Guest>,
    rooms: Vec<Room>,
}

impl BookingsScreen {
    pub fn new(auth: Arc<AuthController>) -> Self {
        Self {
            inner: ResourceScreen::new(auth),
            guests: Vec::new(),
            rooms: Vec::new(),
        }
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn guest_name(&self, id: &EntityId) -> Option<&str> {
        self.guests
            .iter()
            .find(|guest| &guest.id == id)
            .map(|guest| guest.name.as_str())
    }

    pub fn room_number(&self, id: &EntityId) -> Option<&str> {
        self.rooms
            .iter()
            .find(|room| &room.id == id)
            .map(|room| room.room_number.as_str())
    }

    /// Load the guest and room choices for the form.
    pub async fn load_choices(&mut self) -> bool {
        let client = self.inner.auth().client();
        let (guests, rooms) = tokio::join!(client.guests(), client.rooms());
        if !self.inner.is_mounted() {
            return false;
        }

        match (guests, rooms) {
            (Ok(guests), Ok(rooms)) => {
                self.guests = guests;
                self.rooms = rooms;
                true
            }
            (Err(error), _) | (_, Err(error)) => {
                self.inner.fail(error, Action::Fetch);
                false
            }
        }
    }

    /// Bookings and the form choices together.
    pub async fn open(&mut self) -> bool {
        let bookings = self.inner.refresh().await;
        bookings && self.load_choices().await
    }
}

impl Deref for BookingsScreen {
    type Target = ResourceScreen<Booking>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for BookingsScreen {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
