//! Editable forms for each resource.
//!
//! Forms hold raw text as typed. `validate` checks required fields and
//! turns the text into the typed draft the gateway sends.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use frontdesk_gateway::{Booking, BookingDraft, EntityId, Guest, GuestDraft, Room, RoomDraft};

/// Field name to message.
pub type FieldErrors = BTreeMap<String, String>;

pub trait ResourceForm: Clone + Default {
    type Record;
    type Draft;

    /// Prefill the form from an existing record.
    fn from_record(record: &Self::Record) -> Self;

    fn validate(&self) -> Result<Self::Draft, FieldErrors>;
}

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Default)]
struct Checks {
    errors: FieldErrors,
}

impl Checks {
    fn required(&mut self, field: &str, value: &str, message: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            self.errors.insert(field.to_string(), message.to_string());
            return None;
        }
        Some(value.to_string())
    }

    fn parsed<T: std::str::FromStr>(
        &mut self,
        field: &str,
        value: Option<String>,
        message: &str,
    ) -> Option<T> {
        let parsed = value?.parse().ok();
        if parsed.is_none() {
            self.errors.insert(field.to_string(), message.to_string());
        }
        parsed
    }

    fn date(&mut self, field: &str, value: Option<String>, message: &str) -> Option<NaiveDate> {
        let parsed = NaiveDate::parse_from_str(&value?, DATE_FORMAT).ok();
        if parsed.is_none() {
            self.errors.insert(field.to_string(), message.to_string());
        }
        parsed
    }

    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, FieldErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        // every field was checked above
        build().ok_or(self.errors)
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ResourceForm for GuestForm {
    type Record = Guest;
    type Draft = GuestDraft;

    fn from_record(guest: &Guest) -> Self {
        Self {
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone(),
            address: guest.address.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<GuestDraft, FieldErrors> {
        let mut checks = Checks::default();
        let name = checks.required("name", &self.name, "Full name is required");
        let email = checks.required("email", &self.email, "Email is required");
        let phone = checks.required("phone", &self.phone, "Phone is required");

        checks.finish(|| {
            Some(GuestDraft {
                name: name?,
                email: email?,
                phone: phone?,
                address: optional(&self.address),
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomForm {
    pub room_number: String,
    pub room_type: String,
    pub price: String,
    pub capacity: String,
    pub description: String,
}

impl Default for RoomForm {
    fn default() -> Self {
        Self {
            room_number: String::new(),
            room_type: "Single".to_string(),
            price: String::new(),
            capacity: "1".to_string(),
            description: String::new(),
        }
    }
}

impl ResourceForm for RoomForm {
    type Record = Room;
    type Draft = RoomDraft;

    fn from_record(room: &Room) -> Self {
        Self {
            room_number: room.room_number.clone(),
            room_type: room.room_type.to_string(),
            price: room.price.to_string(),
            capacity: room.capacity.to_string(),
            description: room.description.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<RoomDraft, FieldErrors> {
        let mut checks = Checks::default();
        let room_number = checks.required("room_number", &self.room_number, "Room number is required");
        let room_type = checks.required("type", &self.room_type, "Room type is required");
        let price = checks.required("price", &self.price, "Price is required");
        let price: Option<f64> = checks.parsed("price", price, "Price must be a number");
        let capacity = checks.required("capacity", &self.capacity, "Capacity is required");
        let capacity: Option<u32> =
            checks.parsed("capacity", capacity, "Capacity must be a whole number");

        checks.finish(|| {
            Some(RoomDraft {
                room_number: room_number?,
                room_type: room_type?.parse().unwrap_or_default(),
                price: price?,
                capacity: capacity?,
                description: optional(&self.description),
            })
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub guest_id: String,
    pub room_id: String,
    /// `YYYY-MM-DD`
    pub check_in: String,
    pub check_out: String,
    pub special_requests: String,
}

impl ResourceForm for BookingForm {
    type Record = Booking;
    type Draft = BookingDraft;

    fn from_record(booking: &Booking) -> Self {
        Self {
            guest_id: booking.guest_id.to_string(),
            room_id: booking.room_id.to_string(),
            check_in: booking.check_in.format(DATE_FORMAT).to_string(),
            check_out: booking.check_out.format(DATE_FORMAT).to_string(),
            special_requests: booking.special_requests.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<BookingDraft, FieldErrors> {
        let mut checks = Checks::default();
        let guest_id = checks.required("guest_id", &self.guest_id, "Guest is required");
        let room_id = checks.required("room_id", &self.room_id, "Room is required");
        let check_in = checks.required("check_in", &self.check_in, "Check-in date is required");
        let check_in = checks.date("check_in", check_in, "Check-in date must be YYYY-MM-DD");
        let check_out = checks.required("check_out", &self.check_out, "Check-out date is required");
        let check_out = checks.date("check_out", check_out, "Check-out date must be YYYY-MM-DD");

        checks.finish(|| {
            Some(BookingDraft {
                guest_id: EntityId::from(guest_id?),
                room_id: EntityId::from(room_id?),
                check_in: check_in?,
                check_out: check_out?,
                special_requests: optional(&self.special_requests),
            })
        })
    }
}
