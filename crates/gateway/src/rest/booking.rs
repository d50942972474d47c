//! Booking endpoints

use chrono::NaiveDate;
use frontdesk_session::EntityId;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Resource};
use crate::error::GatewayResult;
use crate::rest::{Guest, Room};
use crate::wire::date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: EntityId,
    pub guest_id: EntityId,
    pub room_id: EntityId,
    #[serde(with = "date")]
    pub check_in: NaiveDate,
    #[serde(with = "date")]
    pub check_out: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Embedded by the backend on reads; `None` when the guest was deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<Guest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
}

impl Booking {
    /// Nights between check-in and check-out; zero for inverted ranges.
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(0)
    }

    /// Whether the room is held on the night of `day`.
    pub fn occupies(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }

    /// Price of the whole stay, when the room was embedded.
    pub fn total_price(&self) -> Option<f64> {
        self.room
            .as_ref()
            .map(|room| room.price * f64::from(self.nights()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDraft {
    pub guest_id: EntityId,
    pub room_id: EntityId,
    #[serde(with = "date")]
    pub check_in: NaiveDate,
    #[serde(with = "date")]
    pub check_out: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl Resource for Booking {
    type Draft = BookingDraft;
    const COLLECTION: &'static str = "bookings";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl ApiClient {
    pub async fn bookings(&self) -> GatewayResult<Vec<Booking>> {
        self.list().await
    }

    pub async fn booking(&self, id: &EntityId) -> GatewayResult<Booking> {
        self.fetch(id).await
    }

    pub async fn create_booking(&self, draft: &BookingDraft) -> GatewayResult<Booking> {
        self.create::<Booking>(draft).await
    }

    pub async fn update_booking(
        &self,
        id: &EntityId,
        draft: &BookingDraft,
    ) -> GatewayResult<Booking> {
        self.update::<Booking>(id, draft).await
    }

    pub async fn delete_booking(&self, id: &EntityId) -> GatewayResult<()> {
        self.delete_item::<Booking>(id).await
    }
}
