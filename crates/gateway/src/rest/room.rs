//! Room endpoints

use std::fmt;
use std::str::FromStr;

use frontdesk_session::EntityId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::{ApiClient, Resource};
use crate::error::GatewayResult;
use crate::wire::{lenient_f64, lenient_u32, string_or_number};

/// Room category. Anything the backend stores outside the known set is kept
/// verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RoomType {
    #[default]
    Single,
    Double,
    Suite,
    Deluxe,
    Other(String),
}

impl RoomType {
    pub const KNOWN: [RoomType; 4] = [
        RoomType::Single,
        RoomType::Double,
        RoomType::Suite,
        RoomType::Deluxe,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Suite => "Suite",
            RoomType::Deluxe => "Deluxe",
            RoomType::Other(name) => name,
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Ok(Self::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(raw))
            .unwrap_or_else(|| RoomType::Other(raw.to_string())))
    }
}

impl Serialize for RoomType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoomType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "_id", alias = "id")]
    pub id: EntityId,
    #[serde(alias = "roomNumber", deserialize_with = "string_or_number")]
    pub room_number: String,
    #[serde(rename = "type", default)]
    pub room_type: RoomType,
    /// Nightly rate.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomDraft {
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub price: f64,
    pub capacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for RoomDraft {
    fn default() -> Self {
        Self {
            room_number: String::new(),
            room_type: RoomType::Single,
            price: 0.0,
            capacity: 1,
            description: None,
        }
    }
}

impl Resource for Room {
    type Draft = RoomDraft;
    const COLLECTION: &'static str = "rooms";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl ApiClient {
    pub async fn rooms(&self) -> GatewayResult<Vec<Room>> {
        self.list().await
    }

    pub async fn room(&self, id: &EntityId) -> GatewayResult<Room> {
        self.fetch(id).await
    }

    pub async fn create_room(&self, draft: &RoomDraft) -> GatewayResult<Room> {
        self.create::<Room>(draft).await
    }

    pub async fn update_room(&self, id: &EntityId, draft: &RoomDraft) -> GatewayResult<Room> {
        self.update::<Room>(id, draft).await
    }

    pub async fn delete_room(&self, id: &EntityId) -> GatewayResult<()> {
        self.delete_item::<Room>(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_type_parsing_is_case_insensitive_and_keeps_unknowns() {
        assert_eq!("suite".parse::<RoomType>().unwrap(), RoomType::Suite);
        assert_eq!(
            "Penthouse".parse::<RoomType>().unwrap(),
            RoomType::Other("Penthouse".to_string())
        );
    }

    #[test]
    fn room_reads_form_encoded_numbers() {
        let room: Room = serde_json::from_str(
            r#"{"_id": "r1", "room_number": 101, "type": "Double", "price": "120", "capacity": "2"}"#,
        )
        .unwrap();
        assert_eq!(room.room_number, "101");
        assert_eq!(room.room_type, RoomType::Double);
        assert_eq!(room.price, 120.0);
        assert_eq!(room.capacity, 2);
        assert!(room.description.is_none());
    }

    #[test]
    fn draft_uses_backend_field_names() {
        let json = serde_json::to_value(RoomDraft {
            room_number: "12".into(),
            ..RoomDraft::default()
        })
        .unwrap();
        assert_eq!(json["room_number"], "12");
        assert_eq!(json["type"], "Single");
        assert_eq!(json["capacity"], 1);
        assert!(json.get("description").is_none());
    }
}
