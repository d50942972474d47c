//! Guest endpoints

use frontdesk_session::EntityId;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Resource};
use crate::error::GatewayResult;
use crate::wire::string_or_number;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    #[serde(rename = "_id", alias = "id")]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Fields sent when creating or updating a guest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuestDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Resource for Guest {
    type Draft = GuestDraft;
    const COLLECTION: &'static str = "guests";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl ApiClient {
    pub async fn guests(&self) -> GatewayResult<Vec<Guest>> {
        self.list().await
    }

    pub async fn guest(&self, id: &EntityId) -> GatewayResult<Guest> {
        self.fetch(id).await
    }

    pub async fn create_guest(&self, draft: &GuestDraft) -> GatewayResult<Guest> {
        self.create::<Guest>(draft).await
    }

    pub async fn update_guest(&self, id: &EntityId, draft: &GuestDraft) -> GatewayResult<Guest> {
        self.update::<Guest>(id, draft).await
    }

    pub async fn delete_guest(&self, id: &EntityId) -> GatewayResult<()> {
        self.delete_item::<Guest>(id).await
    }
}
