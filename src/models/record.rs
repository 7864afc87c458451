//! Wire shapes the backend sends. Records may carry `id`, `_id`, or both; `id` wins.

use super::{id_from_any, Collection, Item, Room, User};
use serde::Deserialize;
use serde_json::{Map, Value};

fn pick_id(id: String, mongo_id: String) -> String {
    if id.is_empty() {
        mongo_id
    } else {
        id
    }
}

#[derive(Deserialize)]
pub(crate) struct UserRecord {
    #[serde(default, deserialize_with = "id_from_any")]
    id: String,
    #[serde(rename = "_id", default, deserialize_with = "id_from_any")]
    mongo_id: String,
    #[serde(rename = "firstName", alias = "firstname", default)]
    first_name: String,
    #[serde(rename = "lastName", alias = "lastname", default)]
    last_name: String,
    #[serde(default)]
    email: String,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: pick_id(r.id, r.mongo_id),
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct RoomRecord {
    #[serde(default, deserialize_with = "id_from_any")]
    id: String,
    #[serde(rename = "_id", default, deserialize_with = "id_from_any")]
    mongo_id: String,
    #[serde(default)]
    name: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RoomRecord> for Room {
    fn from(r: RoomRecord) -> Self {
        Self {
            id: pick_id(r.id, r.mongo_id),
            name: r.name,
            extra: r.extra,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct CollectionRecord {
    #[serde(default, deserialize_with = "id_from_any")]
    id: String,
    #[serde(rename = "_id", default, deserialize_with = "id_from_any")]
    mongo_id: String,
    #[serde(
        rename = "roomId",
        alias = "roomID",
        default,
        deserialize_with = "id_from_any"
    )]
    room_id: String,
    #[serde(default)]
    name: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<CollectionRecord> for Collection {
    fn from(r: CollectionRecord) -> Self {
        Self {
            id: pick_id(r.id, r.mongo_id),
            room_id: r.room_id,
            name: r.name,
            extra: r.extra,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ItemRecord {
    #[serde(default, deserialize_with = "id_from_any")]
    id: String,
    #[serde(rename = "_id", default, deserialize_with = "id_from_any")]
    mongo_id: String,
    #[serde(
        rename = "collectionId",
        alias = "collectionID",
        default,
        deserialize_with = "id_from_any"
    )]
    collection_id: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<ItemRecord> for Item {
    fn from(r: ItemRecord) -> Self {
        Self {
            id: pick_id(r.id, r.mongo_id),
            collection_id: r.collection_id,
            fields: r.fields,
        }
    }
}
