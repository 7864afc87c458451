use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

mod record;

/// Backend ids arrive as strings or numbers (and under `id`, `_id`, or both).
/// Everything client-side compares them as strings.
pub(crate) fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported id value: {other}"
        ))),
    }
}

/// REST resource families exposed by the museum backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ResourceKind {
    Users,
    Rooms,
    Collections,
    Items,
}

impl ResourceKind {
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Users => "user",
            ResourceKind::Rooms => "room",
            ResourceKind::Collections => "collection",
            ResourceKind::Items => "item",
        }
    }
}

/// A list entity the client caches and reconciles by id.
pub(crate) trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    /// Human-readable name shown in lists.
    fn label(&self) -> String;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "record::UserRecord")]
pub(crate) struct User {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "record::RoomRecord")]
pub(crate) struct Room {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Room {
    const KIND: ResourceKind = ResourceKind::Rooms;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "record::CollectionRecord")]
pub(crate) struct Collection {
    pub id: String,
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Collection {
    const KIND: ResourceKind = ResourceKind::Collections;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Items carry dynamic fields described by the `keys` schema of their listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "record::ItemRecord")]
pub(crate) struct Item {
    pub id: String,
    #[serde(rename = "collectionId")]
    pub collection_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    pub fn field_text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

impl Entity for Item {
    const KIND: ResourceKind = ResourceKind::Items;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        let name = self.field_text("name");
        if !name.is_empty() {
            return name;
        }
        self.fields
            .values()
            .find_map(|v| v.as_str().filter(|s| !s.trim().is_empty()))
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// One `get_all` response: the entries plus the field schema (items only).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Listing<R> {
    pub entries: Vec<R>,
    pub keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_accepts_numeric_id() {
        let room: Room = serde_json::from_str(r#"{"id": 1, "name": "A"}"#).expect("room");
        assert_eq!(room.id, "1");
        assert_eq!(room.label(), "A");
        assert!(room.extra.is_empty());
    }

    #[test]
    fn test_collection_accepts_mongo_style_ids() {
        let json = r#"{"_id": "c1", "roomID": 7, "name": "Coins", "era": "Roman"}"#;
        let c: Collection = serde_json::from_str(json).expect("collection");
        assert_eq!(c.id, "c1");
        assert_eq!(c.room_id, "7");
        assert_eq!(c.extra["era"], "Roman");
    }

    #[test]
    fn test_collection_serializes_camel_case_room_id() {
        let c = Collection {
            id: "1".to_string(),
            room_id: "r".to_string(),
            name: "N".to_string(),
            extra: Map::new(),
        };
        let v = serde_json::to_value(c).expect("serialize");
        assert_eq!(v["roomId"], "r");
        assert!(v.get("room_id").is_none());
    }

    #[test]
    fn test_item_keeps_dynamic_fields() {
        let json = r#"{"id": "i1", "collectionId": "c1", "name": "Vase", "year": 1820}"#;
        let item: Item = serde_json::from_str(json).expect("item");
        assert_eq!(item.collection_id, "c1");
        assert_eq!(item.field_text("year"), "1820");
        assert_eq!(item.field_text("missing"), "");
        assert_eq!(item.label(), "Vase");
    }

    #[test]
    fn test_item_label_falls_back_to_first_text_field_then_id() {
        let item: Item =
            serde_json::from_str(r#"{"id": 3, "title": "Portrait"}"#).expect("item");
        assert_eq!(item.label(), "Portrait");

        let bare: Item = serde_json::from_str(r#"{"id": 4, "year": 1900}"#).expect("item");
        assert_eq!(bare.label(), "4");
    }

    #[test]
    fn test_user_accepts_lowercase_name_keys() {
        let json = r#"{"id": 9, "firstname": "Ada", "lastname": "Lovelace", "email": "a@b.c"}"#;
        let user: User = serde_json::from_str(json).expect("user");
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_user_display_name_falls_back_to_email() {
        let user: User = serde_json::from_str(r#"{"id": "u", "email": "a@b.c"}"#).expect("user");
        assert_eq!(user.display_name(), "a@b.c");
    }

    #[test]
    fn test_resource_kind_path_segments() {
        assert_eq!(ResourceKind::Collections.to_string(), "collections");
        assert_eq!(ResourceKind::Items.as_ref(), "items");
        assert_eq!(ResourceKind::Rooms.singular(), "room");
    }

    #[test]
    fn test_record_with_both_id_and_mongo_id_decodes() {
        let room: Room =
            serde_json::from_str(r#"{"_id": "a", "id": "a", "name": "A"}"#).expect("room");
        assert_eq!(room.id, "a");
        assert!(room.extra.is_empty());

        let item: Item =
            serde_json::from_str(r#"{"_id": "m1", "id": 5, "title": "Jar"}"#).expect("item");
        assert_eq!(item.id, "5");
        assert!(item.fields.get("_id").is_none());

        let user: User =
            serde_json::from_str(r#"{"_id": "u1", "id": "u1", "email": "a@b.c"}"#).expect("user");
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn test_mongo_id_used_when_id_missing() {
        let c: Collection =
            serde_json::from_str(r#"{"_id": "c9", "id": null, "name": "Maps"}"#).expect("collection");
        assert_eq!(c.id, "c9");
    }

    #[test]
    fn test_user_snapshot_roundtrip() {
        let json = r#"{"id": "u2", "firstname": "Ada", "lastname": "L", "email": "a@b.c"}"#;
        let user: User = serde_json::from_str(json).expect("user");
        let stored = serde_json::to_string(&user).expect("serialize");
        let back: User = serde_json::from_str(&stored).expect("user");
        assert_eq!(back, user);
    }

    #[test]
    fn test_rejects_object_id() {
        let res: Result<Room, _> = serde_json::from_str(r#"{"id": {"x": 1}, "name": "A"}"#);
        assert!(res.is_err());
    }
}
