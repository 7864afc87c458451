use super::{ApiClient, ApiError, ApiResult};
use crate::models::{Entity, Listing, ResourceKind};
use reqwest::Method;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Thin REST façade for one entity type. Every call is a single HTTP request.
pub(crate) struct ResourceService<R> {
    client: ApiClient,
    _entity: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<R: Entity> ResourceService<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::KIND, urlencoding::encode(id))
    }

    /// Full list scoped to a parent (owner for rooms, room for collections,
    /// collection for items).
    pub async fn get_all(&self, parent_id: &str) -> ApiResult<Listing<R>> {
        let data = self
            .client
            .send(Method::GET, R::KIND.as_ref(), &[("parentId", parent_id)], None)
            .await?;
        Ok(parse_listing(R::KIND, data))
    }

    pub async fn create(&self, body: &Value) -> ApiResult<R> {
        let data = self
            .client
            .send(Method::POST, R::KIND.as_ref(), &[], Some(body))
            .await?;
        parse_created(R::KIND, data)
    }

    /// Sends a partial update. The backend does not echo the merged entity back.
    pub async fn update(&self, id: &str, patch: &Map<String, Value>) -> ApiResult<()> {
        let body = Value::Object(patch.clone());
        self.client
            .send(Method::PATCH, &Self::item_path(id), &[], Some(&body))
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .send(Method::DELETE, &Self::item_path(id), &[], None)
            .await
            .map(|_| ())
    }

    pub async fn search(&self, query: &str, scope_id: &str) -> ApiResult<Vec<R>> {
        let path = format!("{}/search", R::KIND);
        let data = self
            .client
            .send(Method::GET, &path, &[("q", query), ("scope", scope_id)], None)
            .await?;
        Ok(parse_listing(R::KIND, data).entries)
    }
}

fn keys_from(v: Option<&Value>) -> Vec<String> {
    v.and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|k| match k {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(o) => o.get("name").and_then(|n| n.as_str()).map(str::to_string),
                    _ => None,
                })
                .filter(|k| !k.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Accepts `{ items, keys? }`, `{ <kind>: [...] }`, `{ results }` or a bare array.
/// Entries that don't decode are dropped rather than failing the whole list.
pub(crate) fn parse_listing<R: Entity>(kind: ResourceKind, data: Value) -> Listing<R> {
    let (list, keys) = match data {
        Value::Array(list) => (list, Vec::new()),
        Value::Object(mut obj) => {
            let keys = keys_from(obj.get("keys"));
            let list = ["items", kind.as_ref(), "results"]
                .iter()
                .find_map(|k| match obj.remove(*k) {
                    Some(Value::Array(list)) => Some(list),
                    _ => None,
                })
                .unwrap_or_default();
            (list, keys)
        }
        _ => (Vec::new(), Vec::new()),
    };

    let mut entries = Vec::with_capacity(list.len());
    for raw in list {
        match serde_json::from_value::<R>(raw) {
            Ok(entry) if !entry.id().trim().is_empty() => entries.push(entry),
            Ok(_) => log::warn!("{kind}: dropping entry without id"),
            Err(e) => log::warn!("{kind}: dropping malformed entry: {e}"),
        }
    }

    Listing { entries, keys }
}

/// The created entity may come back bare or wrapped under its singular name.
pub(crate) fn parse_created<R: Entity>(kind: ResourceKind, data: Value) -> ApiResult<R> {
    let wrapped = ["item", kind.singular(), "result"]
        .iter()
        .find_map(|k| data.get(*k).filter(|v| v.is_object()).cloned());

    let candidate = wrapped.unwrap_or(data);
    let entity: R = serde_json::from_value(candidate).map_err(ApiError::parse)?;
    if entity.id().trim().is_empty() {
        return Err(ApiError::parse(format!(
            "created {} is missing its id",
            kind.singular()
        )));
    }
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use crate::models::{Collection, Item, Room};
    use serde_json::json;

    #[test]
    fn test_item_path_escapes_id() {
        assert_eq!(ResourceService::<Room>::item_path("a/b"), "rooms/a%2Fb");
        assert_eq!(ResourceService::<Item>::item_path("42"), "items/42");
    }

    #[test]
    fn test_parse_listing_items_with_keys() {
        let data = json!({
            "items": [{"id": 1, "collectionId": "c", "name": "Vase"}],
            "keys": ["name", {"name": "year"}, ""]
        });
        let listing: Listing<Item> = parse_listing(ResourceKind::Items, data);
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.keys, vec!["name".to_string(), "year".to_string()]);
    }

    #[test]
    fn test_parse_listing_accepts_kind_named_list() {
        let data = json!({"collections": [{"id": "c1", "roomId": "r", "name": "Coins"}]});
        let listing: Listing<Collection> = parse_listing(ResourceKind::Collections, data);
        assert_eq!(listing.entries[0].name, "Coins");
        assert!(listing.keys.is_empty());
    }

    #[test]
    fn test_parse_listing_bare_array_and_drops_bad_entries() {
        let data = json!([{"id": 1, "name": "A"}, {"name": "no id"}, {"id": {"x": 1}}]);
        let listing: Listing<Room> = parse_listing(ResourceKind::Rooms, data);
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].id, "1");
    }

    #[test]
    fn test_parse_listing_keeps_records_with_id_and_mongo_id() {
        let data = json!({"rooms": [
            {"_id": "a", "id": "a", "name": "A"},
            {"_id": "b", "name": "B"}
        ]});
        let listing: Listing<Room> = parse_listing(ResourceKind::Rooms, data);
        let ids: Vec<&str> = listing.entries.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_listing_unknown_shape_is_empty() {
        let listing: Listing<Room> = parse_listing(ResourceKind::Rooms, json!({"ok": true}));
        assert!(listing.entries.is_empty());
        let listing: Listing<Room> = parse_listing(ResourceKind::Rooms, Value::Null);
        assert!(listing.entries.is_empty());
    }

    #[test]
    fn test_parse_created_bare_and_wrapped() {
        let room: Room = parse_created(ResourceKind::Rooms, json!({"id": 2, "name": "B"})).unwrap();
        assert_eq!(room.id, "2");

        let room: Room =
            parse_created(ResourceKind::Rooms, json!({"room": {"id": 3, "name": "C"}})).unwrap();
        assert_eq!(room.name, "C");
    }

    #[test]
    fn test_parse_created_requires_id() {
        let err = parse_created::<Room>(ResourceKind::Rooms, json!({"name": "B"})).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }
}
