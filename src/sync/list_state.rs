use crate::api::ApiResult;
use crate::models::{Entity, Listing};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ListPhase {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PendingChange {
    Remove,
    /// Shallow merge of these fields into the entity.
    Merge(Map<String, Value>),
}

/// A server-confirmed change that has not reached the rendered list yet.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PendingMutation {
    pub id: String,
    pub change: PendingChange,
    pub apply_at_ms: i64,
    seq: u64,
}

/// Client-side cache of one server list plus its reconciliation queue.
///
/// Creates and searches land immediately. Deletes and updates are queued with an
/// apply-after timestamp and only reach `entries` through [`ListState::apply_due`],
/// which always works on the current entries, never on a snapshot taken when the
/// action was issued.
#[derive(Clone, Debug)]
pub(crate) struct ListState<R> {
    phase: ListPhase,
    entries: Vec<R>,
    keys: Vec<String>,
    pending: Vec<PendingMutation>,
    next_seq: u64,
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self {
            phase: ListPhase::Loading,
            entries: Vec::new(),
            keys: Vec::new(),
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<R: Entity> ListState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.phase {
            ListPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn entries(&self) -> &[R] {
        &self.entries
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[PendingMutation] {
        &self.pending
    }

    pub fn begin_load(&mut self) {
        self.phase = ListPhase::Loading;
    }

    pub fn apply_loaded(&mut self, result: ApiResult<Listing<R>>) -> ApiResult<()> {
        match result {
            Ok(listing) => {
                self.entries = listing.entries;
                self.keys = listing.keys;
                self.phase = ListPhase::Ready;
                Ok(())
            }
            Err(e) => {
                self.phase = ListPhase::Failed(e.message.clone());
                Err(e)
            }
        }
    }

    /// Appends the server-returned entity. No dedup against a concurrent fetch.
    pub fn apply_created(&mut self, result: ApiResult<R>) -> ApiResult<()> {
        let entity = result?;
        self.entries.push(entity);
        Ok(())
    }

    /// Replaces the whole list with the search results. The load phase is left
    /// alone; a failed load stays failed until the next fetch.
    pub fn apply_search(&mut self, result: ApiResult<Vec<R>>) -> ApiResult<()> {
        self.entries = result?;
        Ok(())
    }

    pub fn confirm_delete(
        &mut self,
        result: ApiResult<()>,
        id: &str,
        apply_at_ms: i64,
    ) -> ApiResult<()> {
        result?;
        self.enqueue(id, PendingChange::Remove, apply_at_ms);
        Ok(())
    }

    pub fn confirm_update(
        &mut self,
        result: ApiResult<()>,
        id: &str,
        patch: Map<String, Value>,
        apply_at_ms: i64,
    ) -> ApiResult<()> {
        result?;
        self.enqueue(id, PendingChange::Merge(patch), apply_at_ms);
        Ok(())
    }

    fn enqueue(&mut self, id: &str, change: PendingChange, apply_at_ms: i64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingMutation {
            id: id.to_string(),
            change,
            apply_at_ms,
            seq,
        });
    }

    /// Earliest apply-after time still queued.
    #[cfg(test)]
    pub fn next_due_ms(&self) -> Option<i64> {
        self.pending.iter().map(|p| p.apply_at_ms).min()
    }

    /// Applies every queued mutation due at `now_ms`, oldest deadline first (ties in
    /// issue order). Returns how many were applied.
    pub fn apply_due(&mut self, now_ms: i64) -> usize {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.apply_at_ms <= now_ms);
        self.pending = rest;

        due.sort_by_key(|p| (p.apply_at_ms, p.seq));
        let applied = due.len();
        for mutation in due {
            self.apply_one(mutation);
        }
        applied
    }

    fn apply_one(&mut self, mutation: PendingMutation) {
        match mutation.change {
            PendingChange::Remove => {
                self.entries.retain(|e| e.id() != mutation.id);
                log::debug!("{}: removed {}", R::KIND, mutation.id);
            }
            PendingChange::Merge(patch) => {
                for entry in self.entries.iter_mut().filter(|e| e.id() == mutation.id) {
                    match merge_patch(entry, &patch) {
                        Ok(merged) => *entry = merged,
                        Err(e) => log::warn!("{}: could not merge {}: {e}", R::KIND, mutation.id),
                    }
                }
                log::debug!("{}: merged {}", R::KIND, mutation.id);
            }
        }
    }
}

/// Shallow merge at the JSON level. The id never changes through a patch.
pub(crate) fn merge_patch<R: Entity>(
    entity: &R,
    patch: &Map<String, Value>,
) -> Result<R, serde_json::Error> {
    let mut value = serde_json::to_value(entity)?;
    if let Value::Object(obj) = &mut value {
        for (k, v) in patch {
            if k == "id" || k == "_id" {
                continue;
            }
            obj.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiErrorKind};
    use crate::models::{Item, Room};
    use serde_json::json;

    const DELETE_DELAY: i64 = 1000;
    const UPDATE_DELAY: i64 = 500;

    fn room(id: u32, name: &str) -> Room {
        serde_json::from_value(json!({"id": id, "name": name})).expect("room")
    }

    fn ids(state: &ListState<Room>) -> Vec<String> {
        state.entries().iter().map(|r| r.id.clone()).collect()
    }

    fn ready(rooms: Vec<Room>) -> ListState<Room> {
        let mut state = ListState::new();
        state
            .apply_loaded(Ok(Listing {
                entries: rooms,
                keys: Vec::new(),
            }))
            .expect("load");
        state
    }

    fn patch(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("patch must be an object"),
        }
    }

    #[test]
    fn test_starts_loading_then_ready() {
        let mut state: ListState<Room> = ListState::new();
        assert!(state.is_loading());
        state
            .apply_loaded(Ok(Listing {
                entries: vec![room(1, "A")],
                keys: vec!["name".to_string()],
            }))
            .unwrap();
        assert_eq!(state.phase(), &ListPhase::Ready);
        assert_eq!(state.keys(), &["name".to_string()]);
    }

    #[test]
    fn test_failed_load_keeps_message() {
        let mut state: ListState<Room> = ListState::new();
        let err = state
            .apply_loaded(Err(ApiError::server("no such room")))
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(state.load_error(), Some("no such room"));
        assert!(state.entries().is_empty());
    }

    #[test]
    fn test_create_appends_server_entity() {
        // getAll -> [{1, A}], create {name: B} resolves {2, B}
        let mut state = ready(vec![room(1, "A")]);
        state.apply_created(Ok(room(2, "B"))).unwrap();
        assert_eq!(ids(&state), vec!["1", "2"]);
        assert_eq!(state.entries()[1].name, "B");
    }

    #[test]
    fn test_create_error_leaves_list_unchanged() {
        let mut state = ready(vec![room(1, "A")]);
        let err = state
            .apply_created(Err(ApiError::server("duplicate")))
            .unwrap_err();
        assert_eq!(err.to_string(), "duplicate");
        assert_eq!(ids(&state), vec!["1"]);
        assert_eq!(state.phase(), &ListPhase::Ready);
    }

    #[test]
    fn test_delete_applies_only_after_delay() {
        let mut state = ready(vec![room(1, "A"), room(2, "B")]);
        let now = 10_000;
        state.confirm_delete(Ok(()), "1", now + DELETE_DELAY).unwrap();

        assert_eq!(state.apply_due(now), 0);
        assert_eq!(ids(&state), vec!["1", "2"]);
        assert_eq!(state.apply_due(now + DELETE_DELAY - 1), 0);
        assert_eq!(ids(&state), vec!["1", "2"]);

        assert_eq!(state.apply_due(now + DELETE_DELAY), 1);
        assert_eq!(ids(&state), vec!["2"]);
        assert!(state.pending().is_empty());
    }

    #[test]
    fn test_delete_error_queues_nothing() {
        let mut state = ready(vec![room(1, "A")]);
        let err = state
            .confirm_delete(Err(ApiError::server("locked")), "1", 0)
            .unwrap_err();
        assert_eq!(err.message, "locked");
        assert!(state.pending().is_empty());
        assert_eq!(state.apply_due(i64::MAX), 0);
        assert_eq!(ids(&state), vec!["1"]);
    }

    #[test]
    fn test_update_merges_after_delay_and_leaves_others() {
        let mut state = ready(vec![room(1, "A"), room(2, "B")]);
        state
            .confirm_update(Ok(()), "2", patch(json!({"name": "B2", "floor": 3})), UPDATE_DELAY)
            .unwrap();

        assert_eq!(state.entries()[1].name, "B");
        state.apply_due(UPDATE_DELAY);

        assert_eq!(state.entries()[0], room(1, "A"));
        assert_eq!(state.entries()[1].name, "B2");
        assert_eq!(state.entries()[1].extra["floor"], 3);
    }

    #[test]
    fn test_update_never_changes_id() {
        let mut state = ready(vec![room(1, "A")]);
        state
            .confirm_update(Ok(()), "1", patch(json!({"id": 99, "name": "Z"})), 0)
            .unwrap();
        state.apply_due(0);
        assert_eq!(ids(&state), vec!["1"]);
        assert_eq!(state.entries()[0].name, "Z");
    }

    #[test]
    fn test_unmergeable_patch_keeps_entity() {
        let mut state = ready(vec![room(1, "A")]);
        state
            .confirm_update(Ok(()), "1", patch(json!({"name": null})), 0)
            .unwrap();
        assert_eq!(state.apply_due(0), 1);
        assert_eq!(state.entries()[0], room(1, "A"));
    }

    #[test]
    fn test_item_update_merges_dynamic_fields() {
        let item: Item =
            serde_json::from_value(json!({"id": "i", "collectionId": "c", "name": "Vase"}))
                .expect("item");
        let mut state = ListState::new();
        state
            .apply_loaded(Ok(Listing {
                entries: vec![item],
                keys: vec!["name".to_string(), "year".to_string()],
            }))
            .unwrap();
        state
            .confirm_update(Ok(()), "i", patch(json!({"year": "1820"})), 5)
            .unwrap();
        state.apply_due(5);

        let merged = &state.entries()[0];
        assert_eq!(merged.field_text("name"), "Vase");
        assert_eq!(merged.field_text("year"), "1820");
        assert_eq!(merged.collection_id, "c");
    }

    #[test]
    fn test_search_replaces_entire_list() {
        let mut state = ready(vec![room(1, "A"), room(2, "B")]);
        state.apply_search(Ok(vec![room(7, "Found")])).unwrap();
        assert_eq!(ids(&state), vec!["7"]);

        state.apply_search(Ok(Vec::new())).unwrap();
        assert!(state.entries().is_empty());
    }

    #[test]
    fn test_search_keeps_failed_load_state() {
        let mut state: ListState<Room> = ListState::new();
        let _ = state.apply_loaded(Err(ApiError::server("offline")));
        state.apply_search(Ok(vec![room(7, "Found")])).unwrap();

        assert_eq!(ids(&state), vec!["7"]);
        assert_eq!(state.load_error(), Some("offline"));
    }

    #[test]
    fn test_search_error_leaves_list_unchanged() {
        let mut state = ready(vec![room(1, "A")]);
        assert!(state.apply_search(Err(ApiError::server("bad query"))).is_err());
        assert_eq!(ids(&state), vec!["1"]);
    }

    #[test]
    fn test_create_after_search_appends_to_narrowed_list() {
        let mut state = ready(vec![room(1, "A"), room(2, "B")]);
        state.apply_search(Ok(vec![room(2, "B")])).unwrap();
        state.apply_created(Ok(room(3, "C"))).unwrap();
        assert_eq!(ids(&state), vec!["2", "3"]);
    }

    #[test]
    fn test_pending_mutation_sees_latest_entries() {
        // An entity created after the delete was issued must survive it.
        let mut state = ready(vec![room(1, "A"), room(2, "B")]);
        state.confirm_delete(Ok(()), "1", DELETE_DELAY).unwrap();
        state.apply_created(Ok(room(3, "C"))).unwrap();

        state.apply_due(DELETE_DELAY);
        assert_eq!(ids(&state), vec!["2", "3"]);
    }

    #[test]
    fn test_pending_survives_reload() {
        let mut state = ready(vec![room(1, "A")]);
        state.confirm_delete(Ok(()), "1", 100).unwrap();

        state.begin_load();
        state
            .apply_loaded(Ok(Listing {
                entries: vec![room(1, "A"), room(2, "B")],
                keys: Vec::new(),
            }))
            .unwrap();
        state.apply_due(100);
        assert_eq!(ids(&state), vec!["2"]);
    }

    #[test]
    fn test_due_mutations_apply_in_deadline_then_issue_order() {
        let mut state = ready(vec![room(1, "A")]);
        state
            .confirm_update(Ok(()), "1", patch(json!({"name": "late"})), 600)
            .unwrap();
        state
            .confirm_update(Ok(()), "1", patch(json!({"name": "first"})), 500)
            .unwrap();
        state
            .confirm_update(Ok(()), "1", patch(json!({"name": "second"})), 500)
            .unwrap();

        assert_eq!(state.next_due_ms(), Some(500));
        assert_eq!(state.apply_due(1000), 3);
        assert_eq!(state.entries()[0].name, "late");
    }

    #[test]
    fn test_update_then_delete_of_same_entity() {
        let mut state = ready(vec![room(1, "A"), room(2, "B")]);
        state
            .confirm_update(Ok(()), "1", patch(json!({"name": "A2"})), UPDATE_DELAY)
            .unwrap();
        state.confirm_delete(Ok(()), "1", DELETE_DELAY).unwrap();

        state.apply_due(UPDATE_DELAY);
        assert_eq!(state.entries()[0].name, "A2");
        assert_eq!(state.next_due_ms(), Some(DELETE_DELAY));

        state.apply_due(DELETE_DELAY);
        assert_eq!(ids(&state), vec!["2"]);
        assert_eq!(state.next_due_ms(), None);
    }

    #[test]
    fn test_delete_of_unknown_id_is_noop() {
        let mut state = ready(vec![room(1, "A")]);
        state.confirm_delete(Ok(()), "42", 0).unwrap();
        assert_eq!(state.apply_due(0), 1);
        assert_eq!(ids(&state), vec!["1"]);
    }
}
