use crate::models::User;

pub(crate) const TOKEN_KEY: &str = "museum_token";
pub(crate) const USER_KEY: &str = "museum_user";

/// Persistent home of the auth token (and the user snapshot that goes with it).
///
/// Nothing here expires on its own; a stale token only shows up as `Unauthorized`
/// from the backend.
pub(crate) trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);

    fn user(&self) -> Option<User>;
    fn set_user(&self, user: &User);

    /// Drops both the token and the user snapshot.
    fn clear(&self);
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// `localStorage`-backed store; survives reloads, scoped to the origin.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn get(&self) -> Option<String> {
        local_storage()
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
            .filter(|t| !t.trim().is_empty())
    }

    fn set(&self, token: &str) {
        if let Some(storage) = local_storage() {
            if storage.set_item(TOKEN_KEY, token).is_err() {
                log::warn!("could not persist auth token");
            }
        }
    }

    fn user(&self) -> Option<User> {
        let json = local_storage()?.get_item(USER_KEY).ok().flatten()?;
        serde_json::from_str(&json).ok()
    }

    fn set_user(&self, user: &User) {
        if let Ok(json) = serde_json::to_string(user) {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(USER_KEY, &json);
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryTokenStore;
    use super::*;

    #[test]
    fn test_fresh_store_has_no_token() {
        let store = MemoryTokenStore::default();
        assert!(store.get().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_token_survives_until_clear() {
        let store = MemoryTokenStore::default();
        store.set("t1");
        assert_eq!(store.get().as_deref(), Some("t1"));
        assert_eq!(store.get().as_deref(), Some("t1"));

        store.set("t2");
        assert_eq!(store.get().as_deref(), Some("t2"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clear_drops_user_snapshot() {
        let store = MemoryTokenStore::default();
        let user: User = serde_json::from_str(r#"{"id": 1, "email": "a@b.c"}"#).expect("user");
        store.set_user(&user);
        assert_eq!(store.user(), Some(user));
        store.clear();
        assert!(store.user().is_none());
    }
}
