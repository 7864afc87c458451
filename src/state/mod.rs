use crate::api::{ApiClient, AuthResponse, EnvConfig, ResourceService};
use crate::models::{Collection, Entity, Room, User};
use crate::storage::{BrowserTokenStore, TokenStore};
use leptos::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    /// Rebuilds the session persisted by an earlier page load. A user snapshot without
    /// a token is ignored.
    pub fn restore(store: &impl TokenStore) -> Self {
        match store.get() {
            Some(token) => Self {
                user: store.user(),
                token: Some(token),
            },
            None => Self::default(),
        }
    }

    pub fn sign_in(store: &impl TokenStore, auth: AuthResponse) -> Self {
        store.set(&auth.token);
        store.set_user(&auth.user);
        Self {
            user: Some(auth.user),
            token: Some(auth.token),
        }
    }

    pub fn sign_out(store: &impl TokenStore) -> Self {
        store.clear();
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_id(&self) -> Option<String> {
        self.user.as_ref().map(|u| u.id.clone())
    }
}

/// Where the user is in the room → collection → item hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Selection {
    pub room: Option<Room>,
    pub collection: Option<Collection>,
}

impl Selection {
    pub fn with_room(room: Room) -> Self {
        Self {
            room: Some(room),
            collection: None,
        }
    }

    pub fn with_collection(self, collection: Collection) -> Self {
        Self {
            room: self.room,
            collection: Some(collection),
        }
    }
}

/// Session, navigation selection and configuration for one tab.
///
/// Created once in `App` and handed to every page as a prop; pages only change it
/// through the methods below.
#[derive(Clone, Copy)]
pub(crate) struct AppState {
    session: RwSignal<Session>,
    selection: RwSignal<Selection>,
    config: StoredValue<EnvConfig>,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        let session = Session::restore(&BrowserTokenStore);
        if session.is_authenticated() {
            log::info!("restored session from storage");
        }
        Self {
            session: RwSignal::new(session),
            selection: RwSignal::new(Selection::default()),
            config: StoredValue::new(config),
        }
    }

    pub fn session(&self) -> ReadSignal<Session> {
        self.session.read_only()
    }

    pub fn selection(&self) -> ReadSignal<Selection> {
        self.selection.read_only()
    }

    pub fn config(&self) -> EnvConfig {
        self.config.get_value()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated())
    }

    /// Tracked: effects reading this rerun when the signed-in user changes.
    pub fn user_id(&self) -> Option<String> {
        self.session.with(|s| s.user_id())
    }

    pub fn client(&self) -> ApiClient {
        let token = self.session.with_untracked(|s| s.token.clone());
        ApiClient::new(self.config.with_value(|c| c.api_url.clone())).with_token(token)
    }

    pub fn service<R: Entity>(&self) -> ResourceService<R> {
        ResourceService::new(self.client())
    }

    pub fn sign_in(&self, auth: AuthResponse) {
        log::info!("signed in as {}", auth.user.display_name());
        self.session.set(Session::sign_in(&BrowserTokenStore, auth));
        self.selection.set(Selection::default());
    }

    pub fn sign_out(&self) {
        self.session.set(Session::sign_out(&BrowserTokenStore));
        self.selection.set(Selection::default());
        log::info!("signed out");
    }

    pub fn select_room(&self, room: Room) {
        self.selection.set(Selection::with_room(room));
    }

    pub fn select_collection(&self, collection: Collection) {
        self.selection.update(|s| *s = s.clone().with_collection(collection));
    }
}
