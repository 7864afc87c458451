mod auth;
mod collections;
mod items;
mod museum;

pub use auth::{ForgotPasswordPage, LoginPage, RegisterPage};
pub use collections::CollectionsPage;
pub use items::ItemsPage;
pub use museum::MuseumPage;

use crate::api::ApiResult;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, ErrorAlert, Spinner};
use crate::models::Entity;
use crate::state::AppState;
use crate::sync::ListController;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use serde_json::{Map, Value};
use std::future::Future;

/// List + inline error wiring shared by the rooms, collections and items views.
pub(crate) struct ListPage<R: Entity> {
    state: AppState,
    list: ListController<R>,
    error: RwSignal<Option<String>>,
}

impl<R: Entity> Clone for ListPage<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Entity> Copy for ListPage<R> {}

impl<R: Entity> ListPage<R> {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            list: ListController::new(&state.config()),
            error: RwSignal::new(None),
        }
    }

    fn spawn(&self, action: impl Future<Output = ApiResult<()>> + 'static) {
        let error = self.error;
        error.set(None);
        spawn_local(async move {
            if let Err(e) = action.await {
                error.try_set(Some(e.message));
            }
        });
    }

    /// Loads the list; an unauthorized answer ends the session.
    pub fn load(&self, parent_id: String) {
        let (state, list, service) = (self.state, self.list, self.state.service::<R>());
        self.error.set(None);
        spawn_local(async move {
            if let Err(e) = list.load(service.get_all(&parent_id)).await {
                if e.is_unauthorized() {
                    state.sign_out();
                }
            }
        });
    }

    pub fn create(&self, body: Map<String, Value>) {
        let (list, service) = (self.list, self.state.service::<R>());
        self.spawn(async move {
            let body = Value::Object(body);
            list.create(service.create(&body)).await
        });
    }

    pub fn search(&self, query: String, scope_id: String) {
        let (list, service) = (self.list, self.state.service::<R>());
        self.spawn(async move { list.search(service.search(&query, &scope_id)).await });
    }

    pub fn save(&self, id: String, patch: Map<String, Value>) {
        let (list, service) = (self.list, self.state.service::<R>());
        self.spawn(async move {
            let request = service.update(&id, &patch);
            list.update(&id, patch.clone(), request).await
        });
    }

    pub fn delete(&self, id: String) {
        let (list, service) = (self.list, self.state.service::<R>());
        self.spawn(async move { list.delete(&id, service.delete(&id)).await });
    }

    pub fn entries(&self) -> Vec<R> {
        self.list.entries()
    }

    pub fn keys(&self) -> Vec<String> {
        self.list.keys()
    }

    pub fn error(&self) -> RwSignal<Option<String>> {
        self.error
    }

    /// Loading spinner, load failure, or the empty-list hint.
    pub fn status_view(&self, empty_text: &'static str) -> impl IntoView {
        let list = self.list;
        move || {
            if list.is_loading() {
                view! {
                    <div class="flex items-center gap-2 text-xs text-muted-foreground">
                        <Spinner />
                        "Loading..."
                    </div>
                }
                .into_any()
            } else if let Some(message) = list.load_error() {
                view! { <ErrorAlert message=Signal::derive(move || Some(message.clone())) /> }
                    .into_any()
            } else if list.entries().is_empty() {
                view! { <div class="text-xs text-muted-foreground">{empty_text}</div> }.into_any()
            } else {
                ().into_any()
            }
        }
    }
}

/// Renders `children` only with a session; otherwise back to the login view.
#[component]
pub fn RequireAuth(state: AppState, children: ChildrenFn) -> impl IntoView {
    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show
            when=move || state.is_authenticated()
            fallback=|| view! { <Redirect path="/" /> }
        >
            {move || children.with_value(|c| c())}
        </Show>
    }
}

/// Title bar with the signed-in user and a sign-out button; `children` go on the right.
#[component]
pub fn PageHeader(
    state: AppState,
    #[prop(into)] title: Signal<String>,
    children: Children,
) -> impl IntoView {
    let user_name = move || {
        state
            .session()
            .with(|s| s.user.as_ref().map(|u| u.display_name()))
            .unwrap_or_default()
    };

    view! {
        <div class="mb-4 flex items-center justify-between">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">{move || title.get()}</h1>
                <p class="text-xs text-muted-foreground">{user_name}</p>
            </div>
            <div class="flex items-center gap-2">
                {children()}
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| state.sign_out()
                >
                    "Sign Out"
                </Button>
            </div>
        </div>
    }
}
