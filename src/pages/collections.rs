use super::{ListPage, PageHeader};
use crate::components::list::{EntityRow, FieldsForm, SearchForm};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardList,
    CardTitle, ErrorAlert,
};
use crate::models::{Collection, Entity, Room};
use crate::state::AppState;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;
use serde_json::{Map, Value};

/// Collections of the selected room; without a selection, back to the rooms view.
#[component]
pub fn CollectionsPage(state: AppState) -> impl IntoView {
    // Memoized so selecting a collection does not rebuild this view.
    let room = Memo::new(move |_| state.selection().with(|s| s.room.clone()));

    move || match room.get() {
        Some(room) => view! { <RoomCollections state=state room=room /> }.into_any(),
        None => view! { <Redirect path="/museum" /> }.into_any(),
    }
}

#[component]
fn RoomCollections(state: AppState, room: Room) -> impl IntoView {
    let page = ListPage::<Collection>::new(state);
    let navigate = StoredValue::new(use_navigate());
    let room_id = StoredValue::new(room.id.clone());
    let title = format!("{} Collections", room.name);

    Effect::new(move |_| {
        // Tracked so a different signed-in user refetches.
        let _ = state.user_id();
        page.load(room_id.get_value());
    });

    let on_create = Callback::new(move |mut body: Map<String, Value>| {
        body.insert("roomId".to_string(), Value::String(room_id.get_value()));
        page.create(body);
    });

    let on_search = Callback::new(move |query: String| {
        page.search(query, room_id.get_value());
    });

    let rows = move || {
        page.entries()
            .into_iter()
            .map(|collection| {
                let id = collection.id.clone();
                let delete_id = collection.id.clone();
                let label = collection.label();
                let fields = vec![("name".to_string(), collection.name.clone())];
                let on_open = Callback::new(move |_| {
                    state.select_collection(collection.clone());
                    navigate.with_value(|nav| nav("/items", Default::default()));
                });
                view! {
                    <EntityRow
                        label=label
                        fields=fields
                        on_open=on_open
                        on_save=Callback::new(move |patch| page.save(id.clone(), patch))
                        on_delete=Callback::new(move |_| page.delete(delete_id.clone()))
                    />
                }
            })
            .collect_view()
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[1080px] px-4 py-8">
                <PageHeader state=state title=title>
                    <SearchForm placeholder="Search collections" on_search=on_search />
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| navigate.with_value(|nav| nav("/museum", Default::default()))
                    >
                        "Back to Rooms"
                    </Button>
                </PageHeader>

                <div class="grid gap-4 md:grid-cols-[2fr_1fr]">
                    <Card>
                        <CardHeader>
                            <CardTitle>"Collections"</CardTitle>
                            <CardDescription>
                                {move || format!("{} total", page.entries().len())}
                            </CardDescription>
                        </CardHeader>
                        <CardContent class="flex flex-col gap-3">
                            <ErrorAlert message=page.error() />
                            {page.status_view("No collections in this room yet.")}
                            <CardList>{rows}</CardList>
                        </CardContent>
                    </Card>

                    <Card>
                        <CardHeader>
                            <CardTitle>"New collection"</CardTitle>
                        </CardHeader>
                        <CardContent>
                            <FieldsForm
                                fields=vec!["name".to_string()]
                                submit_label="Create collection"
                                on_submit=on_create
                            />
                        </CardContent>
                    </Card>
                </div>
            </div>
        </div>
    }
}
