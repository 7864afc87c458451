use super::{ListPage, PageHeader};
use crate::components::list::{EntityRow, FieldsForm, SearchForm};
use crate::components::ui::{
    Card, CardContent, CardDescription, CardHeader, CardList, CardTitle, ErrorAlert,
};
use crate::models::{Entity, Room};
use crate::state::AppState;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

/// Rooms owned by the signed-in user.
#[component]
pub fn MuseumPage(state: AppState) -> impl IntoView {
    let page = ListPage::<Room>::new(state);
    let navigate = StoredValue::new(use_navigate());
    let owner_id = move || state.user_id().unwrap_or_default();

    // Refetch whenever the signed-in user changes.
    Effect::new(move |_| {
        page.load(owner_id());
    });

    let on_create = Callback::new(move |mut body: serde_json::Map<String, Value>| {
        body.insert("userId".to_string(), Value::String(owner_id()));
        page.create(body);
    });

    let on_search = Callback::new(move |query: String| {
        page.search(query, state.user_id().unwrap_or_default());
    });

    let rows = move || {
        page.entries()
            .into_iter()
            .map(|room| {
                let id = room.id.clone();
                let delete_id = room.id.clone();
                let label = room.label();
                let fields = vec![("name".to_string(), room.name.clone())];
                let on_open = Callback::new(move |_| {
                    state.select_room(room.clone());
                    navigate.with_value(|nav| nav("/collections", Default::default()));
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
                <PageHeader state=state title="Museum">
                    <SearchForm placeholder="Search rooms" on_search=on_search />
                </PageHeader>

                <div class="grid gap-4 md:grid-cols-[2fr_1fr]">
                    <Card>
                        <CardHeader>
                            <CardTitle>"Rooms"</CardTitle>
                            <CardDescription>
                                {move || format!("{} total", page.entries().len())}
                            </CardDescription>
                        </CardHeader>
                        <CardContent class="flex flex-col gap-3">
                            <ErrorAlert message=page.error() />
                            {page.status_view("No rooms yet.")}
                            <CardList>{rows}</CardList>
                        </CardContent>
                    </Card>

                    <Card>
                        <CardHeader>
                            <CardTitle>"New room"</CardTitle>
                        </CardHeader>
                        <CardContent>
                            <FieldsForm
                                fields=vec!["name".to_string()]
                                submit_label="Create room"
                                on_submit=on_create
                            />
                        </CardContent>
                    </Card>
                </div>
            </div>
        </div>
    }
}
