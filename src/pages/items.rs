use super::{ListPage, PageHeader};
use crate::components::list::{EntityRow, FieldsForm, SearchForm};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardList,
    CardTitle, ErrorAlert,
};
use crate::models::{Collection, Entity, Item};
use crate::state::AppState;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;
use serde_json::{Map, Value};

/// Field names for the create form and row editors; `name` until the listing
/// reports a schema.
fn item_fields(keys: Vec<String>) -> Vec<String> {
    let keys: Vec<String> = keys
        .into_iter()
        .filter(|k| !matches!(k.as_str(), "id" | "_id" | "collectionId" | "collectionID"))
        .collect();
    if keys.is_empty() {
        vec!["name".to_string()]
    } else {
        keys
    }
}

/// Items of the selected collection; without a selection, back to the collections view.
#[component]
pub fn ItemsPage(state: AppState) -> impl IntoView {
    let collection = Memo::new(move |_| state.selection().with(|s| s.collection.clone()));

    move || match collection.get() {
        Some(collection) => {
            view! { <CollectionItems state=state collection=collection /> }.into_any()
        }
        None => view! { <Redirect path="/collections" /> }.into_any(),
    }
}

#[component]
fn CollectionItems(state: AppState, collection: Collection) -> impl IntoView {
    let page = ListPage::<Item>::new(state);
    let navigate = StoredValue::new(use_navigate());
    let collection_id = StoredValue::new(collection.id.clone());
    let title = format!("{} Items", collection.name);
    let fields = Signal::derive(move || item_fields(page.keys()));

    Effect::new(move |_| {
        let _ = state.user_id();
        page.load(collection_id.get_value());
    });

    let on_create = Callback::new(move |mut body: Map<String, Value>| {
        body.insert(
            "collectionId".to_string(),
            Value::String(collection_id.get_value()),
        );
        page.create(body);
    });

    let on_search = Callback::new(move |query: String| {
        page.search(query, collection_id.get_value());
    });

    let rows = move || {
        let keys = fields.get();
        page.entries()
            .into_iter()
            .map(|item| {
                let id = item.id.clone();
                let delete_id = item.id.clone();
                let row_fields: Vec<(String, String)> = keys
                    .iter()
                    .map(|k| (k.clone(), item.field_text(k)))
                    .collect();
                view! {
                    <EntityRow
                        label=item.label()
                        fields=row_fields
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
                    <SearchForm placeholder="Search items" on_search=on_search />
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| navigate.with_value(|nav| nav("/collections", Default::default()))
                    >
                        "Back to Collections"
                    </Button>
                </PageHeader>

                <div class="grid gap-4 md:grid-cols-[2fr_1fr]">
                    <Card>
                        <CardHeader>
                            <CardTitle>"Items"</CardTitle>
                            <CardDescription>
                                {move || format!("{} total", page.entries().len())}
                            </CardDescription>
                        </CardHeader>
                        <CardContent class="flex flex-col gap-3">
                            <ErrorAlert message=page.error() />
                            {page.status_view("No items in this collection yet.")}
                            <CardList>{rows}</CardList>
                        </CardContent>
                    </Card>

                    <Card>
                        <CardHeader>
                            <CardTitle>"New item"</CardTitle>
                        </CardHeader>
                        <CardContent>
                            <FieldsForm fields=fields submit_label="Create item" on_submit=on_create />
                        </CardContent>
                    </Card>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_fields_fall_back_to_name() {
        assert_eq!(item_fields(vec![]), vec!["name".to_string()]);
    }

    #[test]
    fn test_item_fields_hide_identifiers() {
        let keys = ["_id", "name", "collectionId", "artist"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(item_fields(keys), vec!["name".to_string(), "artist".to_string()]);
    }
}
