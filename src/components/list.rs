use crate::components::ui::{Button, ButtonSize, ButtonVariant, CardItem, Input, Label};
use crate::util::fields_to_object;
use leptos::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use wasm_bindgen::JsCast;

fn input_value(ev: &web_sys::Event) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|i| i.value())
}

#[component]
pub fn SearchForm(
    #[prop(into)] placeholder: String,
    on_search: Callback<String>,
) -> impl IntoView {
    let query: RwSignal<String> = RwSignal::new(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_search.run(query.get_untracked().trim().to_string());
    };

    view! {
        <form class="flex items-center gap-2" on:submit=on_submit>
            <Input r#type="search" placeholder=placeholder bind_value=query />
            <Button size=ButtonSize::Sm>"Search"</Button>
        </form>
    }
}

/// Create form whose inputs are generated from a list of field names.
#[component]
pub fn FieldsForm(
    #[prop(into)] fields: Signal<Vec<String>>,
    #[prop(into)] submit_label: String,
    on_submit: Callback<Map<String, Value>>,
) -> impl IntoView {
    let values: RwSignal<BTreeMap<String, String>> = RwSignal::new(BTreeMap::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let body = values.with_untracked(|v| {
            fields_to_object(v.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        });
        if body.is_empty() {
            return;
        }
        values.set(BTreeMap::new());
        on_submit.run(body);
    };

    view! {
        <form class="flex flex-col gap-3" on:submit=submit>
            <For
                each=move || fields.get()
                key=|field| field.clone()
                children=move |field| {
                    let input_id = format!("field-{field}");
                    let label_text = field.clone();
                    let read_key = field.clone();
                    let write_key = field.clone();
                    view! {
                        <div class="flex flex-col gap-2">
                            <Label html_for=input_id.clone()>{label_text}</Label>
                            <input
                                id=input_id
                                class="border-input flex h-9 w-full rounded-md border bg-transparent px-3 py-1 text-sm"
                                placeholder=field
                                prop:value=move || {
                                    values.with(|v| v.get(&read_key).cloned().unwrap_or_default())
                                }
                                on:input=move |ev| {
                                    if let Some(value) = input_value(&ev) {
                                        values.update(|v| {
                                            v.insert(write_key.clone(), value);
                                        });
                                    }
                                }
                            />
                        </div>
                    }
                }
            />
            <Button class="w-full">{submit_label}</Button>
        </form>
    }
}

/// One list row with open / inline edit / delete actions.
///
/// `fields` are the editable `(key, current value)` pairs; only changed values are
/// passed to `on_save`.
#[component]
pub fn EntityRow(
    #[prop(into)] label: String,
    fields: Vec<(String, String)>,
    #[prop(optional)] on_open: Option<Callback<()>>,
    on_save: Callback<Map<String, Value>>,
    on_delete: Callback<()>,
) -> impl IntoView {
    let editing: RwSignal<bool> = RwSignal::new(false);
    let original = StoredValue::new(fields.clone());
    let draft: RwSignal<BTreeMap<String, String>> =
        RwSignal::new(fields.iter().cloned().collect());

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let changed: Map<String, Value> = original.with_value(|orig| {
            draft.with_untracked(|d| {
                orig.iter()
                    .filter_map(|(k, old)| {
                        let new = d.get(k)?.trim();
                        (new != old.as_str()).then(|| (k.clone(), Value::String(new.to_string())))
                    })
                    .collect()
            })
        });
        editing.set(false);
        if !changed.is_empty() {
            on_save.run(changed);
        }
    };

    let title = match on_open {
        Some(open) => view! {
            <button
                type="button"
                class="text-sm font-medium text-primary hover:underline"
                on:click=move |_| open.run(())
            >
                {label}
            </button>
        }
        .into_any(),
        None => view! { <span class="text-sm font-medium">{label}</span> }.into_any(),
    };

    view! {
        <CardItem class="flex-col items-stretch">
            <div class="flex items-center justify-between gap-2">
                {title}
                <div class="flex items-center gap-1">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| editing.update(|e| *e = !*e)
                    >
                        {move || if editing.get() { "Cancel" } else { "Edit" }}
                    </Button>
                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        on:click=move |_| on_delete.run(())
                    >
                        "Delete"
                    </Button>
                </div>
            </div>

            <Show when=move || editing.get() fallback=|| ()>
                <form class="mt-2 flex flex-col gap-2" on:submit=save>
                    {original
                        .get_value()
                        .into_iter()
                        .map(|(key, _)| {
                            let read_key = key.clone();
                            let write_key = key.clone();
                            view! {
                                <input
                                    class="border-input flex h-8 w-full rounded-md border bg-transparent px-3 text-sm"
                                    placeholder=key
                                    prop:value=move || {
                                        draft.with(|d| d.get(&read_key).cloned().unwrap_or_default())
                                    }
                                    on:input=move |ev| {
                                        if let Some(value) = input_value(&ev) {
                                            draft.update(|d| {
                                                d.insert(write_key.clone(), value);
                                            });
                                        }
                                    }
                                />
                            }
                        })
                        .collect_view()}
                    <Button size=ButtonSize::Sm>"Save"</Button>
                </form>
            </Show>
        </CardItem>
    }
}
