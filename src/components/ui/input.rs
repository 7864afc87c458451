use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] required: bool,

    // Manual two-way wiring; `bind:value` has changed shape across Leptos releases.
    #[prop(into)] bind_value: RwSignal<String>,

    /// Extra hook run after `bind_value` is updated.
    #[prop(optional, into)] on_change: Option<Callback<String>>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none",
        "focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50",
        "disabled:cursor-not-allowed disabled:opacity-50",
        class
    );

    let on_input = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let value = input.value();
        bind_value.set(value.clone());
        if let Some(cb) = on_change {
            cb.run(value);
        }
    };

    view! {
        <input
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            required=required
            prop:value=move || bind_value.get()
            on:input=on_input
        />
    }
}
