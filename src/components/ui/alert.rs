use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-md border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm leading-relaxed"}
}

pub use components::*;

/// Inline message for a failed action; renders nothing while `message` is `None`.
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|m| {
            view! {
                <Alert class="border-destructive/30">
                    <AlertDescription class="text-destructive">{m}</AlertDescription>
                </Alert>
            }
        })
    }
}
