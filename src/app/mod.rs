use crate::api::EnvConfig;
use crate::pages::{
    CollectionsPage, ForgotPasswordPage, ItemsPage, LoginPage, MuseumPage, RegisterPage,
    RequireAuth,
};
use crate::state::AppState;
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App(config: EnvConfig) -> impl IntoView {
    let state = AppState::new(config);

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks (`use_navigate`, `<Redirect>`) require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <Redirect path="/" /> }>
                <Route path=path!("") view=move || view! { <LoginPage state=state /> } />
                <Route path=path!("register") view=move || view! { <RegisterPage state=state /> } />
                <Route
                    path=path!("forgotpassword")
                    view=move || view! { <ForgotPasswordPage state=state /> }
                />
                <Route path=path!("museum") view=move || view! {
                    <RequireAuth state=state>
                        <MuseumPage state=state />
                    </RequireAuth>
                } />
                <Route path=path!("collections") view=move || view! {
                    <RequireAuth state=state>
                        <CollectionsPage state=state />
                    </RequireAuth>
                } />
                <Route path=path!("items") view=move || view! {
                    <RequireAuth state=state>
                        <ItemsPage state=state />
                    </RequireAuth>
                } />
            </Routes>
        </Router>
    }
}
