use crate::api::RegisterRequest;
use crate::components::ui::{
    Alert, AlertDescription, Button, Card, CardContent, CardDescription, CardFooter, CardHeader,
    CardTitle, ErrorAlert, Input, Label, Spinner,
};
use crate::state::AppState;
use crate::util::password_match_message;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;

/// Delay before a freshly registered user is sent back to the login view.
const REGISTER_REDIRECT_MS: u32 = 2000;

#[component]
fn AuthShell(
    #[prop(into)] title: String,
    #[prop(into)] description: String,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-md flex-col justify-center px-4 py-12">
                <div class="mb-6">
                    <a href="/" class="text-sm font-medium text-foreground">"Museum"</a>
                    <div class="text-xs text-muted-foreground">"Rooms, collections and items."</div>
                </div>
                <Card>
                    <CardHeader>
                        <CardTitle class="text-xl">{title}</CardTitle>
                        <CardDescription>{description}</CardDescription>
                    </CardHeader>
                    {children()}
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn LoginPage(state: AppState) -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let client = state.client();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match client.login(email_val.trim(), &password_val).await {
                // The session change flips this page into a redirect to /museum.
                Ok(auth) => state.sign_in(auth),
                Err(e) => {
                    error.try_set(Some(e.message));
                }
            }
            loading.try_set(false);
        });
    };

    view! {
        <Show
            when=move || !state.is_authenticated()
            fallback=|| view! { <Redirect path="/museum" /> }
        >
            <AuthShell title="Sign in" description="Use your museum account to continue.">
                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email"</Label>
                            <Input id="email" r#type="email" placeholder="you@example.com" bind_value=email required=true />
                        </div>
                        <div class="flex flex-col gap-2">
                            <Label html_for="password">"Password"</Label>
                            <Input id="password" r#type="password" placeholder="Password" bind_value=password required=true />
                        </div>

                        <ErrorAlert message=error />

                        <Button class="w-full" attr:disabled=move || loading.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>
                <CardFooter class="justify-between text-xs text-muted-foreground">
                    <a class="text-primary underline underline-offset-4" href="/register">"Create an account"</a>
                    <a class="text-primary underline underline-offset-4" href="/forgotpassword">"Forgot password?"</a>
                </CardFooter>
            </AuthShell>
        </Show>
    }
}

#[component]
pub fn RegisterPage(state: AppState) -> impl IntoView {
    let first_name: RwSignal<String> = RwSignal::new(String::new());
    let last_name: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let match_hint: RwSignal<Option<&'static str>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let success: RwSignal<bool> = RwSignal::new(false);
    let navigate = StoredValue::new(use_navigate());

    let on_confirm_change = Callback::new(move |confirm: String| {
        match_hint.set(Some(password_match_message(
            &password.get_untracked(),
            &confirm,
        )));
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let password_val = password.get_untracked();
        if password_val != confirm_password.get_untracked() {
            error.set(Some("Passwords need to match".to_string()));
            return;
        }

        let req = RegisterRequest {
            first_name: first_name.get_untracked().trim().to_string(),
            last_name: last_name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password_val,
        };
        let client = state.client();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match client.register(&req).await {
                Ok(()) => {
                    log::info!("registered {}", req.email);
                    success.try_set(true);
                    loading.try_set(false);
                    TimeoutFuture::new(REGISTER_REDIRECT_MS).await;
                    navigate.try_with_value(|nav| nav("/", Default::default()));
                }
                Err(e) => {
                    error.try_set(Some(e.message));
                    loading.try_set(false);
                }
            }
        });
    };

    view! {
        <AuthShell title="Please register" description="Create a museum account.">
            <CardContent>
                <Show
                    when=move || !success.get()
                    fallback=|| view! {
                        <Alert>
                            <AlertDescription>"New Account Created"</AlertDescription>
                        </Alert>
                    }
                >
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <div class="grid grid-cols-2 gap-3">
                            <div class="flex flex-col gap-2">
                                <Label html_for="first_name">"First name"</Label>
                                <Input id="first_name" placeholder="First Name" bind_value=first_name required=true />
                            </div>
                            <div class="flex flex-col gap-2">
                                <Label html_for="last_name">"Last name"</Label>
                                <Input id="last_name" placeholder="Last Name" bind_value=last_name required=true />
                            </div>
                        </div>
                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email"</Label>
                            <Input id="email" r#type="email" placeholder="Email" bind_value=email required=true />
                        </div>
                        <div class="flex flex-col gap-2">
                            <Label html_for="password">"Password"</Label>
                            <Input id="password" r#type="password" placeholder="Password" bind_value=password required=true />
                        </div>
                        <div class="flex flex-col gap-2">
                            <Label html_for="confirm_password">"Confirm password"</Label>
                            <Input
                                id="confirm_password"
                                r#type="password"
                                placeholder="Confirm Password"
                                bind_value=confirm_password
                                on_change=on_confirm_change
                                required=true
                            />
                            <div class="text-xs text-muted-foreground">
                                {move || match_hint.get().unwrap_or_default()}
                            </div>
                        </div>

                        <ErrorAlert message=error />

                        <Button class="w-full" attr:disabled=move || loading.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Registering..." } else { "Complete Registration" }}
                            </span>
                        </Button>
                    </form>
                </Show>
            </CardContent>
            <CardFooter class="text-xs text-muted-foreground">
                "Already have an account? "
                <a class="text-primary underline underline-offset-4" href="/">"Login"</a>
            </CardFooter>
        </AuthShell>
    }
}

#[component]
pub fn ForgotPasswordPage(state: AppState) -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let sent: RwSignal<bool> = RwSignal::new(false);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email_val = email.get_untracked().trim().to_string();
        if email_val.is_empty() || loading.get_untracked() {
            return;
        }
        let client = state.client();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match client.forgot_password(&email_val).await {
                Ok(()) => {
                    sent.try_set(true);
                }
                Err(e) => {
                    error.try_set(Some(e.message));
                }
            }
            loading.try_set(false);
        });
    };

    view! {
        <AuthShell title="Forgot password" description="We will email you a link to reset it.">
            <CardContent>
                <Show
                    when=move || !sent.get()
                    fallback=|| view! {
                        <Alert>
                            <AlertDescription>"Check your email for a reset link."</AlertDescription>
                        </Alert>
                    }
                >
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email"</Label>
                            <Input id="email" r#type="email" placeholder="you@example.com" bind_value=email required=true />
                        </div>
                        <ErrorAlert message=error />
                        <Button class="w-full" attr:disabled=move || loading.get()>"Send reset link"</Button>
                    </form>
                </Show>
            </CardContent>
            <CardFooter class="text-xs text-muted-foreground">
                <a class="text-primary underline underline-offset-4" href="/">"Back to login"</a>
            </CardFooter>
        </AuthShell>
    }
}
