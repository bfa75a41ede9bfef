use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use mavigo_core::models::RegisterForm;
use mavigo_core::{Action, ErrorContext, View};
use wasm_bindgen_futures::spawn_local;

use crate::context::use_app;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

/// Login and sign-up. Errors stay inline under the form.
#[component]
pub fn AuthPage() -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();
    let (mode, set_mode) = signal(Mode::Login);
    let (display_name, set_display_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (home_address, set_home_address) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let submit_ctx = ctx.clone();
    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        let ctx = submit_ctx.clone();
        let navigate = navigate.clone();
        let current = mode.get_untracked();
        let email = email.get_untracked();
        let password = password.get_untracked();
        let form = RegisterForm {
            display_name: display_name.get_untracked(),
            email: email.clone(),
            password: password.clone(),
            home_address: Some(home_address.get_untracked()),
        };
        spawn_local(async move {
            let result = match current {
                Mode::Login => {
                    ctx.busy_while(Action::Login, ctx.client.login(&ctx.state, &email, &password))
                        .await
                }
                Mode::Register => {
                    ctx.busy_while(Action::Register, ctx.client.register(&ctx.state, &form))
                        .await
                }
            };
            match result {
                Ok(_) => navigate(View::Tasks.path(), Default::default()),
                Err(err) => set_error.set(Some(err.user_message(ErrorContext::Session))),
            }
        });
    };

    let busy_ctx = ctx.clone();
    let submitting = move || busy_ctx.is_busy(Action::Login) || busy_ctx.is_busy(Action::Register);
    let registering = move || mode.get() == Mode::Register;

    view! {
        <div class="page auth-page">
            <h2>{move || if registering() { "Create your account" } else { "Sign in" }}</h2>
            <form class="auth-form" on:submit=submit>
                <Show when=registering>
                    <div class="form-group">
                        <label for="display-name">"Name"</label>
                        <input
                            id="display-name"
                            type="text"
                            class="input"
                            prop:value=move || display_name.get()
                            on:input=move |ev| set_display_name.set(event_target_value(&ev))
                        />
                    </div>
                </Show>
                <div class="form-group">
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        class="input"
                        autocomplete="username"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        class="input"
                        autocomplete=move || if registering() { "new-password" } else { "current-password" }
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                <Show when=registering>
                    <div class="form-group">
                        <label for="home-address">"Home address (optional)"</label>
                        <input
                            id="home-address"
                            type="text"
                            class="input"
                            prop:value=move || home_address.get()
                            on:input=move |ev| set_home_address.set(event_target_value(&ev))
                        />
                    </div>
                </Show>

                <Show when=move || error.get().is_some()>
                    <p class="form-error">{move || error.get().unwrap_or_default()}</p>
                </Show>

                <button type="submit" class="btn btn-primary" disabled=submitting>
                    {move || if registering() { "Sign up" } else { "Sign in" }}
                </button>
            </form>
            <button
                class="link"
                on:click=move |_| {
                    set_error.set(None);
                    set_mode.update(|m| {
                        *m = if *m == Mode::Login { Mode::Register } else { Mode::Login };
                    });
                }
            >
                {move || {
                    if registering() { "Already have an account? Sign in" } else { "New here? Create an account" }
                }}
            </button>
        </div>
    }
}
