use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use mavigo_core::navigation::initial_view;
use mavigo_core::ClientConfig;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::components::nav::Nav;
use crate::components::toast_host::ToastHost;
use crate::context::{use_app, AppContext};
use crate::pages::auth::AuthPage;
use crate::pages::eco_score::EcoScorePage;
use crate::pages::journey::JourneyPage;
use crate::pages::tasks::TasksPage;
use crate::theme::{apply_theme, ThemeContext};

/// Backend origin baked in at build time; unset means same-origin.
fn client_config() -> ClientConfig {
    ClientConfig::from_base_url(option_env!("MAVIGO_API_BASE_URL")).unwrap_or_else(|err| {
        warn!(error = %err, "falling back to same-origin API");
        ClientConfig::default()
    })
}

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(client_config());
    let theme = RwSignal::new(ctx.client.settings().theme());
    provide_context(ctx.clone());
    provide_context(ThemeContext { theme });

    let (restoring, set_restoring) = signal(true);

    // Restore the stored session once on mount
    let restore = ctx.clone();
    Effect::new(move |_| {
        let ctx = restore.clone();
        spawn_local(async move {
            ctx.client.restore_session(&ctx.state).await;
            set_restoring.set(false);
        });
    });

    // Apply and persist the theme whenever it changes
    let settings_ctx = ctx.clone();
    Effect::new(move |_| {
        let t = theme.get();
        apply_theme(t);
        settings_ctx.client.settings().set_theme(t);
    });

    let state = ctx.state;
    let logged_in = move || state.with(|s| s.is_logged_in());

    view! {
        <Router>
            <div class="app-layout">
                <Nav />
                <main class="content">
                    <Show
                        when=move || !restoring.get()
                        fallback=|| view! { <p class="loading">"Loading\u{2026}"</p> }
                    >
                        <Show when=logged_in fallback=|| view! { <AuthPage /> }>
                            <Routes fallback=|| view! { <p>"Page not found"</p> }>
                                <Route path=path!("/") view=ResumeView />
                                <Route path=path!("/journey") view=JourneyPage />
                                <Route path=path!("/tasks") view=TasksPage />
                                <Route path=path!("/eco-score") view=EcoScorePage />
                            </Routes>
                        </Show>
                    </Show>
                </main>
                <ToastHost />
            </div>
        </Router>
    }
}

/// `/` lands on the view the user had open last.
#[component]
fn ResumeView() -> impl IntoView {
    let ctx = use_app();
    let view = initial_view("/", ctx.client.settings().last_view());
    view! { <Redirect path=view.path() /> }
}
