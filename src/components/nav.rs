use leptos::prelude::*;
use mavigo_core::View;

use crate::components::user_dropdown::UserDropdown;
use crate::context::use_app;
use crate::theme::{next_theme, theme_icon, ThemeContext};

#[component]
pub fn Nav() -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let theme = expect_context::<ThemeContext>().theme;
    let logged_in = move || state.with(|s| s.is_logged_in());

    view! {
        <nav class="topbar">
            <div class="topbar-brand">
                <h1 class="topbar-title">"Mavigo"</h1>
            </div>
            <Show when=logged_in>
                <ul class="nav-list">
                    {View::ALL
                        .into_iter()
                        .map(|view| {
                            let class = move || {
                                if state.with(|s| s.view) == view {
                                    "nav-link active"
                                } else {
                                    "nav-link"
                                }
                            };
                            view! {
                                <li class="nav-item">
                                    <a href=view.path() class=class>{view.label()}</a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </Show>
            <div class="topbar-actions">
                <button
                    class="btn btn-icon"
                    title=move || format!("Theme: {}", theme.get().as_str())
                    on:click=move |_| theme.update(|t| *t = next_theme(*t))
                >
                    {move || theme_icon(theme.get())}
                </button>
                <Show when=logged_in>
                    <UserDropdown />
                </Show>
            </div>
        </nav>
    }
}
