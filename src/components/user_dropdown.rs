use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use mavigo_core::format::initials;
use mavigo_core::toast::ToastSpec;
use mavigo_core::View;

use crate::components::comfort_panel::ComfortPanel;
use crate::components::home_address::HomeAddress;
use crate::components::link_badge::LinkBadge;
use crate::context::use_app;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Closed,
    Menu,
    Comfort,
}

#[component]
pub fn UserDropdown() -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let (section, set_section) = signal(Section::Closed);
    let navigate = use_navigate();

    let label = move || {
        state.with(|s| {
            s.user
                .as_ref()
                .map(|u| initials(u.name()))
                .unwrap_or_else(|| "?".to_string())
        })
    };
    let name = move || state.with(|s| s.user.as_ref().map(|u| u.name().to_string()).unwrap_or_default());
    let email = move || state.with(|s| s.user.as_ref().map(|u| u.email.clone()).unwrap_or_default());

    let toggle = move |_| {
        set_section.update(|s| {
            *s = if *s == Section::Closed { Section::Menu } else { Section::Closed };
        })
    };

    let logout_ctx = ctx.clone();
    let logout = move |_: leptos::ev::MouseEvent| {
        logout_ctx.client.logout(&logout_ctx.state);
        set_section.set(Section::Closed);
        logout_ctx.toast(ToastSpec::info("Signed out"));
        navigate(View::Journey.path(), Default::default());
    };

    view! {
        <div class="user-dropdown">
            <button class="avatar" title=name on:click=toggle>{label}</button>
            <Show when=move || section.get() != Section::Closed>
                <div class="dropdown-menu">
                    <div class="dropdown-header">
                        <strong>{name}</strong>
                        <span class="dropdown-email">{email}</span>
                    </div>
                    <HomeAddress />
                    <LinkBadge />
                    <Show
                        when=move || section.get() == Section::Comfort
                        fallback=move || {
                            view! {
                                <button
                                    class="dropdown-item"
                                    on:click=move |_| set_section.set(Section::Comfort)
                                >
                                    "Comfort settings"
                                </button>
                            }
                        }
                    >
                        <ComfortPanel on_close=Callback::new(move |_| set_section.set(Section::Menu)) />
                    </Show>
                    <button class="dropdown-item dropdown-logout" on:click=logout.clone()>
                        "Log out"
                    </button>
                </div>
            </Show>
        </div>
    }
}
