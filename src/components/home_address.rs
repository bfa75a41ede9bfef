use leptos::prelude::*;
use mavigo_core::home::home_badge;
use mavigo_core::toast::ToastSpec;
use mavigo_core::{Action, ErrorContext, StateHandle};
use wasm_bindgen_futures::spawn_local;

use crate::context::use_app;

/// Badge with the saved home address, editable in place.
#[component]
pub fn HomeAddress() -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(String::new());

    let badge = move || state.with(|s| home_badge(s.user.as_ref()));

    let start_edit = move |_: leptos::ev::MouseEvent| {
        let current = state.read(|s| s.user.as_ref().and_then(|u| u.home_address.clone()));
        set_draft.set(current.unwrap_or_default());
        set_editing.set(true);
    };

    let save_ctx = ctx.clone();
    let save = move |_: leptos::ev::MouseEvent| {
        let ctx = save_ctx.clone();
        let address = draft.get_untracked();
        spawn_local(async move {
            let result = ctx
                .busy_while(
                    Action::UpdateHomeAddress,
                    ctx.client.update_home_address(&ctx.state, &address),
                )
                .await;
            match result {
                Ok(_) => {
                    set_editing.set(false);
                    ctx.toast(ToastSpec::success("Home address saved"));
                }
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
        });
    };

    let busy_ctx = ctx.clone();
    let saving = move || busy_ctx.is_busy(Action::UpdateHomeAddress);

    view! {
        <div class="home-address">
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <button
                            class=move || {
                                if badge().is_set { "badge badge-home" } else { "badge badge-home badge-empty" }
                            }
                            on:click=start_edit
                        >
                            "\u{1F3E0} "
                            {move || badge().label}
                        </button>
                    }
                }
            >
                <div class="input-row">
                    <input
                        type="text"
                        class="input"
                        placeholder="Home address"
                        prop:value=move || draft.get()
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                    />
                    <button class="btn btn-save" disabled=saving.clone() on:click=save.clone()>
                        "Save"
                    </button>
                    <button class="btn btn-secondary" on:click=move |_| set_editing.set(false)>
                        "Cancel"
                    </button>
                </div>
            </Show>
        </div>
    }
}
