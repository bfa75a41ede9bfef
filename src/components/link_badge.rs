//! Google Tasks link status and the OAuth popup flow.
//!
//! The popup posts `{type: "GOOGLE_TASKS_LINKED"}` back when the account is
//! linked. A poll notices when the user closes it instead. Whichever comes
//! first settles the [`LinkWatch`]; the follow-up runs from a fresh task so
//! the listener and timer are never torn down from inside their own callback.

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use mavigo_core::google_link::{is_trusted_origin, link_url, LinkOutcome, LinkWatch};
use mavigo_core::toast::ToastSpec;
use mavigo_core::{ErrorContext, StateHandle};
use serde_json::Value;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{MessageEvent, Window};

use crate::context::{use_app, AppContext};

const POPUP_NAME: &str = "mavigo-google-link";
const POPUP_FEATURES: &str = "width=520,height=640";

struct LinkSession {
    watch: LinkWatch,
    popup: Option<Window>,
    listener: Closure<dyn FnMut(MessageEvent)>,
    _poll: Interval,
}

impl LinkSession {
    fn popup_closed(&self) -> bool {
        self.popup.as_ref().map(|p| p.closed().unwrap_or(true)).unwrap_or(true)
    }
}

impl Drop for LinkSession {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                "message",
                self.listener.as_ref().unchecked_ref(),
            );
        }
    }
}

type SessionSlot = StoredValue<Option<LinkSession>, LocalStorage>;

/// Ends the session (if still open) and runs the follow-up for `outcome`.
fn settle(ctx: AppContext, slot: SessionSlot, outcome: LinkOutcome, set_linking: WriteSignal<bool>) {
    spawn_local(async move {
        let session = slot.try_update_value(Option::take).flatten();
        drop(session);
        set_linking.set(false);
        debug!(?outcome, "google link flow ended");

        match ctx.client.finish_google_link(&ctx.state, outcome).await {
            Ok(true) => ctx.toast(ToastSpec::success("Google Tasks linked")),
            Ok(false) if outcome == LinkOutcome::TimedOut => {
                ctx.toast(ToastSpec::warning("Google sign-in timed out"))
            }
            Ok(false) => {}
            Err(err) => ctx.error(&err, ErrorContext::Tasks),
        }
    });
}

#[component]
pub fn LinkBadge() -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let (linking, set_linking) = signal(false);
    let slot: SessionSlot = StoredValue::new_local(None);

    let linked = move || state.with(|s| s.user.as_ref().is_some_and(|u| u.is_google_linked()));

    let start_ctx = ctx.clone();
    let start = move |_: leptos::ev::MouseEvent| {
        let ctx = start_ctx.clone();
        let Some(user_id) = ctx.state.read(|s| s.user_id().map(str::to_string)) else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        if slot.with_value(Option::is_some) {
            return;
        }

        let url = link_url(ctx.client.config(), &user_id);
        let popup = window
            .open_with_url_and_target_and_features(&url, POPUP_NAME, POPUP_FEATURES)
            .ok()
            .flatten();
        if popup.is_none() {
            warn!("google link popup was blocked");
            ctx.toast(ToastSpec::warning("Allow pop-ups to link Google Tasks"));
            return;
        }

        let watch = LinkWatch::new(ctx.client.config());
        let poll_ms = u32::try_from(watch.poll_interval().as_millis()).unwrap_or(u32::MAX);

        let message_ctx = ctx.clone();
        let page_origin = window.location().origin().unwrap_or_default();
        let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let origin = event.origin();
            if !is_trusted_origin(message_ctx.client.config(), &origin, &page_origin) {
                debug!(%origin, "ignored message from unknown origin");
                return;
            }
            let data: Value = serde_wasm_bindgen::from_value(event.data()).unwrap_or_default();
            let outcome = slot
                .try_update_value(|s| s.as_mut().and_then(|s| s.watch.on_message(&data)))
                .flatten();
            if let Some(outcome) = outcome {
                settle(message_ctx.clone(), slot, outcome, set_linking);
            }
        });
        if window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
            .is_err()
        {
            warn!("could not listen for the google link message");
        }

        let tick_ctx = ctx.clone();
        let poll = Interval::new(poll_ms, move || {
            let outcome = slot
                .try_update_value(|s| {
                    s.as_mut().and_then(|s| {
                        let closed = s.popup_closed();
                        s.watch.on_tick(closed)
                    })
                })
                .flatten();
            if let Some(outcome) = outcome {
                settle(tick_ctx.clone(), slot, outcome, set_linking);
            }
        });

        slot.set_value(Some(LinkSession {
            watch,
            popup,
            listener,
            _poll: poll,
        }));
        set_linking.set(true);
    };

    on_cleanup(move || {
        let cancelled = slot
            .try_update_value(|s| s.take().and_then(|mut s| s.watch.cancel()))
            .flatten();
        if cancelled.is_some() {
            debug!("google link flow cancelled");
        }
    });

    view! {
        <div class="link-badge">
            <Show
                when=linked
                fallback=move || {
                    view! {
                        <button
                            class="badge badge-link"
                            disabled=move || linking.get()
                            on:click=start.clone()
                        >
                            {move || {
                                if linking.get() { "Waiting for Google\u{2026}" } else { "Link Google Tasks" }
                            }}
                        </button>
                    }
                }
            >
                <span class="badge badge-linked">"\u{2713} Google Tasks linked"</span>
            </Show>
        </div>
    }
}
