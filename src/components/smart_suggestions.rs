use chrono::Local;
use leptos::prelude::*;
use mavigo_core::journey::ops::PlanForm;
use mavigo_core::models::Suggestion;
use mavigo_core::suggestions::{plan_form_for, suggestion_message};
use mavigo_core::tasks::{task_gate, TaskGate};
use mavigo_core::StateHandle;
use tracing::debug;
use wasm_bindgen_futures::spawn_local;

use crate::context::use_app;

/// Today's task-driven trip ideas. Only shown once Google Tasks is linked.
#[component]
pub fn SmartSuggestions(on_plan: Callback<PlanForm>) -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;

    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        let ctx = load_ctx.clone();
        if !matches!(task_gate(&ctx.state.snapshot()), TaskGate::Ready(_)) {
            return;
        }
        spawn_local(async move {
            let today = Local::now().date_naive();
            // Suggestions are optional; a failure just leaves the list empty.
            if let Err(err) = ctx.client.load_suggestions(&ctx.state, today).await {
                debug!(error = %err, "suggestions unavailable");
            }
        });
    });

    let row_ctx = ctx.clone();
    let rows = move || {
        let ctx = row_ctx.clone();
        state
            .with(|s| s.suggestions.clone())
            .into_iter()
            .map(|suggestion: Suggestion| {
                let message = suggestion_message(&suggestion);
                let task_id = suggestion.task_id.clone();
                let ctx = ctx.clone();
                let plan = move |_| {
                    let form = state.read(|s| plan_form_for(&suggestion, s.user.as_ref()));
                    on_plan.run(form);
                };
                let dismiss = move |_| ctx.client.dismiss_suggestion(&ctx.state, &task_id);
                view! {
                    <li class="suggestion">
                        <span class="suggestion-message">{message}</span>
                        <button class="btn btn-small" on:click=plan>"Plan"</button>
                        <button class="btn btn-small btn-secondary" on:click=dismiss>
                            "Dismiss"
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <Show when=move || state.with(|s| !s.suggestions.is_empty())>
            <section class="suggestions">
                <h4>"Suggestions for today"</h4>
                <ul>{rows.clone()}</ul>
            </section>
        </Show>
    }
}
