use chrono::{Local, NaiveDateTime};
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use mavigo_core::format::format_clock;
use mavigo_core::journey::calculate_progress;
use mavigo_core::journey::ops::CompletionReport;
use mavigo_core::models::Journey;
use mavigo_core::toast::ToastSpec;
use mavigo_core::{Action, ErrorContext, View};
use wasm_bindgen_futures::spawn_local;

use crate::components::itinerary::Itinerary;
use crate::context::{use_app, AppContext, ToastCommand};

const PROGRESS_REFRESH_MS: u32 = 30_000;

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn announce_completion(ctx: &AppContext, report: &CompletionReport) {
    ctx.toast(ToastSpec::success("Journey completed"));
    if !report.completed_tasks.is_empty() {
        ctx.toast(ToastSpec::success(format!(
            "{} task(s) marked done",
            report.completed_tasks.len()
        )));
    }
    if report.is_partial() {
        ctx.toast(
            ToastSpec::warning(format!(
                "{} task(s) could not be marked done",
                report.failed_tasks.len()
            ))
            .with_action("Open tasks", ToastCommand::OpenView(View::Tasks)),
        );
    }
    for badge in &report.new_badges {
        ctx.toast(
            ToastSpec::success(format!("New badge: {}", badge.name))
                .important()
                .with_action("See eco-score", ToastCommand::OpenView(View::EcoScore)),
        );
    }
}

/// The journey in progress: progress bar, itinerary and its actions.
///
/// Once an action is clicked the other buttons hide and the clicked one is
/// disabled until the request settles; a failure brings them back.
#[component]
pub fn JourneyPanel(on_report_disruption: Callback<()>) -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let (locked, set_locked) = signal::<Option<Action>>(None);
    let clock = RwSignal::new(now());

    let ticker = StoredValue::new_local(Some(Interval::new(PROGRESS_REFRESH_MS, move || {
        clock.try_set(now());
    })));
    on_cleanup(move || ticker.set_value(None));

    let journey = move || state.with(|s| s.current_journey().cloned());

    let complete_ctx = ctx.clone();
    let complete = move |_: leptos::ev::MouseEvent| {
        let ctx = complete_ctx.clone();
        set_locked.set(Some(Action::CompleteJourney));
        spawn_local(async move {
            match ctx.client.complete_journey(&ctx.state).await {
                Ok(report) => announce_completion(&ctx, &report),
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
            set_locked.try_set(None);
        });
    };

    let cancel_ctx = ctx.clone();
    let cancel = move |_: leptos::ev::MouseEvent| {
        let ctx = cancel_ctx.clone();
        set_locked.set(Some(Action::CancelJourney));
        spawn_local(async move {
            match ctx.client.cancel_journey(&ctx.state, &confirm).await {
                Ok(Some(_)) => ctx.toast(ToastSpec::info("Journey cancelled")),
                Ok(None) => {}
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
            set_locked.try_set(None);
        });
    };

    let shown = move |action: Action| match locked.get() {
        Some(current) => current == action,
        None => true,
    };

    let render = move |journey: Journey| {
        let actions = journey.status.available_actions();
        let tracked = journey.clone();
        let progress = move || calculate_progress(&tracked, clock.get());
        let route_tasks = journey.tasks_on_route.clone();
        let has_route_tasks = !route_tasks.is_empty();
        let complete = complete.clone();
        let cancel = cancel.clone();

        view! {
            <section class="journey-panel">
                <header class="journey-header">
                    <span class=format!("status status-{}", journey.status.as_str().to_lowercase())>
                        {journey.status.label()}
                    </span>
                    <h3>{journey.origin_label.clone()}" \u{2192} "{journey.destination_label.clone()}</h3>
                    <p class="journey-times">
                        {format_clock(journey.planned_departure.as_deref())}
                        " \u{2013} "
                        {format_clock(journey.planned_arrival.as_deref())}
                    </p>
                </header>

                <div class="progress">
                    <div class="progress-bar" style=move || format!("width: {}%", progress())></div>
                </div>

                <Show when=move || has_route_tasks>
                    <div class="route-tasks">
                        <strong>"On your way: "</strong>
                        {route_tasks
                            .iter()
                            .map(|t| t.title.clone())
                            .collect::<Vec<_>>()
                            .join(", ")}
                    </div>
                </Show>

                <Itinerary journey=journey.clone() />

                <div class="journey-actions">
                    <Show when=move || actions.complete && shown(Action::CompleteJourney)>
                        <button
                            class="btn btn-primary"
                            disabled=move || locked.get().is_some()
                            on:click=complete.clone()
                        >
                            "Arrived"
                        </button>
                    </Show>
                    <Show when=move || actions.report_disruption && locked.get().is_none()>
                        <button
                            class="btn btn-warning"
                            on:click=move |_| on_report_disruption.run(())
                        >
                            "Report a disruption"
                        </button>
                    </Show>
                    <Show when=move || actions.cancel && shown(Action::CancelJourney)>
                        <button
                            class="btn btn-secondary"
                            disabled=move || locked.get().is_some()
                            on:click=cancel.clone()
                        >
                            "Cancel journey"
                        </button>
                    </Show>
                </div>
            </section>
        }
    };

    move || journey().map(render.clone())
}
