use chrono::Local;
use leptos::prelude::*;
use mavigo_core::comfort::{comfort_summary, should_prompt_comfort};
use mavigo_core::format::format_clock;
use mavigo_core::journey::ops::PlanForm;
use mavigo_core::models::Journey;
use mavigo_core::toast::ToastSpec;
use mavigo_core::{Action, ErrorContext, View};
use tracing::debug;
use wasm_bindgen_futures::spawn_local;

use crate::components::disruption_modal::DisruptionModal;
use crate::components::itinerary::Itinerary;
use crate::components::journey_panel::JourneyPanel;
use crate::components::smart_suggestions::SmartSuggestions;
use crate::context::{use_app, AppContext, ToastCommand};

fn default_departure() -> String {
    Local::now().format("%Y-%m-%dT%H:%M").to_string()
}

/// While one card is starting, only its own Start button stays on screen.
fn start_button_shown(starting: Option<&str>, journey_id: &str) -> bool {
    match starting {
        Some(pending) => pending == journey_id,
        None => true,
    }
}

fn start(ctx: AppContext, journey_id: String, starting: RwSignal<Option<String>>) {
    if starting.get_untracked().is_some() {
        return;
    }
    starting.set(Some(journey_id.clone()));
    spawn_local(async move {
        let result = ctx
            .busy_while(
                Action::StartJourney,
                ctx.client.start_journey(&ctx.state, &journey_id),
            )
            .await;
        starting.try_set(None);
        match result {
            Ok(outcome) => {
                ctx.toast(ToastSpec::success("Journey started"));
                if let Some(notice) = outcome.route_notice {
                    ctx.toast(
                        ToastSpec::info(notice.message)
                            .important()
                            .with_action("See tasks", ToastCommand::OpenView(View::Tasks)),
                    );
                }
            }
            Err(err) => ctx.error(&err, ErrorContext::General),
        }
    });
}

#[component]
fn ResultCard(journey: Journey, starting: RwSignal<Option<String>>) -> impl IntoView {
    let ctx = use_app();
    let journey_id = journey.journey_id.clone();
    let shown_id = journey.journey_id.clone();
    let included = journey.included_tasks.len();
    let shown = move || starting.with(|s| start_button_shown(s.as_deref(), &shown_id));

    view! {
        <li class="journey-result">
            <header class="journey-header">
                <h4>{journey.origin_label.clone()}" \u{2192} "{journey.destination_label.clone()}</h4>
                <p class="journey-times">
                    {format_clock(journey.planned_departure.as_deref())}
                    " \u{2013} "
                    {format_clock(journey.planned_arrival.as_deref())}
                </p>
                <Show when=move || { included > 0 }>
                    <span class="badge">{format!("{included} task(s) on the way")}</span>
                </Show>
            </header>
            <Itinerary journey=journey.clone() />
            <Show when=shown>
                <button
                    class="btn btn-primary"
                    disabled=move || starting.with(Option::is_some)
                    on:click={
                        let ctx = ctx.clone();
                        let journey_id = journey_id.clone();
                        move |_| start(ctx.clone(), journey_id.clone(), starting)
                    }
                >
                    {move || if starting.with(Option::is_some) { "Starting\u{2026}" } else { "Start" }}
                </button>
            </Show>
        </li>
    }
}

#[component]
pub fn JourneyPage() -> impl IntoView {
    let ctx = use_app();
    let state = ctx.state;
    let form = RwSignal::new(PlanForm {
        departure_time: default_departure(),
        ..PlanForm::default()
    });
    let (disruption_open, set_disruption_open) = signal(false);
    let starting = RwSignal::new(None::<String>);

    let enter_ctx = ctx.clone();
    Effect::new(move |_| {
        let ctx = enter_ctx.clone();
        spawn_local(async move {
            ctx.client.enter_view(&ctx.state, View::Journey).await;
        });
    });

    let plan_ctx = ctx.clone();
    let plan = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let ctx = plan_ctx.clone();
        let draft = form.get_untracked();
        spawn_local(async move {
            let result = ctx
                .busy_while(Action::PlanJourney, ctx.client.plan_journey(&ctx.state, &draft))
                .await;
            match result {
                Ok(found) => debug!(count = found.len(), "search finished"),
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
        });
    };

    let prompt_ctx = ctx.clone();
    let dismiss_prompt = move |_: leptos::ev::MouseEvent| {
        let ctx = prompt_ctx.clone();
        spawn_local(async move {
            if let Err(err) = ctx.client.mark_comfort_prompt_seen(&ctx.state).await {
                ctx.error(&err, ErrorContext::General);
            }
        });
    };

    let busy_ctx = ctx.clone();
    let searching = move || busy_ctx.is_busy(Action::PlanJourney);
    let panels = move || state.with(|s| s.panels());
    let show_prompt = move || {
        state.with(|s| s.user.as_ref().is_some_and(should_prompt_comfort))
    };
    let home_placeholder = move || {
        state.with(|s| {
            s.user
                .as_ref()
                .and_then(|u| u.home_address.clone())
                .unwrap_or_else(|| "From".to_string())
        })
    };
    let comfort_label = move || {
        state.with(|s| comfort_summary(s.user.as_ref().and_then(|u| u.comfort_profile.as_ref())))
    };
    let comfort_options = move || {
        state
            .with(|s| s.comfort_settings.clone())
            .into_iter()
            .filter_map(|setting| {
                let id = setting.id?;
                Some(view! { <option value=id>{setting.name}</option> })
            })
            .collect_view()
    };
    let results = move || {
        state
            .with(|s| s.journey_results.clone())
            .into_iter()
            .map(|journey| view! { <ResultCard journey=journey starting=starting /> })
            .collect_view()
    };

    view! {
        <div class="page journey-page">
            <Show when=show_prompt>
                <div class="banner">
                    "Set your comfort preferences from the account menu to get journeys that suit you."
                    <button class="btn btn-small btn-secondary" on:click=dismiss_prompt.clone()>
                        "Not now"
                    </button>
                </div>
            </Show>

            <SmartSuggestions on_plan=Callback::new(move |suggested: PlanForm| {
                form.update(|f| {
                    f.origin = suggested.origin;
                    f.destination = suggested.destination;
                    if !suggested.departure_time.is_empty() {
                        f.departure_time = suggested.departure_time;
                    }
                });
            }) />

            <Show when=move || panels().current_visible>
                <JourneyPanel on_report_disruption=Callback::new(move |_| set_disruption_open.set(true)) />
                <Show when=move || disruption_open.get()>
                    <DisruptionModal
                        on_rerouted=Callback::new(move |origin: Option<String>| {
                            if let Some(origin) = origin {
                                form.update(|f| f.origin = origin);
                            }
                            set_disruption_open.set(false);
                        })
                        on_cancel=Callback::new(move |_| set_disruption_open.set(false))
                    />
                </Show>
            </Show>

            <Show when=move || panels().results_visible>
                <form class="plan-form" on:submit=plan.clone()>
                    <div class="form-row">
                        <input
                            type="text"
                            class="input"
                            placeholder=home_placeholder
                            prop:value=move || form.with(|f| f.origin.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.origin = value);
                            }
                        />
                        <input
                            type="text"
                            class="input"
                            placeholder="To"
                            prop:value=move || form.with(|f| f.destination.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.destination = value);
                            }
                        />
                        <input
                            type="datetime-local"
                            class="input"
                            prop:value=move || form.with(|f| f.departure_time.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.departure_time = value);
                            }
                        />
                    </div>
                    <div class="form-row">
                        <label class="checkbox" title=comfort_label>
                            <input
                                type="checkbox"
                                prop:checked=move || form.with(|f| f.preferences.comfort_mode)
                                on:change=move |ev| {
                                    let checked = event_target_checked(&ev);
                                    form.update(|f| f.preferences.comfort_mode = checked);
                                }
                            />
                            "Comfort mode"
                        </label>
                        <select
                            class="input"
                            prop:value=move || {
                                form.with(|f| f.preferences.comfort_setting_id.clone().unwrap_or_default())
                            }
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| {
                                    f.preferences.comfort_setting_id = (!value.is_empty()).then_some(value);
                                });
                            }
                        >
                            <option value="">"My comfort profile"</option>
                            {comfort_options}
                        </select>
                        <button type="submit" class="btn btn-primary" disabled=searching.clone()>
                            {
                                let searching = searching.clone();
                                move || if searching() { "Searching\u{2026}" } else { "Search" }
                            }
                        </button>
                    </div>
                </form>

                <Show when=move || state.with(|s| s.results_notice.is_some())>
                    <p class="empty">
                        {move || state.with(|s| s.results_notice.clone().unwrap_or_default())}
                    </p>
                </Show>
                <ul class="journey-results">{results}</ul>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_start_hides_other_cards() {
        assert!(start_button_shown(None, "j1"));
        assert!(start_button_shown(Some("j1"), "j1"));
        assert!(!start_button_shown(Some("j1"), "j2"));
    }
}
