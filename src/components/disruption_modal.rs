//! Disruption dialog for the journey in progress.
//!
//! The user picks whether a line or a station is disrupted, then which one.
//! Reporting swaps the current journey for the alternatives the backend found.

use leptos::prelude::*;
use mavigo_core::disruption::{DisruptionKind, DisruptionOption, DisruptionTarget};
use mavigo_core::format::contrast_text_color;
use mavigo_core::toast::ToastSpec;
use mavigo_core::{Action, ErrorContext};
use wasm_bindgen_futures::spawn_local;

use crate::context::use_app;

#[component]
pub fn DisruptionModal(
    /// Called with the reroute origin once the report went through
    on_rerouted: Callback<Option<String>>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let ctx = use_app();
    let (kind, set_kind) = signal(DisruptionKind::Line);
    let (options, set_options) = signal::<Vec<DisruptionOption>>(Vec::new());
    let (selected, set_selected) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    // Reload the choices whenever the kind changes
    let options_ctx = ctx.clone();
    Effect::new(move |_| {
        let kind = kind.get();
        let ctx = options_ctx.clone();
        set_selected.set(None);
        set_loading.set(true);
        spawn_local(async move {
            match ctx.client.disruption_options(&ctx.state, kind).await {
                Ok(found) => set_options.set(found),
                Err(err) => {
                    set_options.set(Vec::new());
                    ctx.error(&err, ErrorContext::General);
                }
            }
            set_loading.set(false);
        });
    });

    let report_ctx = ctx.clone();
    let confirm_report = move |_| {
        let Some(id) = selected.get_untracked() else {
            return;
        };
        let target = match kind.get_untracked() {
            DisruptionKind::Line => DisruptionTarget::Line(id),
            DisruptionKind::Station => DisruptionTarget::Station(id),
        };
        let ctx = report_ctx.clone();
        spawn_local(async move {
            let result = ctx
                .busy_while(
                    Action::ReportDisruption,
                    ctx.client.report_disruption(&ctx.state, &target),
                )
                .await;
            match result {
                Ok(outcome) => {
                    if outcome.alternatives.is_empty() {
                        ctx.toast(ToastSpec::warning("Disruption reported, no alternative found"));
                    } else {
                        ctx.toast(ToastSpec::success(format!(
                            "Disruption reported: {} alternative(s)",
                            outcome.alternatives.len()
                        )));
                    }
                    on_rerouted.run(outcome.new_origin);
                }
                Err(err) => ctx.error(&err, ErrorContext::General),
            }
        });
    };

    let busy_ctx = ctx.clone();
    let reporting = move || busy_ctx.is_busy(Action::ReportDisruption);

    let option_list = move || {
        options
            .get()
            .into_iter()
            .map(|option| {
                let id = option.id.clone();
                let id_for_check = option.id.clone();
                let swatch = option.color.as_deref().map(|color| {
                    format!(
                        "background-color: {}; color: {}",
                        color,
                        contrast_text_color(color)
                    )
                });
                view! {
                    <label class="change-item">
                        <input
                            type="radio"
                            name="disruption-target"
                            prop:checked=move || selected.get().as_deref() == Some(id_for_check.as_str())
                            on:change=move |_| set_selected.set(Some(id.clone()))
                        />
                        <span class="line-badge" style=swatch>{option.label.clone()}</span>
                    </label>
                }
            })
            .collect_view()
    };

    view! {
        <div class="change-preview-overlay">
            <div class="change-preview-dialog">
                <h3>"Report a disruption"</h3>
                <div class="segmented">
                    <button
                        class=move || if kind.get() == DisruptionKind::Line { "btn active" } else { "btn" }
                        on:click=move |_| set_kind.set(DisruptionKind::Line)
                    >
                        "Line"
                    </button>
                    <button
                        class=move || if kind.get() == DisruptionKind::Station { "btn active" } else { "btn" }
                        on:click=move |_| set_kind.set(DisruptionKind::Station)
                    >
                        "Station"
                    </button>
                </div>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <p class="loading">"Loading\u{2026}"</p> }
                >
                    <Show
                        when=move || !options.with(Vec::is_empty)
                        fallback=|| view! { <p class="empty">"Nothing to report on this journey."</p> }
                    >
                        <div class="changes-list">{option_list}</div>
                    </Show>
                </Show>

                <div class="dialog-actions">
                    <button class="btn btn-secondary" on:click=move |_| on_cancel.run(())>"Cancel"</button>
                    <button
                        class="btn btn-primary"
                        disabled=move || selected.get().is_none() || reporting()
                        on:click=confirm_report
                    >
                        "Report"
                    </button>
                </div>
            </div>
        </div>
    }
}
