use leptos::prelude::*;
use mavigo_core::format::{contrast_text_color, format_clock, format_duration, mode_icon, mode_label};
use mavigo_core::journey::itinerary::{build_itinerary, ItineraryStep};
use mavigo_core::models::{Journey, JourneyTask, Segment};

fn line_badge(segment: &Segment) -> Option<AnyView> {
    let code = segment.line_code.clone().or_else(|| segment.line_name.clone())?;
    let style = segment.line_color.as_deref().map(|color| {
        let background = if color.starts_with('#') { color.to_string() } else { format!("#{color}") };
        format!(
            "background-color: {}; color: {}",
            background,
            contrast_text_color(&background)
        )
    });
    Some(view! { <span class="line-badge" style=style>{code}</span> }.into_any())
}

fn segment_row(segment: &Segment) -> AnyView {
    let from = segment.origin_label.clone().unwrap_or_default();
    let to = segment.destination_label.clone().unwrap_or_default();
    let duration = segment.duration_seconds.map(format_duration);
    let departure = segment
        .departure_time
        .as_deref()
        .map(|t| format_clock(Some(t)));

    view! {
        <li class="itinerary-step">
            <span class="step-icon" title=mode_label(segment.segment_type)>
                {mode_icon(segment.segment_type)}
            </span>
            {line_badge(segment)}
            <span class="step-places">{from}" \u{2192} "{to}</span>
            <span class="step-time">{departure}</span>
            <span class="step-duration">{duration}</span>
        </li>
    }
    .into_any()
}

fn task_row(task: &JourneyTask) -> AnyView {
    let hint = task.location_hint.clone();
    view! {
        <li class="itinerary-step itinerary-task">
            <span class="step-icon">"\u{2714}"</span>
            <span class="step-places">{task.title.clone()}</span>
            <span class="step-hint">{hint}</span>
        </li>
    }
    .into_any()
}

/// Visible segments of a journey with its included tasks spliced in.
#[component]
pub fn Itinerary(journey: Journey) -> impl IntoView {
    let steps = build_itinerary(&journey)
        .into_iter()
        .map(|step| match step {
            ItineraryStep::Segment(segment) => segment_row(segment),
            ItineraryStep::TaskStop(task) => task_row(task),
        })
        .collect_view();

    view! { <ol class="itinerary">{steps}</ol> }
}
