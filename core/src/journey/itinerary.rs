//! Which segments the itinerary shows, and where task stops go.

use crate::models::{Journey, JourneyTask, Segment, SegmentType, Task, TaskStop};

const TRANSFER_NOISE_SECONDS: i64 = 60;
const NOISE_SECONDS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItineraryStep<'a> {
    Segment(&'a Segment),
    TaskStop(&'a JourneyTask),
}

/// Trimmed, lowercased label; `None` when the planner could not resolve it.
fn place(label: Option<&str>) -> Option<String> {
    let label = label?.trim();
    if label.is_empty() || label == "?" {
        None
    } else {
        Some(label.to_lowercase())
    }
}

pub fn is_visible(segment: &Segment) -> bool {
    if segment.segment_type == SegmentType::Waiting {
        return false;
    }

    let origin = place(segment.origin_label.as_deref());
    let destination = place(segment.destination_label.as_deref());
    if origin.is_none() && destination.is_none() {
        return false;
    }

    let same_place = origin.is_some() && origin == destination;
    match segment.duration_seconds {
        Some(d) if same_place && segment.segment_type.is_transfer_like() => {
            d >= TRANSFER_NOISE_SECONDS
        }
        Some(d) if same_place => d >= NOISE_SECONDS,
        _ => true,
    }
}

pub fn visible_segments(segments: &[Segment]) -> Vec<&Segment> {
    segments.iter().filter(|s| is_visible(s)).collect()
}

fn mentions(segment: &Segment, needle: &str) -> bool {
    [&segment.origin_label, &segment.destination_label]
        .into_iter()
        .flatten()
        .any(|label| label.to_lowercase().contains(needle))
}

/// Visible segments with each included task spliced in before the first
/// segment naming its location, or at the midpoint.
pub fn build_itinerary(journey: &Journey) -> Vec<ItineraryStep<'_>> {
    let mut steps: Vec<ItineraryStep<'_>> = visible_segments(&journey.segments)
        .into_iter()
        .map(ItineraryStep::Segment)
        .collect();

    for task in &journey.included_tasks {
        let needle = task
            .location_hint
            .as_deref()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty());

        let matched = needle.and_then(|needle| {
            steps.iter().position(|step| match step {
                ItineraryStep::Segment(segment) => mentions(segment, &needle),
                ItineraryStep::TaskStop(_) => false,
            })
        });
        let at = matched.unwrap_or(steps.len() / 2);
        steps.insert(at, ItineraryStep::TaskStop(task));
    }
    steps
}

/// Incomplete tasks with coordinates, offered to the planner as optional stops.
pub fn task_stops_for_planning(tasks: &[Task]) -> Vec<TaskStop> {
    tasks
        .iter()
        .filter(|t| !t.is_completed())
        .filter_map(|t| {
            let (lat, lng) = t.coordinates()?;
            Some(TaskStop {
                task_id: t.id.clone(),
                title: t.title.clone(),
                lat,
                lng,
                location_hint: t.location_hint.clone(),
            })
        })
        .collect()
}
