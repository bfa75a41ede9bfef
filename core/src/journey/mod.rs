//! Journey lifecycle: the one status table every component branches on.

pub mod itinerary;
pub mod ops;

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{MavigoError, Result};
use crate::format::parse_timestamp;
use crate::models::Journey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JourneyStatus {
    Planned,
    InProgress,
    Rerouted,
    Completed,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Which controls the journey panel offers for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JourneyActions {
    pub start: bool,
    pub complete: bool,
    pub cancel: bool,
    pub report_disruption: bool,
}

impl JourneyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JourneyStatus::Planned => "PLANNED",
            JourneyStatus::InProgress => "IN_PROGRESS",
            JourneyStatus::Rerouted => "REROUTED",
            JourneyStatus::Completed => "COMPLETED",
            JourneyStatus::Cancelled => "CANCELLED",
            JourneyStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JourneyStatus::Planned => "Planned",
            JourneyStatus::InProgress => "In progress",
            JourneyStatus::Rerouted => "Rerouted",
            JourneyStatus::Completed => "Completed",
            JourneyStatus::Cancelled => "Cancelled",
            JourneyStatus::Unknown => "Unknown",
        }
    }

    /// Active journeys occupy the current-journey panel.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            JourneyStatus::Planned | JourneyStatus::InProgress | JourneyStatus::Rerouted
        )
    }

    /// Rerouted journeys behave like in-progress ones for everything but the label.
    pub fn is_underway(self) -> bool {
        matches!(self, JourneyStatus::InProgress | JourneyStatus::Rerouted)
    }

    pub fn can_transition_to(self, next: JourneyStatus) -> bool {
        use JourneyStatus::*;
        matches!(
            (self, next),
            (Planned, InProgress)
                | (Planned, Rerouted)
                | (Planned, Cancelled)
                | (InProgress, Rerouted)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
                | (Rerouted, Rerouted)
                | (Rerouted, Completed)
                | (Rerouted, Cancelled)
        )
    }

    pub fn validate_transition(self, next: JourneyStatus) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(MavigoError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn available_actions(self) -> JourneyActions {
        JourneyActions {
            start: self.can_transition_to(JourneyStatus::InProgress),
            complete: self.can_transition_to(JourneyStatus::Completed),
            cancel: self.can_transition_to(JourneyStatus::Cancelled),
            report_disruption: self.can_transition_to(JourneyStatus::Rerouted),
        }
    }
}

impl fmt::Display for JourneyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of the planned travel time already elapsed, for underway journeys.
///
/// The start is the actual departure when known, the planned one otherwise.
/// Anything unparseable or an inverted range yields 0.
pub fn calculate_progress(journey: &Journey, now: NaiveDateTime) -> u8 {
    if !journey.status.is_underway() {
        return 0;
    }

    let start = journey
        .actual_departure
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| journey.planned_departure.as_deref().and_then(parse_timestamp));
    let end = journey.planned_arrival.as_deref().and_then(parse_timestamp);

    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };
    if end <= start {
        return 0;
    }

    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;
    (elapsed / total * 100.0).round().clamp(0.0, 100.0) as u8
}
