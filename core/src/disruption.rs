use tracing::info;

use crate::api::ApiTransport;
use crate::error::{MavigoError, Result};
use crate::journey::JourneyStatus;
use crate::models::Journey;
use crate::settings::SettingsStore;
use crate::state::{Action, StateHandle};
use crate::MavigoClient;

pub const NO_ALTERNATIVES: &str = "No alternative journey is available right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisruptionKind {
    Line,
    Station,
}

/// One pickable entry in the disruption modal.
#[derive(Debug, Clone, PartialEq)]
pub struct DisruptionOption {
    pub id: String,
    pub label: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisruptionTarget {
    Line(String),
    Station(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RerouteOutcome {
    pub alternatives: Vec<Journey>,
    pub new_origin: Option<String>,
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    fn disrupted_journey_id(&self, state: &impl StateHandle) -> Result<String> {
        let journey = state
            .read(|s| s.current_journey().cloned())
            .ok_or_else(|| MavigoError::Validation("No journey in progress.".to_string()))?;
        journey.status.validate_transition(JourneyStatus::Rerouted)?;
        Ok(journey.journey_id)
    }

    pub async fn disruption_options(
        &self,
        state: &impl StateHandle,
        kind: DisruptionKind,
    ) -> Result<Vec<DisruptionOption>> {
        let journey_id = self.disrupted_journey_id(state)?;
        let options = match kind {
            DisruptionKind::Line => self
                .api
                .journey_lines(&journey_id)
                .await?
                .into_iter()
                .map(|line| DisruptionOption {
                    label: match line.name {
                        Some(name) if !name.trim().is_empty() => name,
                        _ => line.code.clone(),
                    },
                    id: line.code,
                    color: line.color,
                })
                .collect(),
            DisruptionKind::Station => self
                .api
                .journey_stops(&journey_id)
                .await?
                .into_iter()
                .map(|stop| DisruptionOption {
                    label: if stop.name.trim().is_empty() {
                        stop.id.clone()
                    } else {
                        stop.name
                    },
                    id: stop.id,
                    color: None,
                })
                .collect(),
        };
        Ok(options)
    }

    /// Reports the disruption and swaps the current journey for the alternatives.
    pub async fn report_disruption(
        &self,
        state: &impl StateHandle,
        target: &DisruptionTarget,
    ) -> Result<RerouteOutcome> {
        let journey_id = self.disrupted_journey_id(state)?;
        let _guard = self.in_flight.begin(Action::ReportDisruption)?;

        let response = match target {
            DisruptionTarget::Line(code) => {
                self.api.report_line_disruption(&journey_id, code).await?
            }
            DisruptionTarget::Station(stop_id) => {
                self.api
                    .report_station_disruption(&journey_id, stop_id)
                    .await?
            }
        };
        info!(
            journey_id,
            alternatives = response.alternatives.len(),
            "disruption reported"
        );

        let alternatives = response.alternatives.clone();
        state.update(|s| {
            s.set_current_journey(None);
            s.results_notice = alternatives
                .is_empty()
                .then(|| NO_ALTERNATIVES.to_string());
            s.journey_results = alternatives;
        });
        Ok(RerouteOutcome {
            alternatives: response.alternatives,
            new_origin: response.new_origin,
        })
    }
}
