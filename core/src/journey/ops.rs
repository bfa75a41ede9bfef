use tracing::{debug, info, warn};

use crate::api::ApiTransport;
use crate::error::{MavigoError, Result};
use crate::journey::itinerary::task_stops_for_planning;
use crate::journey::JourneyStatus;
use crate::models::{Badge, Journey, JourneyPreferences, PlanRequest};
use crate::notify::{notify_tasks_on_route_if_any, RouteTaskNotice};
use crate::settings::SettingsStore;
use crate::state::{Action, StateHandle};
use crate::tasks::{task_gate, TaskGate};
use crate::MavigoClient;

pub const NO_JOURNEY_FOUND: &str = "No journey found for this search.";

/// Interactive yes/no before destructive actions.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanForm {
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub preferences: JourneyPreferences,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartOutcome {
    pub journey: Journey,
    pub route_notice: Option<RouteTaskNotice>,
}

/// What happened to the included tasks of a completed journey.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionReport {
    pub journey: Journey,
    pub completed_tasks: Vec<String>,
    pub failed_tasks: Vec<String>,
    pub new_badges: Vec<Badge>,
}

impl CompletionReport {
    pub fn is_partial(&self) -> bool {
        !self.failed_tasks.is_empty()
    }
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    /// Searches journeys and stores the results.
    ///
    /// Cached incomplete tasks with coordinates ride along as candidate
    /// stops; an empty task-aware answer is retried once without them.
    pub async fn plan_journey(&self, state: &impl StateHandle, form: &PlanForm) -> Result<Vec<Journey>> {
        if form.departure_time.trim().is_empty() {
            return Err(MavigoError::Validation(
                "Departure time is required.".to_string(),
            ));
        }
        let (user_id, home, tasks) = state.read(|s| {
            (
                s.user_id().map(str::to_string),
                s.user.as_ref().and_then(|u| u.home_address.clone()),
                s.tasks.clone(),
            )
        });
        let user_id = user_id.ok_or(MavigoError::NotLoggedIn)?;

        let origin = match form.origin.trim() {
            "" => home.unwrap_or_default(),
            origin => origin.to_string(),
        };
        if origin.trim().is_empty() {
            return Err(MavigoError::Validation("Origin is required.".to_string()));
        }
        if form.destination.trim().is_empty() {
            return Err(MavigoError::Validation(
                "Destination is required.".to_string(),
            ));
        }

        let _guard = self.in_flight.begin(Action::PlanJourney)?;

        let stops = task_stops_for_planning(&tasks);
        let mut request = PlanRequest {
            user_id,
            from_query: origin.trim().to_string(),
            to_query: form.destination.trim().to_string(),
            departure_time: form.departure_time.trim().to_string(),
            preferences: form.preferences.clone(),
            tasks: (!stops.is_empty()).then_some(stops),
        };

        let mut results = self.api.plan_journey(&request).await?;
        if results.is_empty() && request.tasks.is_some() {
            debug!("task-aware search came back empty, retrying without tasks");
            request.tasks = None;
            results = self.api.plan_journey(&request).await?;
        }
        info!(count = results.len(), "journeys planned");

        let stored = results.clone();
        state.update(|s| {
            s.results_notice = stored.is_empty().then(|| NO_JOURNEY_FOUND.to_string());
            s.journey_results = stored;
        });
        Ok(results)
    }

    pub async fn start_journey(&self, state: &impl StateHandle, journey_id: &str) -> Result<StartOutcome> {
        let _guard = self.in_flight.begin(Action::StartJourney)?;

        let known = state.read(|s| s.find_journey(journey_id).cloned());
        if let Some(known) = &known {
            if known.status != JourneyStatus::Unknown {
                known.status.validate_transition(JourneyStatus::InProgress)?;
            }
        }

        let mut journey = self.api.start_journey(journey_id).await?;
        if journey.tasks_on_route.is_empty() {
            if let Some(known) = known {
                journey.tasks_on_route = known.tasks_on_route;
            }
        }
        info!(journey_id, status = %journey.status, "journey started");

        let current = journey.clone();
        state.update(|s| {
            s.set_current_journey(Some(current));
        });
        let route_notice = notify_tasks_on_route_if_any(state, &journey);
        Ok(StartOutcome {
            journey,
            route_notice,
        })
    }

    fn current_journey_for(&self, state: &impl StateHandle, next: JourneyStatus) -> Result<Journey> {
        let journey = state
            .read(|s| s.current_journey().cloned())
            .ok_or_else(|| MavigoError::Validation("No journey in progress.".to_string()))?;
        journey.status.validate_transition(next)?;
        Ok(journey)
    }

    /// Completes the current journey, then ticks off its included tasks.
    /// Task failures are reported, never rolled back into the journey.
    pub async fn complete_journey(&self, state: &impl StateHandle) -> Result<CompletionReport> {
        let current = self.current_journey_for(state, JourneyStatus::Completed)?;
        let _guard = self.in_flight.begin(Action::CompleteJourney)?;

        let journey = self.api.complete_journey(&current.journey_id).await?;
        let stored = journey.clone();
        state.update(|s| {
            s.set_current_journey(Some(stored));
        });
        info!(journey_id = %journey.journey_id, "journey completed");

        let mut report = CompletionReport {
            new_badges: journey.new_badges.clone(),
            journey,
            ..CompletionReport::default()
        };

        let included: Vec<_> = current
            .included_tasks
            .iter()
            .filter_map(|t| Some((t.id.clone()?, t.list_id.clone())))
            .collect();
        if included.is_empty() {
            return Ok(report);
        }

        let TaskGate::Ready(user_id) = task_gate(&state.snapshot()) else {
            debug!("skipping included task completion, tasks unavailable");
            return Ok(report);
        };
        let default_list = match self.default_list(state, false).await {
            Ok(list) => Some(list.id),
            Err(err) => {
                warn!(error = %err, "no default list for included tasks");
                None
            }
        };

        for (task_id, list_id) in included {
            let Some(list_id) = list_id.or_else(|| default_list.clone()) else {
                report.failed_tasks.push(task_id);
                continue;
            };
            match self.api.complete_task(&user_id, &list_id, &task_id).await {
                Ok(()) => report.completed_tasks.push(task_id),
                Err(err) => {
                    warn!(task_id, error = %err, "included task completion failed");
                    report.failed_tasks.push(task_id);
                }
            }
        }

        if !report.completed_tasks.is_empty() {
            if let Err(err) = self.reload_tasks(state, false).await {
                warn!(error = %err, "task refresh after journey completion failed");
            }
        }
        Ok(report)
    }

    /// `Ok(None)` when the user declines the confirmation.
    pub async fn cancel_journey(
        &self,
        state: &impl StateHandle,
        confirm: &impl Confirm,
    ) -> Result<Option<Journey>> {
        let current = self.current_journey_for(state, JourneyStatus::Cancelled)?;
        if !confirm.confirm("Cancel this journey?") {
            return Ok(None);
        }
        let _guard = self.in_flight.begin(Action::CancelJourney)?;

        let journey = self.api.cancel_journey(&current.journey_id).await?;
        info!(journey_id = %journey.journey_id, "journey cancelled");
        let stored = journey.clone();
        state.update(|s| {
            s.set_current_journey(Some(stored));
        });
        Ok(Some(journey))
    }
}
