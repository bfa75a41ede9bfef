use tracing::debug;

use crate::models::{Journey, JourneyTask};
use crate::state::StateHandle;

/// Order-independent identity of a set of tasks.
pub fn task_signature(tasks: &[JourneyTask]) -> String {
    let mut keys: Vec<&str> = tasks
        .iter()
        .map(|t| match t.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => t.title.as_str(),
        })
        .collect();
    keys.sort_unstable();
    keys.join("|")
}

/// Remembers the last (journey, task set) pair that produced a popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteNotifier {
    last_journey_id: Option<String>,
    last_signature: Option<String>,
}

impl RouteNotifier {
    pub fn should_notify(&mut self, journey_id: &str, tasks: &[JourneyTask]) -> bool {
        if tasks.is_empty() {
            return false;
        }
        let signature = task_signature(tasks);
        if self.last_journey_id.as_deref() == Some(journey_id)
            && self.last_signature.as_deref() == Some(signature.as_str())
        {
            debug!(journey_id, %signature, "route tasks already announced");
            return false;
        }
        self.last_journey_id = Some(journey_id.to_string());
        self.last_signature = Some(signature);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Popup content for tasks reachable along a journey.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTaskNotice {
    pub journey_id: String,
    pub tasks: Vec<JourneyTask>,
    pub message: String,
}

/// At most one notice per distinct (journey, task set).
pub fn notify_tasks_on_route_if_any(
    state: &impl StateHandle,
    journey: &Journey,
) -> Option<RouteTaskNotice> {
    let tasks = &journey.tasks_on_route;
    let mut fresh = false;
    state.update(|s| fresh = s.route_notice.should_notify(&journey.journey_id, tasks));
    if !fresh {
        return None;
    }

    let message = match tasks.as_slice() {
        [only] => format!("\"{}\" is on your way.", only.title),
        many => format!("{} of your tasks are on your way.", many.len()),
    };
    Some(RouteTaskNotice {
        journey_id: journey.journey_id.clone(),
        tasks: tasks.clone(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::state::AppState;

    fn task(id: Option<&str>, title: &str) -> JourneyTask {
        JourneyTask {
            id: id.map(str::to_string),
            title: title.to_string(),
            ..JourneyTask::default()
        }
    }

    fn journey(id: &str, tasks: Vec<JourneyTask>) -> Journey {
        Journey {
            journey_id: id.into(),
            tasks_on_route: tasks,
            ..Journey::default()
        }
    }

    #[test]
    fn test_signature_is_sorted_and_falls_back_to_title() {
        let tasks = vec![task(Some("b"), "B"), task(None, "Pharmacy"), task(Some("a"), "A")];
        assert_eq!(task_signature(&tasks), "Pharmacy|a|b");
    }

    #[test]
    fn test_same_journey_same_tasks_notifies_once() {
        let state = RefCell::new(AppState::default());
        let j = journey("j1", vec![task(Some("t1"), "Milk"), task(Some("t2"), "Bread")]);
        assert!(notify_tasks_on_route_if_any(&state, &j).is_some());
        assert!(notify_tasks_on_route_if_any(&state, &j).is_none());

        let reordered = journey("j1", vec![task(Some("t2"), "Bread"), task(Some("t1"), "Milk")]);
        assert!(notify_tasks_on_route_if_any(&state, &reordered).is_none());
    }

    #[test]
    fn test_different_task_set_notifies_again() {
        let state = RefCell::new(AppState::default());
        let first = journey("j1", vec![task(Some("t1"), "Milk")]);
        let second = journey("j1", vec![task(Some("t1"), "Milk"), task(Some("t3"), "Post")]);
        assert!(notify_tasks_on_route_if_any(&state, &first).is_some());
        let notice = notify_tasks_on_route_if_any(&state, &second).unwrap();
        assert_eq!(notice.message, "2 of your tasks are on your way.");
    }

    #[test]
    fn test_empty_task_set_never_notifies() {
        let state = RefCell::new(AppState::default());
        assert!(notify_tasks_on_route_if_any(&state, &journey("j1", vec![])).is_none());
    }

    #[test]
    fn test_reset_allows_repeat() {
        let mut notifier = RouteNotifier::default();
        let tasks = [task(Some("t1"), "Milk")];
        assert!(notifier.should_notify("j1", &tasks));
        notifier.reset();
        assert!(notifier.should_notify("j1", &tasks));
    }
}
