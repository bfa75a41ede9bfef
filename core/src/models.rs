//! Wire types exchanged with the Mavigo backend.
//!
//! Shapes are owned by the backend; everything optional is defaulted so a
//! missing field never fails a whole response.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::journey::JourneyStatus;

/// Accepts `"42"` or `42` for identifiers.
fn id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

fn opt_id_from_any<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// -- Users --

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "userId", deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub home_address: Option<String>,
    #[serde(default)]
    pub google_account_linked_at: Option<String>,
    #[serde(default)]
    pub google_account_subject: Option<String>,
    #[serde(default)]
    pub comfort_profile: Option<ComfortProfile>,
    #[serde(default)]
    pub has_seen_comfort_prompt: bool,
    #[serde(default)]
    pub onboarding_completed: bool,
}

impl User {
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    /// Linked when the backend recorded either a link timestamp or a Google subject.
    pub fn is_google_linked(&self) -> bool {
        non_blank(&self.google_account_linked_at) || non_blank(&self.google_account_subject)
    }

    pub fn has_home_address(&self) -> bool {
        non_blank(&self.home_address)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub display_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeAddressRequest {
    pub home_address: String,
}

// -- Comfort --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectPathPolicy {
    Only,
    Preferred,
    Indifferent,
}

/// Named bundle of routing preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_path: Option<DirectPathPolicy>,
    #[serde(default)]
    pub require_air_conditioning: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nb_transfers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_waiting_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_walking_duration: Option<u32>,
}

impl ComfortProfile {
    pub fn is_empty(&self) -> bool {
        self.direct_path.is_none()
            && !self.require_air_conditioning
            && self.max_nb_transfers.is_none()
            && self.max_waiting_duration.is_none()
            && self.max_walking_duration.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortSetting {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_id_from_any"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub profile: ComfortProfile,
}

// -- Journeys --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentType {
    Walking,
    Transfer,
    Waiting,
    Metro,
    Bus,
    Tram,
    Rer,
    Train,
    #[default]
    #[serde(other)]
    Other,
}

impl SegmentType {
    /// Segments that carry the passenger between vehicles rather than in one.
    pub fn is_transfer_like(self) -> bool {
        matches!(
            self,
            SegmentType::Walking | SegmentType::Transfer | SegmentType::Waiting
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default, rename = "type", alias = "segmentType")]
    pub segment_type: SegmentType,
    #[serde(default)]
    pub line_code: Option<String>,
    #[serde(default)]
    pub line_name: Option<String>,
    #[serde(default)]
    pub line_color: Option<String>,
    #[serde(default, alias = "fromLabel")]
    pub origin_label: Option<String>,
    #[serde(default, alias = "toLabel")]
    pub destination_label: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
}

/// A task referenced by a journey, either included as a stop or merely on the route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyTask {
    #[serde(
        default,
        alias = "taskId",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "opt_id_from_any"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "location", skip_serializing_if = "Option::is_none")]
    pub location_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    #[serde(alias = "id", deserialize_with = "id_from_any")]
    pub journey_id: String,
    #[serde(default)]
    pub status: JourneyStatus,
    #[serde(default)]
    pub origin_label: String,
    #[serde(default)]
    pub destination_label: String,
    #[serde(default)]
    pub planned_departure: Option<String>,
    #[serde(default)]
    pub planned_arrival: Option<String>,
    #[serde(default)]
    pub actual_departure: Option<String>,
    #[serde(default)]
    pub actual_arrival: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub included_tasks: Vec<JourneyTask>,
    #[serde(default)]
    pub tasks_on_route: Vec<JourneyTask>,
    #[serde(default)]
    pub new_badges: Vec<Badge>,
    #[serde(default)]
    pub co2_saved_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPreferences {
    #[serde(default)]
    pub comfort_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comfort_setting_id: Option<String>,
}

/// Candidate stop offered to the planner so it can route past a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStop {
    pub task_id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub user_id: String,
    pub from_query: String,
    pub to_query: String,
    pub departure_time: String,
    pub preferences: JourneyPreferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskStop>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(alias = "lineCode", deserialize_with = "id_from_any")]
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mode: SegmentType,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(alias = "stopId", deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionResponse {
    #[serde(default, alias = "journeys")]
    pub alternatives: Vec<Journey>,
    #[serde(default)]
    pub new_origin: Option<String>,
}

// -- Tasks --

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, alias = "location")]
    pub location_hint: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.completed
            || self
                .status
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("completed"))
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_hint: Option<String>,
}

/// Proactive prompt to plan a journey towards an upcoming task.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(alias = "id", deserialize_with = "id_from_any")]
    pub task_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default, alias = "location")]
    pub location_hint: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// -- Eco-score --

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(alias = "code", deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    #[serde(alias = "badgeId", alias = "code", deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub earned_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoHistoryEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub journey_label: Option<String>,
    #[serde(default)]
    pub co2_saved_kg: f64,
    #[serde(default)]
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoDashboard {
    #[serde(default)]
    pub total_co2_saved_kg: f64,
    #[serde(default)]
    pub total_distance_km: f64,
    #[serde(default)]
    pub journeys_count: u32,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub earned_badges: Vec<EarnedBadge>,
    #[serde(default)]
    pub history: Vec<EcoHistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_numeric_id_and_link_markers() {
        let user: User = serde_json::from_str(
            r#"{"id": 7, "email": "a@b.c", "googleAccountSubject": "sub-1"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "7");
        assert!(user.is_google_linked());
        assert_eq!(user.name(), "a@b.c");
    }

    #[test]
    fn test_user_blank_link_markers_are_not_linked() {
        let user: User = serde_json::from_str(
            r#"{"id": "u1", "googleAccountLinkedAt": "  ", "googleAccountSubject": null}"#,
        )
        .unwrap();
        assert!(!user.is_google_linked());
    }

    #[test]
    fn test_journey_unknown_segment_type_and_missing_fields() {
        let journey: Journey = serde_json::from_str(
            r#"{"journeyId": 12, "status": "IN_PROGRESS",
                "segments": [{"type": "FUNICULAR", "durationSeconds": 90}]}"#,
        )
        .unwrap();
        assert_eq!(journey.journey_id, "12");
        assert_eq!(journey.status, JourneyStatus::InProgress);
        assert_eq!(journey.segments[0].segment_type, SegmentType::Other);
        assert!(journey.included_tasks.is_empty());
    }

    #[test]
    fn test_task_completion_flags() {
        let task: Task =
            serde_json::from_str(r#"{"id": "t1", "title": "Milk", "status": "completed"}"#)
                .unwrap();
        assert!(task.is_completed());
        let task: Task = serde_json::from_str(r#"{"id": "t2", "lat": 48.8, "lng": 2.3}"#).unwrap();
        assert!(!task.is_completed());
        assert_eq!(task.coordinates(), Some((48.8, 2.3)));
    }

    #[test]
    fn test_plan_request_omits_absent_tasks() {
        let request = PlanRequest {
            user_id: "u1".into(),
            from_query: "Gare de Lyon".into(),
            to_query: "Nation".into(),
            departure_time: "2025-03-01T08:00".into(),
            preferences: JourneyPreferences::default(),
            tasks: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tasks").is_none());
        assert_eq!(json["departureTime"], "2025-03-01T08:00");
    }
}
