use crate::api::ApiTransport;
use crate::error::{MavigoError, Result};
use crate::models::{Badge, EcoDashboard, EcoHistoryEntry};
use crate::settings::SettingsStore;
use crate::state::StateHandle;
use crate::MavigoClient;

/// A catalog badge and whether this user holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeTile<'a> {
    pub badge: &'a Badge,
    pub earned: bool,
    pub earned_at: Option<&'a str>,
}

/// Catalog order, earned state merged in. Earned badges missing from the
/// catalog are not shown.
pub fn badge_board(dashboard: &EcoDashboard) -> Vec<BadgeTile<'_>> {
    dashboard
        .badges
        .iter()
        .map(|badge| {
            let earned = dashboard.earned_badges.iter().find(|e| e.id == badge.id);
            BadgeTile {
                badge,
                earned: earned.is_some(),
                earned_at: earned.and_then(|e| e.earned_at.as_deref()),
            }
        })
        .collect()
}

/// Newest first. ISO dates compare correctly as strings; undated entries sink.
pub fn recent_history(dashboard: &EcoDashboard, limit: usize) -> Vec<&EcoHistoryEntry> {
    let mut entries: Vec<&EcoHistoryEntry> = dashboard.history.iter().collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    entries
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    pub async fn load_eco_dashboard(&self, state: &impl StateHandle) -> Result<EcoDashboard> {
        let user_id = state
            .read(|s| s.user_id().map(str::to_string))
            .ok_or(MavigoError::NotLoggedIn)?;
        let dashboard = self.api.eco_dashboard(&user_id).await?;
        let cached = dashboard.clone();
        state.update(|s| s.eco = Some(cached));
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EarnedBadge;

    fn dashboard() -> EcoDashboard {
        EcoDashboard {
            badges: vec![
                Badge {
                    id: "first-trip".into(),
                    name: "First trip".into(),
                    ..Badge::default()
                },
                Badge {
                    id: "ten-kg".into(),
                    name: "10 kg saved".into(),
                    ..Badge::default()
                },
            ],
            earned_badges: vec![EarnedBadge {
                id: "first-trip".into(),
                earned_at: Some("2025-02-01".into()),
            }],
            history: vec![
                EcoHistoryEntry {
                    date: Some("2025-02-01".into()),
                    ..EcoHistoryEntry::default()
                },
                EcoHistoryEntry::default(),
                EcoHistoryEntry {
                    date: Some("2025-02-03".into()),
                    ..EcoHistoryEntry::default()
                },
            ],
            ..EcoDashboard::default()
        }
    }

    #[test]
    fn test_badge_board_marks_earned() {
        let d = dashboard();
        let board = badge_board(&d);
        assert_eq!(board.len(), 2);
        assert!(board[0].earned);
        assert_eq!(board[0].earned_at, Some("2025-02-01"));
        assert!(!board[1].earned);
    }

    #[test]
    fn test_recent_history_newest_first() {
        let d = dashboard();
        let recent = recent_history(&d, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date.as_deref(), Some("2025-02-03"));
        assert_eq!(recent[1].date.as_deref(), Some("2025-02-01"));
    }
}
