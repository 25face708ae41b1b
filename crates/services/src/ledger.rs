//! Gamification ledger: a running eco score and the milestone table.
//!
//! Unlocks are never stored. A milestone is unlocked exactly when the
//! current score reaches its threshold, so the unlocked set is always
//! recomputed from the score.

use parking_lot::Mutex;
use serde::Serialize;
use shared::events::{ScoreEntry, ScoreEvent};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Badge,
    Coupon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub id: &'static str,
    pub threshold: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub reward: RewardKind,
}

impl Milestone {
    pub fn is_unlocked(&self, score: u32) -> bool {
        score >= self.threshold
    }

    /// Percent of the way to this milestone, capped at 100.
    pub fn progress(&self, score: u32) -> f64 {
        percent_toward(score, self.threshold)
    }

    /// Translation key for the title, e.g. `milestone_guru_title`.
    pub fn title_key(&self) -> String {
        format!("milestone_{}_title", self.id)
    }

    pub fn description_key(&self) -> String {
        format!("milestone_{}_description", self.id)
    }
}

/// Ordered by ascending threshold.
pub static MILESTONES: [Milestone; 4] = [
    Milestone {
        id: "novice",
        threshold: 35,
        title: "Eco-Novice",
        description: "Awarded for starting your journey.",
        reward: RewardKind::Badge,
    },
    Milestone {
        id: "rookie",
        threshold: 75,
        title: "Recycling Rookie",
        description: "You are getting the hang of it!",
        reward: RewardKind::Badge,
    },
    Milestone {
        id: "guru",
        threshold: 150,
        title: "Green Guru",
        description: "₹100 Amazon Coupon",
        reward: RewardKind::Coupon,
    },
    Milestone {
        id: "star",
        threshold: 300,
        title: "Sustainability Star",
        description: "₹250 Coupon for Eco-friendly Store",
        reward: RewardKind::Coupon,
    },
];

fn percent_toward(score: u32, threshold: u32) -> f64 {
    if threshold == 0 {
        return 100.0;
    }
    (score as f64 / threshold as f64 * 100.0).min(100.0)
}

#[derive(Debug, Default)]
pub struct Ledger {
    score: u32,
    history: Vec<ScoreEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn history(&self) -> &[ScoreEntry] {
        &self.history
    }

    /// Add the fixed award for `event`. Returns the new score.
    pub fn award(&mut self, event: ScoreEvent) -> u32 {
        let entry = ScoreEntry::new(event);
        self.score = self.score.saturating_add(entry.points);
        info!(
            event = entry.event.label(),
            points = entry.points,
            score = self.score,
            "eco points awarded"
        );
        self.history.push(entry);
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.history.clear();
    }

    pub fn unlocked(&self) -> Vec<&'static Milestone> {
        MILESTONES.iter().filter(|m| m.is_unlocked(self.score)).collect()
    }

    pub fn unlocked_ids(&self) -> Vec<&'static str> {
        self.unlocked().into_iter().map(|m| m.id).collect()
    }

    /// First milestone not yet reached, if any.
    pub fn next_milestone(&self) -> Option<&'static Milestone> {
        MILESTONES.iter().find(|m| !m.is_unlocked(self.score))
    }

    /// Progress toward the next unmet milestone; 100 once all are unlocked.
    pub fn progress_to_next(&self) -> f64 {
        self.next_milestone()
            .map(|m| m.progress(self.score))
            .unwrap_or(100.0)
    }

    pub fn points_to_next(&self) -> Option<u32> {
        self.next_milestone().map(|m| m.threshold - self.score)
    }
}

/// Ledger handle shared by the shell and every page.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger(Arc<Mutex<Ledger>>);

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(&self, event: ScoreEvent) -> u32 {
        self.0.lock().award(event)
    }

    pub fn score(&self) -> u32 {
        self.0.lock().score()
    }

    pub fn reset(&self) {
        self.0.lock().reset();
    }

    /// Run `f` against the ledger under the lock.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        f(&self.0.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_off() -> ScoreEvent {
        ScoreEvent::DropOffLogged {
            shop_name: "Kabadi Bazaar".into(),
        }
    }

    #[test]
    fn test_awards_commute() {
        let mut a = Ledger::new();
        a.award(ScoreEvent::WasteIdentified);
        a.award(drop_off());

        let mut b = Ledger::new();
        b.award(drop_off());
        b.award(ScoreEvent::WasteIdentified);

        assert_eq!(a.score(), 30);
        assert_eq!(a.score(), b.score());
        assert_eq!(a.unlocked_ids(), b.unlocked_ids());
    }

    #[test]
    fn test_unlock_is_pure_function_of_score() {
        for score in 0..=320u32 {
            for m in MILESTONES.iter() {
                assert_eq!(m.is_unlocked(score), score >= m.threshold);
            }
        }
        let boundary = MILESTONES[0];
        assert!(!boundary.is_unlocked(34));
        assert!(boundary.is_unlocked(35));
    }

    #[test]
    fn test_unlocked_set_tracks_score() {
        let mut ledger = Ledger::new();
        ledger.award(drop_off());
        assert!(ledger.unlocked().is_empty());
        ledger.award(ScoreEvent::AlternativesFound); // 35
        assert_eq!(ledger.unlocked_ids(), vec!["novice"]);
        assert_eq!(ledger.next_milestone().map(|m| m.id), Some("rookie"));
        assert_eq!(ledger.points_to_next(), Some(40));
    }

    #[test]
    fn test_progress_to_next() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.progress_to_next(), 0.0);
        ledger.award(ScoreEvent::AlternativesFound); // 10 of 35
        assert!((ledger.progress_to_next() - 10.0 / 35.0 * 100.0).abs() < 1e-9);
        for _ in 0..12 {
            ledger.award(drop_off());
        }
        assert_eq!(ledger.score(), 310);
        assert!(ledger.next_milestone().is_none());
        assert_eq!(ledger.progress_to_next(), 100.0);
        assert_eq!(MILESTONES[0].progress(ledger.score()), 100.0);
    }

    #[test]
    fn test_reset_clears_score_and_history() {
        let shared = SharedLedger::new();
        shared.award(ScoreEvent::WasteIdentified);
        assert_eq!(shared.read(|l| l.history().len()), 1);
        shared.reset();
        assert_eq!(shared.score(), 0);
        assert!(shared.read(|l| l.history().is_empty()));
    }

    #[test]
    fn test_milestone_keys() {
        assert_eq!(MILESTONES[2].title_key(), "milestone_guru_title");
        assert_eq!(MILESTONES[3].reward, RewardKind::Coupon);
    }
}
