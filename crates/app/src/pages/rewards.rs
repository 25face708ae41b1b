//! Read-only view of the eco score and milestones.

use services::ledger::{Ledger, Milestone, RewardKind, MILESTONES};

use crate::i18n::Translator;
use crate::state::AppContext;

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneCard {
    pub id: &'static str,
    pub title: String,
    pub description: String,
    pub threshold: u32,
    pub reward: RewardKind,
    pub unlocked: bool,
    /// Percent toward this milestone, capped at 100.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardsView {
    pub score: u32,
    pub progress_to_next: f64,
    /// "N points away from X", absent once every milestone is unlocked.
    pub next_message: Option<String>,
    pub milestones: Vec<MilestoneCard>,
}

impl RewardsView {
    pub fn build(ctx: &AppContext, t: &Translator) -> Self {
        ctx.ledger().read(|ledger| Self::from_ledger(ledger, t))
    }

    pub fn from_ledger(ledger: &Ledger, t: &Translator) -> Self {
        let score = ledger.score();
        let next_message = ledger.next_milestone().map(|m| {
            t.t_with(
                "points_away_message",
                &[
                    ("points", (m.threshold - score).to_string()),
                    ("milestone", t.t(&m.title_key())),
                ],
            )
        });
        Self {
            score,
            progress_to_next: ledger.progress_to_next(),
            next_message,
            milestones: MILESTONES.iter().map(|m| card(m, score, t)).collect(),
        }
    }
}

fn card(m: &Milestone, score: u32, t: &Translator) -> MilestoneCard {
    MilestoneCard {
        id: m.id,
        title: t.t(&m.title_key()),
        description: t.t(&m.description_key()),
        threshold: m.threshold,
        reward: m.reward,
        unlocked: m.is_unlocked(score),
        progress: m.progress(score),
    }
}
