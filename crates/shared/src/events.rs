//! Score events awarded by page controllers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user action that earns eco points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEvent {
    /// A waste item was classified from a photo
    WasteIdentified,
    /// An eco-alternatives search returned results
    AlternativesFound,
    /// The user logged dropping waste off at a shop
    DropOffLogged { shop_name: String },
}

impl ScoreEvent {
    pub fn points(&self) -> u32 {
        match self {
            ScoreEvent::WasteIdentified => 5,
            ScoreEvent::AlternativesFound => 10,
            ScoreEvent::DropOffLogged { .. } => 25,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreEvent::WasteIdentified => "identify",
            ScoreEvent::AlternativesFound => "find-alternatives",
            ScoreEvent::DropOffLogged { .. } => "log-drop-off",
        }
    }
}

/// Award history entry, kept in memory for the session only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// When the award happened
    pub timestamp: DateTime<Utc>,
    /// What earned it
    pub event: ScoreEvent,
    /// Points granted
    pub points: u32,
}

impl ScoreEntry {
    pub fn new(event: ScoreEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            points: event.points(),
            event,
        }
    }
}
