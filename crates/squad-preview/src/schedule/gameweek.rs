// Rounds (gameweeks) and the preview window over them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of rounds shown in a preview.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// One scheduled round of fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: u32,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub finished: bool,
}

/// Select the rounds to preview.
///
/// The window starts at the round flagged as next; failing that, at the
/// first unfinished round; failing that, at the last round of the season.
/// It then takes up to `size` consecutive rounds. Near the end of the season
/// the window shrinks but keeps at least the starting round. Returns an
/// empty window only when `rounds` is empty.
pub fn preview_window(rounds: &[Round], size: usize) -> Vec<Round> {
    let start = rounds
        .iter()
        .position(|r| r.is_next)
        .or_else(|| rounds.iter().position(|r| !r.finished))
        .or_else(|| rounds.len().checked_sub(1));

    let Some(start) = start else {
        return Vec::new();
    };

    let end = (start + size.max(1)).min(rounds.len());
    rounds[start..end].to_vec()
}

/// The round whose submitted picks describe the manager's current squad:
/// the current round, else the most recently finished one, else the first.
pub fn picks_round(rounds: &[Round]) -> Option<&Round> {
    rounds
        .iter()
        .find(|r| r.is_current)
        .or_else(|| rounds.iter().rev().find(|r| r.finished))
        .or_else(|| rounds.first())
}
