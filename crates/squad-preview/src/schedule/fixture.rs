// Fixtures, team directory, and the per-round fixture difficulty index.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder shown when an opponent is not in the team directory.
pub const UNKNOWN_TEAM: &str = "???";

/// A single match between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    /// Round the fixture belongs to. `None` while unscheduled.
    #[serde(rename = "event", default)]
    pub round: Option<u32>,
    pub team_h: u32,
    pub team_a: u32,
    pub team_h_difficulty: u8,
    pub team_a_difficulty: u8,
}

impl Fixture {
    pub fn involves(&self, team: u32) -> bool {
        self.team_h == team || self.team_a == team
    }

    /// Difficulty from `team`'s side of the fixture, or `None` if the team
    /// does not play in it.
    pub fn difficulty_for(&self, team: u32) -> Option<u8> {
        if self.team_h == team {
            Some(self.team_h_difficulty)
        } else if self.team_a == team {
            Some(self.team_a_difficulty)
        } else {
            None
        }
    }
}

/// Coarse difficulty bucket for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyBand {
    Easy,
    Moderate,
    Hard,
}

impl DifficultyBand {
    pub fn from_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=2 => DifficultyBand::Easy,
            3 => DifficultyBand::Moderate,
            _ => DifficultyBand::Hard,
        }
    }
}

/// A club, as listed in the bootstrap payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub short_name: String,
    /// Badge code, distinct from `id`.
    #[serde(default)]
    pub code: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: HashMap<u32, Team>,
}

impl TeamDirectory {
    pub fn new(teams: impl IntoIterator<Item = Team>) -> Self {
        TeamDirectory {
            teams: teams.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&Team> {
        self.teams.get(&id)
    }

    /// Short name for display, `???` when unknown.
    pub fn short_name(&self, id: u32) -> &str {
        self.get(id).map(|t| t.short_name.as_str()).unwrap_or(UNKNOWN_TEAM)
    }
}

/// One fixture seen from a particular team's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFixture {
    pub opponent: u32,
    pub opponent_short_name: String,
    pub is_home: bool,
    pub difficulty: u8,
    pub band: DifficultyBand,
}

impl fmt::Display for TeamFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let venue = if self.is_home { "(H)" } else { "(a)" };
        write!(f, "{}{}", self.opponent_short_name, venue)
    }
}

/// Fixtures grouped by round, for (team, round) lookups.
#[derive(Debug, Clone, Default)]
pub struct FixtureIndex {
    by_round: HashMap<u32, Vec<Fixture>>,
}

impl FixtureIndex {
    /// Build the index. Unscheduled fixtures are left out.
    pub fn new(fixtures: &[Fixture]) -> Self {
        let mut by_round: HashMap<u32, Vec<Fixture>> = HashMap::new();
        for fixture in fixtures {
            if let Some(round) = fixture.round {
                by_round.entry(round).or_default().push(fixture.clone());
            }
        }
        FixtureIndex { by_round }
    }

    /// All fixtures of a round, in source order.
    pub fn for_round(&self, round: u32) -> &[Fixture] {
        self.by_round.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Label every fixture in `fixtures` that `team` plays in. Empty on a blank
/// round; two entries on a double round.
pub fn label_fixtures(fixtures: &[Fixture], team: u32, teams: &TeamDirectory) -> Vec<TeamFixture> {
    fixtures
        .iter()
        .filter(|f| f.involves(team))
        .map(|f| {
            let is_home = f.team_h == team;
            let opponent = if is_home { f.team_a } else { f.team_h };
            let difficulty = if is_home {
                f.team_h_difficulty
            } else {
                f.team_a_difficulty
            };
            TeamFixture {
                opponent,
                opponent_short_name: teams.short_name(opponent).to_string(),
                is_home,
                difficulty,
                band: DifficultyBand::from_difficulty(difficulty),
            }
        })
        .collect()
}
