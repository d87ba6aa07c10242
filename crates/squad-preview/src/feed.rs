// Fantasy API payload ingestion.
//
// Parses the saved JSON responses (bootstrap-static, fixtures, picks and the
// manager entry) into the engine's types. Statistical fields arrive as
// strings ("4.5"), numbers or null; anything that is not a finite number
// becomes `None` rather than an error.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::DataPaths;
use crate::schedule::fixture::{Fixture, Team, TeamDirectory};
use crate::schedule::gameweek::Round;
use crate::squad::pick::{captaincy_is_valid, Pick, Position};
use crate::squad::player::{Player, PlayerDirectory, PlayerStatus};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Manager header information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manager {
    #[serde(default)]
    pub player_first_name: String,
    #[serde(default)]
    pub player_last_name: String,
    /// Team name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary_overall_rank: Option<u64>,
    #[serde(default)]
    pub summary_overall_points: Option<i64>,
}

impl Manager {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
            .trim()
            .to_string()
    }
}

/// Bootstrap payload after normalization.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    pub rounds: Vec<Round>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
}

/// Everything a preview needs, read from one set of saved payloads.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub players: PlayerDirectory,
    pub teams: TeamDirectory,
    pub rounds: Vec<Round>,
    pub fixtures: Vec<Fixture>,
    pub picks: Vec<Pick>,
    pub manager: Option<Manager>,
}

impl Snapshot {
    pub fn new(
        bootstrap: Bootstrap,
        fixtures: Vec<Fixture>,
        picks: Vec<Pick>,
        manager: Option<Manager>,
    ) -> Self {
        Snapshot {
            players: PlayerDirectory::new(bootstrap.players),
            teams: TeamDirectory::new(bootstrap.teams),
            rounds: bootstrap.rounds,
            fixtures,
            picks,
            manager,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawBootstrap {
    #[serde(default)]
    events: Vec<Round>,
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    id: u32,
    #[serde(default)]
    web_name: String,
    element_type: u8,
    team: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    ep_next: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    points_per_game: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    form: Option<f64>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct RawPicks {
    #[serde(default)]
    picks: Vec<Pick>,
}

/// Accept a number, a numeric string, or anything else (as `None`).
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

fn player_from_raw(raw: RawElement) -> Player {
    let position = Position::from_element_type(raw.element_type).unwrap_or_else(|| {
        warn!(
            "player {} ({}) has unknown element_type {}, treating as MID",
            raw.id, raw.web_name, raw.element_type
        );
        Position::Midfielder
    });
    Player {
        id: raw.id,
        web_name: raw.web_name,
        position,
        team: raw.team,
        ep_next: raw.ep_next,
        points_per_game: raw.points_per_game,
        form: raw.form,
        status: PlayerStatus::from_code(&raw.status),
    }
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

pub fn parse_bootstrap(text: &str) -> Result<Bootstrap, serde_json::Error> {
    let raw: RawBootstrap = serde_json::from_str(text)?;
    Ok(Bootstrap {
        rounds: raw.events,
        teams: raw.teams,
        players: raw.elements.into_iter().map(player_from_raw).collect(),
    })
}

pub fn parse_fixtures(text: &str) -> Result<Vec<Fixture>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Picks in slot order.
pub fn parse_picks(text: &str) -> Result<Vec<Pick>, serde_json::Error> {
    let raw: RawPicks = serde_json::from_str(text)?;
    let mut picks = raw.picks;
    picks.sort_by_key(|p| p.slot);
    Ok(picks)
}

pub fn parse_manager(text: &str) -> Result<Manager, serde_json::Error> {
    serde_json::from_str(text)
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

async fn read_payload(path: &str) -> Result<String, FeedError> {
    tokio::fs::read_to_string(Path::new(path))
        .await
        .map_err(|e| FeedError::Io {
            path: path.to_string(),
            source: e,
        })
}

fn json_error(path: &str) -> impl FnOnce(serde_json::Error) -> FeedError + '_ {
    move |e| FeedError::Json {
        path: path.to_string(),
        source: e,
    }
}

/// Read and parse every payload named in `paths`.
pub async fn load_snapshot(paths: &DataPaths) -> Result<Snapshot, FeedError> {
    let bootstrap_text = read_payload(&paths.bootstrap).await?;
    let bootstrap = parse_bootstrap(&bootstrap_text).map_err(json_error(&paths.bootstrap))?;

    let fixtures_text = read_payload(&paths.fixtures).await?;
    let fixtures = parse_fixtures(&fixtures_text).map_err(json_error(&paths.fixtures))?;

    let picks_text = read_payload(&paths.picks).await?;
    let picks = parse_picks(&picks_text).map_err(json_error(&paths.picks))?;
    if !captaincy_is_valid(&picks) {
        warn!("{}: expected one captain and one vice-captain among the starters", paths.picks);
    }

    let manager = match &paths.manager {
        Some(path) => {
            let text = read_payload(path).await?;
            Some(parse_manager(&text).map_err(json_error(path))?)
        }
        None => None,
    };

    info!(
        "Loaded snapshot: {} players, {} rounds, {} fixtures, {} picks",
        bootstrap.players.len(),
        bootstrap.rounds.len(),
        fixtures.len(),
        picks.len()
    );

    Ok(Snapshot::new(bootstrap, fixtures, picks, manager))
}
