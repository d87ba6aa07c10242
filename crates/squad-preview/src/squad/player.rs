// Player records and the read-only player directory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::pick::Position;

/// Availability flag published alongside each player. Display only; it never
/// feeds into expected points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Available,
    Doubtful,
    Injured,
    Suspended,
    Unavailable,
    NotInSquad,
}

impl PlayerStatus {
    /// Parse the single-letter status code used by the fantasy API.
    /// Unknown codes are treated as available.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "d" => PlayerStatus::Doubtful,
            "i" => PlayerStatus::Injured,
            "s" => PlayerStatus::Suspended,
            "u" => PlayerStatus::Unavailable,
            "n" => PlayerStatus::NotInSquad,
            _ => PlayerStatus::Available,
        }
    }

    /// Whether the status gets its own marker on a player card (and hides
    /// the form marker).
    pub fn has_marker(&self) -> bool {
        matches!(
            self,
            PlayerStatus::Doubtful | PlayerStatus::Injured | PlayerStatus::Suspended
        )
    }
}

/// Recent-form bucket used by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormBand {
    Hot,
    Warm,
    Cold,
}

impl FormBand {
    pub fn from_form(form: f64) -> Self {
        if form >= 6.0 {
            FormBand::Hot
        } else if form >= 3.0 {
            FormBand::Warm
        } else {
            FormBand::Cold
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormBand::Hot => "hot",
            FormBand::Warm => "warm",
            FormBand::Cold => "cold",
        }
    }
}

/// A player as seen by the engine.
///
/// Statistical fields are optional: the feed leaves them `None` when the
/// source value is missing or not a finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub web_name: String,
    pub position: Position,
    pub team: u32,
    /// Published projection for the next round.
    pub ep_next: Option<f64>,
    /// Historical average points per round played.
    pub points_per_game: Option<f64>,
    pub form: Option<f64>,
    pub status: PlayerStatus,
}

impl Player {
    /// Form bucket, or `None` when a status marker takes its place.
    pub fn form_band(&self) -> Option<FormBand> {
        if self.status.has_marker() {
            return None;
        }
        let form = self.form.filter(|f| f.is_finite()).unwrap_or(0.0);
        Some(FormBand::from_form(form))
    }
}

/// Read-only lookup of players by id.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: HashMap<u32, Player>,
}

impl PlayerDirectory {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        PlayerDirectory {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, status: PlayerStatus, form: Option<f64>) -> Player {
        Player {
            id,
            web_name: format!("Player {id}"),
            position: Position::Midfielder,
            team: 1,
            ep_next: None,
            points_per_game: None,
            form,
            status,
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(PlayerStatus::from_code("a"), PlayerStatus::Available);
        assert_eq!(PlayerStatus::from_code("d"), PlayerStatus::Doubtful);
        assert_eq!(PlayerStatus::from_code("i"), PlayerStatus::Injured);
        assert_eq!(PlayerStatus::from_code("s"), PlayerStatus::Suspended);
        assert_eq!(PlayerStatus::from_code("u"), PlayerStatus::Unavailable);
        assert_eq!(PlayerStatus::from_code("n"), PlayerStatus::NotInSquad);
        assert_eq!(PlayerStatus::from_code("?"), PlayerStatus::Available);
    }

    #[test]
    fn form_band_thresholds() {
        assert_eq!(FormBand::from_form(6.0), FormBand::Hot);
        assert_eq!(FormBand::from_form(5.9), FormBand::Warm);
        assert_eq!(FormBand::from_form(3.0), FormBand::Warm);
        assert_eq!(FormBand::from_form(2.9), FormBand::Cold);
    }

    #[test]
    fn form_band_hidden_by_status_marker() {
        assert_eq!(player(1, PlayerStatus::Injured, Some(8.0)).form_band(), None);
        assert_eq!(player(1, PlayerStatus::Doubtful, Some(8.0)).form_band(), None);
        assert_eq!(
            player(1, PlayerStatus::Available, Some(8.0)).form_band(),
            Some(FormBand::Hot)
        );
    }

    #[test]
    fn missing_form_is_cold() {
        assert_eq!(
            player(1, PlayerStatus::Available, None).form_band(),
            Some(FormBand::Cold)
        );
    }

    #[test]
    fn directory_lookup() {
        let dir = PlayerDirectory::new(vec![
            player(7, PlayerStatus::Available, None),
            player(9, PlayerStatus::Available, None),
        ]);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.get(7).map(|p| p.id), Some(7));
        assert!(dir.get(8).is_none());
        assert!(!dir.is_empty());
        assert!(PlayerDirectory::default().is_empty());
    }
}
