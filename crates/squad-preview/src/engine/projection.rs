// Display-ready lineup shape shared by the submitted lineup and the Best XI,
// so the rendering side can switch between them without special cases.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::expected::RoundContext;
use crate::engine::formation::{is_legal, Formation};
use crate::engine::lineup::{lineup_total, score_picks, ScoredPick};
use crate::engine::optimizer::{best_xi, SquadSelection};
use crate::schedule::fixture::{label_fixtures, TeamDirectory, TeamFixture};
use crate::squad::pick::{Pick, Position};
use crate::squad::player::{Player, PlayerDirectory};

/// One player card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupEntry {
    pub pick: Pick,
    pub player: Player,
    pub ep: f64,
    /// The player's fixtures in the round; empty on a blank round.
    pub fixtures: Vec<TeamFixture>,
}

/// Starters grouped by position, the ordered bench, and the lineup EP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupResult {
    /// Always holds all four positions, possibly with empty lists.
    pub starters: BTreeMap<Position, Vec<LineupEntry>>,
    pub bench: Vec<LineupEntry>,
    pub total_ep: f64,
    /// Shape of the eleven. Set for the Best XI; for a submitted lineup it
    /// is derived from the starters when they form a legal shape.
    pub formation: Option<Formation>,
}

impl LineupResult {
    pub fn starter_count(&self) -> usize {
        self.starters.values().map(Vec::len).sum()
    }

    /// Starters in display order (GKP, DEF, MID, FWD).
    pub fn starters_in_order(&self) -> impl Iterator<Item = &LineupEntry> {
        self.starters.values().flatten()
    }

    pub fn captain(&self) -> Option<&LineupEntry> {
        self.starters_in_order().find(|e| e.pick.is_captain)
    }

    pub fn vice_captain(&self) -> Option<&LineupEntry> {
        self.starters_in_order().find(|e| e.pick.is_vice_captain)
    }
}

fn empty_groups() -> BTreeMap<Position, Vec<LineupEntry>> {
    Position::ALL.into_iter().map(|p| (p, Vec::new())).collect()
}

fn entry(scored: &ScoredPick<'_>, ctx: &RoundContext<'_>, teams: &TeamDirectory) -> LineupEntry {
    LineupEntry {
        pick: scored.pick.clone(),
        player: scored.player.clone(),
        ep: scored.ep,
        fixtures: label_fixtures(ctx.fixtures, scored.player.team, teams),
    }
}

fn formation_of(starters: &BTreeMap<Position, Vec<LineupEntry>>) -> Option<Formation> {
    let count = |p: Position| starters.get(&p).map(Vec::len).unwrap_or(0);
    if count(Position::Goalkeeper) != 1 {
        return None;
    }
    let formation = Formation::new(
        count(Position::Defender),
        count(Position::Midfielder),
        count(Position::Forward),
    );
    is_legal(&formation).then_some(formation)
}

/// Project the submitted lineup verbatim: starters grouped by the players'
/// positions in pick order, bench in pick order.
pub fn project_actual(
    picks: &[Pick],
    players: &PlayerDirectory,
    ctx: &RoundContext<'_>,
    teams: &TeamDirectory,
) -> LineupResult {
    let scored = score_picks(picks, players, ctx);
    let mut starters = empty_groups();
    let mut bench = Vec::new();

    for s in &scored {
        if s.pick.is_starter() {
            starters
                .entry(s.player.position)
                .or_default()
                .push(entry(s, ctx, teams));
        } else {
            bench.push(entry(s, ctx, teams));
        }
    }

    let formation = formation_of(&starters);
    LineupResult {
        starters,
        bench,
        total_ep: lineup_total(&scored),
        formation,
    }
}

/// Project an optimizer selection.
pub fn project_selection(
    selection: &SquadSelection<'_>,
    ctx: &RoundContext<'_>,
    teams: &TeamDirectory,
) -> LineupResult {
    let mut starters = empty_groups();
    for s in &selection.starters {
        starters
            .entry(s.player.position)
            .or_default()
            .push(entry(s, ctx, teams));
    }

    LineupResult {
        starters,
        bench: selection.bench.iter().map(|s| entry(s, ctx, teams)).collect(),
        total_ep: selection.total_ep,
        formation: Some(selection.formation),
    }
}

/// Best XI for the round, projected for display. `None` when the roster
/// cannot field a legal eleven.
pub fn best_lineup(
    picks: &[Pick],
    players: &PlayerDirectory,
    ctx: &RoundContext<'_>,
    teams: &TeamDirectory,
) -> Option<LineupResult> {
    best_xi(picks, players, ctx).map(|sel| project_selection(&sel, ctx, teams))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixture::{Fixture, Team};
    use crate::squad::player::PlayerStatus;

    fn player(id: u32, position: Position, team: u32, ep: f64) -> Player {
        Player {
            id,
            web_name: format!("P{id}"),
            position,
            team,
            ep_next: Some(ep),
            points_per_game: Some(ep),
            form: None,
            status: PlayerStatus::Available,
        }
    }

    /// 2 GK, 5 DEF, 5 MID, 3 FWD. Submitted as 4-4-2 with captain on the
    /// first midfielder.
    fn squad() -> (Vec<Pick>, PlayerDirectory) {
        use Position::*;
        let layout = [
            (Goalkeeper, 5.0),
            (Defender, 4.0),
            (Defender, 4.0),
            (Defender, 3.0),
            (Defender, 3.0),
            (Midfielder, 6.0),
            (Midfielder, 5.0),
            (Midfielder, 4.0),
            (Midfielder, 2.0),
            (Forward, 7.0),
            (Forward, 3.0),
            (Goalkeeper, 2.0),
            (Defender, 1.0),
            (Midfielder, 1.0),
            (Forward, 1.0),
        ];
        let players = PlayerDirectory::new(
            layout
                .iter()
                .enumerate()
                .map(|(i, &(pos, ep))| player(i as u32 + 1, pos, (i as u32 % 3) + 1, ep)),
        );
        let picks = (0..layout.len())
            .map(|i| Pick {
                player_id: i as u32 + 1,
                slot: i as u8 + 1,
                is_captain: i == 5,
                is_vice_captain: i == 9,
            })
            .collect();
        (picks, players)
    }

    fn teams() -> TeamDirectory {
        TeamDirectory::new(vec![
            Team { id: 1, name: "One".into(), short_name: "ONE".into(), code: 1 },
            Team { id: 2, name: "Two".into(), short_name: "TWO".into(), code: 2 },
        ])
    }

    #[test]
    fn actual_lineup_grouped_and_totalled() {
        let (picks, players) = squad();
        let ctx = RoundContext::published(1, &[]);
        let result = project_actual(&picks, &players, &ctx, &teams());

        assert_eq!(result.starter_count(), 11);
        assert_eq!(result.starters[&Position::Goalkeeper].len(), 1);
        assert_eq!(result.starters[&Position::Defender].len(), 4);
        assert_eq!(result.starters[&Position::Midfielder].len(), 4);
        assert_eq!(result.starters[&Position::Forward].len(), 2);
        assert_eq!(result.formation, Some(Formation::new(4, 4, 2)));

        let bench_ids: Vec<u32> = result.bench.iter().map(|e| e.player.id).collect();
        assert_eq!(bench_ids, vec![12, 13, 14, 15]);

        // 5 + 14 + 17 + 10 = 46, plus captain 6.
        assert_eq!(result.total_ep, 52.0);
        assert_eq!(result.captain().map(|e| e.player.id), Some(6));
        assert_eq!(result.vice_captain().map(|e| e.player.id), Some(10));
    }

    #[test]
    fn best_and_actual_share_shape() {
        let (picks, players) = squad();
        let ctx = RoundContext::published(1, &[]);
        let actual = project_actual(&picks, &players, &ctx, &teams());
        let best = best_lineup(&picks, &players, &ctx, &teams()).unwrap();

        let keys = |r: &LineupResult| r.starters.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys(&actual), Position::ALL.to_vec());
        assert_eq!(keys(&best), Position::ALL.to_vec());
        assert_eq!(best.starter_count(), 11);
        assert_eq!(best.bench.len(), 4);
        assert!(best.total_ep >= actual.total_ep);
        assert_eq!(best.captain().map(|e| e.player.id), Some(10));
    }

    #[test]
    fn entries_carry_fixture_labels() {
        let (picks, players) = squad();
        let fixtures = [Fixture {
            id: 1,
            round: Some(2),
            team_h: 1,
            team_a: 2,
            team_h_difficulty: 2,
            team_a_difficulty: 4,
        }];
        let ctx = RoundContext::fixture_scaled(2, &fixtures);
        let result = project_actual(&picks, &players, &ctx, &teams());

        let gk = &result.starters[&Position::Goalkeeper][0];
        assert_eq!(gk.player.team, 1);
        assert_eq!(gk.fixtures.len(), 1);
        assert_eq!(gk.fixtures[0].to_string(), "TWO(H)");

        // Team 3 has no fixture: blank round, zero EP.
        let blank = result
            .starters_in_order()
            .find(|e| e.player.team == 3)
            .unwrap();
        assert!(blank.fixtures.is_empty());
        assert_eq!(blank.ep, 0.0);
    }

    #[test]
    fn illegal_submitted_shape_has_no_formation() {
        let (mut picks, players) = squad();
        // Swap a forward starter with the bench goalkeeper: two goalkeepers start.
        picks[10].slot = 12;
        picks[11].slot = 11;
        let ctx = RoundContext::published(1, &[]);
        let result = project_actual(&picks, &players, &ctx, &teams());
        assert_eq!(result.formation, None);
    }

    #[test]
    fn serializes_position_keys() {
        let (picks, players) = squad();
        let ctx = RoundContext::published(1, &[]);
        let result = project_actual(&picks, &players, &ctx, &teams());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["starters"]["GKP"].is_array());
        assert!(json["starters"]["FWD"].is_array());
        assert_eq!(json["bench"].as_array().map(Vec::len), Some(4));
    }
}
