// Preview session: one loaded snapshot viewed round by round.
//
// Holds the preview window and fixture index derived from the snapshot, plus
// the Best XI memo. Everything derived is rebuilt on `reload`.

use tracing::info;

use crate::engine::cache::BestXiCache;
use crate::engine::expected::RoundContext;
use crate::engine::lineup::aggregate;
use crate::engine::projection::{best_lineup, project_actual, LineupResult};
use crate::feed::{Manager, Snapshot};
use crate::schedule::fixture::FixtureIndex;
use crate::schedule::gameweek::{picks_round, preview_window, Round};

pub struct SquadPreview {
    snapshot: Snapshot,
    window_size: usize,
    window: Vec<Round>,
    fixture_index: FixtureIndex,
    best_cache: BestXiCache,
}

impl SquadPreview {
    pub fn new(snapshot: Snapshot, window_size: usize) -> Self {
        let window = preview_window(&snapshot.rounds, window_size);
        let fixture_index = FixtureIndex::new(&snapshot.fixtures);
        SquadPreview {
            snapshot,
            window_size,
            window,
            fixture_index,
            best_cache: BestXiCache::new(),
        }
    }

    /// Replace the snapshot. Cached Best XI results are discarded.
    pub fn reload(&mut self, snapshot: Snapshot) {
        self.window = preview_window(&snapshot.rounds, self.window_size);
        self.fixture_index = FixtureIndex::new(&snapshot.fixtures);
        self.snapshot = snapshot;
        self.best_cache.clear();
        info!("Preview reloaded: {} rounds in window", self.window.len());
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn window(&self) -> &[Round] {
        &self.window
    }

    pub fn manager(&self) -> Option<&Manager> {
        self.snapshot.manager.as_ref()
    }

    /// Round the loaded picks were submitted for.
    pub fn picks_round(&self) -> Option<&Round> {
        picks_round(&self.snapshot.rounds)
    }

    pub fn round_context(&self, index: usize) -> Option<RoundContext<'_>> {
        let round = self.window.get(index)?;
        Some(RoundContext::in_window(
            round,
            &self.window,
            &self.fixture_index,
        ))
    }

    /// The submitted lineup scored for the `index`-th window round.
    pub fn actual(&self, index: usize) -> Option<LineupResult> {
        let ctx = self.round_context(index)?;
        let s = &self.snapshot;
        Some(project_actual(&s.picks, &s.players, &ctx, &s.teams))
    }

    /// Best XI for the `index`-th window round, computed at most once per
    /// snapshot.
    pub fn best(&mut self, index: usize) -> Option<&LineupResult> {
        let round = self.window.get(index)?;
        let window = &self.window;
        let fixture_index = &self.fixture_index;
        let s = &self.snapshot;
        self.best_cache.get_or_compute(index, || {
            let ctx = RoundContext::in_window(round, window, fixture_index);
            best_lineup(&s.picks, &s.players, &ctx, &s.teams)
        })
    }

    pub fn is_best_cached(&self, index: usize) -> bool {
        self.best_cache.contains(index)
    }

    /// Next-round EP of the submitted starters, captain doubled. Zero when
    /// there is no round left to preview.
    pub fn starters_ep(&self) -> f64 {
        let Some(head) = self.window.first() else {
            return 0.0;
        };
        let ctx = RoundContext::published(head.id, self.fixture_index.for_round(head.id));
        aggregate(&self.snapshot.picks, &self.snapshot.players, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formation::Formation;
    use crate::feed::Bootstrap;
    use crate::schedule::fixture::{Fixture, Team};
    use crate::squad::pick::{Pick, Position};
    use crate::squad::player::{Player, PlayerStatus};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn round(id: u32, finished: bool, is_current: bool, is_next: bool) -> Round {
        Round {
            id,
            deadline_time: None,
            is_next,
            is_current,
            finished,
        }
    }

    fn team(id: u32, short_name: &str) -> Team {
        Team {
            id,
            name: short_name.to_string(),
            short_name: short_name.to_string(),
            code: 0,
        }
    }

    fn fixture(id: u32, round: u32, team_h: u32, team_a: u32, h: u8, a: u8) -> Fixture {
        Fixture {
            id,
            round: Some(round),
            team_h,
            team_a,
            team_h_difficulty: h,
            team_a_difficulty: a,
        }
    }

    /// Fifteen players on team 1, picks in slot order with the first
    /// goalkeeper as captain. Rounds: 1 finished (current), 2 next, 3, 4.
    /// Team 1 plays at home in round 2, away at neutral difficulty in round
    /// 3 and blanks in round 4.
    fn snapshot() -> Snapshot {
        use Position::*;
        let layout = [
            (Goalkeeper, 4.0),
            (Goalkeeper, 3.0),
            (Defender, 6.0),
            (Defender, 5.0),
            (Defender, 4.0),
            (Defender, 3.0),
            (Defender, 2.0),
            (Midfielder, 7.0),
            (Midfielder, 6.0),
            (Midfielder, 5.0),
            (Midfielder, 4.0),
            (Midfielder, 1.0),
            (Forward, 8.0),
            (Forward, 2.0),
            (Forward, 1.0),
        ];
        let players = layout
            .iter()
            .enumerate()
            .map(|(i, &(position, ep))| Player {
                id: i as u32 + 1,
                web_name: format!("P{}", i + 1),
                position,
                team: 1,
                ep_next: Some(ep),
                points_per_game: Some(ep),
                form: None,
                status: PlayerStatus::Available,
            })
            .collect();
        let picks = (0..layout.len())
            .map(|i| Pick {
                player_id: i as u32 + 1,
                slot: i as u8 + 1,
                is_captain: i == 0,
                is_vice_captain: i == 1,
            })
            .collect();

        let bootstrap = Bootstrap {
            rounds: vec![
                round(1, true, true, false),
                round(2, false, false, true),
                round(3, false, false, false),
                round(4, false, false, false),
            ],
            teams: vec![team(1, "ARS"), team(2, "CHE")],
            players,
        };
        let fixtures = vec![fixture(1, 2, 1, 2, 2, 4), fixture(2, 3, 2, 1, 3, 3)];
        Snapshot::new(bootstrap, fixtures, picks, None)
    }

    #[test]
    fn window_and_picks_round() {
        let preview = SquadPreview::new(snapshot(), 5);
        let ids: Vec<u32> = preview.window().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(preview.picks_round().map(|r| r.id), Some(1));
        assert!(preview.manager().is_none());
    }

    #[test]
    fn window_respects_size() {
        let preview = SquadPreview::new(snapshot(), 2);
        let ids: Vec<u32> = preview.window().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn starters_ep_doubles_captain() {
        let preview = SquadPreview::new(snapshot(), 5);
        // Slots 1..=11: 4*2 + 3 + (6+5+4+3+2) + (7+6+5+4)
        assert!(approx_eq(preview.starters_ep(), 53.0, 1e-9));
    }

    #[test]
    fn actual_lineup_per_round() {
        let preview = SquadPreview::new(snapshot(), 5);

        let next = preview.actual(0).unwrap();
        assert!(approx_eq(next.total_ep, 53.0, 1e-9));
        assert_eq!(next.starter_count(), 11);
        assert_eq!(next.bench.len(), 4);
        // Two keepers in the eleven is not a legal shape.
        assert!(next.formation.is_none());

        // Neutral difficulty reproduces the rate.
        let neutral = preview.actual(1).unwrap();
        assert!(approx_eq(neutral.total_ep, 53.0, 1e-9));
        assert_eq!(neutral.starters[&Position::Forward].len(), 0);

        let blank = preview.actual(2).unwrap();
        assert!(approx_eq(blank.total_ep, 0.0, 1e-9));
        assert!(blank.starters_in_order().all(|e| e.fixtures.is_empty()));

        assert!(preview.actual(3).is_none());
    }

    #[test]
    fn actual_lineup_labels_fixtures() {
        let preview = SquadPreview::new(snapshot(), 5);
        let next = preview.actual(0).unwrap();
        let keeper = &next.starters[&Position::Goalkeeper][0];
        assert_eq!(keeper.fixtures.len(), 1);
        assert_eq!(keeper.fixtures[0].to_string(), "CHE(H)");

        let away = preview.actual(1).unwrap();
        let keeper = &away.starters[&Position::Goalkeeper][0];
        assert_eq!(keeper.fixtures[0].to_string(), "CHE(a)");
    }

    #[test]
    fn best_is_cached_per_round() {
        let mut preview = SquadPreview::new(snapshot(), 5);
        assert!(!preview.is_best_cached(0));

        let best = preview.best(0).unwrap();
        assert!(approx_eq(best.total_ep, 62.0, 1e-9));
        assert_eq!(best.formation, Some(Formation::new(4, 4, 2)));
        assert_eq!(best.captain().map(|e| e.player.id), Some(13));
        assert_eq!(best.vice_captain().map(|e| e.player.id), Some(8));
        assert!(preview.is_best_cached(0));
        assert!(!preview.is_best_cached(1));

        let again = preview.best(0).unwrap().total_ep;
        assert!(approx_eq(again, 62.0, 1e-9));
    }

    #[test]
    fn best_out_of_window_is_none() {
        let mut preview = SquadPreview::new(snapshot(), 5);
        assert!(preview.best(7).is_none());
        assert!(!preview.is_best_cached(7));
    }

    #[test]
    fn reload_clears_cache() {
        let mut preview = SquadPreview::new(snapshot(), 5);
        preview.best(0);
        preview.best(1);
        assert!(preview.is_best_cached(1));

        let mut next = snapshot();
        for r in &mut next.rounds {
            r.is_next = r.id == 3;
            r.finished = r.id < 3;
        }
        preview.reload(next);

        assert!(!preview.is_best_cached(0));
        assert!(!preview.is_best_cached(1));
        let ids: Vec<u32> = preview.window().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn empty_snapshot_previews_nothing() {
        let mut preview = SquadPreview::new(Snapshot::default(), 5);
        assert!(preview.window().is_empty());
        assert!(preview.actual(0).is_none());
        assert!(preview.best(0).is_none());
        assert_eq!(preview.starters_ep(), 0.0);
    }
}
