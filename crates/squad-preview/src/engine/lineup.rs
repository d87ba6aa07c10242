// Lineup EP aggregation.

use tracing::debug;

use crate::engine::expected::{expected_points, numeric_or_zero, RoundContext};
use crate::squad::pick::Pick;
use crate::squad::player::{Player, PlayerDirectory};

/// Captain's points count this many times.
pub const CAPTAIN_MULTIPLIER: f64 = 2.0;

/// A pick joined with its player and the player's EP for one round.
#[derive(Debug, Clone)]
pub struct ScoredPick<'a> {
    pub pick: Pick,
    pub player: &'a Player,
    pub ep: f64,
}

impl ScoredPick<'_> {
    /// EP this pick adds to a lineup total: captain doubled, bench nothing.
    ///
    /// The vice-captain is never doubled. Its benefit only applies when the
    /// captain does not play, and there is no minutes data to know that.
    pub fn contribution(&self) -> f64 {
        if !self.pick.is_starter() {
            0.0
        } else if self.pick.is_captain {
            numeric_or_zero(Some(self.ep * CAPTAIN_MULTIPLIER))
        } else {
            self.ep
        }
    }
}

/// Join picks with the directory and score each one, keeping pick order.
/// Picks whose player is not in the directory are dropped.
pub fn score_picks<'a>(
    picks: &[Pick],
    players: &'a PlayerDirectory,
    ctx: &RoundContext<'_>,
) -> Vec<ScoredPick<'a>> {
    picks
        .iter()
        .filter_map(|pick| {
            let Some(player) = players.get(pick.player_id) else {
                debug!(player_id = pick.player_id, "pick references unknown player, skipping");
                return None;
            };
            Some(ScoredPick {
                pick: pick.clone(),
                player,
                ep: expected_points(player, ctx),
            })
        })
        .collect()
}

/// Total EP of scored picks. Summed in slot order so the result does not
/// depend on the order the picks arrive in. An overflowing sum resolves to 0
/// like any other non-finite value.
pub fn lineup_total(scored: &[ScoredPick<'_>]) -> f64 {
    let mut ordered: Vec<&ScoredPick<'_>> = scored.iter().collect();
    ordered.sort_by_key(|s| (s.pick.slot, s.pick.player_id));
    numeric_or_zero(Some(ordered.iter().map(|s| s.contribution()).sum()))
}

/// Total EP of the starting eleven in `picks` for one round.
pub fn aggregate(picks: &[Pick], players: &PlayerDirectory, ctx: &RoundContext<'_>) -> f64 {
    lineup_total(&score_picks(picks, players, ctx))
}
