// Expected points per player per round.
//
// The window's first round uses the published projection as-is. Later rounds
// have no published projection, so EP is synthesized from the player's
// points-per-game rate scaled by fixture difficulty: each fixture contributes
// rate * (6 - difficulty) / 3, i.e. full rate at difficulty 3, five thirds at
// 1, a third at 5. Blank rounds contribute nothing; double rounds sum.

use crate::schedule::fixture::{Fixture, FixtureIndex};
use crate::schedule::gameweek::Round;
use crate::squad::player::Player;

/// Difficulty at which a fixture contributes exactly the base rate.
const NEUTRAL_DIFFICULTY: f64 = 3.0;
/// Difficulty offset: (OFFSET - difficulty) / NEUTRAL_DIFFICULTY scales the rate.
const DIFFICULTY_OFFSET: f64 = 6.0;

/// Which formula applies to a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpBasis {
    /// Trust the published next-round projection.
    Published,
    /// Derive from points-per-game and fixture difficulty.
    FixtureScaled,
}

/// Everything the calculator needs to know about the round being scored.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    pub round: u32,
    pub basis: EpBasis,
    /// Fixtures scheduled in `round`.
    pub fixtures: &'a [Fixture],
}

impl<'a> RoundContext<'a> {
    /// Context for `round` within a preview window. The window's first round
    /// is scored from the published projection, every other from fixtures.
    pub fn in_window(round: &Round, window: &[Round], index: &'a FixtureIndex) -> Self {
        let basis = if window.first().is_some_and(|head| head.id == round.id) {
            EpBasis::Published
        } else {
            EpBasis::FixtureScaled
        };
        RoundContext {
            round: round.id,
            basis,
            fixtures: index.for_round(round.id),
        }
    }

    pub fn published(round: u32, fixtures: &'a [Fixture]) -> Self {
        RoundContext {
            round,
            basis: EpBasis::Published,
            fixtures,
        }
    }

    pub fn fixture_scaled(round: u32, fixtures: &'a [Fixture]) -> Self {
        RoundContext {
            round,
            basis: EpBasis::FixtureScaled,
            fixtures,
        }
    }
}

/// Resolve an optional statistic to a usable number: missing, non-finite and
/// negative values all become 0.
pub fn numeric_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Expected points for `player` in the round described by `ctx`. Always
/// finite and >= 0.
pub fn expected_points(player: &Player, ctx: &RoundContext<'_>) -> f64 {
    match ctx.basis {
        EpBasis::Published => numeric_or_zero(player.ep_next),
        EpBasis::FixtureScaled => {
            let rate = numeric_or_zero(player.points_per_game);
            let total = ctx
                .fixtures
                .iter()
                .filter(|f| f.round == Some(ctx.round))
                .filter_map(|f| f.difficulty_for(player.team))
                .map(|difficulty| difficulty_scaled(rate, difficulty))
                .sum::<f64>();
            numeric_or_zero(Some(total))
        }
    }
}

/// One fixture's contribution. Overflow and out-of-scale difficulties give 0.
fn difficulty_scaled(rate: f64, difficulty: u8) -> f64 {
    numeric_or_zero(Some(
        rate * (DIFFICULTY_OFFSET - f64::from(difficulty)) / NEUTRAL_DIFFICULTY,
    ))
}
