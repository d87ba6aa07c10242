// Best XI search.
//
// Algorithm:
// 1. Score every roster member once and split them into four position pools.
// 2. Stable-sort each pool by descending EP (ties keep roster order).
// 3. For each formation the pools can field, take the top goalkeeper and the
//    top D/M/F of each outfield pool.
// 4. Captain is the highest-EP starter, vice-captain the second highest.
//    Ties go to the earlier starter in GK, DEF, MID, FWD iteration order.
// 5. Candidate total = starter EPs with the captain counted twice.
// 6. Keep the strictly best total; earlier formations win ties.
//
// Top-K per pool is a greedy heuristic. Within one formation it maximizes
// both the starter sum and the captain's bonus.

use std::cmp::Ordering;

use tracing::debug;

use crate::engine::bench::order_bench;
use crate::engine::expected::{numeric_or_zero, RoundContext};
use crate::engine::formation::{Formation, FORMATIONS};
use crate::engine::lineup::{score_picks, ScoredPick, CAPTAIN_MULTIPLIER};
use crate::squad::pick::{Pick, Position};
use crate::squad::player::PlayerDirectory;

/// The winning eleven with its bench.
#[derive(Debug, Clone)]
pub struct SquadSelection<'a> {
    pub formation: Formation,
    /// Starters in GK, DEF, MID, FWD order, each pool by descending EP.
    /// Slots are renumbered 1..=11 and captaincy is reassigned.
    pub starters: Vec<ScoredPick<'a>>,
    pub bench: Vec<ScoredPick<'a>>,
    pub total_ep: f64,
}

/// Roster members split by position, each pool sorted by descending EP.
struct Pools<'a> {
    by_position: [Vec<ScoredPick<'a>>; 4],
}

impl<'a> Pools<'a> {
    fn new(scored: Vec<ScoredPick<'a>>) -> Self {
        let mut by_position: [Vec<ScoredPick<'a>>; 4] = Default::default();
        for s in scored {
            by_position[s.player.position as usize].push(s);
        }
        for pool in &mut by_position {
            pool.sort_by(|a, b| b.ep.partial_cmp(&a.ep).unwrap_or(Ordering::Equal));
        }
        Pools { by_position }
    }

    fn pool(&self, pos: Position) -> &[ScoredPick<'a>] {
        &self.by_position[pos as usize]
    }

    fn can_field(&self, formation: &Formation) -> bool {
        Position::ALL
            .iter()
            .all(|&pos| self.pool(pos).len() >= formation.count(pos))
    }

    /// Starters of `formation` in iteration order.
    fn starters(&self, formation: Formation) -> impl Iterator<Item = &ScoredPick<'a>> {
        Position::ALL
            .into_iter()
            .flat_map(move |pos| self.pool(pos)[..formation.count(pos)].iter())
    }
}

/// A scored formation, before materialization.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    formation: Formation,
    total_ep: f64,
    /// Indices into the formation's starter iteration order.
    captain: usize,
    vice_captain: usize,
}

/// Index of the highest EP in `eps`, skipping `exclude`. First wins ties.
fn argmax(eps: &[f64], exclude: Option<usize>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &ep) in eps.iter().enumerate() {
        if Some(i) == exclude {
            continue;
        }
        match best {
            Some(b) if ep <= eps[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

fn evaluate(pools: &Pools<'_>, formation: Formation) -> Option<Candidate> {
    if !pools.can_field(&formation) {
        return None;
    }
    let eps: Vec<f64> = pools.starters(formation).map(|s| s.ep).collect();
    let captain = argmax(&eps, None)?;
    let vice_captain = argmax(&eps, Some(captain))?;
    let total_ep = numeric_or_zero(Some(
        eps.iter().sum::<f64>() + eps[captain] * (CAPTAIN_MULTIPLIER - 1.0),
    ));
    Some(Candidate {
        formation,
        total_ep,
        captain,
        vice_captain,
    })
}

/// Candidate totals for every formation the roster can field, in
/// evaluation order.
pub fn formation_totals(
    picks: &[Pick],
    players: &PlayerDirectory,
    ctx: &RoundContext<'_>,
) -> Vec<(Formation, f64)> {
    let pools = Pools::new(score_picks(picks, players, ctx));
    FORMATIONS
        .iter()
        .filter_map(|&f| evaluate(&pools, f))
        .map(|c| (c.formation, c.total_ep))
        .collect()
}

/// Find the highest-EP legal eleven for the round described by `ctx`.
///
/// Returns `None` when the roster cannot field any legal formation (for
/// example fewer than three defenders or no goalkeeper). The input picks are
/// never modified; the selection holds fresh copies.
pub fn best_xi<'a>(
    picks: &[Pick],
    players: &'a PlayerDirectory,
    ctx: &RoundContext<'_>,
) -> Option<SquadSelection<'a>> {
    let pools = Pools::new(score_picks(picks, players, ctx));

    let mut best: Option<Candidate> = None;
    for &formation in &FORMATIONS {
        let Some(candidate) = evaluate(&pools, formation) else {
            debug!(round = ctx.round, %formation, "formation not fieldable");
            continue;
        };
        if best.map_or(true, |b| candidate.total_ep > b.total_ep) {
            best = Some(candidate);
        }
    }

    let Some(winner) = best else {
        debug!(round = ctx.round, "no legal formation for roster");
        return None;
    };
    debug!(
        round = ctx.round,
        formation = %winner.formation,
        total_ep = winner.total_ep,
        "best XI selected"
    );

    Some(materialize(pools, winner))
}

/// Turn the winning candidate into concrete starter and bench picks.
fn materialize(pools: Pools<'_>, winner: Candidate) -> SquadSelection<'_> {
    let mut starters = Vec::with_capacity(11);
    let mut remaining = Vec::new();

    for (pos, pool) in Position::ALL.into_iter().zip(pools.by_position) {
        let take = winner.formation.count(pos);
        for (rank, s) in pool.into_iter().enumerate() {
            if rank < take {
                starters.push(s);
            } else {
                remaining.push(s);
            }
        }
    }

    for (i, s) in starters.iter_mut().enumerate() {
        s.pick = Pick {
            player_id: s.pick.player_id,
            slot: i as u8 + 1,
            is_captain: i == winner.captain,
            is_vice_captain: i == winner.vice_captain,
        };
    }

    SquadSelection {
        formation: winner.formation,
        starters,
        bench: order_bench(remaining),
        total_ep: winner.total_ep,
    }
}
