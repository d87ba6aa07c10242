// Bench ordering for players left out of a selected eleven.
//
// Outfield substitutes come first, grouped defenders, midfielders, forwards
// and then sorted by descending EP (stable, so the group order settles ties).
// Spare goalkeepers always sit at the end.

use std::cmp::Ordering;

use crate::engine::lineup::ScoredPick;
use crate::squad::pick::{Pick, STARTING_SLOTS};

fn by_ep_desc(a: &ScoredPick<'_>, b: &ScoredPick<'_>) -> Ordering {
    b.ep.partial_cmp(&a.ep).unwrap_or(Ordering::Equal)
}

/// Order the non-selected players into a bench. Slots are renumbered from
/// 12 and any captaincy flags are cleared.
pub fn order_bench<'a>(remaining: Vec<ScoredPick<'a>>) -> Vec<ScoredPick<'a>> {
    let (mut outfield, mut keepers): (Vec<_>, Vec<_>) = remaining
        .into_iter()
        .partition(|s| s.player.position.is_outfield());

    outfield.sort_by_key(|s| s.player.position);
    outfield.sort_by(by_ep_desc);
    keepers.sort_by(by_ep_desc);

    outfield
        .into_iter()
        .chain(keepers)
        .enumerate()
        .map(|(i, s)| ScoredPick {
            pick: Pick {
                player_id: s.pick.player_id,
                slot: STARTING_SLOTS + 1 + i as u8,
                is_captain: false,
                is_vice_captain: false,
            },
            ..s
        })
        .collect()
}
