// Legal formations for a starting eleven.
//
// One goalkeeper plus ten outfield players with 3-5 defenders, 2-5
// midfielders and 1-3 forwards. That admits exactly eight shapes, listed in
// the order the optimizer evaluates them (earlier shapes win ties).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::squad::pick::Position;

pub const GOALKEEPERS: usize = 1;
pub const OUTFIELD_STARTERS: usize = 10;

/// Outfield shape of a starting eleven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl Formation {
    pub const fn new(defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Formation {
            defenders,
            midfielders,
            forwards,
        }
    }

    /// Number of starters this formation needs at `pos`.
    pub fn count(&self, pos: Position) -> usize {
        match pos {
            Position::Goalkeeper => GOALKEEPERS,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn outfield(&self) -> usize {
        self.defenders + self.midfielders + self.forwards
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// Every legal formation, in evaluation order.
pub const FORMATIONS: [Formation; 8] = [
    Formation::new(3, 5, 2),
    Formation::new(3, 4, 3),
    Formation::new(4, 5, 1),
    Formation::new(4, 4, 2),
    Formation::new(4, 3, 3),
    Formation::new(5, 4, 1),
    Formation::new(5, 3, 2),
    Formation::new(5, 2, 3),
];

/// Whether `formation` respects the per-position bounds.
pub fn is_legal(formation: &Formation) -> bool {
    formation.outfield() == OUTFIELD_STARTERS
        && (3..=5).contains(&formation.defenders)
        && (2..=5).contains(&formation.midfielders)
        && (1..=3).contains(&formation.forwards)
}
