// Squad positions and roster picks.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Fantasy API element type constants
// ---------------------------------------------------------------------------

pub const ELEMENT_TYPE_GKP: u8 = 1;
pub const ELEMENT_TYPE_DEF: u8 = 2;
pub const ELEMENT_TYPE_MID: u8 = 3;
pub const ELEMENT_TYPE_FWD: u8 = 4;

/// Number of starting slots in a squad. Slots above this are the bench.
pub const STARTING_SLOTS: u8 = 11;

/// Football positions used for squad grouping and formation rules.
///
/// Variant order is the display order (GKP, DEF, MID, FWD), so the derived
/// `Ord` can key sorted maps directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GKP")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    /// All positions in display order.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Map a fantasy API `element_type` to a position.
    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            ELEMENT_TYPE_GKP => Some(Position::Goalkeeper),
            ELEMENT_TYPE_DEF => Some(Position::Defender),
            ELEMENT_TYPE_MID => Some(Position::Midfielder),
            ELEMENT_TYPE_FWD => Some(Position::Forward),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    pub fn is_outfield(&self) -> bool {
        !matches!(self, Position::Goalkeeper)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A single roster slot, as published by the picks endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// Player id this slot refers to.
    #[serde(rename = "element")]
    pub player_id: u32,
    /// Squad order, 1-indexed. 1..=11 start, 12..=15 sit on the bench.
    #[serde(rename = "position")]
    pub slot: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

impl Pick {
    pub fn is_starter(&self) -> bool {
        self.slot <= STARTING_SLOTS
    }
}

/// Check the captaincy invariant of a full squad: exactly one captain and
/// one vice-captain, both starters, on different slots.
pub fn captaincy_is_valid(picks: &[Pick]) -> bool {
    let captains: Vec<&Pick> = picks.iter().filter(|p| p.is_captain).collect();
    let vices: Vec<&Pick> = picks.iter().filter(|p| p.is_vice_captain).collect();
    match (captains.as_slice(), vices.as_slice()) {
        ([c], [v]) => c.is_starter() && v.is_starter() && c.slot != v.slot,
        _ => false,
    }
}
