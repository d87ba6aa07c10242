// Squad model: positions, picks, players.

pub mod pick;
pub mod player;
