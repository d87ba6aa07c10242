// Scoring engine: expected points, lineup totals, formations, Best XI search.

pub mod bench;
pub mod cache;
pub mod expected;
pub mod formation;
pub mod lineup;
pub mod optimizer;
pub mod projection;
