// Season schedule: rounds, fixtures, difficulty lookups.

pub mod fixture;
pub mod gameweek;
