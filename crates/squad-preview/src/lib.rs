// Library root: re-exports all modules so integration tests and the preview
// binary can access the crate's public API.

pub mod config;
pub mod engine;
pub mod feed;
pub mod preview;
pub mod schedule;
pub mod squad;
