//! Background jobs.
//!
//! The only job is the leaderboard poll, repeated every `POLL_INTERVAL_SECS`.

pub mod poll;
