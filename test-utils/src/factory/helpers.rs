//! Shared helper utilities for factory methods.

/// Counter for generating unique identifiers in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Builds a syntactically valid 17 digit SteamID64 from a counter value.
///
/// # Arguments
/// - `n` - Value mixed into the low digits
///
/// # Returns
/// - `String` - SteamID64 in the `7656119` range
pub fn steam_id(n: u64) -> String {
    format!("7656119{:010}", n % 10_000_000_000)
}
