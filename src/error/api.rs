use thiserror::Error;

/// Failures talking to the leaderboard API.
///
/// All variants are transient from the bot's point of view: the current poll cycle
/// is skipped and the next tick tries again.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure, timeout or TLS error.
    #[error("Leaderboard request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success HTTP status.
    #[error("Leaderboard API returned status {status} for {context}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Which table was requested
        context: String,
    },

    /// The body could not be decoded or lacks `data.entries`.
    #[error("Malformed leaderboard response: {0}")]
    Malformed(String),
}
