//! HTTP client for the Rusticated stats leaderboard API.

use std::time::Duration;

use serenity::async_trait;

use crate::{
    api::LeaderboardSource,
    config::Config,
    error::api::ApiError,
    model::leaderboard::{LeaderboardResponse, LeaderboardRow, TableQuery},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Leaderboard client bound to one server and wipe.
pub struct RusticatedClient {
    http: reqwest::Client,
    base_url: String,
    server_id: String,
    server_wipe_id: String,
    org_id: Option<String>,
}

impl RusticatedClient {
    /// Builds a client from configuration.
    ///
    /// # Arguments
    /// - `config` - Supplies base URL, server id, wipe id and optional org id
    ///
    /// # Returns
    /// - `Ok(RusticatedClient)` - Client with a 10 second request timeout
    /// - `Err(ApiError::Http)` - The TLS backend could not be initialized
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            server_id: config.server_id.clone(),
            server_wipe_id: config.server_wipe_id.clone(),
            org_id: config.org_id.clone(),
        })
    }

    /// Query string parameters for a table request.
    pub fn query_params(&self, query: &TableQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("offset", "0".to_string()),
            ("sortDir", "desc".to_string()),
            ("serverId", self.server_id.clone()),
            ("serverWipeId", self.server_wipe_id.clone()),
            ("type", query.kind.as_str().to_string()),
            ("group", query.group.clone()),
            ("sortBy", query.sort_by.clone()),
        ];

        if let Some(org_id) = &self.org_id {
            params.push(("orgId", org_id.clone()));
        }

        params
    }
}

#[async_trait]
impl LeaderboardSource for RusticatedClient {
    async fn fetch_table(&self, query: &TableQuery) -> Result<Vec<LeaderboardRow>, ApiError> {
        tracing::debug!(
            "Requesting {} leaderboard group={} sortBy={}",
            query.kind,
            query.group,
            query.sort_by
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                context: format!("{} {}/{}", query.kind, query.group, query.sort_by),
            });
        }

        let body = response.text().await?;
        let parsed: LeaderboardResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))?;

        parsed.into_rows()
    }
}
