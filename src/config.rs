use crate::error::{config::ConfigError, AppError};

const DEFAULT_DATABASE_URL: &str = "sqlite://rustinity.db?mode=rwc";
const DEFAULT_API_BASE_URL: &str = "https://stats.rusticated.com/api/leaderboard";
const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 180;
const DEFAULT_SERVER_ID: &str = "us-2x-monthly-large";
const DEFAULT_SERVER_WIPE_ID: &str = "4033";
const DEFAULT_CLAN_NAME: &str = "Walobots";

/// Message ids of persistent embeds supplied through the environment.
///
/// Used only when the database has no id stored for the embed yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageIdConfig {
    pub leaderboard: Option<u64>,
    pub trend: Option<u64>,
    pub help: Option<u64>,
    pub status: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    /// Channel receiving alerts and the persistent embeds.
    pub channel_id: u64,
    pub command_prefix: String,
    pub poll_interval_secs: u64,
    pub alert_role_id: Option<u64>,
    pub admin_role_id: Option<u64>,

    pub api_base_url: String,
    pub server_id: String,
    pub server_wipe_id: String,
    pub org_id: Option<String>,

    /// The bot's own clan, excluded from spike alerts and used by `wins`.
    pub clan_name: String,
    pub watch_clans: Vec<String>,
    pub watch_players: Vec<String>,
    /// `(steam_id, clan label)` pairs from `PLAYER_CLAN_OVERRIDES`.
    pub player_clan_overrides: Vec<(String, String)>,
    pub tracking_enabled: bool,

    pub message_ids: MessageIdConfig,
}

impl Config {
    /// Loads configuration from process environment variables.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and every value valid
    /// - `Err(AppError::ConfigErr)` - Missing required variable or invalid value
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated the same as unset ones.
    ///
    /// # Arguments
    /// - `lookup` - Returns the raw value of a variable by name
    ///
    /// # Returns
    /// - `Ok(Config)` - Parsed configuration with defaults applied
    /// - `Err(AppError::ConfigErr)` - Missing required variable or invalid value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require =
            |name: &str| get(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()));

        let channel_id = parse_id("DISCORD_CHANNEL_ID", &require("DISCORD_CHANNEL_ID")?)?;

        let poll_interval_secs = match get("POLL_INTERVAL_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(invalid("POLL_INTERVAL_SECS", &raw, "expected a positive integer").into())
                }
            },
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        let tracking_enabled = match get("TRACKING_ENABLED") {
            Some(raw) => parse_bool("TRACKING_ENABLED", &raw)?,
            None => false,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            discord_bot_token: require("DISCORD_BOT_TOKEN")?,
            channel_id,
            command_prefix: get("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            poll_interval_secs,
            alert_role_id: optional_id("ALERT_ROLE_ID", get("ALERT_ROLE_ID"))?,
            admin_role_id: optional_id("ADMIN_ROLE_ID", get("ADMIN_ROLE_ID"))?,
            api_base_url: get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            server_id: get("SERVER_ID").unwrap_or_else(|| DEFAULT_SERVER_ID.to_string()),
            server_wipe_id: get("SERVER_WIPE_ID")
                .unwrap_or_else(|| DEFAULT_SERVER_WIPE_ID.to_string()),
            org_id: get("ORG_ID"),
            clan_name: get("CLAN_NAME").unwrap_or_else(|| DEFAULT_CLAN_NAME.to_string()),
            watch_clans: split_csv(get("WATCH_CLAN_NAME")),
            watch_players: split_csv(get("WATCH_PLAYER_IDS")),
            player_clan_overrides: parse_overrides(get("PLAYER_CLAN_OVERRIDES"))?,
            tracking_enabled,
            message_ids: MessageIdConfig {
                leaderboard: optional_id("LEADERBOARD_MESSAGE_ID", get("LEADERBOARD_MESSAGE_ID"))?,
                trend: optional_id("TREND_MESSAGE_ID", get("TREND_MESSAGE_ID"))?,
                help: optional_id("HELP_MESSAGE_ID", get("HELP_MESSAGE_ID"))?,
                status: optional_id("STATUS_MESSAGE_ID", get("STATUS_MESSAGE_ID"))?,
            },
        })
    }
}

fn invalid(name: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_id(name: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>()
        .map_err(|_| invalid(name, raw, "expected a numeric Discord id"))
}

fn optional_id(name: &str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|raw| parse_id(name, &raw)).transpose()
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, raw, "expected true or false")),
    }
}

fn split_csv(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parses `steamid:clan` pairs, e.g. `7656119...:Walobots,7656119...:Other`.
fn parse_overrides(raw: Option<String>) -> Result<Vec<(String, String)>, ConfigError> {
    split_csv(raw.clone())
        .into_iter()
        .map(|pair| match pair.split_once(':') {
            Some((steam, clan)) if !steam.trim().is_empty() && !clan.trim().is_empty() => {
                Ok((steam.trim().to_string(), clan.trim().to_string()))
            }
            _ => Err(invalid(
                "PLAYER_CLAN_OVERRIDES",
                raw.as_deref().unwrap_or_default(),
                "expected comma separated steamid:clan pairs",
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DISCORD_BOT_TOKEN", "token"),
        ("DISCORD_CHANNEL_ID", "1234"),
    ];

    #[test]
    fn applies_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.channel_id, 1234);
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.poll_interval_secs, 180);
        assert_eq!(config.server_id, "us-2x-monthly-large");
        assert_eq!(config.server_wipe_id, "4033");
        assert_eq!(config.clan_name, "Walobots");
        assert_eq!(config.database_url, "sqlite://rustinity.db?mode=rwc");
        assert!(!config.tracking_enabled);
        assert!(config.watch_clans.is_empty());
        assert_eq!(config.message_ids, MessageIdConfig::default());
    }

    #[test]
    fn reports_missing_token() {
        let result = load(&[("DISCORD_CHANNEL_ID", "1234")]);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(ref name))) if name == "DISCORD_BOT_TOKEN"
        ));
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let result = load(&[("DISCORD_BOT_TOKEN", "token"), ("DISCORD_CHANNEL_ID", "  ")]);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(_)))
        ));
    }

    #[test]
    fn rejects_non_numeric_channel() {
        let result = load(&[("DISCORD_BOT_TOKEN", "token"), ("DISCORD_CHANNEL_ID", "general")]);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { .. }))
        ));
    }

    #[test]
    fn parses_watch_lists_and_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("WATCH_CLAN_NAME", "Walobots, Rivals ,"));
        vars.push(("WATCH_PLAYER_IDS", "76561198000000001"));
        vars.push(("PLAYER_CLAN_OVERRIDES", "76561198000000002:Walobots"));
        vars.push(("TRACKING_ENABLED", "true"));
        vars.push(("ALERT_ROLE_ID", "555"));
        vars.push(("TREND_MESSAGE_ID", "999"));

        let config = load(&vars).unwrap();

        assert_eq!(config.watch_clans, vec!["Walobots", "Rivals"]);
        assert_eq!(config.watch_players, vec!["76561198000000001"]);
        assert_eq!(
            config.player_clan_overrides,
            vec![("76561198000000002".to_string(), "Walobots".to_string())]
        );
        assert!(config.tracking_enabled);
        assert_eq!(config.alert_role_id, Some(555));
        assert_eq!(config.message_ids.trend, Some(999));
    }

    #[test]
    fn rejects_malformed_override() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PLAYER_CLAN_OVERRIDES", "76561198000000002"));

        assert!(load(&vars).is_err());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("POLL_INTERVAL_SECS", "0"));

        assert!(load(&vars).is_err());
    }
}
