//! Prefix chat commands.
//!
//! A message starting with the configured prefix is parsed into a `Command`. Parsing
//! never touches state; the command service executes the parsed value.

use thiserror::Error;

use crate::model::{bot_state::PersistentKind, tracked::is_valid_steam_id};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Status,
    Lookup(String),
    Link(String),
    Me,
    Track { clan: String, stats: Vec<String> },
    Untrack(String),
    TrackPlayer {
        steam_id: String,
        clan_label: Option<String>,
    },
    UntrackPlayer(String),
    List,
    Toggle,
    Clear,
    Wins,
    Init(PersistentKind),
}

/// Reasons a prefixed message could not be turned into a command.
///
/// The display text is sent back to the channel as is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    #[error("Unknown command `{prefix}{name}`. Try `{prefix}help`.")]
    UnknownCommand { prefix: String, name: String },

    #[error("Usage: `{prefix}{usage}`")]
    BadArguments { prefix: String, usage: &'static str },

    #[error("`{0}` is not a valid SteamID64 (expected 17 digits).")]
    InvalidSteamId(String),
}

/// Command names with their argument syntax, in help order.
pub const USAGE: &[(&str, &str)] = &[
    ("help", "Show this help message."),
    ("status", "Show tracking state and watched clans."),
    ("lookup <steamId64>", "Show PvP stats for a player."),
    ("link <steamId64>", "Link your Discord account to a SteamID."),
    ("me", "Show stats for your linked SteamID."),
    ("track <clan> [| stat,stat...]", "Watch a clan, optionally only some stats."),
    ("untrack <clan>", "Stop watching a clan."),
    ("trackplayer <steamId64> [clan]", "Watch a player, optionally labelled with a clan."),
    ("untrackplayer <steamId64>", "Stop watching a player."),
    ("list", "List every tracker."),
    ("toggle", "Turn alerts on or off."),
    ("clear", "Delete recent messages except pinned ones and the bot embeds."),
    ("wins", "Show categories where our clan is #1 this wipe."),
    ("init <help|status|trend|leaderboard>", "Post a persistent embed the bot keeps updated."),
];

impl Command {
    /// Parses a chat message.
    ///
    /// # Arguments
    /// - `prefix` - Configured command prefix, e.g. `!`
    /// - `content` - Raw message content
    ///
    /// # Returns
    /// - `None` - Message is not a command
    /// - `Some(Ok(Command))` - Parsed command
    /// - `Some(Err(UsageError))` - Unknown command or bad arguments
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Command, UsageError>> {
        let body = content.trim().strip_prefix(prefix)?;
        let mut parts = body.split_whitespace();
        let name = parts.next()?.to_lowercase();
        let args: Vec<&str> = parts.collect();

        let usage = |usage: &'static str| UsageError::BadArguments {
            prefix: prefix.to_string(),
            usage,
        };

        let command = match (name.as_str(), args.as_slice()) {
            ("help", []) => Ok(Command::Help),
            ("status", []) => Ok(Command::Status),
            ("me", []) => Ok(Command::Me),
            ("list", []) => Ok(Command::List),
            ("toggle", []) => Ok(Command::Toggle),
            ("clear", []) => Ok(Command::Clear),
            ("wins" | "walowins", []) => Ok(Command::Wins),

            ("lookup", [steam]) => steam_id(steam).map(Command::Lookup),
            ("lookup", _) => Err(usage("lookup <steamId64>")),
            ("link", [steam]) => steam_id(steam).map(Command::Link),
            ("link", _) => Err(usage("link <steamId64>")),

            ("track", [_, ..]) => parse_track(&args.join(" "))
                .ok_or_else(|| usage("track <clan> [| stat,stat...]")),
            ("track", []) => Err(usage("track <clan> [| stat,stat...]")),
            ("untrack", [_, ..]) => Ok(Command::Untrack(args.join(" "))),
            ("untrack", []) => Err(usage("untrack <clan>")),

            ("trackplayer", [steam, label @ ..]) => {
                steam_id(steam).map(|steam_id| Command::TrackPlayer {
                    steam_id,
                    clan_label: (!label.is_empty()).then(|| label.join(" ")),
                })
            }
            ("trackplayer", []) => Err(usage("trackplayer <steamId64> [clan]")),
            ("untrackplayer", [steam]) => steam_id(steam).map(Command::UntrackPlayer),
            ("untrackplayer", _) => Err(usage("untrackplayer <steamId64>")),

            ("init", [kind]) => PersistentKind::parse(kind)
                .map(Command::Init)
                .ok_or_else(|| usage("init <help|status|trend|leaderboard>")),
            ("init", _) => Err(usage("init <help|status|trend|leaderboard>")),
            ("inithelp", []) => Ok(Command::Init(PersistentKind::Help)),
            ("initstatus", []) => Ok(Command::Init(PersistentKind::Status)),
            ("inittrend", []) => Ok(Command::Init(PersistentKind::Trend)),

            ("help" | "status" | "me" | "list" | "toggle" | "clear" | "wins" | "walowins", _) => {
                Err(usage(name_usage(&name)))
            }
            _ => Err(UsageError::UnknownCommand {
                prefix: prefix.to_string(),
                name,
            }),
        };

        Some(command)
    }

    /// Whether the author needs the admin role to run the command.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Command::Track { .. }
                | Command::Untrack(_)
                | Command::TrackPlayer { .. }
                | Command::UntrackPlayer(_)
                | Command::Toggle
                | Command::Clear
                | Command::Init(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Status => "status",
            Command::Lookup(_) => "lookup",
            Command::Link(_) => "link",
            Command::Me => "me",
            Command::Track { .. } => "track",
            Command::Untrack(_) => "untrack",
            Command::TrackPlayer { .. } => "trackplayer",
            Command::UntrackPlayer(_) => "untrackplayer",
            Command::List => "list",
            Command::Toggle => "toggle",
            Command::Clear => "clear",
            Command::Wins => "wins",
            Command::Init(_) => "init",
        }
    }
}

fn steam_id(value: &str) -> Result<String, UsageError> {
    if is_valid_steam_id(value) {
        Ok(value.trim().to_string())
    } else {
        Err(UsageError::InvalidSteamId(value.to_string()))
    }
}

/// Splits `Walo Bots | kill_player, death_player` into the clan name and its stat filter.
///
/// Everything before `|` is the clan name, so names may contain spaces. Stats accept
/// commas as well as spaces.
fn parse_track(rest: &str) -> Option<Command> {
    let (clan, stats) = rest.split_once('|').unwrap_or((rest, ""));
    let clan = clan.split_whitespace().collect::<Vec<_>>().join(" ");
    if clan.is_empty() {
        return None;
    }

    let stats = stats
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|stat| !stat.is_empty())
        .map(str::to_string)
        .collect();

    Some(Command::Track { clan, stats })
}

fn name_usage(name: &str) -> &'static str {
    match name {
        "help" => "help",
        "status" => "status",
        "me" => "me",
        "list" => "list",
        "toggle" => "toggle",
        "clear" => "clear",
        _ => "wins",
    }
}
