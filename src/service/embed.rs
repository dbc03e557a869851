//! Discord embed and alert text builders.
//!
//! Builders are pure: they take already fetched data and return serenity builders, so
//! both the poll cycle and commands share the same formatting.

use chrono::{DateTime, Utc};
use serenity::all::{CreateEmbed, CreateEmbedFooter, Timestamp};
use std::collections::BTreeMap;

use crate::{
    error::{internal::InternalError, AppError},
    model::{
        alert::{AlertEvent, AlertKind},
        bot_state::BotState,
        command::USAGE,
        history::TrendRow,
        leaderboard::LeaderboardRow,
        metric::{self, DISPLAY_METRICS, TREND_METRICS, TREND_TOP_N},
        tracked::EntityKind,
    },
};

const COLOR_HELP: u32 = 0x2ECC71;
const COLOR_ON: u32 = 0x2ECC71;
const COLOR_OFF: u32 = 0xE74C3C;
const COLOR_LEADERBOARD: u32 = 0x00AAFF;
const COLOR_TREND: u32 = 0xFFAA00;
const COLOR_WINS: u32 = 0x55FF55;
const COLOR_NO_WINS: u32 = 0xFF5555;

/// Formats a stat with thousands separators, e.g. `12,345`.
///
/// Fractional values such as gambling totals keep up to two decimals (`1.2`).
pub fn format_count(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let whole = rounded.abs().trunc() as u64;
    let cents = ((rounded.abs() - whole as f64) * 100.0).round() as u64;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if cents > 0 {
        let fraction = format!("{cents:02}");
        grouped.push('.');
        grouped.push_str(fraction.trim_end_matches('0'));
    }

    grouped
}

/// Converts a time into an embed timestamp.
///
/// # Returns
/// - `Ok(Timestamp)` - Discord timestamp
/// - `Err(AppError::InternalErr)` - Time outside the range Discord accepts
fn embed_timestamp(time: DateTime<Utc>) -> Result<Timestamp, AppError> {
    Timestamp::from_unix_timestamp(time.timestamp()).map_err(|e| {
        InternalError::InvalidDiscordTimestamp {
            timestamp: time.timestamp(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Builds the text of an alert message.
///
/// # Arguments
/// - `alert` - Alert produced by the poll cycle
/// - `alert_role_id` - Role mentioned in front of the alert, if configured
pub fn alert_text(alert: &AlertEvent, alert_role_id: Option<u64>) -> String {
    let stat = &alert.metric.stat;
    let group = &alert.metric.group;
    let change = format!(
        "Δ +{} (now {})",
        format_count(alert.delta),
        format_count(alert.new_value)
    );

    let mut text = match (alert.kind, alert.entity.kind) {
        (AlertKind::Increase, EntityKind::Clan) => format!(
            "[WATCH] Clan `{}` had a stat change for `{}` in group `{}`:\n{}",
            alert.display_name, stat, group, change
        ),
        (AlertKind::Increase, EntityKind::Player) => format!(
            "[PLAYER WATCH] `{}` ({}) had a stat change for `{}` in group `{}`:\n{}",
            alert.display_name,
            alert.clan_label.as_deref().unwrap_or("no clan"),
            stat,
            group,
            change
        ),
        (AlertKind::Spike, _) => {
            let label = metric::find_by_id(&alert.metric)
                .map(|metric| metric.key)
                .unwrap_or(stat.as_str());
            format!(
                "[SPIKE] Clan `{}` had a large increase in **{}**:\n{}",
                alert.display_name, label, change
            )
        }
        (AlertKind::RoundEnded, kind) => format!(
            "[ROUND ENDED] {} `{}` stats were reset (`{}` in group `{}` went from {} to {}). \
             New baseline stored.",
            match kind {
                EntityKind::Clan => "Clan",
                EntityKind::Player => "Player",
            },
            alert.display_name,
            stat,
            group,
            format_count(alert.old_value),
            format_count(alert.new_value)
        ),
    };

    text.push_str(&format!("\nTime: <t:{}:F>", alert.observed_at.timestamp()));
    if let Some(rank) = alert.rank {
        text.push_str(&format!(" • Rank #{rank}"));
    }

    match alert_role_id {
        Some(role) => format!("<@&{role}> {text}"),
        None => text,
    }
}

/// Builds the embed listing every command.
///
/// # Arguments
/// - `prefix` - Configured command prefix
pub fn help_embed(prefix: &str) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("Rustinity Bot Commands")
        .description(format!(
            "Commands start with `{prefix}`. Commands marked 🔒 need the admin role."
        ))
        .color(COLOR_HELP);

    USAGE.iter().fold(embed, |embed, (usage, description)| {
        let locked = if requires_admin(usage) { " 🔒" } else { "" };
        embed.field(format!("{prefix}{usage}{locked}"), *description, false)
    })
}

fn requires_admin(usage: &str) -> bool {
    let name = usage.split_whitespace().next().unwrap_or_default();
    matches!(
        name,
        "track" | "untrack" | "trackplayer" | "untrackplayer" | "toggle" | "clear" | "init"
    )
}

/// Builds the tracking status embed.
///
/// # Arguments
/// - `state` - Current bot state
/// - `prefix` - Configured command prefix, used in the footer hints
pub fn status_embed(state: &BotState, prefix: &str) -> CreateEmbed {
    let (tracking, color) = if state.tracking_enabled {
        ("🟢 ON", COLOR_ON)
    } else {
        ("🔴 OFF", COLOR_OFF)
    };

    let mut clans: Vec<&str> = state
        .tracked_of_kind(EntityKind::Clan)
        .map(|tracked| tracked.display_name.as_str())
        .collect();
    clans.sort_by_key(|name| name.to_lowercase());
    clans.dedup_by(|a, b| a.eq_ignore_ascii_case(b));

    let clan_list = if clans.is_empty() {
        "_No clans are currently monitored_".to_string()
    } else {
        clans
            .iter()
            .map(|name| format!("• `{name}`"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let players: Vec<String> = state
        .tracked_of_kind(EntityKind::Player)
        .map(|tracked| match &tracked.clan_label {
            Some(label) => format!("• `{}` ({})", tracked.display_name, label),
            None => format!("• `{}`", tracked.display_name),
        })
        .collect();
    let player_list = if players.is_empty() {
        "_No players are currently monitored_".to_string()
    } else {
        players.join("\n")
    };

    let last_cycle = match state.snapshot.taken_at {
        Some(taken_at) => format!("<t:{}:R>", taken_at.timestamp()),
        None => "Never".to_string(),
    };

    CreateEmbed::new()
        .title("📊 Bot Tracking Status")
        .description("Current tracking state and watched clans.")
        .color(color)
        .field("Tracking", tracking, false)
        .field("Watched Clans", clan_list, false)
        .field("Watched Players", player_list, false)
        .field("Total Watched", (clans.len() + players.len()).to_string(), true)
        .field("Last Poll", last_cycle, true)
        .footer(CreateEmbedFooter::new(format!(
            "Use {prefix}toggle to toggle tracking • \
             Use {prefix}track <clan> / {prefix}untrack <clan> to manage watched clans"
        )))
}

/// Builds the top-2 clan leaderboard for the display metrics.
///
/// # Arguments
/// - `tables` - Clan table rows keyed by metric key, in rank order
/// - `server_id` - Server shown in the footer
/// - `now` - Update time
pub fn leaderboard_embed(
    tables: &BTreeMap<&str, Vec<LeaderboardRow>>,
    server_id: &str,
    now: DateTime<Utc>,
) -> Result<CreateEmbed, AppError> {
    let mut embed = CreateEmbed::new()
        .title("Clan Leaderboard (Top 2)")
        .color(COLOR_LEADERBOARD)
        .footer(CreateEmbedFooter::new(format!("Server: {server_id}")))
        .timestamp(embed_timestamp(now)?);

    for key in DISPLAY_METRICS {
        let Some(metric) = metric::find(key) else {
            continue;
        };

        let lines: Vec<String> = tables
            .get(key)
            .map(|rows| {
                rows.iter()
                    .take(2)
                    .zip(["🥇", "🥈"])
                    .map(|(row, medal)| {
                        format!(
                            "{} #{} **{}** — {}",
                            medal,
                            rank_label(row.rank),
                            row.clan_name.as_deref().unwrap_or("Unknown"),
                            format_count(row.stat(metric.sort_by).unwrap_or(0.0))
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let value = if lines.is_empty() {
            "No data.".to_string()
        } else {
            lines.join("\n")
        };
        embed = embed.field(metric.label, value, false);
    }

    Ok(embed)
}

/// Builds the 12-hour trend embed.
///
/// # Arguments
/// - `trends` - Per-clan trend rows keyed by metric key, largest gain first
/// - `server_id` - Server shown in the footer
/// - `now` - Update time
pub fn trend_embed(
    trends: &BTreeMap<&str, Vec<TrendRow>>,
    server_id: &str,
    now: DateTime<Utc>,
) -> Result<CreateEmbed, AppError> {
    let mut embed = CreateEmbed::new()
        .title("12-Hour Clan Trend (Top 5)")
        .color(COLOR_TREND)
        .footer(CreateEmbedFooter::new(format!(
            "Server: {server_id} • Trend window: last 12h"
        )))
        .timestamp(embed_timestamp(now)?);

    for key in TREND_METRICS {
        let Some(metric) = metric::find(key) else {
            continue;
        };

        let value = match trends.get(key) {
            None => "No data yet.".to_string(),
            Some(rows) if rows.is_empty() => "No data yet.".to_string(),
            Some(rows) => {
                let lines: Vec<String> = rows
                    .iter()
                    .take(TREND_TOP_N)
                    .filter(|row| row.delta > 0.0)
                    .map(|row| {
                        format!(
                            "#{} **{}** — {}  _(Δ +{} in 12h)_",
                            rank_label(row.rank),
                            row.clan_name,
                            format_count(row.end),
                            format_count(row.delta)
                        )
                    })
                    .collect();
                if lines.is_empty() {
                    "No positive gains in last 12 hours.".to_string()
                } else {
                    lines.join("\n")
                }
            }
        };
        embed = embed.field(metric.label, value, false);
    }

    Ok(embed)
}

/// Builds a PvP stats embed for one player row.
///
/// Missing or non-numeric stats show as zero.
///
/// # Arguments
/// - `steam_id` - SteamID64 of the player
/// - `row` - Player row from the PvP table sorted by kills
pub fn player_stats_embed(steam_id: &str, row: &LeaderboardRow) -> CreateEmbed {
    let username = row.username.as_deref().unwrap_or("Unknown");
    let kills = row.stat("kill_player").unwrap_or(0.0);
    let deaths = row.stat("death_player").unwrap_or(0.0);
    let kdr = row.stat("kdr").unwrap_or(0.0);
    let playtime = row.stat("playtime").unwrap_or(0.0).max(0.0) as u64;

    CreateEmbed::new()
        .title(format!("Stats for {username}"))
        .description(format!("SteamID: `{steam_id}`"))
        .color(COLOR_LEADERBOARD)
        .field("Leaderboard Rank (PvP kills)", rank_label(row.rank), false)
        .field("Kills", format_count(kills), true)
        .field("Deaths", format_count(deaths), true)
        .field("K/D Ratio", format!("{kdr:.2}"), true)
        .field(
            "Playtime (this wipe)",
            format!("{}h {}m", playtime / 3600, (playtime % 3600) / 60),
            false,
        )
}

/// Builds the wipe wins summary.
///
/// # Arguments
/// - `clan` - Configured clan name
/// - `wipe_id` - Server wipe id
/// - `server_id` - Server shown in the footer
/// - `wins` - Labels of metrics where the clan is ranked first
pub fn wins_embed(clan: &str, wipe_id: &str, server_id: &str, wins: &[&str]) -> CreateEmbed {
    let embed = if wins.is_empty() {
        CreateEmbed::new()
            .title(format!("{clan} — Wipe {wipe_id} Results"))
            .description(format!(
                "{clan} has **not** secured 1st place in any tracked categories yet for \
                 wipe `{wipe_id}`.\n\nKeep grinding! 💪"
            ))
            .color(COLOR_NO_WINS)
    } else {
        let items = wins
            .iter()
            .map(|label| format!("• {label}"))
            .collect::<Vec<_>>()
            .join("\n");
        CreateEmbed::new()
            .title(format!("{clan} Wipe Wins 🎉"))
            .description(format!(
                "{clan} has won the competition for the following categories on wipe \
                 `{wipe_id}`:\n\n{items}"
            ))
            .color(COLOR_WINS)
    };

    embed.footer(CreateEmbedFooter::new(format!(
        "Server: {server_id} • Data from Rusticated stats"
    )))
}

fn rank_label(rank: Option<i64>) -> String {
    rank.map(|rank| rank.to_string())
        .unwrap_or_else(|| "?".to_string())
}
