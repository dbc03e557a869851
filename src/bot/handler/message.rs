use serenity::all::{Context, Message, RoleId};

use crate::{
    model::command::Command,
    service::{
        command::{CommandContext, CommandService},
        notifier::{DiscordNotifier, Notifier, OutgoingMessage},
    },
    state::AppState,
};

/// Handle a message that may carry a prefix command
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    let prefix = &state.config.command_prefix;
    let Some(parsed) = Command::parse(prefix, &message.content) else {
        return;
    };

    let notifier = DiscordNotifier::new(ctx.http.clone());
    let channel_id = message.channel_id.get();

    let replies = match parsed {
        Err(usage) => vec![OutgoingMessage::text(usage.to_string())],
        Ok(command) => {
            let name = command.name();
            let command_ctx = CommandContext {
                author_id: message.author.id.get(),
                channel_id,
                is_admin: is_admin(state, &message),
            };

            tracing::debug!("Running {}{} for {}", prefix, name, message.author.name);

            match CommandService::new(state, &notifier)
                .execute(&command_ctx, command)
                .await
            {
                Ok(replies) => replies,
                Err(e) => {
                    tracing::error!("Command {}{} failed: {}", prefix, name, e);
                    vec![OutgoingMessage::text(format!(
                        "Something went wrong running `{prefix}{name}`. Check the bot logs."
                    ))]
                }
            }
        }
    };

    for reply in replies {
        if let Err(e) = notifier.send(channel_id, reply).await {
            tracing::error!("Failed to reply in channel {}: {}", channel_id, e);
        }
    }
}

/// Without a configured admin role every member counts as an admin.
fn is_admin(state: &AppState, message: &Message) -> bool {
    let Some(role) = state.config.admin_role_id else {
        return true;
    };

    message
        .member
        .as_ref()
        .is_some_and(|member| member.roles.contains(&RoleId::new(role)))
}
