use serenity::all::CreateActionRow;
use serenity::all::CreateButton;
use serenity::all::CreateEmbed;
use serenity::all::CreateEmbedFooter;
use serenity::all::CreateMessage;
use serenity::all::EditMessage;
use serenity::model::prelude::*;

use super::{Bot, Category};
use crate::Result;

static PANEL_TITLE: &str = "🎫 Welcome to the Support Center";
static PANEL_DESCRIPTION: &str = "Please choose one of the options below to open a ticket.";
static PANEL_FOOTER: &str = "Powered by Solace";
const PANEL_COLOUR: u32 = 0x5865F2;

// How many recent messages to scan when looking for a previously sent panel.
const PANEL_LOOKBACK: u8 = 10;

impl Bot {
    /// Posts the ticket panel into `channel_id`, editing a previously sent
    /// panel in place when one is found in the recent history. Repeated
    /// invocations converge on exactly one live panel per channel.
    #[tracing::instrument(skip_all, fields(channel_id = %channel_id))]
    pub async fn publish_panel(&self, channel_id: ChannelId) -> Result<()> {
        let guild = self.guild_id.to_partial_guild(&self.discord_client).await?;
        let embed = panel_embed(&guild);
        let components = panel_components();

        let bot_user_id = self.discord_client.get_current_user().await?.id;
        let recent = self.get_recent_messages(channel_id, PANEL_LOOKBACK).await?;
        let previous = recent
            .iter()
            .find(|message| is_panel_message(message.author.id, bot_user_id, !message.embeds.is_empty()));

        match previous {
            Some(message) => {
                self.edit_message(
                    channel_id,
                    message.id,
                    EditMessage::new().embed(embed).components(components),
                )
                .await?;
                tracing::info!("updated existing ticket panel");
            }
            None => {
                self.send_message(
                    channel_id,
                    CreateMessage::new().embed(embed).components(components),
                )
                .await?;
                tracing::info!("sent new ticket panel");
            }
        }

        Ok(())
    }
}

fn is_panel_message(author_id: UserId, bot_user_id: UserId, has_embeds: bool) -> bool {
    author_id == bot_user_id && has_embeds
}

fn panel_embed(guild: &PartialGuild) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(PANEL_TITLE)
        .description(PANEL_DESCRIPTION)
        .colour(PANEL_COLOUR)
        .footer(CreateEmbedFooter::new(PANEL_FOOTER))
        .timestamp(Timestamp::now());

    for category in Category::ALL {
        embed = embed.field(
            format!("{} {}", category.emoji(), category.label()),
            category.panel_note(),
            category != Category::ContactOwner,
        );
    }

    if let Some(icon_url) = guild.icon_url() {
        embed = embed.thumbnail(icon_url);
    }

    embed
}

fn panel_components() -> Vec<CreateActionRow> {
    let (secondary, primary): (Vec<_>, Vec<_>) = Category::ALL
        .into_iter()
        .partition(|category| *category == Category::ContactOwner);

    vec![
        CreateActionRow::Buttons(primary.into_iter().map(category_button).collect()),
        CreateActionRow::Buttons(secondary.into_iter().map(category_button).collect()),
    ]
}

fn category_button(category: Category) -> CreateButton {
    CreateButton::new(category.custom_id())
        .label(category.label())
        .emoji(ReactionType::Unicode(category.emoji().to_string()))
        .style(category.button_style())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_own_embed_messages_as_panels() {
        let bot = UserId::new(1);
        let other = UserId::new(2);

        assert!(is_panel_message(bot, bot, true));
        assert!(!is_panel_message(bot, bot, false));
        assert!(!is_panel_message(other, bot, true));
    }
}
