use serenity::all::CreateEmbed;
use serenity::all::CreateEmbedFooter;
use serenity::all::CreateMessage;
use serenity::model::prelude::*;

use super::Bot;
use crate::Result;

static WELCOME_DESCRIPTION: &str =
    "We're excited to have you here! Make sure to read the rules and enjoy your stay!";
static WELCOME_BANNER_URL: &str = "https://solbot.store/logo.png";
static WELCOME_FOOTER: &str = "Enjoy your journey!";
const WELCOME_COLOUR: u32 = 0x00FF00;

impl Bot {
    /// Greets a freshly joined member in the welcome channel.
    #[tracing::instrument(skip_all, fields(user = %member.user.id))]
    pub(crate) async fn send_welcome(&self, member: &Member) -> Result<()> {
        let guild = self.guild_id.to_partial_guild(&self.discord_client).await?;

        let embed = CreateEmbed::new()
            .title(format!(
                "👋 Welcome to {}, {}!",
                guild.name,
                member.display_name()
            ))
            .description(WELCOME_DESCRIPTION)
            .colour(WELCOME_COLOUR)
            .image(WELCOME_BANNER_URL)
            .thumbnail(member.face())
            .footer(CreateEmbedFooter::new(WELCOME_FOOTER))
            .timestamp(Timestamp::now());

        self.send_message(self.welcome_channel_id, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}
