mod categories;
pub mod helpers;
mod panel;
mod tickets;
mod welcome;

pub use categories::Category;

use std::collections::HashMap;
use std::sync::Arc;

use serenity::all::ComponentInteraction;
use serenity::all::ComponentInteractionDataKind;
use serenity::all::CreateInteractionResponse;
use serenity::all::CreateInteractionResponseFollowup;
use serenity::all::CreateInteractionResponseMessage;
use serenity::all::Interaction;
use serenity::all::ModalInteraction;
use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use serenity::http::Http;
use serenity::http::HttpError;
use serenity::model::prelude::*;
use tokio::sync::RwLock;

use crate::bot::helpers::HelperError;
use crate::errors::Error;
use crate::Result;

// Privileged text command that re-posts the panel in the invoking channel.
const PANEL_COMMAND: &str = "!panel";

// Discord JSON error code for "interaction has already been acknowledged".
const ALREADY_ACKNOWLEDGED_CODE: isize = 40060;

pub struct Configuration {
    pub token: String,
    pub application_id: u64,
    pub guild_id: u64,
    pub panel_channel_id: u64,
    pub welcome_channel_id: u64,
    pub log_channel_id: Option<u64>,
    pub staff_role_id: u64,
    pub owner_role_id: u64,
}

pub struct Bot {
    token: String,
    application_id: u64,
    guild_id: GuildId,
    panel_channel_id: ChannelId,
    welcome_channel_id: ChannelId,
    log_channel_id: Option<ChannelId>,
    staff_role_id: RoleId,
    owner_role_id: RoleId,
    discord_client: Arc<Http>,
    categories: RwLock<HashMap<Category, ChannelId>>,
}

impl Bot {
    pub fn new(config: Configuration) -> Self {
        let discord_client = Arc::new(Http::new(&config.token));
        discord_client.set_application_id(ApplicationId::new(config.application_id));

        Bot {
            token: config.token,
            application_id: config.application_id,
            guild_id: GuildId::new(config.guild_id),
            panel_channel_id: ChannelId::new(config.panel_channel_id),
            welcome_channel_id: ChannelId::new(config.welcome_channel_id),
            log_channel_id: config.log_channel_id.map(ChannelId::new),
            staff_role_id: RoleId::new(config.staff_role_id),
            owner_role_id: RoleId::new(config.owner_role_id),
            discord_client,
            categories: RwLock::new(HashMap::new()),
        }
    }

    pub async fn start(self) -> Result<()> {
        let token = self.token.clone();
        let application_id = ApplicationId::new(self.application_id);

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(&token, intents)
            .application_id(application_id)
            .event_handler(self)
            .await?;

        Ok(client.start().await?)
    }
}

#[async_trait]
impl EventHandler for Bot {
    #[tracing::instrument(skip_all, fields(
        session_id = ?ready.session_id,
        user = %ready.user.name,
    ))]
    async fn ready(&self, _: Context, ready: Ready) {
        tracing::info!("bot is ready!");

        if let Err(err) = self.resolve_categories().await {
            tracing::error!(?err, "failed to resolve ticket categories");
        }

        if let Err(err) = self.publish_panel(self.panel_channel_id).await {
            tracing::error!(?err, "failed to publish ticket panel");
        }
    }

    #[tracing::instrument(skip_all, fields(user = %member.user.id))]
    async fn guild_member_addition(&self, _: Context, member: Member) {
        if member.guild_id != self.guild_id {
            return;
        }

        if let Err(err) = self.send_welcome(&member).await {
            tracing::error!(?err, "failed to send welcome message");
        }
    }

    #[tracing::instrument(skip_all, fields(channel_id = %message.channel_id))]
    async fn message(&self, _: Context, message: Message) {
        if message.author.bot || message.guild_id != Some(self.guild_id) {
            return;
        }

        if message.content.trim() != PANEL_COMMAND {
            return;
        }

        let is_owner = message
            .member
            .as_ref()
            .map(|member| member.roles.contains(&self.owner_role_id))
            .unwrap_or(false);

        if !is_owner {
            tracing::debug!(user = %message.author.id, "panel command denied");
            return;
        }

        if let Err(err) = self.publish_panel(message.channel_id).await {
            tracing::error!(?err, "failed to republish ticket panel");
        }
    }

    #[tracing::instrument(skip_all)]
    async fn interaction_create(&self, _: Context, interaction: Interaction) {
        match interaction {
            Interaction::Component(interaction) => {
                self.handle_component_interaction(&interaction).await
            }
            Interaction::Modal(interaction) => self.handle_modal_interaction(&interaction).await,
            _ => {}
        }
    }
}

impl Bot {
    #[tracing::instrument(skip_all, fields(
        custom_id = %interaction.data.custom_id,
        channel_id = %interaction.channel_id,
        user = %interaction.user.id,
    ))]
    async fn handle_component_interaction(&self, interaction: &ComponentInteraction) {
        if !matches!(interaction.data.kind, ComponentInteractionDataKind::Button) {
            return;
        }

        let custom_id = interaction.data.custom_id.as_str();

        let result = if let Some(category) = Category::from_custom_id(custom_id) {
            self.open_ticket(interaction, category).await
        } else if custom_id == tickets::CLOSE_BUTTON_ID {
            self.request_close_reason(interaction).await
        } else {
            tracing::debug!("unhandled component custom id, skipped");
            return;
        };

        if let Err(err) = result {
            self.report_component_failure(interaction, err).await;
        }
    }

    #[tracing::instrument(skip_all, fields(
        custom_id = %interaction.data.custom_id,
        channel_id = %interaction.channel_id,
        user = %interaction.user.id,
    ))]
    async fn handle_modal_interaction(&self, interaction: &ModalInteraction) {
        let result = match interaction.data.custom_id.as_str() {
            tickets::APPLICATION_MODAL_ID => self.finalize_application(interaction).await,
            tickets::CLOSE_MODAL_ID => self.close_ticket(interaction).await,
            _ => {
                tracing::debug!("unhandled modal custom id, skipped");
                return;
            }
        };

        if let Err(err) = result {
            self.report_modal_failure(interaction, err).await;
        }
    }

    async fn report_component_failure(&self, interaction: &ComponentInteraction, err: Error) {
        if !err.is_user_error() {
            tracing::error!(?err, "component interaction handler failed");
        }

        // The conflict means a response already went out; no further notice.
        if is_already_acknowledged(&err) {
            tracing::debug!("interaction already acknowledged, notice suppressed");
            return;
        }

        let notice = err.to_string();
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .ephemeral(true)
                .content(&notice),
        );
        if self.respond_to_component(interaction, response).await.is_ok() {
            return;
        }

        // The first response fails when the interaction is already
        // acknowledged; retry once as a followup and give up quietly.
        let followup = CreateInteractionResponseFollowup::new()
            .ephemeral(true)
            .content(notice);
        if let Err(err) = self.followup_to_component(interaction, followup).await {
            tracing::debug!(?err, "failed to deliver failure notice");
        }
    }

    async fn report_modal_failure(&self, interaction: &ModalInteraction, err: Error) {
        if !err.is_user_error() {
            tracing::error!(?err, "modal interaction handler failed");
        }

        if is_already_acknowledged(&err) {
            tracing::debug!("interaction already acknowledged, notice suppressed");
            return;
        }

        let notice = err.to_string();
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .ephemeral(true)
                .content(&notice),
        );
        if self.respond_to_modal(interaction, response).await.is_ok() {
            return;
        }

        let followup = CreateInteractionResponseFollowup::new()
            .ephemeral(true)
            .content(notice);
        if let Err(err) = self.followup_to_modal(interaction, followup).await {
            tracing::debug!(?err, "failed to deliver failure notice");
        }
    }
}

fn is_already_acknowledged(err: &Error) -> bool {
    let serenity_err = match err {
        Error::SerenityError(err) => err,
        Error::HelperError(HelperError::SerenityError(err)) => err,
        _ => return false,
    };

    matches!(
        serenity_err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.error.code == ALREADY_ACKNOWLEDGED_CODE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SystemError, UserError};

    #[test]
    fn only_the_acknowledged_conflict_suppresses_the_notice() {
        let user: Error = UserError::CategoryUnavailable.into();
        let system: Error = SystemError::UnexpectedError("boom".to_string()).into();
        let remote: Error = serenity::Error::Other("gateway hiccup").into();
        let helper: Error = HelperError::SerenityError(serenity::Error::Other("send failed")).into();

        assert!(!is_already_acknowledged(&user));
        assert!(!is_already_acknowledged(&system));
        assert!(!is_already_acknowledged(&remote));
        assert!(!is_already_acknowledged(&helper));
    }
}
