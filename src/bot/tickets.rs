use std::time::Duration;

use serenity::all::CreateActionRow;
use serenity::all::CreateButton;
use serenity::all::CreateEmbed;
use serenity::all::CreateEmbedFooter;
use serenity::all::CreateInputText;
use serenity::all::CreateInteractionResponse;
use serenity::all::CreateInteractionResponseMessage;
use serenity::all::CreateMessage;
use serenity::all::CreateModal;
use serenity::all::ButtonStyle;
use serenity::all::ComponentInteraction;
use serenity::all::InputTextStyle;
use serenity::all::ModalInteraction;
use serenity::model::mention::Mentionable;
use serenity::model::prelude::*;

use super::helpers::channels::GuildChannelDefinitionBuilder;
use super::{Bot, Category};
use crate::{Result, SystemError, UserError};

pub(crate) const CLOSE_BUTTON_ID: &str = "close_ticket";
pub(crate) const CLOSE_MODAL_ID: &str = "close_confirm";
pub(crate) const APPLICATION_MODAL_ID: &str = "staff_application";

const CLOSE_REASON_FIELD: &str = "close_reason";
const APPLICANT_NAME_FIELD: &str = "applicant_name";
const APPLICANT_ID_FIELD: &str = "applicant_id";
const APPLICATION_TEXT_FIELD: &str = "application_text";

const DEFAULT_CLOSE_REASON: &str = "No reason provided.";

const TICKET_OPEN_COLOUR: u32 = 0x00FF00;
const TICKET_CLOSED_COLOUR: u32 = 0xFF0000;
const LOG_COLOUR: u32 = 0x5865F2;

// Grace period between the closing confirmation and channel deletion.
const DELETE_DELAY: Duration = Duration::from_secs(5);

/// Structured input collected before a staff-application ticket is opened.
#[derive(Debug)]
struct TicketApplication {
    name: String,
    applicant_id: String,
    details: String,
}

fn ticket_channel_name(user_id: UserId) -> String {
    format!("ticket-{user_id}")
}

fn is_open_ticket(
    name: &str,
    parent: Option<ChannelId>,
    user_id: UserId,
    category_channel: ChannelId,
) -> bool {
    name == ticket_channel_name(user_id) && parent == Some(category_channel)
}

fn close_reason(input: Option<&str>) -> String {
    match input {
        Some(reason) if !reason.is_empty() => reason.to_string(),
        _ => DEFAULT_CLOSE_REASON.to_string(),
    }
}

fn ephemeral_notice(content: String) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .ephemeral(true)
            .content(content),
    )
}

fn application_modal(user_id: UserId) -> CreateInteractionResponse {
    let components = vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Name", APPLICANT_NAME_FIELD)
                .placeholder("Your name")
                .required(true),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Discord ID", APPLICANT_ID_FIELD)
                .value(user_id.to_string())
                .required(true),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(
                InputTextStyle::Paragraph,
                "Why should we pick you?",
                APPLICATION_TEXT_FIELD,
            )
            .placeholder("Tell us about your experience.")
            .required(true),
        ),
    ];

    CreateInteractionResponse::Modal(
        CreateModal::new(APPLICATION_MODAL_ID, "Staff Application").components(components),
    )
}

fn close_reason_modal() -> CreateInteractionResponse {
    let components = vec![CreateActionRow::InputText(
        CreateInputText::new(
            InputTextStyle::Paragraph,
            "Reason for closing (optional)",
            CLOSE_REASON_FIELD,
        )
        .placeholder("Enter optional reason here...")
        .required(false),
    )];

    CreateInteractionResponse::Modal(
        CreateModal::new(CLOSE_MODAL_ID, "Confirm Closing Ticket").components(components),
    )
}

impl Bot {
    /// Handles a panel button press: rejects duplicates, defers the
    /// form-requiring category to its application modal, and otherwise
    /// creates the private ticket channel right away.
    #[tracing::instrument(skip_all, fields(user = %interaction.user.id, category = ?category))]
    pub(crate) async fn open_ticket(
        &self,
        interaction: &ComponentInteraction,
        category: Category,
    ) -> Result<()> {
        let category_channel = self
            .category_channel(category)
            .await
            .ok_or(UserError::CategoryUnavailable)?;

        let user_id = interaction.user.id;
        if let Some(existing) = self.find_open_ticket(user_id, category_channel).await? {
            return Err(UserError::TicketAlreadyOpen(existing).into());
        }

        if category.requires_application() {
            tracing::debug!("collecting application before opening the ticket");
            self.respond_to_component(interaction, application_modal(user_id))
                .await?;
            return Ok(());
        }

        let channel = self
            .create_ticket_channel(user_id, category, category_channel)
            .await?;
        self.send_ticket_intro(&channel, user_id, category, None)
            .await?;

        tracing::info!(channel_id = %channel.id, "opened ticket");
        self.respond_to_component(
            interaction,
            ephemeral_notice(format!(
                "Your ticket has been created: {}",
                channel.id.mention()
            )),
        )
        .await?;
        Ok(())
    }

    /// Finalizes a submitted staff application by creating the deferred
    /// ticket channel and reproducing the submitted fields in it.
    #[tracing::instrument(skip_all, fields(user = %interaction.user.id))]
    pub(crate) async fn finalize_application(&self, interaction: &ModalInteraction) -> Result<()> {
        let application = self.parse_application(interaction)?;

        let category = Category::JoinStaff;
        let category_channel = self
            .category_channel(category)
            .await
            .ok_or(UserError::CategoryUnavailable)?;

        // The press-time check does not cover the form window, which stays
        // open as long as the user keeps the modal around; re-check before
        // creating the deferred channel.
        let user_id = interaction.user.id;
        if let Some(existing) = self.find_open_ticket(user_id, category_channel).await? {
            return Err(UserError::TicketAlreadyOpen(existing).into());
        }

        let channel = self
            .create_ticket_channel(user_id, category, category_channel)
            .await?;
        self.send_ticket_intro(&channel, user_id, category, Some(&application))
            .await?;

        tracing::info!(channel_id = %channel.id, "opened ticket from application");
        self.respond_to_modal(
            interaction,
            ephemeral_notice(format!(
                "Your ticket has been created: {}",
                channel.id.mention()
            )),
        )
        .await?;
        Ok(())
    }

    /// Responds to the close button with the reason modal.
    #[tracing::instrument(skip_all, fields(channel_id = %interaction.channel_id))]
    pub(crate) async fn request_close_reason(
        &self,
        interaction: &ComponentInteraction,
    ) -> Result<()> {
        self.respond_to_component(interaction, close_reason_modal())
            .await?;
        Ok(())
    }

    /// Closes the ticket: confirmation embed in the channel, a log entry to
    /// the configured log channel, and channel deletion after a fixed delay.
    #[tracing::instrument(skip_all, fields(
        channel_id = %interaction.channel_id,
        user = %interaction.user.id,
    ))]
    pub(crate) async fn close_ticket(&self, interaction: &ModalInteraction) -> Result<()> {
        let reason = close_reason(self.get_modal_field(interaction, CLOSE_REASON_FIELD));
        let closer = &interaction.user;
        let channel_id = interaction.channel_id;

        let confirmation = CreateEmbed::new()
            .title("🔒 Ticket Closed")
            .description(format!(
                "This ticket was closed by {}.\n\n**Reason:**\n{}",
                closer.id.mention(),
                reason
            ))
            .colour(TICKET_CLOSED_COLOUR);

        self.respond_to_modal(
            interaction,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().embed(confirmation),
            ),
        )
        .await?;

        if let Some(log_channel_id) = self.log_channel_id {
            let channel_name = interaction
                .channel
                .as_ref()
                .and_then(|channel| channel.name.clone())
                .unwrap_or_else(|| channel_id.to_string());

            let log = CreateEmbed::new()
                .title("🗂️ Ticket Closed Log")
                .field(
                    "Closed By",
                    format!("{} ({})", closer.id.mention(), closer.tag()),
                    false,
                )
                .field("Reason", reason.clone(), false)
                .field("Ticket Channel", format!("#{channel_name}"), false)
                .colour(LOG_COLOUR)
                .timestamp(Timestamp::now());

            // A missing or broken log channel must not keep the ticket open.
            if let Err(err) = self
                .send_message(log_channel_id, CreateMessage::new().embed(log))
                .await
            {
                tracing::error!(?err, "failed to post ticket close log");
            }
        }

        tracing::info!(%channel_id, %reason, "ticket closed");
        self.schedule_ticket_deletion(channel_id);
        Ok(())
    }

    async fn find_open_ticket(
        &self,
        user_id: UserId,
        category_channel: ChannelId,
    ) -> Result<Option<ChannelId>> {
        let channels = self.get_channels(&[ChannelType::Text]).await?;
        Ok(channels
            .iter()
            .find(|channel| {
                is_open_ticket(&channel.name, channel.parent_id, user_id, category_channel)
            })
            .map(|channel| channel.id))
    }

    async fn create_ticket_channel(
        &self,
        user_id: UserId,
        category: Category,
        parent: ChannelId,
    ) -> Result<GuildChannel> {
        let definition = GuildChannelDefinitionBuilder::default()
            .name(ticket_channel_name(user_id))
            .kind(ChannelType::Text)
            .category(Some(parent))
            .permissions(self.ticket_permissions(user_id, category))
            .build()
            .map_err(|err| SystemError::UnexpectedError(err.to_string()))?;

        Ok(self.create_channel(&definition).await?)
    }

    fn ticket_permissions(&self, user_id: UserId, category: Category) -> Vec<PermissionOverwrite> {
        let participant =
            Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::READ_MESSAGE_HISTORY;

        vec![
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
                kind: PermissionOverwriteType::Role(self.everyone_role()),
            },
            PermissionOverwrite {
                allow: participant,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(user_id),
            },
            PermissionOverwrite {
                allow: participant,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(self.responder_role(category)),
            },
        ]
    }

    fn responder_role(&self, category: Category) -> RoleId {
        match category {
            Category::ContactOwner => self.owner_role_id,
            _ => self.staff_role_id,
        }
    }

    fn everyone_role(&self) -> RoleId {
        // The @everyone role shares its id with the guild.
        RoleId::new(self.guild_id.get())
    }

    async fn send_ticket_intro(
        &self,
        channel: &GuildChannel,
        user_id: UserId,
        category: Category,
        application: Option<&TicketApplication>,
    ) -> Result<()> {
        let intro = CreateEmbed::new()
            .title(category.ticket_title())
            .description(format!(
                "Hello {}, this is your ticket. Please describe your request.",
                user_id.mention()
            ))
            .colour(TICKET_OPEN_COLOUR)
            .footer(CreateEmbedFooter::new("Click the close button when done."));

        let close_row = CreateActionRow::Buttons(vec![CreateButton::new(CLOSE_BUTTON_ID)
            .label("Close Ticket")
            .emoji(ReactionType::Unicode("🔒".to_string()))
            .style(ButtonStyle::Danger)]);

        let mut message = CreateMessage::new()
            .content(user_id.mention().to_string())
            .embed(intro);

        if let Some(application) = application {
            message = message.add_embed(
                CreateEmbed::new()
                    .title("Staff Application")
                    .field("Name", application.name.clone(), false)
                    .field("Discord ID", application.applicant_id.clone(), false)
                    .field("Application", application.details.clone(), false)
                    .colour(TICKET_OPEN_COLOUR),
            );
        }

        self.send_message(channel.id, message.components(vec![close_row]))
            .await?;
        Ok(())
    }

    fn parse_application(&self, interaction: &ModalInteraction) -> Result<TicketApplication> {
        Ok(TicketApplication {
            name: self
                .get_modal_field(interaction, APPLICANT_NAME_FIELD)
                .ok_or(SystemError::MissingModalField(APPLICANT_NAME_FIELD))?
                .to_string(),
            applicant_id: self
                .get_modal_field(interaction, APPLICANT_ID_FIELD)
                .ok_or(SystemError::MissingModalField(APPLICANT_ID_FIELD))?
                .to_string(),
            details: self
                .get_modal_field(interaction, APPLICATION_TEXT_FIELD)
                .ok_or(SystemError::MissingModalField(APPLICATION_TEXT_FIELD))?
                .to_string(),
        })
    }

    /// Deletes the ticket channel after the grace period. Fire-and-forget:
    /// deletion failure (e.g. someone beat us to it) is logged, not raised.
    fn schedule_ticket_deletion(&self, channel_id: ChannelId) {
        let discord_client = self.discord_client.clone();
        tokio::spawn(async move {
            tokio::time::sleep(DELETE_DELAY).await;
            if let Err(err) = channel_id.delete(&discord_client).await {
                tracing::error!(%channel_id, ?err, "failed to delete closed ticket channel");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Configuration;

    fn test_bot() -> Bot {
        Bot::new(Configuration {
            token: "test-token".to_string(),
            application_id: 1,
            guild_id: 10,
            panel_channel_id: 20,
            welcome_channel_id: 30,
            log_channel_id: None,
            staff_role_id: 40,
            owner_role_id: 50,
        })
    }

    #[test]
    fn ticket_channels_are_named_after_the_requester() {
        assert_eq!(ticket_channel_name(UserId::new(12345)), "ticket-12345");
    }

    #[test]
    fn open_ticket_detection_requires_name_and_container_match() {
        let user = UserId::new(7);
        let container = ChannelId::new(100);

        assert!(is_open_ticket("ticket-7", Some(container), user, container));
        assert!(!is_open_ticket("ticket-7", Some(ChannelId::new(101)), user, container));
        assert!(!is_open_ticket("ticket-7", None, user, container));
        assert!(!is_open_ticket("ticket-8", Some(container), user, container));
        assert!(!is_open_ticket("general", Some(container), user, container));
    }

    #[test]
    fn close_reason_defaults_when_absent_or_empty() {
        assert_eq!(close_reason(None), "No reason provided.");
        assert_eq!(close_reason(Some("")), "No reason provided.");
    }

    #[test]
    fn close_reason_is_kept_verbatim() {
        assert_eq!(close_reason(Some("resolved in DM")), "resolved in DM");
        // Whitespace-only input counts as a supplied reason.
        assert_eq!(close_reason(Some("   ")), "   ");
    }

    #[test]
    fn repeated_staff_applications_match_the_existing_ticket() {
        let user = UserId::new(7);
        let container = ChannelId::new(200);

        // A channel opened by a first form submission must be found again
        // when the same user submits a second application, so the second
        // submission is refused instead of double-booking.
        let first_submission = ticket_channel_name(user);
        assert!(is_open_ticket(&first_submission, Some(container), user, container));
        assert!(!is_open_ticket(&first_submission, Some(container), UserId::new(8), container));
    }

    #[test]
    fn contact_owner_tickets_go_to_the_owner_role() {
        let bot = test_bot();
        assert_eq!(bot.responder_role(Category::ContactOwner), RoleId::new(50));
        assert_eq!(bot.responder_role(Category::Support), RoleId::new(40));
        assert_eq!(bot.responder_role(Category::JoinTeam), RoleId::new(40));
        assert_eq!(bot.responder_role(Category::JoinStaff), RoleId::new(40));
    }

    #[test]
    fn ticket_permissions_hide_the_channel_from_everyone_else() {
        let bot = test_bot();
        let user = UserId::new(7);
        let overwrites = bot.ticket_permissions(user, Category::Support);
        let participant =
            Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::READ_MESSAGE_HISTORY;

        assert_eq!(overwrites.len(), 3);
        assert!(overwrites.contains(&PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(RoleId::new(10)),
        }));
        assert!(overwrites.contains(&PermissionOverwrite {
            allow: participant,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(user),
        }));
        assert!(overwrites.contains(&PermissionOverwrite {
            allow: participant,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(RoleId::new(40)),
        }));
    }
}
