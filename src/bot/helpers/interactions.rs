use serenity::all::ComponentInteraction;
use serenity::all::CreateInteractionResponse;
use serenity::all::CreateInteractionResponseFollowup;
use serenity::all::ModalInteraction;
use serenity::model::prelude::*;

use super::HelperResult;
use crate::bot::Bot;

// Helper functions for responding to interactions
impl Bot {
    #[tracing::instrument(skip_all)]
    pub async fn respond_to_component(
        &self,
        interaction: &ComponentInteraction,
        response: CreateInteractionResponse,
    ) -> HelperResult<()> {
        tracing::trace!("Respond to component interaction");
        interaction
            .create_response(&self.discord_client, response)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub async fn respond_to_modal(
        &self,
        interaction: &ModalInteraction,
        response: CreateInteractionResponse,
    ) -> HelperResult<()> {
        tracing::trace!("Respond to modal interaction");
        interaction
            .create_response(&self.discord_client, response)
            .await?;
        Ok(())
    }

    // Follow-up delivery for interactions that may already be acknowledged.
    #[tracing::instrument(skip_all)]
    pub async fn followup_to_component(
        &self,
        interaction: &ComponentInteraction,
        followup: CreateInteractionResponseFollowup,
    ) -> HelperResult<Message> {
        tracing::trace!("Follow up component interaction");
        Ok(interaction
            .create_followup(&self.discord_client, followup)
            .await?)
    }

    #[tracing::instrument(skip_all)]
    pub async fn followup_to_modal(
        &self,
        interaction: &ModalInteraction,
        followup: CreateInteractionResponseFollowup,
    ) -> HelperResult<Message> {
        tracing::trace!("Follow up modal interaction");
        Ok(interaction
            .create_followup(&self.discord_client, followup)
            .await?)
    }

    pub fn get_modal_field<'t>(
        &self,
        interaction: &'t ModalInteraction,
        custom_id: &str,
    ) -> Option<&'t str> {
        for row in &interaction.data.components {
            for component in &row.components {
                if let ActionRowComponent::InputText(input) = component {
                    if input.custom_id == custom_id {
                        return input.value.as_deref().filter(|value| !value.is_empty());
                    }
                }
            }
        }
        None
    }
}
