use serenity::all::CreateChannel;
use serenity::model::prelude::*;

use super::HelperResult;
use crate::bot::Bot;

#[derive(Clone, Debug, derive_builder::Builder)]
pub struct GuildChannelDefinition {
    pub name: String,
    pub kind: ChannelType,
    #[builder(default)]
    pub category: Option<ChannelId>,
    #[builder(default)]
    pub permissions: Vec<PermissionOverwrite>,
}

// Helper functions for manipulating guild channels
impl Bot {
    #[tracing::instrument(skip_all, fields(definition = ?definition))]
    pub async fn create_channel(
        &self,
        definition: &GuildChannelDefinition,
    ) -> HelperResult<GuildChannel> {
        tracing::trace!("Create channel");
        let definition = definition.clone();

        let mut create_channel = CreateChannel::new(definition.name)
            .kind(definition.kind)
            .permissions(definition.permissions);

        create_channel = match definition.category {
            Some(category_id) => create_channel.category(category_id),
            None => create_channel,
        };

        Ok(self
            .guild_id
            .create_channel(&self.discord_client, create_channel)
            .await?)
    }

    #[tracing::instrument(skip_all)]
    pub async fn get_channels<T: AsRef<[ChannelType]>>(
        &self,
        kinds: T,
    ) -> HelperResult<Vec<GuildChannel>> {
        tracing::trace!("Get channels");
        Ok(self
            .guild_id
            .channels(&self.discord_client)
            .await?
            .into_values()
            .filter(|channel| kinds.as_ref().contains(&channel.kind))
            .collect())
    }
}
