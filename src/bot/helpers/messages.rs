use serenity::all::CreateMessage;
use serenity::all::EditMessage;
use serenity::all::GetMessages;
use serenity::model::prelude::*;

use super::HelperResult;
use crate::bot::Bot;

// Helper functions for manipulating channel messages
impl Bot {
    #[tracing::instrument(skip_all, fields(channel_id = %channel_id, limit = limit))]
    pub async fn get_recent_messages(
        &self,
        channel_id: ChannelId,
        limit: u8,
    ) -> HelperResult<Vec<Message>> {
        tracing::trace!("Get recent messages");
        Ok(channel_id
            .messages(&self.discord_client, GetMessages::new().limit(limit))
            .await?)
    }

    #[tracing::instrument(skip_all, fields(channel_id = %channel_id))]
    pub async fn send_message(
        &self,
        channel_id: ChannelId,
        builder: CreateMessage,
    ) -> HelperResult<Message> {
        tracing::trace!("Send message");
        Ok(channel_id
            .send_message(&self.discord_client, builder)
            .await?)
    }

    #[tracing::instrument(skip_all, fields(channel_id = %channel_id, message_id = %message_id))]
    pub async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        builder: EditMessage,
    ) -> HelperResult<Message> {
        tracing::trace!("Edit message");
        Ok(channel_id
            .edit_message(&self.discord_client, message_id, builder)
            .await?)
    }
}
