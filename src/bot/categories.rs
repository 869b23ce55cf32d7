use std::collections::HashMap;

use serenity::all::ButtonStyle;
use serenity::model::prelude::*;

use super::helpers::channels::GuildChannelDefinitionBuilder;
use super::Bot;
use crate::utils::title_case;
use crate::{Result, SystemError};

/// The fixed set of ticket categories. Each maps to a Discord category
/// channel named after its custom id, plus the button shown on the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    JoinTeam,
    JoinStaff,
    Support,
    ContactOwner,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::JoinTeam,
        Category::JoinStaff,
        Category::Support,
        Category::ContactOwner,
    ];

    /// Component custom id, doubling as the container channel name.
    pub fn custom_id(self) -> &'static str {
        match self {
            Category::JoinTeam => "join_team",
            Category::JoinStaff => "join_staff",
            Category::Support => "support",
            Category::ContactOwner => "contact_owner",
        }
    }

    pub fn from_custom_id(custom_id: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.custom_id() == custom_id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::JoinTeam => "Join Team",
            Category::JoinStaff => "Join Staff",
            Category::Support => "Support",
            Category::ContactOwner => "Contact Owner",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Category::JoinTeam => "🎮",
            Category::JoinStaff => "👨‍💼",
            Category::Support => "❓",
            Category::ContactOwner => "🧑",
        }
    }

    pub fn panel_note(self) -> &'static str {
        match self {
            Category::JoinTeam => "Apply to join our team.",
            Category::JoinStaff => "Apply to become staff.",
            Category::Support => "Get help from support.",
            Category::ContactOwner => "Contact the server owner directly.",
        }
    }

    pub fn button_style(self) -> ButtonStyle {
        match self {
            Category::ContactOwner => ButtonStyle::Success,
            _ => ButtonStyle::Primary,
        }
    }

    /// Categories that collect a structured application before the ticket
    /// channel is created.
    pub fn requires_application(self) -> bool {
        matches!(self, Category::JoinStaff)
    }

    pub fn ticket_title(self) -> String {
        format!("{} Ticket", title_case(self.custom_id()))
    }
}

impl Bot {
    /// Finds or creates the container channel for every category and stores
    /// the resulting map. Re-running finds the previously created containers
    /// rather than duplicating them. A category whose container cannot be
    /// created is left unresolved; opening tickets for it fails gracefully.
    #[tracing::instrument(skip_all)]
    pub async fn resolve_categories(&self) -> Result<()> {
        tracing::info!("resolve ticket categories");

        let existing = self.get_channels(&[ChannelType::Category]).await?;

        let mut resolved = HashMap::new();
        for category in Category::ALL {
            if let Some(channel) = existing
                .iter()
                .find(|channel| channel.name == category.custom_id())
            {
                tracing::debug!(?category, channel_id = %channel.id, "category already exists");
                resolved.insert(category, channel.id);
                continue;
            }

            let definition = GuildChannelDefinitionBuilder::default()
                .name(category.custom_id().to_string())
                .kind(ChannelType::Category)
                .build()
                .map_err(|err| SystemError::UnexpectedError(err.to_string()))?;

            match self.create_channel(&definition).await {
                Ok(channel) => {
                    tracing::debug!(?category, channel_id = %channel.id, "created category");
                    resolved.insert(category, channel.id);
                }
                Err(err) => {
                    tracing::error!(?category, ?err, "failed to create category channel");
                }
            }
        }

        *self.categories.write().await = resolved;
        Ok(())
    }

    pub(crate) async fn category_channel(&self, category: Category) -> Option<ChannelId> {
        self.categories.read().await.get(&category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_ids_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_custom_id(category.custom_id()), Some(category));
        }
    }

    #[test]
    fn unknown_custom_ids_are_rejected() {
        assert_eq!(Category::from_custom_id("close_ticket"), None);
        assert_eq!(Category::from_custom_id(""), None);
    }

    #[test]
    fn only_staff_applications_require_a_form() {
        let requiring: Vec<_> = Category::ALL
            .into_iter()
            .filter(|category| category.requires_application())
            .collect();
        assert_eq!(requiring, vec![Category::JoinStaff]);
    }

    #[test]
    fn ticket_titles_are_title_cased() {
        assert_eq!(Category::JoinStaff.ticket_title(), "Join Staff Ticket");
        assert_eq!(Category::Support.ticket_title(), "Support Ticket");
    }
}
