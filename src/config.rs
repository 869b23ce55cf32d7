use std::fs::File;
use std::path::Path;

use anyhow::Result;
use serde_derive::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Configuration {
    pub discord: DiscordConfiguration,
    pub channels: ChannelConfiguration,
    pub roles: RoleConfiguration,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

impl From<Configuration> for support_bot::Configuration {
    fn from(config: Configuration) -> Self {
        Self {
            token: config.discord.token,
            application_id: config.discord.application_id,
            guild_id: config.discord.guild_id,
            panel_channel_id: config.channels.panel,
            welcome_channel_id: config.channels.welcome,
            log_channel_id: config.channels.log,
            staff_role_id: config.roles.staff,
            owner_role_id: config.roles.owner,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DiscordConfiguration {
    pub token: String,
    pub application_id: u64,
    pub guild_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChannelConfiguration {
    pub panel: u64,
    pub welcome: u64,

    // Closing logs are skipped entirely when no log channel is configured.
    #[serde(default)]
    pub log: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RoleConfiguration {
    pub staff: u64,
    pub owner: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_configuration() {
        let config: Configuration = serde_yaml::from_str(
            r#"
discord:
  token: "secret"
  application_id: 1
  guild_id: 2
channels:
  panel: 3
  welcome: 4
  log: 5
roles:
  staff: 6
  owner: 7
"#,
        )
        .unwrap();

        assert_eq!(config.discord.guild_id, 2);
        assert_eq!(config.channels.log, Some(5));

        let bot_config: support_bot::Configuration = config.into();
        assert_eq!(bot_config.panel_channel_id, 3);
        assert_eq!(bot_config.owner_role_id, 7);
    }

    #[test]
    fn log_channel_is_optional() {
        let config: Configuration = serde_yaml::from_str(
            r#"
discord:
  token: "secret"
  application_id: 1
  guild_id: 2
channels:
  panel: 3
  welcome: 4
roles:
  staff: 6
  owner: 7
"#,
        )
        .unwrap();

        assert_eq!(config.channels.log, None);
    }
}
