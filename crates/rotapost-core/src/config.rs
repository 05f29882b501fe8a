use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Hard cap on a single Publisher HTTP call.
pub const PUBLISH_TIMEOUT_SECS: u64 = 30;
/// Default late-fire tolerance before a trigger is treated as a misfire.
pub const DEFAULT_GRACE_SECS: u64 = 300;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Top-level config (rotapost.toml + ROTAPOST_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RotapostConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Absent means the publisher stays inactive.
    pub bot_token: Option<String>,
    /// Target channel, e.g. "@my_channel" or a numeric chat id.
    pub channel_id: Option<String>,
    /// Bot API base, overridable for tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel_id: None,
            api_base: default_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA zone the scheduler process operates in.
    #[serde(default = "default_server_timezone")]
    pub server_timezone: String,
    /// IANA zone the audience reads the channel in. Posting times in the
    /// schedule table are wall-clock times in this zone.
    #[serde(default = "default_target_timezone")]
    pub target_timezone: String,
    /// Seconds after the nominal fire time during which a late fire still runs.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            server_timezone: default_server_timezone(),
            target_timezone: default_target_timezone(),
            grace_secs: default_grace_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Length of the repeating content cycle in days.
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
    /// Working days per content week, for weekly-cadence types.
    #[serde(default = "default_days_per_week")]
    pub days_per_week: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            cycle_length: default_cycle_length(),
            days_per_week: default_days_per_week(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl RotapostConfig {
    /// Load config: explicit path > ROTAPOST_CONFIG env > ./rotapost.toml.
    ///
    /// Env overrides use double underscores for nesting, e.g.
    /// `ROTAPOST_TELEGRAM__BOT_TOKEN`. The original deployment's bare
    /// `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHANNEL_ID` are honoured as a
    /// fallback so existing environments keep working.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(|| "rotapost.toml".to_string());

        let mut config: RotapostConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ROTAPOST_").split("__"))
            .extract()
            .map_err(|e| crate::error::RotapostError::Config(e.to_string()))?;

        if config.telegram.bot_token.is_none() {
            config.telegram.bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok();
        }
        if config.telegram.channel_id.is_none() {
            config.telegram.channel_id = std::env::var("TELEGRAM_CHANNEL_ID").ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the rotation arithmetic cannot operate on.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.rotation.cycle_length == 0 {
            return Err(crate::error::RotapostError::Config(
                "rotation.cycle_length must be at least 1".to_string(),
            ));
        }
        if self.rotation.days_per_week == 0 {
            return Err(crate::error::RotapostError::Config(
                "rotation.days_per_week must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn server_tz(&self) -> crate::error::Result<Tz> {
        self.schedule.server_timezone.parse().map_err(|_| {
            crate::error::RotapostError::Config(format!(
                "unknown server timezone: {}",
                self.schedule.server_timezone
            ))
        })
    }

    pub fn target_tz(&self) -> crate::error::Result<Tz> {
        self.schedule.target_timezone.parse().map_err(|_| {
            crate::error::RotapostError::Config(format!(
                "unknown target timezone: {}",
                self.schedule.target_timezone
            ))
        })
    }

    /// Both credentials present — the publisher can be activated.
    pub fn telegram_configured(&self) -> bool {
        self.telegram.bot_token.is_some() && self.telegram.channel_id.is_some()
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_server_timezone() -> String {
    "UTC".to_string()
}

fn default_target_timezone() -> String {
    "Asia/Novokuznetsk".to_string()
}

fn default_grace_secs() -> u64 {
    DEFAULT_GRACE_SECS
}

fn default_cycle_length() -> u32 {
    20
}

fn default_days_per_week() -> u32 {
    5
}

fn default_db_path() -> String {
    "rotapost.db".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
