use crate::chat::ChatUser;
use crate::voice::VoiceSettings;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub nats: NatsConfig,
    pub voice: VoiceConfig,
    #[serde(default)]
    pub user: Option<UserConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct VoiceConfig {
    pub base_url: String,
    #[serde(default)]
    pub authorization: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_device")]
    pub input_device: String,
}

#[derive(Debug, Deserialize)]
pub struct UserConfig {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_device() -> String {
    "default".to_string()
}

impl Config {
    /// Load `path` (any extension the config crate understands), then
    /// apply `VOICE_CHAT__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("VOICE_CHAT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl VoiceConfig {
    pub fn settings(&self) -> VoiceSettings {
        VoiceSettings {
            base_url: self.base_url.clone(),
            authorization: self.authorization.clone(),
            language: self.language.clone(),
        }
    }
}

impl From<&UserConfig> for ChatUser {
    fn from(user: &UserConfig) -> Self {
        ChatUser {
            user_id: user.user_id.clone(),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
        }
    }
}
