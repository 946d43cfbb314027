//! Game configuration.

use crate::world::{find_location, STARTING_LOCATION};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MODEL: &str = openrouter::DEFAULT_MODEL;
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_APP_TITLE: &str = "D&D AI Dungeon Master";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_NARRATIVE_TIMEOUT: Duration = Duration::from_secs(45);
pub const DEFAULT_STARTING_GOLD: u32 = 100;

/// Configuration for a game service.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// API key for the narrative service. Without one, narration is offline only.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Sent as `HTTP-Referer`.
    pub site_url: String,
    /// Sent as `X-Title`.
    pub app_title: String,
    /// Language the DM writes in.
    pub language: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Deadline for one narrative call before falling back.
    pub narrative_timeout: Duration,
    pub starting_gold: u32,
    pub starting_location: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: openrouter::DEFAULT_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            max_tokens: 600,
            temperature: 0.8,
            top_p: 0.9,
            frequency_penalty: 0.2,
            presence_penalty: 0.1,
            narrative_timeout: DEFAULT_NARRATIVE_TIMEOUT,
            starting_gold: DEFAULT_STARTING_GOLD,
            starting_location: STARTING_LOCATION.to_string(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the environment.
    ///
    /// `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`, `OPENROUTER_BASE_URL`,
    /// `SITE_URL`, `DM_LANGUAGE` and `NARRATIVE_TIMEOUT_SECS` are honored.
    /// Unset or blank variables keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.api_key = get("OPENROUTER_API_KEY");
        if let Some(model) = get("OPENROUTER_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = get("OPENROUTER_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(site_url) = get("SITE_URL") {
            config.site_url = site_url;
        }
        if let Some(language) = get("DM_LANGUAGE") {
            config.language = language;
        }
        if let Some(secs) = get("NARRATIVE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.narrative_timeout = Duration::from_secs(secs),
                _ => warn!(value = %secs, "Ignoring invalid NARRATIVE_TIMEOUT_SECS"),
            }
        }
        if let Some(gold) = get("STARTING_GOLD") {
            match gold.parse::<u32>() {
                Ok(gold) => config.starting_gold = gold,
                Err(_) => warn!(value = %gold, "Ignoring invalid STARTING_GOLD"),
            }
        }
        if let Some(location) = get("STARTING_LOCATION") {
            if find_location(&location).is_some() {
                config.starting_location = location;
            } else {
                warn!(value = %location, "Ignoring unknown STARTING_LOCATION");
            }
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_narrative_timeout(mut self, timeout: Duration) -> Self {
        self.narrative_timeout = timeout;
        self
    }

    pub fn with_starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    pub fn with_starting_location(mut self, location: impl Into<String>) -> Self {
        self.starting_location = location.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
