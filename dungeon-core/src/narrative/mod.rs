//! Narrative generation.
//!
//! The [`Narrator`] turns a player action into DM text. It asks a
//! [`NarrativeService`] (normally an OpenRouter chat model) and, whenever that
//! fails for any reason, answers with canned offline text instead. Callers
//! always get a usable narration back.

pub mod fallback;
pub mod prompt;

pub use fallback::{classify_action, fallback_narrative, ActionKind};
pub use prompt::{build_prompt, roll_label, system_instruction, PromptContext};

use crate::config::GameConfig;
use crate::dice::{DiceRoller, RngDice};
use async_trait::async_trait;
use openrouter::{Client, Message, Request};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Why the narrative service produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("narrative service is not configured")]
    NotConfigured,
    #[error("narrative service rejected the credentials")]
    Unauthorized,
    #[error("narrative service rate limit exceeded")]
    RateLimited,
    #[error("narrative service rejected the request")]
    BadRequest,
    #[error("narrative service unreachable: {0}")]
    Transport(String),
    #[error("narrative service timed out")]
    Timeout,
    #[error("malformed narrative response: {0}")]
    Malformed(String),
    #[error("narrative service returned no text")]
    Empty,
}

impl From<openrouter::Error> for NarrativeError {
    fn from(err: openrouter::Error) -> Self {
        use openrouter::Error as E;
        match err {
            E::NoApiKey | E::Config(_) => NarrativeError::NotConfigured,
            E::Api { status: 401 | 403, .. } => NarrativeError::Unauthorized,
            E::Api { status: 429, .. } => NarrativeError::RateLimited,
            E::Api { status: 400, .. } => NarrativeError::BadRequest,
            E::Api { status, message } => NarrativeError::Transport(format!("status {status}: {message}")),
            E::Network(msg) => NarrativeError::Transport(msg),
            E::Timeout => NarrativeError::Timeout,
            E::Parse(msg) => NarrativeError::Malformed(msg),
            E::EmptyResponse => NarrativeError::Empty,
        }
    }
}

/// A black-box text generator.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, NarrativeError>;
}

/// [`NarrativeService`] backed by an OpenAI-compatible chat model.
pub struct OpenRouterNarrator {
    client: Client,
    system: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

impl OpenRouterNarrator {
    pub fn new(client: Client, config: &GameConfig) -> Self {
        Self {
            client,
            system: system_instruction(&config.language),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
        }
    }

    /// Build from config. Fails with `NotConfigured` when there is no API key.
    pub fn from_config(config: &GameConfig) -> Result<Self, NarrativeError> {
        let key = config.api_key.as_deref().ok_or(NarrativeError::NotConfigured)?;
        let client = Client::new(key)
            .with_model(&config.model)
            .with_base_url(&config.base_url)
            .with_referer(&config.site_url)
            .with_title(&config.app_title);
        Ok(Self::new(client, config))
    }
}

#[async_trait]
impl NarrativeService for OpenRouterNarrator {
    async fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        let request = Request::new(vec![Message::system(&self.system), Message::user(prompt)])
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_top_p(self.top_p)
            .with_frequency_penalty(self.frequency_penalty)
            .with_presence_penalty(self.presence_penalty);

        let response = self.client.complete(request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(NarrativeError::Empty)
    }
}

/// Where a narration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Model,
    Fallback,
}

/// Text ready to show the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    pub source: NarrativeSource,
    /// The failure that triggered the fallback, if any.
    pub error: Option<NarrativeError>,
}

/// Trim, collapse runs of 3+ newlines to 2 and make sure the text ends in
/// `.`, `!` or `?`. Returns `None` for blank text.
pub fn sanitize(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(trimmed.len() + 1);
    let mut newlines = 0;
    for ch in trimmed.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(ch);
    }
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    Some(out)
}

/// Narrative adapter with guaranteed output.
pub struct Narrator {
    service: Option<Arc<dyn NarrativeService>>,
    timeout: Duration,
    language: String,
    dice: Mutex<Box<dyn DiceRoller + Send>>,
}

impl Narrator {
    pub fn new(service: Arc<dyn NarrativeService>) -> Self {
        Self {
            service: Some(service),
            ..Self::offline()
        }
    }

    /// A narrator that only ever uses offline text.
    pub fn offline() -> Self {
        Self {
            service: None,
            timeout: crate::config::DEFAULT_NARRATIVE_TIMEOUT,
            language: crate::config::DEFAULT_LANGUAGE.to_string(),
            dice: Mutex::new(Box::new(RngDice::new(StdRng::from_entropy()))),
        }
    }

    /// OpenRouter-backed when an API key is configured, offline otherwise.
    pub fn from_config(config: &GameConfig) -> Self {
        let narrator = match OpenRouterNarrator::from_config(config) {
            Ok(service) => Self::new(Arc::new(service)),
            Err(_) => {
                warn!("OPENROUTER_API_KEY not set, narration runs offline");
                Self::offline()
            }
        };
        narrator
            .with_timeout(config.narrative_timeout)
            .with_language(&config.language)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Dice used to pick offline responses.
    pub fn with_dice(mut self, dice: impl DiceRoller + Send + 'static) -> Self {
        self.dice = Mutex::new(Box::new(dice));
        self
    }

    pub fn is_online(&self) -> bool {
        self.service.is_some()
    }

    /// Narrate one player action. Never fails.
    pub async fn narrate(&self, ctx: &PromptContext<'_>) -> Narration {
        let prompt = build_prompt(ctx, &self.language);
        debug!(chars = prompt.len(), roll = ctx.roll, "Narrating action");

        let generated = match &self.service {
            None => Err(NarrativeError::NotConfigured),
            Some(service) => tokio::time::timeout(self.timeout, service.generate(&prompt))
                .await
                .unwrap_or(Err(NarrativeError::Timeout)),
        };

        match generated.and_then(|text| sanitize(&text).ok_or(NarrativeError::Empty)) {
            Ok(text) => Narration {
                text,
                source: NarrativeSource::Model,
                error: None,
            },
            Err(error) => {
                warn!(%error, "Narrative generation failed, using fallback");
                Narration {
                    text: self.fallback(ctx.action),
                    source: NarrativeSource::Fallback,
                    error: Some(error),
                }
            }
        }
    }

    fn fallback(&self, action: &str) -> String {
        let mut dice = self.dice.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let text = fallback_narrative(action, dice.as_mut());
        sanitize(text).unwrap_or_else(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedDice, MockNarrator};
    use crate::world::{AbilityScores, Character, CharacterClass};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hero() -> Character {
        Character::new("Bram", CharacterClass::Fighter, AbilityScores::new(15, 12, 14, 8, 10, 9))
    }

    fn ctx<'a>(character: &'a Character, action: &'a str) -> PromptContext<'a> {
        PromptContext {
            character,
            location: None,
            last_dm_line: None,
            action,
            roll: 11,
        }
    }

    fn ends_in_terminal(text: &str) -> bool {
        text.ends_with(['.', '!', '?'])
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  Hello there  ").as_deref(), Some("Hello there."));
        assert_eq!(sanitize("Run!").as_deref(), Some("Run!"));
        assert_eq!(sanitize("a\n\n\n\n\nb?").as_deref(), Some("a\n\nb?"));
        assert_eq!(sanitize("a\n\nb").as_deref(), Some("a\n\nb."));
        assert_eq!(sanitize(" \n\t "), None);
    }

    #[test]
    fn test_error_mapping() {
        let api = |status| openrouter::Error::Api {
            status,
            message: String::new(),
        };
        assert_eq!(NarrativeError::from(api(401)), NarrativeError::Unauthorized);
        assert_eq!(NarrativeError::from(api(403)), NarrativeError::Unauthorized);
        assert_eq!(NarrativeError::from(api(429)), NarrativeError::RateLimited);
        assert_eq!(NarrativeError::from(api(400)), NarrativeError::BadRequest);
        assert!(matches!(NarrativeError::from(api(502)), NarrativeError::Transport(_)));
        assert!(matches!(
            NarrativeError::from(openrouter::Error::Parse("x".into())),
            NarrativeError::Malformed(_)
        ));
        assert_eq!(NarrativeError::from(openrouter::Error::EmptyResponse), NarrativeError::Empty);
        assert_eq!(NarrativeError::from(openrouter::Error::Timeout), NarrativeError::Timeout);
        assert_eq!(NarrativeError::from(openrouter::Error::NoApiKey), NarrativeError::NotConfigured);
    }

    #[tokio::test]
    async fn test_offline_always_falls_back() {
        let narrator = Narrator::offline().with_dice(FixedDice::new(1));
        let hero = hero();
        for action in ["", "   ", "I search the room", "attack!", "talk to her", "\n\n"] {
            let narration = narrator.narrate(&ctx(&hero, action)).await;
            assert_eq!(narration.source, NarrativeSource::Fallback);
            assert_eq!(narration.error, Some(NarrativeError::NotConfigured));
            assert!(!narration.text.is_empty());
            assert!(ends_in_terminal(&narration.text));
        }
    }

    #[tokio::test]
    async fn test_model_text_is_sanitized() {
        let service = MockNarrator::new(vec![Ok("The door creaks open\n\n\n\nA rat scurries past".to_string())]);
        let narrator = Narrator::new(Arc::new(service));
        let hero = hero();
        let narration = narrator.narrate(&ctx(&hero, "open the door")).await;
        assert_eq!(narration.source, NarrativeSource::Model);
        assert_eq!(narration.text, "The door creaks open\n\nA rat scurries past.");
    }

    #[tokio::test]
    async fn test_every_error_falls_back() {
        let errors = vec![
            Err(NarrativeError::Unauthorized),
            Err(NarrativeError::RateLimited),
            Err(NarrativeError::BadRequest),
            Err(NarrativeError::Transport("down".into())),
            Err(NarrativeError::Malformed("junk".into())),
            Err(NarrativeError::Empty),
            Ok("   ".to_string()),
        ];
        let count = errors.len();
        let narrator = Narrator::new(Arc::new(MockNarrator::new(errors)));
        let hero = hero();
        for _ in 0..count {
            let narration = narrator.narrate(&ctx(&hero, "look around")).await;
            assert_eq!(narration.source, NarrativeSource::Fallback);
            assert!(narration.error.is_some());
            assert!(ends_in_terminal(&narration.text));
        }
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let service = MockNarrator::new(vec![Ok("Too late.".to_string())]).with_delay(Duration::from_millis(200));
        let narrator = Narrator::new(Arc::new(service)).with_timeout(Duration::from_millis(20));
        let hero = hero();
        let narration = narrator.narrate(&ctx(&hero, "wait")).await;
        assert_eq!(narration.error, Some(NarrativeError::Timeout));
        assert_eq!(narration.source, NarrativeSource::Fallback);
    }

    fn openrouter_config(server: &MockServer) -> GameConfig {
        GameConfig::default()
            .with_api_key("sk-test")
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_openrouter_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "gen-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "  The innkeeper nods  "}, "finish_reason": "stop"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let narrator = Narrator::from_config(&openrouter_config(&server));
        assert!(narrator.is_online());
        let hero = hero();
        let narration = narrator.narrate(&ctx(&hero, "I greet the innkeeper")).await;
        assert_eq!(narration.source, NarrativeSource::Model);
        assert_eq!(narration.text, "The innkeeper nods.");
    }

    #[tokio::test]
    async fn test_openrouter_failures_fall_back() {
        let cases = [
            (ResponseTemplate::new(401).set_body_string("no"), NarrativeError::Unauthorized),
            (ResponseTemplate::new(429).set_body_string("slow down"), NarrativeError::RateLimited),
            (ResponseTemplate::new(400).set_body_string("bad"), NarrativeError::BadRequest),
            (ResponseTemplate::new(200).set_body_string(""), NarrativeError::Empty),
        ];
        for (template, expected) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(template)
                .mount(&server)
                .await;

            let narrator = Narrator::from_config(&openrouter_config(&server));
            let hero = hero();
            let narration = narrator.narrate(&ctx(&hero, "attack the orc")).await;
            assert_eq!(narration.source, NarrativeSource::Fallback);
            assert_eq!(narration.error, Some(expected));
            assert!(ends_in_terminal(&narration.text));
        }
    }

    #[tokio::test]
    async fn test_openrouter_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let narrator = Narrator::from_config(&openrouter_config(&server));
        let hero = hero();
        let narration = narrator.narrate(&ctx(&hero, "sneak")).await;
        assert!(matches!(narration.error, Some(NarrativeError::Malformed(_))));
        assert_eq!(narration.source, NarrativeSource::Fallback);
    }

    #[test]
    fn test_from_config_without_key_is_offline() {
        assert!(!Narrator::from_config(&GameConfig::default()).is_online());
    }
}
