//! Testing utilities for the game.
//!
//! This module provides tools for deterministic tests:
//! - `FixedDice` and `ScriptedDice` for controlled rolls
//! - `MockNarrator` for narration without network calls
//! - `TestHarness` for scripted game scenarios

use crate::character_builder::CharacterBuilder;
use crate::config::GameConfig;
use crate::dice::DiceRoller;
use crate::game::{ActionOutcome, GameError, GameMaster};
use crate::narrative::{NarrativeError, NarrativeService, Narrator};
use crate::session::{GameSession, SessionId, SessionView};
use crate::store::{InMemorySessionStore, SessionStore};
use crate::world::CharacterClass;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Dice that always roll the same value, clamped to the die size.
#[derive(Debug, Clone, Copy)]
pub struct FixedDice {
    value: u32,
}

impl FixedDice {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl DiceRoller for FixedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.value.min(sides).max(1)
    }
}

/// Dice that replay a script in a loop. Each value is clamped to the die
/// size, so a 20 on a d6 reads as 6.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    script: Vec<u32>,
    next: usize,
}

impl ScriptedDice {
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        let script: Vec<u32> = script.into_iter().collect();
        Self {
            script: if script.is_empty() { vec![1] } else { script },
            next: 0,
        }
    }
}

impl DiceRoller for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let value = self.script[self.next % self.script.len()];
        self.next += 1;
        value.min(sides).max(1)
    }
}

/// A narrative service that returns scripted results in order.
///
/// Once the script runs out the last result is repeated.
pub struct MockNarrator {
    responses: Mutex<VecDeque<Result<String, NarrativeError>>>,
    last: Mutex<Result<String, NarrativeError>>,
    delay: Option<Duration>,
}

impl MockNarrator {
    pub fn new(responses: Vec<Result<String, NarrativeError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(Err(NarrativeError::Empty)),
            delay: None,
        }
    }

    /// Always answers with `text`.
    pub fn repeating(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Sleep before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl NarrativeService for MockNarrator {
    async fn generate(&self, _prompt: &str) -> Result<String, NarrativeError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(result) = next {
            *last = result;
        }
        last.clone()
    }
}

/// Test harness for running game scenarios.
///
/// Wires a [`GameMaster`] to an in-memory store, a mock narrator and fixed
/// dice, and starts a session for a level 1 Fighter named Bram.
pub struct TestHarness {
    pub game: GameMaster,
    pub store: Arc<InMemorySessionStore>,
    pub session: SessionId,
}

impl TestHarness {
    /// Offline narration and dice that always roll 10.
    pub fn new() -> Self {
        Self::build(Narrator::offline(), FixedDice::new(10))
    }

    /// Narration scripted by `responses`.
    pub fn with_responses(responses: Vec<Result<String, NarrativeError>>) -> Self {
        Self::build(Narrator::new(Arc::new(MockNarrator::new(responses))), FixedDice::new(10))
    }

    /// Offline narration with custom dice.
    pub fn with_dice(dice: impl DiceRoller + Send + 'static) -> Self {
        Self::build(Narrator::offline(), dice)
    }

    fn build(narrator: Narrator, dice: impl DiceRoller + Send + 'static) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let game = GameMaster::new(store.clone(), narrator.with_dice(FixedDice::new(1)), GameConfig::default())
            .with_dice(dice);
        let session = match game.start_session(Self::hero()) {
            Ok(id) => id,
            Err(e) => panic!("test hero should be valid: {e}"),
        };
        Self { game, store, session }
    }

    /// Bram the Fighter with the class preset stats.
    pub fn hero() -> CharacterBuilder {
        CharacterBuilder::new()
            .name("Bram")
            .class(CharacterClass::Fighter)
            .ability_scores(CharacterClass::Fighter.base_stats())
    }

    pub fn view(&self) -> SessionView {
        match self.game.session_view(&self.session) {
            Ok(view) => view,
            Err(e) => panic!("harness session vanished: {e}"),
        }
    }

    /// Change the stored session directly, bypassing the rules.
    pub fn edit(&self, change: impl FnOnce(&mut GameSession)) {
        if let Some(mut session) = self.store.get(&self.session) {
            change(&mut session);
            self.store.update(&self.session, session);
        }
    }

    pub async fn act(&self, action: &str) -> Result<ActionOutcome, GameError> {
        self.game.submit_action(&self.session, action).await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
