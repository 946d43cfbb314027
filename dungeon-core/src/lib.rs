//! D&D-style text adventure engine with an AI Dungeon Master.
//!
//! This crate provides:
//! - Character creation, progression and skill rules
//! - Simplified combat resolution and procedural NPCs
//! - Narration through an OpenRouter model with offline fallback text
//! - An in-memory session store with optimistic concurrency
//!
//! # Quick Start
//!
//! ```ignore
//! use dungeon_core::{CharacterBuilder, CharacterClass, GameConfig, GameMaster};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let game = GameMaster::from_config(GameConfig::from_env());
//!
//!     let id = game.start_session(
//!         CharacterBuilder::new()
//!             .name("Bram")
//!             .class(CharacterClass::Fighter)
//!             .ability_scores(CharacterClass::Fighter.base_stats()),
//!     )?;
//!
//!     let outcome = game.submit_action(&id, "I look around the tavern").await?;
//!     println!("[d20: {}] {}", outcome.dice_roll, outcome.narrative);
//!     Ok(())
//! }
//! ```

pub mod character_builder;
pub mod class_data;
pub mod classify;
pub mod combat;
pub mod config;
pub mod dice;
pub mod game;
pub mod items;
pub mod narrative;
pub mod npc;
pub mod rules;
pub mod scenarios;
pub mod session;
pub mod store;
pub mod testing;
pub mod voices;
pub mod world;

// Primary public API
pub use character_builder::{AbilityMethod, CharacterBuilder, ValidationError};
pub use config::GameConfig;
pub use game::{ActionOutcome, FightOutcome, GameError, GameMaster, ItemUse, QuestProgress};
pub use narrative::{NarrativeError, NarrativeService, NarrativeSource, Narrator, OpenRouterNarrator};
pub use rules::RuleError;
pub use session::{GameSession, HistoryEntry, HistoryKind, SessionId, SessionView};
pub use store::{InMemorySessionStore, SessionStore, StoreError};
pub use testing::{FixedDice, MockNarrator, ScriptedDice, TestHarness};
pub use voices::VoiceArchetype;
pub use world::{Ability, AbilityScores, Character, CharacterClass, Skill};
