//! Integration tests that call the real OpenRouter API.
//!
//! These tests require OPENROUTER_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p dungeon-core --test api_integration -- --ignored`
//!
//! These are marked #[ignore] by default to avoid:
//! - API costs in CI
//! - Test failures when no API key is available
//! - Slow test runs (API calls take seconds)

use dungeon_core::{GameConfig, GameMaster, NarrativeSource, TestHarness};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

#[tokio::test]
#[ignore] // Run with: cargo test -p dungeon-core --test api_integration -- --ignored
async fn test_model_narrates_an_action() {
    setup();
    let config = GameConfig::from_env();
    if !config.has_api_key() {
        eprintln!("Skipping test: OPENROUTER_API_KEY not set");
        return;
    }

    let game = GameMaster::from_config(config);
    let id = game.start_session(TestHarness::hero()).unwrap();
    let outcome = game.submit_action(&id, "I ask the innkeeper about the goblins").await.unwrap();

    println!("[d20: {}] {:?}", outcome.dice_roll, outcome.source);
    println!("{}", outcome.narrative);

    assert_eq!(outcome.source, NarrativeSource::Model);
    assert!(outcome.narrative.ends_with(['.', '!', '?']));
}

#[tokio::test]
#[ignore]
async fn test_bad_key_falls_back() {
    setup();
    let config = GameConfig::from_env().with_api_key("sk-or-invalid");
    let game = GameMaster::from_config(config);
    let id = game.start_session(TestHarness::hero()).unwrap();

    let outcome = game.submit_action(&id, "I draw my sword").await.unwrap();
    assert_eq!(outcome.source, NarrativeSource::Fallback);
    assert!(!outcome.narrative.is_empty());
}
