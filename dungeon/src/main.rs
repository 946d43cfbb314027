//! D&D AI Dungeon Master, line-oriented front end.
//!
//! ```bash
//! cargo run -p dungeon -- --name "Bram" --class fighter
//! ```
//!
//! Narration uses OpenRouter when `OPENROUTER_API_KEY` is set and offline
//! text otherwise. Logs go to stderr; set `RUST_LOG=debug` for detail.

mod headless;

use dungeon_core::{GameConfig, GameMaster};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let options = headless::parse_options_from_args(&args);
    let config = GameConfig::from_env();
    if !config.has_api_key() {
        eprintln!("Note: OPENROUTER_API_KEY is not set, the Dungeon Master will use offline narration.");
    }

    let game = GameMaster::from_config(config);
    headless::run_headless(&game, options).await?;
    Ok(())
}

fn print_help() {
    println!("D&D AI Dungeon Master");
    println!();
    println!("Usage: dungeon [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --name <NAME>    Character name (default: Adventurer)");
    println!("  --class <CLASS>  fighter, wizard, rogue, cleric, ranger, barbarian, bard or paladin");
    println!("  --point-buy      Buy ability scores with points instead of the class preset");
    println!("  --roll           Roll ability scores (4d6 drop lowest)");
    println!("  -h, --help       Show this help");
    println!();
    println!("Environment:");
    println!("  OPENROUTER_API_KEY      API key for narration (optional)");
    println!("  OPENROUTER_MODEL        Model id (default: {})", dungeon_core::config::DEFAULT_MODEL);
    println!("  DM_LANGUAGE             Language the DM writes in (default: English)");
    println!("  NARRATIVE_TIMEOUT_SECS  Seconds to wait for the model before falling back");
}
