//! Headless mode for the game.
//!
//! A simple text-based interface over stdin/stdout. Lines starting with `#`
//! are commands; anything else is a player action for the Dungeon Master.

use dungeon_core::character_builder::suggested_point_buy;
use dungeon_core::dice::RngDice;
use dungeon_core::world::{find_location, frontier, ItemId};
use dungeon_core::{
    AbilityMethod, CharacterBuilder, CharacterClass, GameError, GameMaster, HistoryKind, SessionId, SessionView,
    Skill, VoiceArchetype,
};
use std::io::{self, BufRead, Write};

/// Character options from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessOptions {
    pub name: String,
    pub class: CharacterClass,
    pub method: AbilityMethod,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            name: "Adventurer".to_string(),
            class: CharacterClass::Fighter,
            method: AbilityMethod::Preset,
        }
    }
}

impl HeadlessOptions {
    pub fn character(&self) -> CharacterBuilder {
        let builder = CharacterBuilder::new().name(&self.name).class(self.class);
        match self.method {
            AbilityMethod::Preset => builder.ability_scores(self.class.base_stats()),
            AbilityMethod::PointBuy => builder.point_buy(suggested_point_buy(self.class)),
            AbilityMethod::Rolled => builder.rolled(&mut RngDice::thread()),
        }
    }
}

/// Parse character options from command line arguments.
pub fn parse_options_from_args(args: &[String]) -> HeadlessOptions {
    let mut options = HeadlessOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                if let Some(name) = args.get(i + 1) {
                    options.name = name.clone();
                    i += 1;
                }
            }
            "--class" => {
                if let Some(class) = args.get(i + 1) {
                    options.class = class.parse().unwrap_or(CharacterClass::Fighter);
                    i += 1;
                }
            }
            "--point-buy" => options.method = AbilityMethod::PointBuy,
            "--roll" => options.method = AbilityMethod::Rolled,
            _ => {}
        }
        i += 1;
    }

    options
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Quit,
    Help,
    Status,
    Inventory,
    Quests,
    Map,
    Travel(String),
    LevelUp,
    Skill(String),
    Use(String),
    Npc(Option<String>),
    Fight,
    Unknown(String),
    Action(String),
}

fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('#') else {
        return Some(Command::Action(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let arg = (!arg.is_empty()).then(|| arg.to_string());

    Some(match (name.to_lowercase().as_str(), arg) {
        ("quit" | "exit", _) => Command::Quit,
        ("help", _) => Command::Help,
        ("status", _) => Command::Status,
        ("inventory" | "inv", _) => Command::Inventory,
        ("quests", _) => Command::Quests,
        ("map", _) => Command::Map,
        ("travel", Some(id)) => Command::Travel(id),
        ("levelup", _) => Command::LevelUp,
        ("skill", Some(skill)) => Command::Skill(skill),
        ("use", Some(item)) => Command::Use(item),
        ("npc", hint) => Command::Npc(hint),
        ("fight", _) => Command::Fight,
        _ => Command::Unknown(line.to_string()),
    })
}

fn badges(voices: &[VoiceArchetype]) -> String {
    voices.iter().map(|v| format!("[{}]", v.name())).collect::<Vec<_>>().join(" ")
}

fn print_help() {
    println!("[HELP]");
    println!("  #status        - Show your character");
    println!("  #inventory     - List your items");
    println!("  #quests        - List your quests");
    println!("  #map           - Show where you can go");
    println!("  #travel <id>   - Travel to a location");
    println!("  #levelup       - Level up when you have enough experience");
    println!("  #skill <name>  - Spend a skill point");
    println!("  #use <item-id> - Use a consumable item");
    println!("  #npc [hint]    - Meet someone, e.g. #npc a nervous merchant");
    println!("  #fight         - Pick a fight with whatever lurks nearby");
    println!("  #quit          - Exit the game");
    println!("  (anything else is sent as player action)");
}

fn print_status(view: &SessionView) {
    let c = &view.character;
    println!("[STATUS]");
    println!("  Character: {} (level {} {})", c.name, c.level, c.class);
    println!("  HP: {}/{}", c.hp, c.max_hp);
    println!("  XP: {}/{}", c.experience, c.experience_to_next);
    println!("  Gold: {}", c.gold);
    println!("  Skill points: {}", c.skill_points);
    let scores: Vec<String> = c
        .ability_scores
        .iter()
        .map(|(ability, score)| format!("{} {score}", ability.abbreviation()))
        .collect();
    println!("  Abilities: {}", scores.join(", "));
    let trained: Vec<String> = Skill::all()
        .iter()
        .filter(|s| c.skills.is_trained(**s))
        .map(|s| format!("{} {}", s.name(), c.skills.get(*s)))
        .collect();
    if !trained.is_empty() {
        println!("  Skills: {}", trained.join(", "));
    }
    let location = find_location(&view.current_location).map_or(view.current_location.as_str(), |l| l.name);
    println!("  Location: {location}");
}

fn print_inventory(view: &SessionView) {
    println!("[INVENTORY] {} items, {:.1} lb, {} gold worth", view.inventory.len(), view.inventory.total_weight(), view.inventory.total_value());
    for item in view.inventory.iter() {
        println!("  {} x{} ({}) - {}", item.name, item.quantity, item.item_type.name(), item.id);
    }
}

fn print_quests(view: &SessionView) {
    println!("[QUESTS]");
    for quest in &view.quests {
        let (done, total) = quest.progress();
        println!("  {} [{:?}] {done}/{total}", quest.title, quest.status);
        for objective in &quest.objectives {
            let mark = if objective.completed { "x" } else { " " };
            println!("    [{mark}] {}", objective.description);
        }
    }
}

fn print_map(view: &SessionView) {
    println!("[MAP]");
    for id in &view.visited_locations {
        if let Some(location) = find_location(id) {
            let here = if *id == view.current_location { " (you are here)" } else { "" };
            println!("  {} - {}{here}", location.id, location.name);
        }
    }
    let reachable = frontier(&view.visited_locations);
    if !reachable.is_empty() {
        println!("  Unexplored:");
        for location in reachable {
            println!("    {} - {}", location.id, location.name);
        }
    }
}

/// Run the game until stdin closes or the player quits.
pub async fn run_headless(game: &GameMaster, options: HeadlessOptions) -> Result<(), GameError> {
    let id = game.start_session(options.character())?;
    let view = game.session_view(&id)?;

    println!("=== D&D AI Dungeon Master ===");
    println!(
        "Character: {} ({}), HP {}/{}",
        view.character.name, view.character.class, view.character.hp, view.character.max_hp
    );
    println!();
    if let Some(opening) = view.history.iter().find(|e| e.kind == HistoryKind::Dm) {
        println!("[DM] {}", badges(&opening.voices));
        println!("{}", opening.content);
        println!();
    }
    println!("Enter your actions (one per line), #help for commands:");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };
        let Some(command) = parse_line(&line) else {
            continue;
        };
        if command == Command::Quit {
            println!("Goodbye!");
            break;
        }

        if let Err(e) = handle(game, &id, command).await {
            println!("[ERROR] {e}");
        }
        println!();
        stdout.flush().ok();
    }

    Ok(())
}

async fn handle(game: &GameMaster, id: &SessionId, command: Command) -> Result<(), GameError> {
    match command {
        Command::Quit => {}
        Command::Help => print_help(),
        Command::Status => print_status(&game.session_view(id)?),
        Command::Inventory => print_inventory(&game.session_view(id)?),
        Command::Quests => print_quests(&game.session_view(id)?),
        Command::Map => print_map(&game.session_view(id)?),
        Command::Travel(target) => {
            let location = game.travel(id, &target)?;
            println!("[TRAVEL] {}", location.name);
            println!("{}", location.description);
        }
        Command::LevelUp => {
            let reward = game.level_up(id)?;
            let view = game.session_view(id)?;
            println!(
                "[LEVEL UP] Level {}! +{} max HP, +{} skill points",
                view.character.level, reward.hp_increase, reward.skill_points
            );
            for ability in reward.new_abilities {
                println!("  New ability: {ability}");
            }
        }
        Command::Skill(name) => match name.parse::<Skill>() {
            Ok(skill) => {
                let rank = game.spend_skill_point(id, skill)?;
                println!("[SKILL] {} is now rank {rank}", skill.name());
            }
            Err(_) => println!("[ERROR] Unknown skill: {name}"),
        },
        Command::Use(item) => match item.parse::<ItemId>() {
            Ok(item_id) => {
                let used = game.use_item(id, item_id)?;
                println!("[ITEM] Used {} (healed {}, {} left)", used.item, used.healed, used.remaining);
            }
            Err(_) => println!("[ERROR] Not an item id: {item}. See #inventory."),
        },
        Command::Npc(hint) => {
            let npc = game.meet_npc(id, hint.as_deref())?;
            println!("[NPC] {} the {} {} ({:?})", npc.name, npc.race, npc.occupation, npc.relationship);
            println!("  {}", npc.appearance);
            println!("  Voice: {}", npc.voice.name());
            if let Some(greeting) = npc.respond("greeting") {
                println!("  \"{greeting}\"");
            }
        }
        Command::Fight => {
            let outcome = game.fight(id)?;
            println!("[COMBAT] {}", outcome.enemy.name);
            for event in &outcome.result.events {
                println!("  {}", event.result);
            }
            let view = game.session_view(id)?;
            if let Some(summary) = view.history.last() {
                println!("{}", summary.content);
            }
            println!("HP: {}/{}", view.character.hp, view.character.max_hp);
            if outcome.can_level_up {
                println!("You can level up! Type #levelup.");
            }
        }
        Command::Unknown(line) => println!("[ERROR] Unknown command: {line}. Type #help for help."),
        Command::Action(action) => {
            let outcome = game.submit_action(id, &action).await?;
            println!("[d20: {}]", outcome.dice_roll);
            println!("[DM] {}", badges(&outcome.voices));
            for para in outcome.narrative.split("\n\n") {
                println!("{para}");
            }
        }
    }
    Ok(())
}
