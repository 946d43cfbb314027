//! Prompt construction for the narrative service.

use crate::voices::VoiceArchetype;
use crate::world::{Ability, Character};

/// Characters of the previous DM line carried into the prompt.
pub const LAST_EVENT_CHARS: usize = 150;

const NO_PREVIOUS_EVENT: &str = "The adventure begins";

/// Everything the prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub character: &'a Character,
    /// Display name of the current location.
    pub location: Option<&'a str>,
    pub last_dm_line: Option<&'a str>,
    pub action: &'a str,
    pub roll: u8,
}

/// Qualitative label for a d20 result.
pub fn roll_label(roll: u8) -> &'static str {
    match roll {
        15.. => "excellent!",
        10..=14 => "good",
        6..=9 => "average",
        _ => "failure",
    }
}

/// DM persona and output rules sent as the system message.
pub fn system_instruction(language: &str) -> String {
    let voices: Vec<String> = VoiceArchetype::all()
        .iter()
        .enumerate()
        .map(|(i, voice)| {
            let profile = voice.profile();
            let words: Vec<String> = profile.vocabulary.iter().take(3).map(|w| format!("\"{w}\"")).collect();
            format!("{}. {}: {}", i + 1, profile.name.to_uppercase(), words.join(", "))
        })
        .collect();

    format!(
        "You are an expert Dungeon Master for D&D. Create engaging adventures with unique NPC voices.\n\
         \n\
         RESPONSE STYLE:\n\
         - Write in {language}\n\
         - Be concise but vivid, focus on action and plot\n\
         - Only mention the key details of the surroundings\n\
         - Emphasize NPC dialogue with unique voices\n\
         - Always finish your sentences\n\
         \n\
         NPC VOICES (use their characteristic vocabulary):\n\
         {voices}\n\
         \n\
         RESPONSE STRUCTURE (4-6 sentences):\n\
         1. Result of the player's action (1-2 sentences)\n\
         2. One line of NPC dialogue in a distinct voice\n\
         3. A new event or plot twist (1-2 sentences)\n\
         4. One explicit choice for the player (1 sentence)\n\
         \n\
         Never end mid-sentence. Respond in {language}.",
        voices = voices.join("\n"),
    )
}

/// The user message for one player action.
pub fn build_prompt(ctx: &PromptContext<'_>, language: &str) -> String {
    let c = ctx.character;
    let stats: Vec<String> = Ability::all()
        .iter()
        .map(|a| format!("{} {}", a.abbreviation(), c.ability_scores.get(*a)))
        .collect();
    let last_event: String = ctx
        .last_dm_line
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(NO_PREVIOUS_EVENT)
        .chars()
        .take(LAST_EVENT_CHARS)
        .collect();

    let mut prompt = String::from("GAME SITUATION:\n");
    prompt.push_str(&format!(
        "Character: {} ({}), level {}, HP {}/{}\n",
        c.name, c.class, c.level, c.hp, c.max_hp
    ));
    prompt.push_str(&format!("Stats: {}\n", stats.join(", ")));
    if let Some(location) = ctx.location {
        prompt.push_str(&format!("Location: {location}\n"));
    }
    prompt.push_str(&format!("Last event: {last_event}\n\n"));
    prompt.push_str(&format!("PLAYER ACTION: \"{}\"\n", ctx.action.trim()));
    prompt.push_str(&format!("DICE RESULT: {}/20 ({})\n\n", ctx.roll, roll_label(ctx.roll)));
    prompt.push_str(&format!(
        "Describe the result briefly but vividly. If there are NPCs, give them unique voices. \
         Offer the player a specific choice. Maximum 4-6 sentences in {language}."
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{AbilityScores, CharacterClass};

    fn bram() -> Character {
        Character::new("Bram", CharacterClass::Fighter, AbilityScores::new(15, 12, 14, 8, 10, 9))
    }

    #[test]
    fn test_roll_labels() {
        assert_eq!(roll_label(20), "excellent!");
        assert_eq!(roll_label(15), "excellent!");
        assert_eq!(roll_label(14), "good");
        assert_eq!(roll_label(10), "good");
        assert_eq!(roll_label(9), "average");
        assert_eq!(roll_label(6), "average");
        assert_eq!(roll_label(5), "failure");
        assert_eq!(roll_label(1), "failure");
    }

    #[test]
    fn test_prompt_contents() {
        let hero = bram();
        let ctx = PromptContext {
            character: &hero,
            location: Some("The Goldenheart Tavern"),
            last_dm_line: None,
            action: "  I search the room ",
            roll: 12,
        };
        let prompt = build_prompt(&ctx, "English");
        assert!(prompt.contains("Character: Bram (Fighter), level 1, HP 12/12"));
        assert!(prompt.contains("STR 15, DEX 12, CON 14, INT 8, WIS 10, CHA 9"));
        assert!(prompt.contains("Location: The Goldenheart Tavern"));
        assert!(prompt.contains("Last event: The adventure begins"));
        assert!(prompt.contains("PLAYER ACTION: \"I search the room\""));
        assert!(prompt.contains("DICE RESULT: 12/20 (good)"));
        assert!(prompt.ends_with("in English."));
    }

    #[test]
    fn test_last_event_is_truncated() {
        let hero = bram();
        let long = "é".repeat(400);
        let ctx = PromptContext {
            character: &hero,
            location: None,
            last_dm_line: Some(&long),
            action: "wait",
            roll: 3,
        };
        let prompt = build_prompt(&ctx, "English");
        let line = prompt.lines().find(|l| l.starts_with("Last event: ")).unwrap();
        assert_eq!(line.trim_start_matches("Last event: ").chars().count(), LAST_EVENT_CHARS);
        assert!(!prompt.contains("Location:"));
    }

    #[test]
    fn test_system_instruction_lists_all_voices() {
        let system = system_instruction("Russian");
        assert!(system.contains("Write in Russian"));
        assert!(system.contains("12. VILLAIN: \"fool\""));
        assert!(system.contains("4-6 sentences"));
    }
}
