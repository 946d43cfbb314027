//! NPC generation.
//!
//! Three generators: a fully random townsfolk NPC, a contextual NPC shaped by
//! a free-text hint, and a hostile monster for combat encounters.

use crate::classify::{classify, KeywordTable};
use crate::dice::DiceRoller;
use crate::items::MERCHANT_STOCK;
use crate::voices::VoiceArchetype;
use crate::world::{InventoryItem, NpcId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Friendly,
    Neutral,
    Hostile,
    Romantic,
}

/// Combat stats, generated for every NPC in case the encounter turns hostile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcStats {
    pub level: u8,
    pub hp: i32,
    pub ac: i32,
    /// Damage dice, e.g. `1d6+2`.
    pub damage: String,
    /// Experience value of defeating the NPC.
    pub experience: u32,
}

/// One line of dialogue and the keyword that triggers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub trigger: String,
    pub response: String,
    pub conditions: Vec<String>,
}

impl DialogueEntry {
    pub fn new(trigger: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            response: response.into(),
            conditions: Vec::new(),
        }
    }
}

/// A non-player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
    pub race: String,
    pub occupation: String,
    pub personality: Vec<String>,
    pub appearance: String,
    pub voice: VoiceArchetype,
    pub location: String,
    pub relationship: Relationship,
    pub quest_giver: bool,
    pub merchant: bool,
    pub stats: Option<NpcStats>,
    pub dialogue: Vec<DialogueEntry>,
    pub inventory: Option<Vec<InventoryItem>>,
    pub created_at: DateTime<Utc>,
}

impl Npc {
    /// Response for a dialogue trigger, if the NPC has one.
    pub fn respond(&self, trigger: &str) -> Option<&str> {
        self.dialogue
            .iter()
            .find(|d| d.trigger.eq_ignore_ascii_case(trigger))
            .map(|d| d.response.as_str())
    }

    pub fn is_hostile(&self) -> bool {
        self.relationship == Relationship::Hostile
    }
}

const RACES: &[&str] = &[
    "Human", "Elf", "Dwarf", "Halfling", "Dragonborn", "Gnome", "Half-Elf", "Half-Orc", "Tiefling",
    "Aasimar",
];

const MERCHANT: &str = "Merchant";
const GUARD: &str = "Guard";

const OCCUPATIONS: &[&str] = &[
    MERCHANT, "Blacksmith", "Innkeeper", GUARD, "Farmer", "Priest", "Mage", "Bard", "Hunter",
    "Fisher", "Baker", "Tailor", "Alchemist", "Scribe", "Soldier", "Thief", "Mercenary",
];

const PERSONALITY_TRAITS: &[&str] = &[
    "friendly", "suspicious", "greedy", "generous", "curious", "secretive", "talkative", "quiet",
    "brave", "cowardly", "honest", "deceitful", "cheerful", "gloomy", "wise", "foolish", "patient",
    "hot-tempered", "kind", "cruel",
];

const APPEARANCE_FEATURES: &[&str] = &[
    "tall", "short", "thin", "stout", "muscular", "frail", "bearded", "bald", "long-haired",
    "close-cropped", "scarred", "tattooed", "bespectacled", "leaning on a cane", "elegant",
    "scruffy",
];

const FIRST_NAMES: &[&str] = &[
    "Aldric", "Bryn", "Cedric", "Dara", "Elowen", "Fenwick", "Gwyn", "Hilda", "Ivor", "Jora",
    "Kestrel", "Liora", "Marek", "Nessa", "Orin", "Pell", "Quill", "Rowan", "Sable", "Tamsin",
];

const LAST_NAMES: &[&str] = &[
    "Ironbeard", "Goldwing", "Brightwater", "Ashdown", "Stonefield", "Swiftfoot", "Oakenshield",
    "Thornwood", "Blackbriar", "Fairweather", "Hollowell", "Underhill", "Redmane", "Silverleaf",
    "Ravensworth",
];

fn pick<'a, D: DiceRoller + ?Sized>(dice: &mut D, pool: &[&'a str]) -> &'a str {
    pool[dice.pick_index(pool.len())]
}

/// Pick `count` distinct entries. A repeated draw moves to the next unused entry.
fn pick_distinct<D: DiceRoller + ?Sized>(dice: &mut D, pool: &[&str], count: usize) -> Vec<String> {
    let mut chosen: Vec<String> = Vec::with_capacity(count);
    for _ in 0..count.min(pool.len()) {
        let mut idx = dice.pick_index(pool.len());
        while chosen.iter().any(|c| c == pool[idx]) {
            idx = (idx + 1) % pool.len();
        }
        chosen.push(pool[idx].to_string());
    }
    chosen
}

/// True with the given percentage chance.
fn chance<D: DiceRoller + ?Sized>(dice: &mut D, percent: u32) -> bool {
    dice.roll_die(100) <= percent
}

fn roll_relationship<D: DiceRoller + ?Sized>(dice: &mut D) -> Relationship {
    match dice.roll_die(100) {
        0..=40 => Relationship::Friendly,
        41..=80 => Relationship::Neutral,
        81..=95 => Relationship::Hostile,
        _ => Relationship::Romantic,
    }
}

pub fn generate_name<D: DiceRoller + ?Sized>(dice: &mut D) -> String {
    format!("{} {}", pick(dice, FIRST_NAMES), pick(dice, LAST_NAMES))
}

fn starter_dialogue(personality: &[String], occupation: &str) -> Vec<DialogueEntry> {
    let has = |trait_name: &str| personality.iter().any(|p| p == trait_name);
    let greeting = if has("friendly") {
        "Greetings, traveler! How fares the road?"
    } else if has("suspicious") {
        "What do you want, stranger?"
    } else {
        "Hello."
    };

    let (trigger, line) = match occupation {
        MERCHANT => ("trade", "I have the finest wares! Care to take a look?"),
        GUARD | "Soldier" => ("law", "Order must be kept. No trouble on my watch!"),
        "Priest" => ("blessing", "The gods watch over those who walk in the light."),
        "Innkeeper" => ("rumors", "Sit, have a drink, and I'll tell you the latest news."),
        "Mage" | "Scribe" | "Alchemist" => ("lore", "Knowledge is the only treasure worth hoarding."),
        _ => ("work", "Busy day, as always. What brings you here?"),
    };

    vec![DialogueEntry::new("greeting", greeting), DialogueEntry::new(trigger, line)]
}

/// 3 to 10 random stacks from the merchant stock table.
pub fn generate_merchant_inventory<D: DiceRoller + ?Sized>(dice: &mut D) -> Vec<InventoryItem> {
    let count = dice.roll_die(8) + 2;
    (0..count)
        .map(|_| {
            let template = &MERCHANT_STOCK[dice.pick_index(MERCHANT_STOCK.len())];
            template.instantiate(dice.roll_die(3))
        })
        .collect()
}

/// A random townsfolk NPC at `location`.
pub fn generate_random_npc<D: DiceRoller + ?Sized>(dice: &mut D, location: &str) -> Npc {
    let name = generate_name(dice);
    let race = pick(dice, RACES);
    let occupation = pick(dice, OCCUPATIONS);
    let trait_count = dice.roll_die(2) as usize + 1;
    let personality = pick_distinct(dice, PERSONALITY_TRAITS, trait_count);
    let feature_count = dice.roll_die(3) as usize + 1;
    let features = pick_distinct(dice, APPEARANCE_FEATURES, feature_count);
    let voice = VoiceArchetype::random(dice);
    let relationship = roll_relationship(dice);
    let quest_giver = chance(dice, 30);
    let merchant = occupation == MERCHANT || chance(dice, 20);

    let level = dice.roll_die(5) as u8;
    let stats = NpcStats {
        level,
        hp: dice.roll_die(20).saturating_sub(1) as i32 + i32::from(level) * 5,
        ac: dice.roll_die(5).saturating_sub(1) as i32 + 10,
        damage: "1d6".to_string(),
        experience: u32::from(level) * 25,
    };

    let dialogue = starter_dialogue(&personality, occupation);
    let inventory = merchant.then(|| generate_merchant_inventory(dice));

    Npc {
        id: NpcId::new(),
        name,
        race: race.to_string(),
        occupation: occupation.to_string(),
        personality,
        appearance: format!("{}, {}", race, features.join(", ")),
        voice,
        location: location.to_string(),
        relationship,
        quest_giver,
        merchant,
        stats: Some(stats),
        dialogue,
        inventory,
        created_at: Utc::now(),
    }
}

/// Kinds of NPC a hint can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NpcRole {
    Merchant,
    Guard,
    Priest,
    Mage,
}

const ROLE_KEYWORDS: &KeywordTable<NpcRole> = &[
    (NpcRole::Merchant, &["merchant", "trader", "shop"]),
    (NpcRole::Guard, &["guard", "soldier"]),
    (NpcRole::Priest, &["priest", "temple", "cleric"]),
    (NpcRole::Mage, &["mage", "wizard", "sage", "scholar"]),
];

/// An NPC shaped by a free-text hint such as "a suspicious merchant".
///
/// The first matching role sets occupation, voice and personality. Hints
/// that match nothing produce a commoner.
pub fn generate_contextual_npc<D: DiceRoller + ?Sized>(dice: &mut D, hint: &str, location: &str) -> Npc {
    let (occupation, voice, personality): (&str, VoiceArchetype, &[&str]) = match classify(ROLE_KEYWORDS, hint) {
        Some(NpcRole::Merchant) => (MERCHANT, VoiceArchetype::Merchant, &["greedy", "talkative"][..]),
        Some(NpcRole::Guard) => (GUARD, VoiceArchetype::Guard, &["stern", "honest"][..]),
        Some(NpcRole::Priest) => ("Priest", VoiceArchetype::Priest, &["wise", "kind"][..]),
        Some(NpcRole::Mage) => ("Mage", VoiceArchetype::Scholar, &["curious", "wise"][..]),
        None => ("Commoner", VoiceArchetype::Peasant, &["friendly"][..]),
    };

    let mut npc = generate_random_npc(dice, location);
    npc.occupation = occupation.to_string();
    npc.voice = voice;
    npc.personality = personality.iter().map(|p| p.to_string()).collect();
    npc.dialogue = starter_dialogue(&npc.personality, occupation);
    npc.merchant = occupation == MERCHANT;
    npc.inventory = match (npc.merchant, npc.inventory.take()) {
        (true, Some(stock)) => Some(stock),
        (true, None) => Some(generate_merchant_inventory(dice)),
        (false, _) => None,
    };
    npc.quest_giver = chance(dice, 50);
    npc
}

/// A monster from the encounter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monster {
    pub name: &'static str,
    pub race: &'static str,
    pub level: u8,
    pub hp: i32,
    pub ac: i32,
    pub damage: &'static str,
    pub experience: u32,
}

pub const MONSTERS: &[Monster] = &[
    Monster { name: "Goblin Raider", race: "Goblin", level: 1, hp: 7, ac: 15, damage: "1d6+2", experience: 50 },
    Monster { name: "Orc Warrior", race: "Orc", level: 2, hp: 15, ac: 13, damage: "1d12+3", experience: 100 },
    Monster { name: "Skeleton Sentry", race: "Undead", level: 1, hp: 13, ac: 13, damage: "1d6+2", experience: 50 },
    Monster { name: "Wild Wolf", race: "Beast", level: 1, hp: 11, ac: 12, damage: "2d4+2", experience: 25 },
    Monster { name: "Bandit", race: "Human", level: 1, hp: 11, ac: 12, damage: "1d6+1", experience: 25 },
];

impl Monster {
    /// A hostile NPC for this monster at `location`.
    pub fn spawn(&self, location: &str) -> Npc {
        Npc {
            id: NpcId::new(),
            name: self.name.to_string(),
            race: self.race.to_string(),
            occupation: "Enemy".to_string(),
            personality: vec!["aggressive".to_string(), "hostile".to_string()],
            appearance: format!("{}, ready for battle", self.race),
            voice: VoiceArchetype::Villain,
            location: location.to_string(),
            relationship: Relationship::Hostile,
            quest_giver: false,
            merchant: false,
            stats: Some(NpcStats {
                level: self.level,
                hp: self.hp,
                ac: self.ac,
                damage: self.damage.to_string(),
                experience: self.experience,
            }),
            dialogue: vec![DialogueEntry::new("combat", "Prepare to fight!")],
            inventory: None,
            created_at: Utc::now(),
        }
    }
}

/// A random hostile enemy for a fight at `location`.
pub fn generate_combat_encounter<D: DiceRoller + ?Sized>(dice: &mut D, location: &str) -> Npc {
    MONSTERS[dice.pick_index(MONSTERS.len())].spawn(location)
}
