//! Game world types.
//!
//! Contains the data model for game state: ability scores, skills, the
//! player character, inventory items, quests, and the static world map.

use crate::rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for inventory items.
    ItemId
);
uuid_id!(
    /// Unique identifier for quests.
    QuestId
);
uuid_id!(
    /// Unique identifier for quest objectives.
    ObjectiveId
);
uuid_id!(
    /// Unique identifier for NPCs.
    NpcId
);
uuid_id!(
    /// Unique identifier for combat log entries.
    CombatEventId
);

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Ability::Strength => "Physical power, affects melee attacks and carrying capacity",
            Ability::Dexterity => "Agility and reflexes, affects AC, initiative, and ranged attacks",
            Ability::Constitution => "Health and stamina, affects hit points and fortitude saves",
            Ability::Intelligence => "Reasoning ability, affects skill points and knowledge",
            Ability::Wisdom => "Awareness and insight, affects perception and will saves",
            Ability::Charisma => "Force of personality, affects social interactions and leadership",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub const fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    /// All scores at 8, the zero-cost point-buy baseline.
    pub const fn point_buy_baseline() -> Self {
        Self::new(8, 8, 8, 8, 8, 8)
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        rules::ability_modifier(self.get(ability))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, u8)> + '_ {
        Ability::all().into_iter().map(move |a| (a, self.get(a)))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// Highest rank a skill can be trained to.
pub const MAX_SKILL_RANK: u8 = 5;

/// The skills a character can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Stealth,
    Investigation,
    Perception,
    Persuasion,
    Intimidation,
    Survival,
    Arcana,
}

impl Skill {
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Stealth => Ability::Dexterity,
            Skill::Investigation | Skill::Arcana => Ability::Intelligence,
            Skill::Perception | Skill::Survival => Ability::Wisdom,
            Skill::Persuasion | Skill::Intimidation => Ability::Charisma,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Stealth => "Stealth",
            Skill::Investigation => "Investigation",
            Skill::Perception => "Perception",
            Skill::Persuasion => "Persuasion",
            Skill::Intimidation => "Intimidation",
            Skill::Survival => "Survival",
            Skill::Arcana => "Arcana",
        }
    }

    pub fn all() -> [Skill; 8] {
        [
            Skill::Athletics,
            Skill::Stealth,
            Skill::Investigation,
            Skill::Perception,
            Skill::Persuasion,
            Skill::Intimidation,
            Skill::Survival,
            Skill::Arcana,
        ]
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Skill::all()
            .into_iter()
            .find(|skill| skill.name().to_lowercase() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Trained ranks for every skill, each in `0..=MAX_SKILL_RANK`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRanks {
    pub athletics: u8,
    pub stealth: u8,
    pub investigation: u8,
    pub perception: u8,
    pub persuasion: u8,
    pub intimidation: u8,
    pub survival: u8,
    pub arcana: u8,
}

impl SkillRanks {
    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Athletics => self.athletics,
            Skill::Stealth => self.stealth,
            Skill::Investigation => self.investigation,
            Skill::Perception => self.perception,
            Skill::Persuasion => self.persuasion,
            Skill::Intimidation => self.intimidation,
            Skill::Survival => self.survival,
            Skill::Arcana => self.arcana,
        }
    }

    /// Set a rank, clamped to `MAX_SKILL_RANK`.
    pub fn set(&mut self, skill: Skill, rank: u8) {
        let rank = rank.min(MAX_SKILL_RANK);
        match skill {
            Skill::Athletics => self.athletics = rank,
            Skill::Stealth => self.stealth = rank,
            Skill::Investigation => self.investigation = rank,
            Skill::Perception => self.perception = rank,
            Skill::Persuasion => self.persuasion = rank,
            Skill::Intimidation => self.intimidation = rank,
            Skill::Survival => self.survival = rank,
            Skill::Arcana => self.arcana = rank,
        }
    }

    pub fn is_trained(&self, skill: Skill) -> bool {
        self.get(skill) > 0
    }
}

// ============================================================================
// Classes
// ============================================================================

/// Playable classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Fighter,
    Wizard,
    Rogue,
    Cleric,
    Ranger,
    Barbarian,
    Bard,
    Paladin,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Wizard => "Wizard",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Paladin => "Paladin",
        }
    }

    pub fn all() -> [CharacterClass; 8] {
        [
            CharacterClass::Fighter,
            CharacterClass::Wizard,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
            CharacterClass::Ranger,
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Paladin,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CharacterClass::all()
            .into_iter()
            .find(|class| class.name().to_lowercase() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

// ============================================================================
// Character
// ============================================================================

/// The player's avatar.
///
/// `0 <= hp <= max_hp` holds after every mutation made through this type
/// or the rules in [`crate::rules`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub ability_scores: AbilityScores,
    pub level: u8,
    pub experience: u32,
    pub experience_to_next: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: u32,
    pub skill_points: u32,
    pub skills: SkillRanks,
}

impl Character {
    /// A fresh level 1 character. Starting HP is `10 + CON modifier`.
    pub fn new(name: impl Into<String>, class: CharacterClass, ability_scores: AbilityScores) -> Self {
        let max_hp = 10 + ability_scores.modifier(Ability::Constitution);
        Self {
            name: name.into(),
            class,
            ability_scores,
            level: 1,
            experience: 0,
            experience_to_next: rules::experience_for_next_level(1),
            hp: max_hp,
            max_hp,
            gold: 0,
            skill_points: 2,
            skills: SkillRanks::default(),
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.ability_scores.modifier(ability)
    }

    pub fn proficiency_bonus(&self) -> i32 {
        rules::proficiency_bonus(self.level)
    }

    /// Apply damage, never dropping below 0. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        before - self.hp
    }

    /// Heal, never exceeding max HP. Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn is_conscious(&self) -> bool {
        self.hp > 0
    }
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    Treasure,
    Tool,
    Misc,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Consumable => "consumable",
            ItemType::Treasure => "treasure",
            ItemType::Tool => "tool",
            ItemType::Misc => "misc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Optional combat stats on an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    /// Damage dice, e.g. `1d8+1`.
    pub damage: Option<String>,
    pub armor: Option<i32>,
    pub bonus: Option<String>,
}

/// A stackable inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub item_type: ItemType,
    pub description: String,
    pub quantity: u32,
    pub value: u32,
    pub rarity: Rarity,
    pub weight: f32,
    pub stats: Option<ItemStats>,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, item_type: ItemType, description: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            item_type,
            description: description.into(),
            quantity: 1,
            value: 0,
            rarity: Rarity::Common,
            weight: 0.0,
            stats: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    pub fn with_damage(mut self, dice: impl Into<String>) -> Self {
        self.stats.get_or_insert_with(ItemStats::default).damage = Some(dice.into());
        self
    }

    pub fn with_armor(mut self, armor: i32) -> Self {
        self.stats.get_or_insert_with(ItemStats::default).armor = Some(armor);
        self
    }

    pub fn with_bonus(mut self, bonus: impl Into<String>) -> Self {
        self.stats.get_or_insert_with(ItemStats::default).bonus = Some(bonus.into());
        self
    }

    /// Weapons and armor are distinct pieces; everything else stacks.
    pub fn is_stackable(&self) -> bool {
        !matches!(self.item_type, ItemType::Weapon | ItemType::Armor)
    }
}

/// Ordered list of the items a session owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        let mut inventory = Self::default();
        for item in items {
            inventory.add(item);
        }
        inventory
    }

    /// Add an item. Stackable items merge into an entry with the same name.
    pub fn add(&mut self, item: InventoryItem) {
        if item.is_stackable() {
            if let Some(existing) = self
                .items
                .iter_mut()
                .find(|i| i.is_stackable() && i.name.eq_ignore_ascii_case(&item.name))
            {
                existing.quantity += item.quantity;
                return;
            }
        }
        self.items.push(item);
    }

    /// Remove `quantity` of an item. The entry disappears when it reaches 0.
    /// Returns false if the item is missing or there are not enough of it.
    pub fn remove(&mut self, id: ItemId, quantity: u32) -> bool {
        let Some(idx) = self.items.iter().position(|i| i.id == id) else {
            return false;
        };
        if self.items[idx].quantity < quantity {
            return false;
        }
        self.items[idx].quantity -= quantity;
        if self.items[idx].quantity == 0 {
            self.items.remove(idx);
        }
        true
    }

    pub fn find(&self, id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Find an item by name, case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    pub fn total_weight(&self) -> f32 {
        self.items.iter().map(|i| i.weight * i.quantity as f32).sum()
    }

    pub fn total_value(&self) -> u32 {
        self.items.iter().map(|i| i.value * i.quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter()
    }
}

// ============================================================================
// Quests
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

impl QuestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, QuestStatus::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestObjective {
    pub id: ObjectiveId,
    pub description: String,
    pub completed: bool,
}

impl QuestObjective {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: ObjectiveId::new(),
            description: description.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestReward {
    pub gold: u32,
    pub items: Vec<InventoryItem>,
    pub experience: u32,
}

/// Errors from quest state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("quest is already {0:?}")]
    AlreadyTerminal(QuestStatus),
    #[error("quest has no objective {0}")]
    UnknownObjective(ObjectiveId),
}

/// A tracked objective list. Status only moves `Active -> Completed | Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub status: QuestStatus,
    pub objectives: Vec<QuestObjective>,
    pub reward: Option<QuestReward>,
    pub giver: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Quest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: QuestId::new(),
            title: title.into(),
            description: description.into(),
            status: QuestStatus::Active,
            objectives: Vec::new(),
            reward: None,
            giver: None,
            location: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn with_objective(mut self, description: impl Into<String>) -> Self {
        self.objectives.push(QuestObjective::new(description));
        self
    }

    pub fn with_reward(mut self, reward: QuestReward) -> Self {
        self.reward = Some(reward);
        self
    }

    pub fn with_giver(mut self, giver: impl Into<String>) -> Self {
        self.giver = Some(giver.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Fraction of objectives done, as `(completed, total)`.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.objectives.iter().filter(|o| o.completed).count();
        (done, self.objectives.len())
    }

    pub fn all_objectives_complete(&self) -> bool {
        !self.objectives.is_empty() && self.objectives.iter().all(|o| o.completed)
    }

    /// Mark an objective done. Returns true if every objective is now done.
    pub fn complete_objective(&mut self, objective: ObjectiveId) -> Result<bool, QuestError> {
        self.ensure_active()?;
        let entry = self
            .objectives
            .iter_mut()
            .find(|o| o.id == objective)
            .ok_or(QuestError::UnknownObjective(objective))?;
        entry.completed = true;
        Ok(self.all_objectives_complete())
    }

    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), QuestError> {
        self.ensure_active()?;
        self.status = QuestStatus::Completed;
        self.completed_at = Some(at);
        Ok(())
    }

    pub fn fail(&mut self) -> Result<(), QuestError> {
        self.ensure_active()?;
        self.status = QuestStatus::Failed;
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), QuestError> {
        if self.status.is_terminal() {
            Err(QuestError::AlreadyTerminal(self.status))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Locations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Town,
    Dungeon,
    Wilderness,
    Landmark,
}

/// A node of the static world graph.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub location_type: LocationType,
    pub connections: &'static [&'static str],
    pub discovered: bool,
    pub x: i32,
    pub y: i32,
}

/// Where every new adventure begins.
pub const STARTING_LOCATION: &str = "goldenheart-tavern";

pub static WORLD_LOCATIONS: &[Location] = &[
    Location {
        id: "goldenheart-tavern",
        name: "The Goldenheart Tavern",
        description: "A warm roadside inn where travelers trade rumors over spiced ale.",
        location_type: LocationType::Town,
        connections: &["millbrook-village", "whispering-woods"],
        discovered: true,
        x: 200,
        y: 150,
    },
    Location {
        id: "millbrook-village",
        name: "Millbrook Village",
        description: "A farming village of thatched roofs and a noisy market square.",
        location_type: LocationType::Town,
        connections: &["goldenheart-tavern", "old-mill", "kings-road"],
        discovered: false,
        x: 270,
        y: 110,
    },
    Location {
        id: "whispering-woods",
        name: "The Whispering Woods",
        description: "Ancient trees whose leaves seem to murmur when the wind is still.",
        location_type: LocationType::Wilderness,
        connections: &["goldenheart-tavern", "forgotten-shrine", "goblin-caves"],
        discovered: false,
        x: 130,
        y: 200,
    },
    Location {
        id: "old-mill",
        name: "The Old Mill",
        description: "An abandoned watermill. The wheel still turns at night.",
        location_type: LocationType::Landmark,
        connections: &["millbrook-village"],
        discovered: false,
        x: 320,
        y: 70,
    },
    Location {
        id: "kings-road",
        name: "The King's Road",
        description: "A paved highway patrolled less often than it should be.",
        location_type: LocationType::Wilderness,
        connections: &["millbrook-village", "stormwatch-keep"],
        discovered: false,
        x: 340,
        y: 160,
    },
    Location {
        id: "forgotten-shrine",
        name: "The Forgotten Shrine",
        description: "A moss-covered shrine to a god nobody remembers.",
        location_type: LocationType::Landmark,
        connections: &["whispering-woods"],
        discovered: false,
        x: 70,
        y: 250,
    },
    Location {
        id: "goblin-caves",
        name: "The Goblin Caves",
        description: "Smoke-stained tunnels echoing with harsh laughter.",
        location_type: LocationType::Dungeon,
        connections: &["whispering-woods"],
        discovered: false,
        x: 150,
        y: 270,
    },
    Location {
        id: "stormwatch-keep",
        name: "Stormwatch Keep",
        description: "A ruined fortress on a sea cliff, lit by lightning.",
        location_type: LocationType::Dungeon,
        connections: &["kings-road"],
        discovered: false,
        x: 380,
        y: 230,
    },
];

/// Look up a location by id.
pub fn find_location(id: &str) -> Option<&'static Location> {
    WORLD_LOCATIONS.iter().find(|l| l.id == id)
}

/// A location is reachable if it was visited, or if it neighbours a
/// location that was visited or is discovered from the start.
pub fn is_accessible(location: &Location, visited: &[String]) -> bool {
    if visited.iter().any(|v| v == location.id) {
        return true;
    }
    location.connections.iter().any(|neighbour| {
        visited.iter().any(|v| v == neighbour)
            || find_location(neighbour).is_some_and(|l| l.discovered)
    })
}

/// Locations that can be travelled to but were not visited yet.
pub fn frontier(visited: &[String]) -> Vec<&'static Location> {
    WORLD_LOCATIONS
        .iter()
        .filter(|l| !visited.iter().any(|v| v == l.id) && is_accessible(l, visited))
        .collect()
}
