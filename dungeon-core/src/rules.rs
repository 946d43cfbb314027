//! Character progression rules.
//!
//! Pure functions over a [`Character`]: modifiers, proficiency, the
//! experience table, level-ups, skill checks and skill point spending.
//! Randomness comes in through a [`DiceRoller`] so every rule is testable.

use crate::class_data::class_abilities;
use crate::dice::DiceRoller;
use crate::world::{Ability, Character, ItemId, QuestError, QuestId, Skill, MAX_SKILL_RANK};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Highest attainable level.
pub const MAX_LEVEL: u8 = 20;

/// Default difficulty class for skill checks.
pub const DEFAULT_DC: i32 = 15;

/// Experience needed to reach each level, indexed by `level - 1`.
pub const EXPERIENCE_TABLE: [u32; MAX_LEVEL as usize] = [
    0, 300, 900, 2_700, 6_500, 14_000, 23_000, 34_000, 48_000, 64_000, 85_000, 100_000, 120_000,
    140_000, 165_000, 195_000, 225_000, 265_000, 305_000, 355_000,
];

/// Errors from rule operations that the game service surfaces to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("not enough experience to level up ({experience}/{needed})")]
    NotEligible { experience: u32, needed: u32 },
    #[error("already at the maximum level")]
    MaxLevel,
    #[error("no skill points left to spend")]
    NoSkillPoints,
    #[error("{0} is already at the maximum rank")]
    SkillAtMaxRank(Skill),
    #[error("no item {0} in the inventory")]
    UnknownItem(ItemId),
    #[error("{0} cannot be used")]
    ItemNotUsable(String),
    #[error("no quest {0}")]
    UnknownQuest(QuestId),
    #[error(transparent)]
    Quest(#[from] QuestError),
    #[error("unknown location {0}")]
    UnknownLocation(String),
    #[error("{0} is not reachable from where you have been")]
    LocationUnreachable(String),
}

/// `floor((score - 10) / 2)`.
pub fn ability_modifier(score: u8) -> i32 {
    (i32::from(score) - 10).div_euclid(2)
}

/// `ceil(level / 4) + 1`.
pub fn proficiency_bonus(level: u8) -> i32 {
    (i32::from(level.max(1)) + 3) / 4 + 1
}

/// Total experience required to be at `level`. Levels past the cap reuse
/// the final threshold.
pub fn experience_threshold(level: u8) -> u32 {
    let idx = usize::from(level.clamp(1, MAX_LEVEL)) - 1;
    EXPERIENCE_TABLE[idx]
}

/// Experience required for the level after `level`.
pub fn experience_for_next_level(level: u8) -> u32 {
    experience_threshold(level.saturating_add(1))
}

pub fn can_level_up(character: &Character) -> bool {
    character.level < MAX_LEVEL && character.experience >= experience_for_next_level(character.level)
}

/// Add experience. Returns true if the character can now level up.
pub fn gain_experience(character: &mut Character, amount: u32) -> bool {
    character.experience = character.experience.saturating_add(amount);
    can_level_up(character)
}

/// What a level-up granted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpReward {
    pub hp_increase: i32,
    pub skill_points: u32,
    pub new_abilities: Vec<String>,
}

impl LevelUpReward {
    pub fn is_empty(&self) -> bool {
        self.hp_increase == 0 && self.skill_points == 0 && self.new_abilities.is_empty()
    }
}

/// Advance one level if eligible.
///
/// Max HP grows by `1d8 + CON` (at least 1), HP is fully restored and
/// `2 + INT` skill points (at least 0) are granted. An ineligible
/// character is left untouched and gets an empty reward.
pub fn level_up<D: DiceRoller + ?Sized>(character: &mut Character, dice: &mut D) -> LevelUpReward {
    if !can_level_up(character) {
        return LevelUpReward::default();
    }

    let new_level = character.level + 1;
    let die = dice.roll_die(8).max(1) as i32;
    let hp_increase = (die + character.modifier(Ability::Constitution)).max(1);
    let skill_points = (2 + character.modifier(Ability::Intelligence)).max(0) as u32;
    let new_abilities = class_abilities(character.class)
        .iter()
        .filter(|a| a.level == new_level)
        .map(|a| a.description.to_string())
        .collect();

    character.level = new_level;
    character.max_hp += hp_increase;
    character.hp = character.max_hp;
    character.skill_points += skill_points;
    character.experience_to_next = experience_for_next_level(new_level);

    info!(
        character = %character.name,
        level = new_level,
        hp_increase,
        skill_points,
        "Level up"
    );

    LevelUpReward {
        hp_increase,
        skill_points,
        new_abilities,
    }
}

/// Ability modifier for the skill, plus proficiency if the skill is trained.
pub fn skill_modifier(character: &Character, skill: Skill) -> i32 {
    let proficiency = if character.skills.is_trained(skill) {
        character.proficiency_bonus()
    } else {
        0
    };
    character.modifier(skill.ability()) + proficiency
}

/// Outcome of a skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    pub skill: Skill,
    pub roll: u32,
    pub modifier: i32,
    pub total: i32,
    pub difficulty: i32,
    pub success: bool,
}

pub fn roll_skill_check<D: DiceRoller + ?Sized>(
    character: &Character,
    skill: Skill,
    difficulty: i32,
    dice: &mut D,
) -> SkillCheck {
    let roll = dice.d20();
    let modifier = skill_modifier(character, skill);
    let total = roll as i32 + modifier;
    SkillCheck {
        skill,
        roll,
        modifier,
        total,
        difficulty,
        success: total >= difficulty,
    }
}

/// Spend one skill point on `skill`. Returns the new rank.
pub fn spend_skill_point(character: &mut Character, skill: Skill) -> Result<u8, RuleError> {
    if character.skill_points == 0 {
        return Err(RuleError::NoSkillPoints);
    }
    let rank = character.skills.get(skill);
    if rank >= MAX_SKILL_RANK {
        return Err(RuleError::SkillAtMaxRank(skill));
    }
    character.skills.set(skill, rank + 1);
    character.skill_points -= 1;
    Ok(rank + 1)
}
