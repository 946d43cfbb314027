//! Character creation.
//!
//! Validates the name/class/ability scores a player submits and produces a
//! level 1 [`Character`]. Supports class presets, point buy and rolled
//! scores.

use crate::dice::{roll_ability_score, DiceRoller};
use crate::world::{Ability, AbilityScores, Character, CharacterClass};
use thiserror::Error;

/// How ability scores were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityMethod {
    /// Use the class preset or scores supplied as-is.
    #[default]
    Preset,
    /// Buy scores 8-15 from a shared budget.
    PointBuy,
    /// 4d6 drop lowest for each ability.
    Rolled,
}

/// Lowest score accepted for any ability.
pub const MIN_ABILITY_SCORE: u8 = 3;
/// Highest score accepted for any ability.
pub const MAX_ABILITY_SCORE: u8 = 18;

/// Total points available for point buy.
pub const POINT_BUY_BUDGET: u32 = 11;

/// Point buy cost of a score, or `None` outside 8-15.
pub fn point_buy_cost(score: u8) -> Option<u32> {
    match score {
        8 => Some(0),
        9 => Some(1),
        10 => Some(2),
        11 => Some(3),
        12 => Some(4),
        13 => Some(5),
        14 => Some(7),
        15 => Some(9),
        _ => None,
    }
}

/// Sum of point buy costs. Scores outside 8-15 are reported as errors.
pub fn point_buy_total(scores: &AbilityScores) -> Result<u32, ValidationError> {
    scores.iter().try_fold(0u32, |total, (ability, value)| {
        point_buy_cost(value)
            .map(|cost| total + cost)
            .ok_or(ValidationError::AbilityOutOfRange { ability, value })
    })
}

/// Validate a point buy array. Returns the unspent budget.
pub fn validate_point_buy(scores: &AbilityScores) -> Result<u32, ValidationError> {
    let spent = point_buy_total(scores)?;
    POINT_BUY_BUDGET
        .checked_sub(spent)
        .ok_or(ValidationError::OverBudget {
            spent,
            budget: POINT_BUY_BUDGET,
        })
}

/// A point buy array for `class`: the primary ability at 15 and the rest of
/// the budget spent on the first secondary ability.
pub fn suggested_point_buy(class: CharacterClass) -> AbilityScores {
    let recommendation = class.recommendation();
    let mut scores = AbilityScores::point_buy_baseline();
    let mut remaining = POINT_BUY_BUDGET;

    for ability in recommendation.primary.iter().chain(recommendation.secondary) {
        let best = (8..=15u8)
            .rev()
            .find(|score| point_buy_cost(*score).is_some_and(|cost| cost <= remaining));
        if let Some(score) = best {
            scores.set(*ability, score);
            remaining -= point_buy_cost(score).unwrap_or(0);
        }
    }
    scores
}

/// Roll a full set of scores, 4d6 drop lowest each.
pub fn roll_ability_scores<D: DiceRoller + ?Sized>(dice: &mut D) -> AbilityScores {
    let mut scores = AbilityScores::default();
    for ability in Ability::all() {
        scores.set(ability, roll_ability_score(dice));
    }
    scores
}

/// Rejected character input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown class: {0}")]
    UnknownClass(String),
    #[error("{ability} score {value} is out of range")]
    AbilityOutOfRange { ability: Ability, value: u8 },
    #[error("point buy spends {spent} points, budget is {budget}")]
    OverBudget { spent: u32, budget: u32 },
}

/// Builder for new characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    class: Option<String>,
    ability_scores: Option<AbilityScores>,
    method: AbilityMethod,
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class.name().to_string());
        self
    }

    /// Set the class from user input. Parsed when the character is built.
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.method = AbilityMethod::Preset;
        self
    }

    /// Set scores bought with points. Validated against the budget on build.
    pub fn point_buy(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.method = AbilityMethod::PointBuy;
        self
    }

    pub fn rolled<D: DiceRoller + ?Sized>(mut self, dice: &mut D) -> Self {
        self.ability_scores = Some(roll_ability_scores(dice));
        self.method = AbilityMethod::Rolled;
        self
    }

    /// Build the character, returning an error if any field is missing or invalid.
    pub fn build(self) -> Result<Character, ValidationError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingField("name"))?;
        let class_name = self
            .class
            .filter(|c| !c.trim().is_empty())
            .ok_or(ValidationError::MissingField("class"))?;
        let class: CharacterClass = class_name
            .parse()
            .map_err(ValidationError::UnknownClass)?;
        let scores = self
            .ability_scores
            .ok_or(ValidationError::MissingField("ability_scores"))?;

        if self.method == AbilityMethod::PointBuy {
            validate_point_buy(&scores)?;
        }
        for (ability, value) in scores.iter() {
            if !(MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE).contains(&value) {
                return Err(ValidationError::AbilityOutOfRange { ability, value });
            }
        }

        Ok(Character::new(name, class, scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDice;

    #[test]
    fn test_point_buy_costs() {
        let costs: Vec<u32> = (8..=15).filter_map(point_buy_cost).collect();
        assert_eq!(costs, vec![0, 1, 2, 3, 4, 5, 7, 9]);
        assert_eq!(point_buy_cost(7), None);
        assert_eq!(point_buy_cost(16), None);
    }

    #[test]
    fn test_point_buy_baseline_is_free() {
        let scores = AbilityScores::point_buy_baseline();
        assert_eq!(point_buy_total(&scores), Ok(0));
        assert_eq!(validate_point_buy(&scores), Ok(POINT_BUY_BUDGET));
    }

    #[test]
    fn test_point_buy_single_fifteen() {
        let mut scores = AbilityScores::point_buy_baseline();
        scores.strength = 15;
        assert_eq!(validate_point_buy(&scores), Ok(2));
        scores.dexterity = 10;
        assert_eq!(validate_point_buy(&scores), Ok(0));
        scores.constitution = 9;
        assert_eq!(
            validate_point_buy(&scores),
            Err(ValidationError::OverBudget { spent: 12, budget: 11 })
        );
    }

    #[test]
    fn test_suggested_point_buy_is_valid() {
        for class in CharacterClass::all() {
            let scores = suggested_point_buy(class);
            assert_eq!(validate_point_buy(&scores), Ok(0), "{class}");
            let primary = class.recommendation().primary[0];
            assert_eq!(scores.get(primary), 15, "{class}");
        }
        assert_eq!(suggested_point_buy(CharacterClass::Fighter), AbilityScores::new(15, 8, 10, 8, 8, 8));
    }

    #[test]
    fn test_point_buy_out_of_range() {
        let mut scores = AbilityScores::point_buy_baseline();
        scores.wisdom = 16;
        assert_eq!(
            validate_point_buy(&scores),
            Err(ValidationError::AbilityOutOfRange {
                ability: Ability::Wisdom,
                value: 16
            })
        );
    }

    #[test]
    fn test_build_from_preset() {
        let hero = CharacterBuilder::new()
            .name("Bram")
            .class(CharacterClass::Fighter)
            .ability_scores(CharacterClass::Fighter.base_stats())
            .build()
            .expect("should build");
        assert_eq!(hero.level, 1);
        assert_eq!(hero.max_hp, 12);
        assert_eq!(hero.hp, 12);
        assert_eq!(hero.skill_points, 2);
        assert_eq!(hero.experience_to_next, 300);
    }

    #[test]
    fn test_missing_fields() {
        let err = CharacterBuilder::new()
            .name("   ")
            .class(CharacterClass::Rogue)
            .ability_scores(AbilityScores::default())
            .build();
        assert_eq!(err, Err(ValidationError::MissingField("name")));

        let err = CharacterBuilder::new()
            .name("Vex")
            .ability_scores(AbilityScores::default())
            .build();
        assert_eq!(err, Err(ValidationError::MissingField("class")));

        let err = CharacterBuilder::new().name("Vex").class(CharacterClass::Rogue).build();
        assert_eq!(err, Err(ValidationError::MissingField("ability_scores")));
    }

    #[test]
    fn test_unknown_class() {
        let err = CharacterBuilder::new()
            .name("Vex")
            .class_name("Necromancer")
            .ability_scores(AbilityScores::default())
            .build();
        assert_eq!(err, Err(ValidationError::UnknownClass("Necromancer".to_string())));
    }

    #[test]
    fn test_rolled_scores() {
        let mut dice = ScriptedDice::new([6, 6, 6, 1]);
        let hero = CharacterBuilder::new()
            .name("Lucky")
            .class_name("bard")
            .rolled(&mut dice)
            .build()
            .unwrap();
        assert!(hero.ability_scores.iter().all(|(_, v)| v == 18));
        assert_eq!(hero.class, CharacterClass::Bard);
    }

    #[test]
    fn test_scores_out_of_range() {
        let err = CharacterBuilder::new()
            .name("Giant")
            .class(CharacterClass::Barbarian)
            .ability_scores(AbilityScores::new(25, 10, 10, 10, 10, 10))
            .build();
        assert!(matches!(err, Err(ValidationError::AbilityOutOfRange { value: 25, .. })));
    }
}
