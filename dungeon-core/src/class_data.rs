//! Class data for character creation.
//!
//! Base stat presets, stat recommendations, descriptions and the cosmetic
//! abilities announced on level-up for each of the eight classes.

use crate::world::{Ability, AbilityScores, CharacterClass};

/// A flavor ability unlocked at a given level. Has no mechanical effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassAbility {
    pub level: u8,
    pub description: &'static str,
}

/// Which abilities matter for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatRecommendation {
    pub primary: &'static [Ability],
    pub secondary: &'static [Ability],
    pub dump: &'static [Ability],
}

impl StatRecommendation {
    /// `"primary"`, `"secondary"`, `"dump"` or `None` for an ability.
    pub fn tag(&self, ability: Ability) -> Option<&'static str> {
        if self.primary.contains(&ability) {
            Some("primary")
        } else if self.secondary.contains(&ability) {
            Some("secondary")
        } else if self.dump.contains(&ability) {
            Some("dump")
        } else {
            None
        }
    }
}

use Ability::*;

impl CharacterClass {
    /// Balanced starting scores for the class.
    pub fn base_stats(&self) -> AbilityScores {
        match self {
            CharacterClass::Fighter => AbilityScores::new(15, 12, 14, 8, 10, 9),
            CharacterClass::Wizard => AbilityScores::new(8, 12, 13, 15, 11, 9),
            CharacterClass::Rogue => AbilityScores::new(9, 15, 12, 11, 13, 8),
            CharacterClass::Cleric => AbilityScores::new(10, 9, 13, 8, 15, 12),
            CharacterClass::Ranger => AbilityScores::new(11, 14, 12, 9, 13, 8),
            CharacterClass::Barbarian => AbilityScores::new(15, 11, 14, 8, 10, 9),
            CharacterClass::Bard => AbilityScores::new(8, 12, 11, 10, 9, 15),
            CharacterClass::Paladin => AbilityScores::new(14, 9, 13, 8, 10, 13),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CharacterClass::Fighter => "A master of martial combat, skilled with weapons and armor",
            CharacterClass::Wizard => "A scholarly magic-user who bends reality through study",
            CharacterClass::Rogue => "A scoundrel who relies on stealth, wit and precise strikes",
            CharacterClass::Cleric => "A priestly champion who wields divine magic",
            CharacterClass::Ranger => "A hunter and tracker at home in the wilderness",
            CharacterClass::Barbarian => "A fierce warrior fuelled by primal rage",
            CharacterClass::Bard => "An inspiring performer whose words carry magic",
            CharacterClass::Paladin => "A holy warrior bound by a sacred oath",
        }
    }

    pub fn recommendation(&self) -> StatRecommendation {
        match self {
            CharacterClass::Fighter => StatRecommendation {
                primary: &[Strength],
                secondary: &[Constitution, Dexterity],
                dump: &[Intelligence, Charisma],
            },
            CharacterClass::Wizard => StatRecommendation {
                primary: &[Intelligence],
                secondary: &[Constitution, Dexterity],
                dump: &[Strength, Charisma],
            },
            CharacterClass::Rogue => StatRecommendation {
                primary: &[Dexterity],
                secondary: &[Wisdom, Constitution],
                dump: &[Strength, Charisma],
            },
            CharacterClass::Cleric => StatRecommendation {
                primary: &[Wisdom],
                secondary: &[Constitution, Charisma],
                dump: &[Intelligence, Dexterity],
            },
            CharacterClass::Ranger => StatRecommendation {
                primary: &[Dexterity],
                secondary: &[Wisdom, Constitution],
                dump: &[Charisma, Intelligence],
            },
            CharacterClass::Barbarian => StatRecommendation {
                primary: &[Strength],
                secondary: &[Constitution],
                dump: &[Intelligence, Charisma],
            },
            CharacterClass::Bard => StatRecommendation {
                primary: &[Charisma],
                secondary: &[Dexterity],
                dump: &[Strength, Wisdom],
            },
            CharacterClass::Paladin => StatRecommendation {
                primary: &[Strength],
                secondary: &[Charisma, Constitution],
                dump: &[Intelligence, Dexterity],
            },
        }
    }
}

/// Abilities announced when a class reaches levels 2 to 5.
pub fn class_abilities(class: CharacterClass) -> &'static [ClassAbility] {
    match class {
        CharacterClass::Fighter => &[
            ClassAbility { level: 2, description: "Action Surge - one extra action in combat" },
            ClassAbility { level: 3, description: "Martial Archetype - choose a fighting style" },
            ClassAbility { level: 4, description: "Ability Score Improvement - +2 to your abilities" },
            ClassAbility { level: 5, description: "Extra Attack - attack twice per turn" },
        ],
        CharacterClass::Wizard => &[
            ClassAbility { level: 2, description: "Arcane Recovery - regain spell slots on a short rest" },
            ClassAbility { level: 3, description: "Arcane Tradition - choose a school of magic" },
            ClassAbility { level: 4, description: "Cantrip Improvement - your cantrips grow stronger" },
            ClassAbility { level: 5, description: "3rd Level Spells - access to 3rd level spells" },
        ],
        CharacterClass::Rogue => &[
            ClassAbility { level: 2, description: "Cunning Action - dash, disengage or hide as a bonus" },
            ClassAbility { level: 3, description: "Roguish Archetype - choose a specialty" },
            ClassAbility { level: 4, description: "Ability Score Improvement - +2 to your abilities" },
            ClassAbility { level: 5, description: "Uncanny Dodge - halve the damage of an attack" },
        ],
        CharacterClass::Cleric => &[
            ClassAbility { level: 2, description: "Channel Divinity - call on divine power" },
            ClassAbility { level: 3, description: "Divine Domain Feature - a gift of your domain" },
            ClassAbility { level: 4, description: "Ability Score Improvement - +2 to your abilities" },
            ClassAbility { level: 5, description: "Destroy Undead - turned undead are destroyed" },
        ],
        _ => &[],
    }
}
