//! Opening scenes and starter quests.

use crate::dice::DiceRoller;
use crate::items::{HEALING_POTION, IRON_SWORD};
use crate::world::{Quest, QuestReward};

/// A possible first scene of an adventure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub name: &'static str,
    pub opening: &'static str,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "The Stranger's Map",
        opening: "Rain drums on the shutters of the Goldenheart Tavern. A hooded stranger \
                  slides a torn map across your table. \"Half of it leads to the Goblin Caves,\" \
                  she whispers. \"The other half was stolen last night.\" Do you take the map, \
                  question her, or follow the thief's trail?",
    },
    Scenario {
        name: "A Cry in the Night",
        opening: "You wake to a scream from the road outside the Goldenheart Tavern. The \
                  innkeeper stands at the door, lantern trembling. \"Welcome, dear guest, but \
                  that came from the Whispering Woods!\" Do you grab your gear and run, or \
                  wake the other travelers first?",
    },
    Scenario {
        name: "The Missing Miller",
        opening: "The common room of the Goldenheart Tavern falls silent as a farmer bursts in. \
                  \"The miller's gone! The Old Mill's wheel turned all night with nobody \
                  inside.\" Every eye turns to you. Do you offer your help or ask for payment \
                  first?",
    },
    Scenario {
        name: "Bounty Board",
        opening: "A fresh notice is nailed to the Goldenheart Tavern's bounty board: goblins \
                  raiding the King's Road, fifty gold for proof of their defeat. A scarred guard \
                  watches you read it. \"Order must be kept,\" he says. Do you accept the \
                  bounty or ask the guard what he knows?",
    },
];

/// Pick an opening scene.
pub fn random_scenario<D: DiceRoller + ?Sized>(dice: &mut D) -> &'static Scenario {
    &SCENARIOS[dice.pick_index(SCENARIOS.len())]
}

/// The quests every new session starts with.
pub fn starting_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "Goblin Trouble",
            "Goblins have been raiding travelers near the Whispering Woods.",
        )
        .with_objective("Find the goblin lair")
        .with_objective("Defeat the goblin raiders")
        .with_giver("Innkeeper Marta")
        .with_location("goblin-caves")
        .with_reward(QuestReward {
            gold: 50,
            items: vec![HEALING_POTION.instantiate(1)],
            experience: 150,
        }),
        Quest::new(
            "The Silent Mill",
            "Nobody has seen the miller of Millbrook for three days.",
        )
        .with_objective("Visit Millbrook Village")
        .with_objective("Search the Old Mill")
        .with_giver("Farmer Tobin")
        .with_location("old-mill")
        .with_reward(QuestReward {
            gold: 30,
            items: vec![IRON_SWORD.instantiate(1)],
            experience: 100,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedDice;
    use crate::world::{find_location, QuestStatus};

    #[test]
    fn test_random_scenario_in_range() {
        assert_eq!(random_scenario(&mut FixedDice::new(1)).name, SCENARIOS[0].name);
        assert_eq!(random_scenario(&mut FixedDice::new(99)).name, SCENARIOS[SCENARIOS.len() - 1].name);
    }

    #[test]
    fn test_starting_quests_are_active_and_placed() {
        let quests = starting_quests();
        assert_eq!(quests.len(), 2);
        for quest in &quests {
            assert_eq!(quest.status, QuestStatus::Active);
            assert!(!quest.objectives.is_empty());
            let location = quest.location.as_deref().unwrap();
            assert!(find_location(location).is_some());
        }
    }
}
