//! Offline narration used when the narrative service is unavailable.
//!
//! Responses are grouped by what the player was trying to do. Each line
//! already speaks in one or more NPC voices so voice badges still show up.

use crate::classify::{classify, KeywordTable};
use crate::dice::DiceRoller;

/// Broad intent of a player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Dialogue,
    Combat,
    Exploration,
    General,
}

const ACTION_KEYWORDS: &KeywordTable<ActionKind> = &[
    (ActionKind::Dialogue, &["talk", "speak", "ask", "chat", "greet", "say", "dialogue"]),
    (ActionKind::Combat, &["attack", "fight", "strike", "stab", "swing", "shoot", "hit"]),
    (ActionKind::Exploration, &["search", "explore", "look", "examine", "inspect", "investigate"]),
];

/// Classify an action by keyword. Unmatched actions are `General`.
pub fn classify_action(action: &str) -> ActionKind {
    classify(ACTION_KEYWORDS, action).unwrap_or(ActionKind::General)
}

const DIALOGUE: &[&str] = &[
    "The merchant behind the counter perks up at the sight of you. \"Ah, coin in my pocket already! \
     Finest quality wares, shall we strike a deal?\" He produces a strange glowing amulet. \"Only a \
     hundred gold!\" Do you buy, haggle, or walk away?",
    "A guard steps into your path. \"Halt! Show me your papers! Orders come first.\" His eyes slide \
     over your weapons. \"But if we understand each other... maybe I'll let you through.\" Do you \
     show your papers, offer a bribe, or prepare for trouble?",
    "An old priest lifts his head from his prayers. \"May the gods bless you, my child. I see your \
     road has been hard.\" He rises from his knees. \"Repent, and you will find peace. How can I \
     help?\" Do you ask for a blessing, confess, or ask about the troubles here?",
];

const COMBAT: &[&str] = &[
    "Your blow lands! A barbarian in animal hides staggers back. \"Strength decides everything! The \
     weak do not survive!\" he roars, raising his axe. Do you press the attack or raise your guard?",
    "An elegant duelist parries your thrust. \"My lord, you wish to fight? Graciously accept a proper \
     duel, then.\" His blade flashes in the torchlight. Do you accept his rules or attack without \
     ceremony?",
    "A critical hit! Your foe collapses, dropping a glowing amulet. \"Fool... you have no idea... \
     what you've done...\" he rasps. The amulet pulses with red light. Do you pick it up, destroy it, \
     or leave quickly?",
];

const EXPLORATION: &[&str] = &[
    "You find a hidden niche in the wall. Inside lies an ancient scroll with a map. \"A fascinating \
     artifact,\" remarks a passing scholar. \"A true phenomenon of magical cartography.\" Do you \
     study the map, question the scholar, or keep searching?",
    "Beneath the dust you uncover an old lever. When pulled, a secret passage grinds open. A child's \
     voice drifts up from the depths: \"Mister, it's scary down here, but so cool!\" A little girl \
     points into the darkness. Do you enter the passage, calm the child, or look for her parents?",
];

const GENERAL: &[&str] = &[
    "A hooded figure beckons you over. \"There's a little job going, but it's risky. Got a tip-off \
     about easy pickings in the old keep.\" He glances around. \"Interested?\" Do you hear him out \
     or refuse?",
    "A little girl runs up to you. \"Mister, are you a real hero? I'm scared!\" She points at a dark \
     alley. \"Grandpa went in there and never came back...\" Do you investigate, comfort her, or look \
     for her family?",
    "The floor cracks beneath your feet, an ancient trap! You teeter on the edge of a chasm while a \
     voice cackles from the dark: \"Fool! Now you will suffer!\" An old chain hangs nearby, and a \
     narrow ledge juts out on the far side. Do you leap for the chain, the ledge, or look for another \
     way?",
    "The innkeeper waves you over. \"Welcome, dear guest! The best stew in town!\" He leans closer. \
     \"Fresh news over a mug of ale? They say strange things happen at the old keep.\" Do you order \
     an ale, ask about the keep, or look for a room?",
    "A long-bearded elder studies you with wise eyes. \"In my day I saw many things, young one. \
     Wisdom comes with experience.\" He points at a fork in the road. \"Left leads to riches, right \
     to glory, and both are dangerous.\" Which path do you choose?",
];

/// The response pool for an action kind.
pub fn pool(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::Dialogue => DIALOGUE,
        ActionKind::Combat => COMBAT,
        ActionKind::Exploration => EXPLORATION,
        ActionKind::General => GENERAL,
    }
}

/// Pick a canned response matching the action.
pub fn fallback_narrative<D: DiceRoller + ?Sized>(action: &str, dice: &mut D) -> &'static str {
    let responses = pool(classify_action(action));
    responses[dice.pick_index(responses.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedDice;
    use crate::voices::detect_voices;

    #[test]
    fn test_classify_action() {
        assert_eq!(classify_action("I talk to the barkeep"), ActionKind::Dialogue);
        assert_eq!(classify_action("Attack the goblin!"), ActionKind::Combat);
        assert_eq!(classify_action("I search the room"), ActionKind::Exploration);
        assert_eq!(classify_action("I sit down"), ActionKind::General);
        assert_eq!(classify_action(""), ActionKind::General);
    }

    #[test]
    fn test_keywords_inside_other_words_are_ignored() {
        assert_eq!(classify_action("examine the mask"), ActionKind::Exploration);
        assert_eq!(classify_action("look at the white tower"), ActionKind::Exploration);
        assert_eq!(classify_action("I read the essay"), ActionKind::General);
        assert_eq!(classify_action("I ask about the tower"), ActionKind::Dialogue);
        assert_eq!(classify_action("She hits the target"), ActionKind::Combat);
    }

    #[test]
    fn test_pools_are_well_formed() {
        for kind in [ActionKind::Dialogue, ActionKind::Combat, ActionKind::Exploration, ActionKind::General] {
            for line in pool(kind) {
                assert!(line.ends_with('?'), "{line}");
                assert!(!detect_voices(line).is_empty(), "{line}");
                assert!(!line.contains("  "), "{line}");
            }
        }
    }

    #[test]
    fn test_fallback_picks_from_pool() {
        let text = fallback_narrative("explore the cave", &mut FixedDice::new(1));
        assert_eq!(text, EXPLORATION[0]);
    }
}
