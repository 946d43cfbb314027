//! NPC voice archetypes.
//!
//! Twelve speech styles used to flavor generated dialogue. The characteristic
//! vocabulary of each voice doubles as the keyword set that tags DM lines with
//! voice badges.

use crate::classify::{classify_all, KeywordTable};
use crate::dice::DiceRoller;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceArchetype {
    Noble,
    Merchant,
    Guard,
    Peasant,
    Scholar,
    Rogue,
    Priest,
    Barbarian,
    Child,
    Elder,
    Innkeeper,
    Villain,
}

/// Static description of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub speech_pattern: &'static str,
    pub vocabulary: &'static [&'static str],
    pub examples: &'static [&'static str],
}

impl VoiceArchetype {
    pub fn all() -> [VoiceArchetype; 12] {
        use VoiceArchetype::*;
        [
            Noble, Merchant, Guard, Peasant, Scholar, Rogue, Priest, Barbarian, Child, Elder,
            Innkeeper, Villain,
        ]
    }

    pub fn profile(&self) -> &'static VoiceProfile {
        match self {
            VoiceArchetype::Noble => &NOBLE,
            VoiceArchetype::Merchant => &MERCHANT,
            VoiceArchetype::Guard => &GUARD,
            VoiceArchetype::Peasant => &PEASANT,
            VoiceArchetype::Scholar => &SCHOLAR,
            VoiceArchetype::Rogue => &ROGUE,
            VoiceArchetype::Priest => &PRIEST,
            VoiceArchetype::Barbarian => &BARBARIAN,
            VoiceArchetype::Child => &CHILD,
            VoiceArchetype::Elder => &ELDER,
            VoiceArchetype::Innkeeper => &INNKEEPER,
            VoiceArchetype::Villain => &VILLAIN,
        }
    }

    pub fn id(&self) -> &'static str {
        self.profile().id
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    /// Uniformly random voice.
    pub fn random<D: DiceRoller + ?Sized>(dice: &mut D) -> Self {
        let all = Self::all();
        all[dice.pick_index(all.len())]
    }
}

impl fmt::Display for VoiceArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for VoiceArchetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

const NOBLE: VoiceProfile = VoiceProfile {
    id: "noble",
    name: "Noble",
    description: "An aristocrat or person of high birth",
    speech_pattern: "Refined speech, elaborate turns of phrase, exaggerated courtesy",
    vocabulary: &["my lord", "milord", "graciously", "most honorable", "i daresay"],
    examples: &[
        "My lord, allow me to express my deepest respects.",
        "Graciously accept my humble proposal.",
        "I daresay this matter is most delicate.",
    ],
};

const MERCHANT: VoiceProfile = VoiceProfile {
    id: "merchant",
    name: "Merchant",
    description: "A trader or shopkeeper",
    speech_pattern: "Businesslike, always talking prices and profit",
    vocabulary: &["coin", "bargain", "wares", "a deal", "finest quality"],
    examples: &[
        "Coin loves to be counted, my friend!",
        "Shall we strike a deal? Good for you, no loss for me.",
        "Finest quality wares, you won't regret it!",
    ],
};

const GUARD: VoiceProfile = VoiceProfile {
    id: "guard",
    name: "Guard",
    description: "A town guard or soldier",
    speech_pattern: "Clipped military speech, orders and discipline",
    vocabulary: &["halt", "orders", "discipline", "by the law", "violation"],
    examples: &[
        "Halt! Show me your papers!",
        "Orders come first, remember that.",
        "Any violation will be punished by the law.",
    ],
};

const PEASANT: VoiceProfile = VoiceProfile {
    id: "peasant",
    name: "Peasant",
    description: "A commoner or farmer",
    speech_pattern: "Plain speech, local sayings, complaints about hard living",
    vocabulary: &["good sir", "hard times", "poor folk", "the harvest"],
    examples: &[
        "Oh, good sir, these are hard times!",
        "The harvest failed again, what can you do...",
        "Forgive us, we're just poor folk.",
    ],
};

const SCHOLAR: VoiceProfile = VoiceProfile {
    id: "scholar",
    name: "Scholar",
    description: "A sage, mage or researcher",
    speech_pattern: "Academic speech, technical terms, musing aloud",
    vocabulary: &["phenomenon", "hypothesis", "artifact", "fascinating"],
    examples: &[
        "A fascinating phenomenon, it demands further study.",
        "My hypothesis is confirmed by the ancient texts.",
        "This artifact has most unusual properties.",
    ],
};

const ROGUE: VoiceProfile = VoiceProfile {
    id: "rogue",
    name: "Rogue",
    description: "A thief, smuggler or swindler",
    speech_pattern: "Sly hints and thieves' cant",
    vocabulary: &["little job", "tip-off", "the fence", "easy pickings"],
    examples: &[
        "There's a little job going, but it's risky...",
        "Got a tip-off about easy pickings.",
        "The fence is a crook, but his goods are good.",
    ],
};

const PRIEST: VoiceProfile = VoiceProfile {
    id: "priest",
    name: "Priest",
    description: "A priest or temple servant",
    speech_pattern: "Solemn speech, blessings and morals",
    vocabulary: &["blessing", "bless you", "repent", "the gods", "divine"],
    examples: &[
        "May the gods bless you, my child.",
        "Repent your sins and find salvation.",
        "Divine will is beyond mortal understanding.",
    ],
};

const BARBARIAN: VoiceProfile = VoiceProfile {
    id: "barbarian",
    name: "Barbarian",
    description: "A tribal warrior from the wilds",
    speech_pattern: "Blunt short phrases, boasts of strength",
    vocabulary: &["strength", "battle", "warrior's honor", "the weak"],
    examples: &[
        "Strength decides everything! The weak do not survive!",
        "The enemy is strong, but we are stronger!",
        "A warrior's honor is worth more than life!",
    ],
};

const CHILD: VoiceProfile = VoiceProfile {
    id: "child",
    name: "Child",
    description: "Children and youngsters",
    speech_pattern: "Simple, curious and excitable",
    vocabulary: &["mister", "scary", "so cool", "real hero"],
    examples: &[
        "Mister, are you a real hero?",
        "It's scary, but so cool!",
        "What's behind that door?",
    ],
};

const ELDER: VoiceProfile = VoiceProfile {
    id: "elder",
    name: "Elder",
    description: "An old and wise character",
    speech_pattern: "Slow speech, memories and hard-won wisdom",
    vocabulary: &["in my day", "i remember", "wisdom", "young one"],
    examples: &[
        "In my day I saw many things...",
        "I remember, it was long, long ago...",
        "Wisdom comes with experience, young one.",
    ],
};

const INNKEEPER: VoiceProfile = VoiceProfile {
    id: "innkeeper",
    name: "Innkeeper",
    description: "The keeper of a tavern or inn",
    speech_pattern: "Hospitable, always offering food, rooms and gossip",
    vocabulary: &["dear guest", "welcome", "mug of ale", "fresh news"],
    examples: &[
        "Welcome, dear guest!",
        "The best stew in town is served right here!",
        "Fresh news over a mug of ale?",
    ],
};

const VILLAIN: VoiceProfile = VoiceProfile {
    id: "villain",
    name: "Villain",
    description: "Antagonists and enemies",
    speech_pattern: "Threatening, arrogant and spiteful",
    vocabulary: &["fool", "power", "revenge", "suffer"],
    examples: &[
        "Fool! You have no idea who you're dealing with!",
        "The power will be mine, and you will regret this!",
        "Your suffering has only begun!",
    ],
};

const VOCABULARY: &KeywordTable<VoiceArchetype> = &[
    (VoiceArchetype::Noble, NOBLE.vocabulary),
    (VoiceArchetype::Merchant, MERCHANT.vocabulary),
    (VoiceArchetype::Guard, GUARD.vocabulary),
    (VoiceArchetype::Peasant, PEASANT.vocabulary),
    (VoiceArchetype::Scholar, SCHOLAR.vocabulary),
    (VoiceArchetype::Rogue, ROGUE.vocabulary),
    (VoiceArchetype::Priest, PRIEST.vocabulary),
    (VoiceArchetype::Barbarian, BARBARIAN.vocabulary),
    (VoiceArchetype::Child, CHILD.vocabulary),
    (VoiceArchetype::Elder, ELDER.vocabulary),
    (VoiceArchetype::Innkeeper, INNKEEPER.vocabulary),
    (VoiceArchetype::Villain, VILLAIN.vocabulary),
];

/// Voices whose vocabulary appears in a piece of DM text.
pub fn detect_voices(text: &str) -> Vec<VoiceArchetype> {
    classify_all(VOCABULARY, text)
}
