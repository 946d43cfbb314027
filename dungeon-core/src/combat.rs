//! Combat resolution.
//!
//! A simplified exchange of blows between the player and one enemy. The
//! player swings first each round; the fight ends when either side drops to
//! 0 HP or after [`MAX_ROUNDS`] rounds.

use crate::dice::{roll_damage, DiceRoller};
use crate::items::LOOT_TABLE;
use crate::npc::Npc;
use crate::world::{Ability, Character, CombatEventId, InventoryItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Rounds fought before an encounter is called off.
pub const MAX_ROUNDS: u32 = 10;

/// Experience per enemy level on victory.
pub const EXPERIENCE_PER_LEVEL: u32 = 50;

const PLAYER_DAMAGE: &str = "1d8";
const ENEMY_DAMAGE: &str = "1d6";
const ENEMY_DAMAGE_BONUS: i32 = 2;

const DEFAULT_ENEMY_HP: i32 = 10;
const DEFAULT_ENEMY_AC: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatEventKind {
    Attack,
    Defend,
    Spell,
    Item,
}

/// One logged action in a fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub id: CombatEventId,
    pub kind: CombatEventKind,
    pub attacker: String,
    pub target: String,
    pub damage: Option<i32>,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl CombatEvent {
    fn attack(attacker: &str, target: &str, damage: Option<i32>) -> Self {
        let result = match damage {
            Some(dmg) => format!("{attacker} hits {target} for {dmg} damage!"),
            None => format!("{attacker} misses {target}!"),
        };
        Self {
            id: CombatEventId::new(),
            kind: CombatEventKind::Attack,
            attacker: attacker.to_string(),
            target: target.to_string(),
            damage,
            result,
            timestamp: Utc::now(),
        }
    }
}

/// How an encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    PlayerVictory,
    EnemyVictory,
    /// The round cap was reached with both sides standing.
    Timeout,
}

/// Summary of a resolved encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub outcome: CombatOutcome,
    pub victory: bool,
    pub experience_gained: u32,
    pub gold_gained: u32,
    pub items_gained: Vec<InventoryItem>,
    /// HP before the fight minus HP after it.
    pub damage_taken: i32,
    pub rounds: u32,
    pub enemy_hp_remaining: i32,
    pub events: Vec<CombatEvent>,
}

/// An attack roll of `d20 + bonus` against `armor_class`.
fn attack_hits<D: DiceRoller + ?Sized>(dice: &mut D, bonus: i32, armor_class: i32) -> bool {
    let roll = dice.d20() as i32;
    let total = roll + bonus;
    debug!(roll, bonus, total, armor_class, "Attack roll");
    total >= armor_class
}

/// Player attack bonus: STR modifier plus proficiency.
pub fn player_attack_bonus(character: &Character) -> i32 {
    character.modifier(Ability::Strength) + character.proficiency_bonus()
}

/// Player armor class: 10 plus DEX modifier.
pub fn player_armor_class(character: &Character) -> i32 {
    10 + character.modifier(Ability::Dexterity)
}

/// Enemy attack bonus: half the enemy's level plus 2.
pub fn enemy_attack_bonus(level: u8) -> i32 {
    i32::from(level) / 2 + 2
}

/// Fight `enemy` until one side falls or the round cap is hit.
///
/// The character is not modified; apply `damage_taken` and the rewards
/// from the result.
pub fn resolve_combat<D: DiceRoller + ?Sized>(character: &Character, enemy: &Npc, dice: &mut D) -> CombatResult {
    let (enemy_level, mut enemy_hp, enemy_ac) = enemy
        .stats
        .as_ref()
        .map(|s| (s.level, s.hp, s.ac))
        .unwrap_or((1, DEFAULT_ENEMY_HP, DEFAULT_ENEMY_AC));

    let attack_bonus = player_attack_bonus(character);
    let damage_bonus = character.modifier(Ability::Strength);
    let player_ac = player_armor_class(character);
    let enemy_bonus = enemy_attack_bonus(enemy_level);

    let mut player_hp = character.hp;
    let mut events = Vec::new();
    let mut rounds = 0;

    while player_hp > 0 && enemy_hp > 0 && rounds < MAX_ROUNDS {
        rounds += 1;

        let damage = attack_hits(dice, attack_bonus, enemy_ac)
            .then(|| roll_damage(dice, PLAYER_DAMAGE, damage_bonus));
        if let Some(dmg) = damage {
            enemy_hp -= dmg;
        }
        events.push(CombatEvent::attack(&character.name, &enemy.name, damage));

        if enemy_hp <= 0 {
            break;
        }

        let damage = attack_hits(dice, enemy_bonus, player_ac)
            .then(|| roll_damage(dice, ENEMY_DAMAGE, ENEMY_DAMAGE_BONUS));
        if let Some(dmg) = damage {
            player_hp -= dmg;
        }
        events.push(CombatEvent::attack(&enemy.name, &character.name, damage));
    }

    let outcome = if enemy_hp <= 0 {
        CombatOutcome::PlayerVictory
    } else if player_hp <= 0 {
        CombatOutcome::EnemyVictory
    } else {
        CombatOutcome::Timeout
    };
    let victory = outcome == CombatOutcome::PlayerVictory;

    let (experience_gained, gold_gained, items_gained) = if victory {
        let gold = dice.roll_die(20) + 4;
        let count = dice.roll_die(3).saturating_sub(1);
        let loot = (0..count)
            .map(|_| LOOT_TABLE[dice.pick_index(LOOT_TABLE.len())].instantiate(1))
            .collect();
        (u32::from(enemy_level) * EXPERIENCE_PER_LEVEL, gold, loot)
    } else {
        (0, 0, Vec::new())
    };

    let damage_taken = character.hp - player_hp.max(0);

    info!(
        enemy = %enemy.name,
        ?outcome,
        rounds,
        damage_taken,
        experience_gained,
        "Combat resolved"
    );

    CombatResult {
        outcome,
        victory,
        experience_gained,
        gold_gained,
        items_gained,
        damage_taken,
        rounds,
        enemy_hp_remaining: enemy_hp,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::MONSTERS;
    use crate::testing::{FixedDice, ScriptedDice};
    use crate::world::{AbilityScores, CharacterClass};

    fn hero(hp: i32) -> Character {
        let mut c = Character::new("Bram", CharacterClass::Fighter, AbilityScores::new(14, 10, 14, 10, 10, 10));
        c.max_hp = hp;
        c.hp = hp;
        c
    }

    #[test]
    fn test_timeout_after_ten_rounds() {
        // A 1 never hits either side's AC.
        let character = hero(1_000);
        let enemy = MONSTERS[0].spawn("goblin-caves");
        let result = resolve_combat(&character, &enemy, &mut FixedDice::new(1));
        assert_eq!(result.outcome, CombatOutcome::Timeout);
        assert!(!result.victory);
        assert_eq!(result.rounds, MAX_ROUNDS);
        assert_eq!(result.experience_gained, 0);
        assert_eq!(result.gold_gained, 0);
        assert!(result.items_gained.is_empty());
        assert!(result.damage_taken >= 0);
        assert_eq!(result.events.len(), 20);
        assert!(result.events.iter().all(|e| e.damage.is_none()));
    }

    #[test]
    fn test_fixed_damage_is_deterministic() {
        // Orc: 15 HP, AC 13. Player rolls 20 to hit and 3 + 2 damage; the
        // orc's 1 always misses.
        let character = hero(1_000);
        let enemy = MONSTERS[1].spawn("kings-road");
        let mut dice = ScriptedDice::new([20, 3, 1]);
        let result = resolve_combat(&character, &enemy, &mut dice);
        // 15 - 3 * 5 = 0 after the third player turn.
        assert_eq!(result.outcome, CombatOutcome::PlayerVictory);
        assert_eq!(result.rounds, 3);
        assert_eq!(result.enemy_hp_remaining, 0);
        let player_hits: Vec<_> = result
            .events
            .iter()
            .filter(|e| e.attacker == "Bram")
            .map(|e| e.damage)
            .collect();
        assert_eq!(player_hits, vec![Some(5), Some(5), Some(5)]);
        assert_eq!(result.damage_taken, 0);
        assert_eq!(result.experience_gained, 100);
    }

    #[test]
    fn test_victory_rewards_per_monster() {
        let character = hero(1_000);
        for monster in MONSTERS {
            let result = resolve_combat(&character, &monster.spawn("goblin-caves"), &mut FixedDice::new(20));
            assert!(result.victory, "{}", monster.name);
            assert_eq!(result.experience_gained, u32::from(monster.level) * EXPERIENCE_PER_LEVEL);
            assert_eq!(result.gold_gained, 24);
            assert_eq!(result.items_gained.len(), 2);
        }
    }

    #[test]
    fn test_random_rewards_in_range() {
        let character = hero(1_000);
        let mut dice = crate::dice::RngDice::thread();
        for _ in 0..100 {
            let enemy = crate::npc::generate_combat_encounter(&mut dice, "goblin-caves");
            let result = resolve_combat(&character, &enemy, &mut dice);
            assert!(result.rounds <= MAX_ROUNDS);
            assert!(result.damage_taken >= 0);
            if result.victory {
                assert!((5..=24).contains(&result.gold_gained));
                assert!(result.items_gained.len() <= 2);
            } else {
                assert_eq!(result.experience_gained, 0);
            }
        }
    }

    #[test]
    fn test_enemy_victory() {
        // Player always misses with 1s; enemy then rolls 20 to hit and 6 damage.
        let character = hero(8);
        let enemy = MONSTERS[4].spawn("kings-road");
        let mut dice = ScriptedDice::new([1, 20, 6]);
        let result = resolve_combat(&character, &enemy, &mut dice);
        assert_eq!(result.outcome, CombatOutcome::EnemyVictory);
        assert!(!result.victory);
        assert_eq!(result.damage_taken, 8);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.events.len(), 2);
    }

    #[test]
    fn test_enemy_without_stats_uses_defaults() {
        let character = hero(1_000);
        let mut enemy = MONSTERS[0].spawn("old-mill");
        enemy.stats = None;
        let result = resolve_combat(&character, &enemy, &mut ScriptedDice::new([20, 8, 1]));
        // 8 + 2 = 10 damage drops the default 10 HP in one hit.
        assert!(result.victory);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.experience_gained, EXPERIENCE_PER_LEVEL);
    }
}
