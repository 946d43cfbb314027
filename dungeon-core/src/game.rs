//! The game service.
//!
//! [`GameMaster`] is the entry point for front ends: it creates sessions,
//! runs player actions through the narrator and applies the rules that
//! change a session's state.
//!
//! Every write is an optimistic transaction. The session is read, the change
//! is applied to the copy, and the copy is committed only if nobody else
//! committed in between; otherwise the change is re-applied to the fresh
//! state. The narrative call runs before the transaction so slow model
//! responses never hold a session.

use crate::character_builder::{CharacterBuilder, ValidationError};
use crate::combat::{resolve_combat, CombatOutcome, CombatResult};
use crate::config::GameConfig;
use crate::dice::{DiceRoller, RngDice};
use crate::items::{healing_dice, starting_items};
use crate::narrative::{roll_label, NarrativeSource, Narrator, PromptContext};
use crate::npc::{generate_combat_encounter, generate_contextual_npc, generate_random_npc, Npc};
use crate::rules::{self, LevelUpReward, RuleError, SkillCheck, DEFAULT_DC};
use crate::scenarios::{random_scenario, starting_quests};
use crate::session::{GameSession, HistoryEntry, SessionId, SessionView};
use crate::store::{InMemorySessionStore, SessionStore, StoreError};
use crate::voices::VoiceArchetype;
use crate::world::{find_location, is_accessible, Inventory, ItemId, ItemType, Location, ObjectiveId, QuestId, QuestReward, Skill};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Commit attempts before a write gives up with [`GameError::Contention`].
pub const MAX_COMMIT_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
    #[error(transparent)]
    Rules(#[from] RuleError),
    #[error("session {0} is too busy, try again")]
    Contention(SessionId),
}

/// Result of one player action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub narrative: String,
    pub dice_roll: u8,
    pub source: NarrativeSource,
    pub voices: Vec<VoiceArchetype>,
}

/// Result of a fight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FightOutcome {
    pub enemy: Npc,
    pub result: CombatResult,
    /// The character has enough experience for the next level.
    pub can_level_up: bool,
}

/// Result of using an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemUse {
    pub item: String,
    pub healed: i32,
    pub remaining: u32,
}

/// Result of completing a quest objective.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestProgress {
    pub quest_completed: bool,
    /// The reward paid out, when this objective finished the quest.
    pub reward: Option<QuestReward>,
}

/// Game service over a session store and a narrator.
pub struct GameMaster {
    store: Arc<dyn SessionStore>,
    narrator: Narrator,
    config: GameConfig,
    dice: Mutex<Box<dyn DiceRoller + Send>>,
}

impl GameMaster {
    pub fn new(store: Arc<dyn SessionStore>, narrator: Narrator, config: GameConfig) -> Self {
        Self {
            store,
            narrator,
            config,
            dice: Mutex::new(Box::new(RngDice::new(StdRng::from_entropy()))),
        }
    }

    /// In-memory store and a narrator built from `config`.
    pub fn from_config(config: GameConfig) -> Self {
        let narrator = Narrator::from_config(&config);
        Self::new(Arc::new(InMemorySessionStore::new()), narrator, config)
    }

    /// Dice for every game-side roll (d20s, combat, NPCs, level-ups).
    pub fn with_dice(mut self, dice: impl DiceRoller + Send + 'static) -> Self {
        self.dice = Mutex::new(Box::new(dice));
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    fn dice(&self) -> MutexGuard<'_, Box<dyn DiceRoller + Send>> {
        self.dice.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self, id: &SessionId) -> Result<GameSession, GameError> {
        if id.is_blank() {
            return Err(ValidationError::MissingField("session_id").into());
        }
        self.store
            .get(id)
            .ok_or_else(|| GameError::SessionNotFound(id.clone()))
    }

    /// Apply `change` to the latest copy of the session and commit it.
    ///
    /// `change` may run more than once; it must only touch the session it is
    /// given. An error from `change` aborts without writing.
    fn transact<T>(
        &self,
        id: &SessionId,
        mut change: impl FnMut(&mut GameSession, &mut (dyn DiceRoller + Send)) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let mut session = self.load(id)?;
            let expected = session.revision;
            let value = {
                let mut dice = self.dice();
                change(&mut session, dice.as_mut())?
            };

            match self.store.compare_and_swap(id, expected, session) {
                Ok(_) => return Ok(value),
                Err(StoreError::Conflict { .. }) => {
                    debug!(session = %id, attempt, "Write conflict, retrying");
                }
                Err(StoreError::NotFound(_)) => return Err(GameError::SessionNotFound(id.clone())),
            }
        }
        warn!(session = %id, attempts = MAX_COMMIT_ATTEMPTS, "Giving up on contended session");
        Err(GameError::Contention(id.clone()))
    }

    // ========================================================================
    // Session API
    // ========================================================================

    /// Create a session for a new character.
    ///
    /// The character starts with the configured gold, class and common
    /// equipment, the starter quests and a random opening scene.
    pub fn start_session(&self, character: CharacterBuilder) -> Result<SessionId, GameError> {
        let mut character = character.build()?;
        character.gold = self.config.starting_gold;

        let inventory = Inventory::new(starting_items(character.class));
        let id = SessionId::generate();
        let mut session = GameSession::new(
            id.clone(),
            character,
            inventory,
            starting_quests(),
            self.config.starting_location.clone(),
        );

        let scenario = random_scenario(self.dice().as_mut());
        session.record(HistoryEntry::dm(scenario.opening));

        info!(
            session = %id,
            character = %session.character.name,
            class = %session.character.class,
            scenario = scenario.name,
            "Session started"
        );
        self.store.create(session);
        Ok(id)
    }

    pub fn session_view(&self, id: &SessionId) -> Result<SessionView, GameError> {
        Ok(self.load(id)?.view())
    }

    /// Roll a d20, narrate the action and append it to the history.
    ///
    /// Narration never fails; a broken or missing model produces offline
    /// text instead.
    pub async fn submit_action(&self, id: &SessionId, action: &str) -> Result<ActionOutcome, GameError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(ValidationError::MissingField("action").into());
        }

        let snapshot = self.load(id)?;
        let roll = self.dice().d20() as u8;
        let location = snapshot.location().map(|l| l.name);
        let ctx = PromptContext {
            character: &snapshot.character,
            location,
            last_dm_line: snapshot.last_dm_line(),
            action,
            roll,
        };
        let narration = self.narrator.narrate(&ctx).await;

        let dm_entry = HistoryEntry::dm(narration.text.clone());
        let voices = dm_entry.voices.clone();
        self.transact(id, |session, _| {
            session.record(HistoryEntry::player(action));
            session.record(HistoryEntry::roll(format!("d20 roll: {roll} ({})", roll_label(roll)), roll));
            session.record(dm_entry.clone());
            Ok(())
        })?;

        debug!(session = %id, roll, source = ?narration.source, "Action narrated");
        Ok(ActionOutcome {
            narrative: narration.text,
            dice_roll: roll,
            source: narration.source,
            voices,
        })
    }

    // ========================================================================
    // Progression
    // ========================================================================

    pub fn level_up(&self, id: &SessionId) -> Result<LevelUpReward, GameError> {
        self.transact(id, |session, dice| {
            let character = &mut session.character;
            if character.level >= rules::MAX_LEVEL {
                return Err(RuleError::MaxLevel.into());
            }
            if !rules::can_level_up(character) {
                return Err(RuleError::NotEligible {
                    experience: character.experience,
                    needed: character.experience_to_next,
                }
                .into());
            }

            let reward = rules::level_up(character, dice);
            let mut summary = format!(
                "{} reached level {}! +{} max HP, +{} skill points.",
                character.name, character.level, reward.hp_increase, reward.skill_points
            );
            for ability in &reward.new_abilities {
                summary.push_str(&format!(" New ability: {ability}."));
            }
            session.record(HistoryEntry::level_up(summary));
            Ok(reward)
        })
    }

    /// Spend a skill point. Returns the new rank.
    pub fn spend_skill_point(&self, id: &SessionId, skill: Skill) -> Result<u8, GameError> {
        self.transact(id, |session, _| Ok(rules::spend_skill_point(&mut session.character, skill)?))
    }

    /// Roll a skill check against `difficulty` (default 15) and log it.
    pub fn skill_check(&self, id: &SessionId, skill: Skill, difficulty: Option<i32>) -> Result<SkillCheck, GameError> {
        let difficulty = difficulty.unwrap_or(DEFAULT_DC);
        self.transact(id, |session, dice| {
            let check = rules::roll_skill_check(&session.character, skill, difficulty, dice);
            let verdict = if check.success { "success" } else { "failure" };
            session.record(HistoryEntry::roll(
                format!(
                    "{skill} check: {} {:+} = {} vs DC {difficulty}, {verdict}",
                    check.roll, check.modifier, check.total
                ),
                check.roll as u8,
            ));
            Ok(check)
        })
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    /// Use one of a consumable. Healing items restore HP up to the maximum.
    pub fn use_item(&self, id: &SessionId, item_id: ItemId) -> Result<ItemUse, GameError> {
        self.transact(id, |session, dice| {
            let item = session
                .inventory
                .find(item_id)
                .cloned()
                .ok_or(RuleError::UnknownItem(item_id))?;
            if item.item_type != ItemType::Consumable {
                return Err(RuleError::ItemNotUsable(item.name).into());
            }

            let healed = healing_dice(&item)
                .map(|expr| session.character.heal(expr.roll_with(dice)))
                .unwrap_or(0);
            session.inventory.remove(item_id, 1);
            let remaining = session.inventory.find(item_id).map_or(0, |i| i.quantity);

            debug!(session = %session.id, item = %item.name, healed, remaining, "Item used");
            Ok(ItemUse {
                item: item.name,
                healed,
                remaining,
            })
        })
    }

    // ========================================================================
    // Quests
    // ========================================================================

    /// Tick off an objective. Finishing the last one completes the quest and
    /// pays its reward.
    pub fn complete_objective(
        &self,
        id: &SessionId,
        quest_id: QuestId,
        objective_id: ObjectiveId,
    ) -> Result<QuestProgress, GameError> {
        self.transact(id, |session, _| {
            let quest = session
                .quest_mut(quest_id)
                .ok_or(RuleError::UnknownQuest(quest_id))?;
            if !quest.complete_objective(objective_id).map_err(RuleError::from)? {
                return Ok(QuestProgress {
                    quest_completed: false,
                    reward: None,
                });
            }

            quest.complete(Utc::now()).map_err(RuleError::from)?;
            let title = quest.title.clone();
            let reward = quest.reward.clone();
            if let Some(reward) = &reward {
                session.character.gold += reward.gold;
                rules::gain_experience(&mut session.character, reward.experience);
                for item in &reward.items {
                    session.inventory.add(item.clone());
                }
            }
            info!(session = %session.id, quest = %title, "Quest completed");
            Ok(QuestProgress {
                quest_completed: true,
                reward,
            })
        })
    }

    /// Give up on an active quest.
    pub fn abandon_quest(&self, id: &SessionId, quest_id: QuestId) -> Result<(), GameError> {
        self.transact(id, |session, _| {
            let quest = session
                .quest_mut(quest_id)
                .ok_or(RuleError::UnknownQuest(quest_id))?;
            quest.fail().map_err(RuleError::from)?;
            Ok(())
        })
    }

    // ========================================================================
    // World
    // ========================================================================

    /// Move to a location that is visited or adjacent to one.
    pub fn travel(&self, id: &SessionId, location_id: &str) -> Result<&'static Location, GameError> {
        let location_id = location_id.trim();
        let location = find_location(location_id).ok_or_else(|| RuleError::UnknownLocation(location_id.to_string()))?;
        self.transact(id, |session, _| {
            if !is_accessible(location, &session.visited_locations) {
                return Err(RuleError::LocationUnreachable(location.id.to_string()).into());
            }
            if session.visit(location.id) {
                info!(session = %session.id, location = location.id, "Location discovered");
            }
            Ok(location)
        })
    }

    /// Meet an NPC at the current location. A non-empty hint such as
    /// "a grumpy guard" shapes who appears.
    pub fn meet_npc(&self, id: &SessionId, hint: Option<&str>) -> Result<Npc, GameError> {
        let hint = hint.map(str::trim).filter(|h| !h.is_empty());
        self.transact(id, |session, dice| {
            let location = session.current_location.clone();
            let npc = match hint {
                Some(hint) => generate_contextual_npc(dice, hint, &location),
                None => generate_random_npc(dice, &location),
            };
            session.encountered_npcs.push(npc.clone());
            Ok(npc)
        })
    }

    /// Fight a random enemy at the current location and apply the result.
    pub fn fight(&self, id: &SessionId) -> Result<FightOutcome, GameError> {
        self.transact(id, |session, dice| {
            let enemy = generate_combat_encounter(dice, &session.current_location);
            let result = resolve_combat(&session.character, &enemy, dice);

            let character = &mut session.character;
            character.take_damage(result.damage_taken);
            character.gold += result.gold_gained;
            rules::gain_experience(character, result.experience_gained);
            for item in &result.items_gained {
                session.inventory.add(item.clone());
            }
            session.combat_log.extend(result.events.iter().cloned());
            session.encountered_npcs.push(enemy.clone());

            let summary = match result.outcome {
                CombatOutcome::PlayerVictory => format!(
                    "Victory over {} in {} rounds! +{} XP, +{} gold, {} items, {} damage taken.",
                    enemy.name,
                    result.rounds,
                    result.experience_gained,
                    result.gold_gained,
                    result.items_gained.len(),
                    result.damage_taken
                ),
                CombatOutcome::EnemyVictory => {
                    format!("Defeated by {} after {} rounds.", enemy.name, result.rounds)
                }
                CombatOutcome::Timeout => format!(
                    "The fight with {} drags on for {} rounds and both sides withdraw.",
                    enemy.name, result.rounds
                ),
            };
            session.record(HistoryEntry::combat(summary));

            Ok(FightOutcome {
                can_level_up: rules::can_level_up(&session.character),
                enemy,
                result,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::NarrativeError;
    use crate::session::HistoryKind;
    use crate::testing::{FixedDice, MockNarrator, TestHarness};
    use crate::world::{AbilityScores, CharacterClass, QuestStatus, STARTING_LOCATION};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_start_session_validation() {
        let harness = TestHarness::new();
        let err = harness
            .game
            .start_session(CharacterBuilder::new().class(CharacterClass::Wizard).ability_scores(AbilityScores::default()))
            .unwrap_err();
        assert_eq!(err, GameError::Validation(ValidationError::MissingField("name")));

        let err = harness
            .game
            .start_session(CharacterBuilder::new().name("Ysolde").class(CharacterClass::Wizard))
            .unwrap_err();
        assert_eq!(err, GameError::Validation(ValidationError::MissingField("ability_scores")));
    }

    #[test]
    fn test_start_session_seeds_state() {
        let harness = TestHarness::new();
        let view = harness.view();
        assert_eq!(view.character.name, "Bram");
        assert_eq!(view.character.hp, 12);
        assert_eq!(view.character.gold, 100);
        assert_eq!(view.current_location, STARTING_LOCATION);
        assert_eq!(view.quests.len(), 2);
        assert!(view.inventory.find_by_name("Healing Potion").is_some());
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].kind, HistoryKind::Dm);
    }

    #[test]
    fn test_unknown_session() {
        let harness = TestHarness::new();
        let ghost = SessionId::from("ghost");
        assert_eq!(harness.game.session_view(&ghost), Err(GameError::SessionNotFound(ghost.clone())));
        assert_eq!(harness.game.fight(&ghost).unwrap_err(), GameError::SessionNotFound(ghost));
        assert_eq!(
            harness.game.session_view(&SessionId::from(" ")),
            Err(GameError::Validation(ValidationError::MissingField("session_id")))
        );
    }

    #[tokio::test]
    async fn test_submit_action_appends_three_entries() {
        let harness = TestHarness::with_responses(vec![Ok("The bookshelf swings aside".to_string())]);
        let outcome = harness.game.submit_action(&harness.session, "I search the room").await.unwrap();
        assert_eq!(outcome.narrative, "The bookshelf swings aside.");
        assert_eq!(outcome.source, NarrativeSource::Model);
        assert!((1..=20).contains(&outcome.dice_roll));

        let view = harness.view();
        let kinds: Vec<HistoryKind> = view.history.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![HistoryKind::Dm, HistoryKind::Player, HistoryKind::Roll, HistoryKind::Dm]);
        assert_eq!(view.history[1].content, "I search the room");
        assert_eq!(view.history[2].roll, Some(outcome.dice_roll));
    }

    #[tokio::test]
    async fn test_submit_action_falls_back_on_failure() {
        let harness = TestHarness::with_responses(vec![Err(NarrativeError::RateLimited)]);
        let outcome = harness.game.submit_action(&harness.session, "attack the shadow").await.unwrap();
        assert_eq!(outcome.source, NarrativeSource::Fallback);
        assert!(outcome.narrative.ends_with(['.', '!', '?']));
        assert!(!outcome.voices.is_empty());
        assert_eq!(harness.view().history.len(), 4);
    }

    #[tokio::test]
    async fn test_submit_empty_action_is_rejected() {
        let harness = TestHarness::new();
        let err = harness.game.submit_action(&harness.session, "   ").await.unwrap_err();
        assert_eq!(err, GameError::Validation(ValidationError::MissingField("action")));
        assert_eq!(harness.view().history.len(), 1);
    }

    #[test]
    fn test_level_up_requires_experience() {
        let harness = TestHarness::new();
        let err = harness.game.level_up(&harness.session).unwrap_err();
        assert_eq!(
            err,
            GameError::Rules(RuleError::NotEligible {
                experience: 0,
                needed: 300
            })
        );
    }

    #[test]
    fn test_level_up_after_quest_reward() {
        let harness = TestHarness::new();
        let quest = harness.view().quests[0].clone();
        for objective in &quest.objectives {
            harness
                .game
                .complete_objective(&harness.session, quest.id, objective.id)
                .unwrap();
        }
        // 150 XP from the first quest is not enough on its own.
        assert!(harness.game.level_up(&harness.session).is_err());

        let second = harness.view().quests[1].clone();
        for objective in &second.objectives {
            harness.game.complete_objective(&harness.session, second.id, objective.id).unwrap();
        }
        let view = harness.view();
        assert_eq!(view.character.experience, 250);
        assert_eq!(view.character.gold, 180);
        assert!(view.inventory.find_by_name("Iron Sword").is_some());
    }

    #[test]
    fn test_level_up_applies_reward() {
        let harness = TestHarness::new();
        harness.edit(|s| s.character.experience = 300);
        let reward = harness.game.level_up(&harness.session).unwrap();
        let view = harness.view();
        assert_eq!(view.character.level, 2);
        assert_eq!(view.character.hp, view.character.max_hp);
        assert_eq!(reward.new_abilities, vec!["Action Surge - one extra action in combat".to_string()]);
        assert_eq!(view.history.last().map(|e| e.kind), Some(HistoryKind::LevelUp));
    }

    #[test]
    fn test_level_up_at_cap() {
        let harness = TestHarness::new();
        harness.edit(|s| {
            s.character.level = 20;
            s.character.experience = u32::MAX;
        });
        assert_eq!(harness.game.level_up(&harness.session), Err(GameError::Rules(RuleError::MaxLevel)));
    }

    #[test]
    fn test_skill_points() {
        let harness = TestHarness::new();
        assert_eq!(harness.game.spend_skill_point(&harness.session, Skill::Athletics), Ok(1));
        assert_eq!(harness.game.spend_skill_point(&harness.session, Skill::Athletics), Ok(2));
        assert_eq!(
            harness.game.spend_skill_point(&harness.session, Skill::Athletics),
            Err(GameError::Rules(RuleError::NoSkillPoints))
        );
        assert_eq!(harness.view().character.skills.get(Skill::Athletics), 2);
    }

    #[test]
    fn test_skill_check_is_logged() {
        let harness = TestHarness::new();
        let check = harness.game.skill_check(&harness.session, Skill::Athletics, None).unwrap();
        assert_eq!(check.difficulty, DEFAULT_DC);
        assert_eq!(check.roll, 10);
        let last = harness.view().history.last().cloned().unwrap();
        assert_eq!(last.kind, HistoryKind::Roll);
        assert_eq!(last.roll, Some(10));
    }

    #[test]
    fn test_use_healing_potion() {
        let harness = TestHarness::new();
        harness.edit(|s| s.character.hp = 1);
        let potion = harness.view().inventory.find_by_name("Healing Potion").cloned().unwrap();
        let used = harness.game.use_item(&harness.session, potion.id).unwrap();
        // FixedDice(10) clamps each d4 to 4: 4 + 4 + 2 = 10, capped at 12 max HP.
        assert_eq!(used.healed, 10);
        assert_eq!(used.remaining, potion.quantity - 1);
        assert_eq!(harness.view().character.hp, 11);
    }

    #[test]
    fn test_use_item_rejects_equipment() {
        let harness = TestHarness::new();
        let sword = harness
            .view()
            .inventory
            .iter()
            .find(|i| i.item_type == ItemType::Weapon)
            .cloned()
            .unwrap();
        assert_eq!(
            harness.game.use_item(&harness.session, sword.id),
            Err(GameError::Rules(RuleError::ItemNotUsable(sword.name)))
        );
        let missing = ItemId::new();
        assert_eq!(
            harness.game.use_item(&harness.session, missing),
            Err(GameError::Rules(RuleError::UnknownItem(missing)))
        );
    }

    #[test]
    fn test_abandon_quest_is_terminal() {
        let harness = TestHarness::new();
        let quest = harness.view().quests[0].clone();
        harness.game.abandon_quest(&harness.session, quest.id).unwrap();
        assert_eq!(harness.view().quests[0].status, QuestStatus::Failed);
        assert!(matches!(
            harness.game.abandon_quest(&harness.session, quest.id),
            Err(GameError::Rules(RuleError::Quest(_)))
        ));
        assert!(harness
            .game
            .complete_objective(&harness.session, quest.id, quest.objectives[0].id)
            .is_err());
    }

    #[test]
    fn test_travel() {
        let harness = TestHarness::new();
        assert_eq!(
            harness.game.travel(&harness.session, "atlantis").unwrap_err(),
            GameError::Rules(RuleError::UnknownLocation("atlantis".to_string()))
        );
        assert_eq!(
            harness.game.travel(&harness.session, "stormwatch-keep").unwrap_err(),
            GameError::Rules(RuleError::LocationUnreachable("stormwatch-keep".to_string()))
        );

        let village = harness.game.travel(&harness.session, "millbrook-village").unwrap();
        assert_eq!(village.id, "millbrook-village");
        harness.game.travel(&harness.session, "kings-road").unwrap();
        harness.game.travel(&harness.session, "stormwatch-keep").unwrap();
        let view = harness.view();
        assert_eq!(view.current_location, "stormwatch-keep");
        assert_eq!(
            view.visited_locations,
            vec![STARTING_LOCATION, "millbrook-village", "kings-road", "stormwatch-keep"]
        );
    }

    #[test]
    fn test_meet_npc() {
        let harness = TestHarness::new();
        let npc = harness.game.meet_npc(&harness.session, Some("a grumpy guard")).unwrap();
        assert_eq!(npc.voice, VoiceArchetype::Guard);
        assert_eq!(npc.location, STARTING_LOCATION);
        harness.game.meet_npc(&harness.session, None).unwrap();
        assert_eq!(harness.view().encountered_npcs.len(), 2);
    }

    #[test]
    fn test_fight_applies_result() {
        let harness = TestHarness::with_dice(FixedDice::new(20));
        let before = harness.view();
        let outcome = harness.game.fight(&harness.session).unwrap();
        assert!(outcome.result.victory);

        let view = harness.view();
        assert_eq!(view.character.gold, before.character.gold + outcome.result.gold_gained);
        assert_eq!(view.character.experience, outcome.result.experience_gained);
        assert_eq!(view.character.hp, before.character.hp - outcome.result.damage_taken);
        assert_eq!(view.combat_log.len(), outcome.result.events.len());
        assert_eq!(view.encountered_npcs.len(), 1);
        assert_eq!(view.history.last().map(|e| e.kind), Some(HistoryKind::Combat));
    }

    /// Store that lets another writer slip in before the first few commits.
    struct ContendedStore {
        inner: InMemorySessionStore,
        interference: AtomicUsize,
    }

    impl SessionStore for ContendedStore {
        fn create(&self, session: GameSession) {
            self.inner.create(session)
        }

        fn get(&self, id: &SessionId) -> Option<GameSession> {
            self.inner.get(id)
        }

        fn update(&self, id: &SessionId, session: GameSession) {
            self.inner.update(id, session)
        }

        fn compare_and_swap(&self, id: &SessionId, expected: u64, session: GameSession) -> Result<u64, StoreError> {
            let left = self.interference.load(Ordering::SeqCst);
            if left > 0 {
                self.interference.store(left - 1, Ordering::SeqCst);
                if let Some(mut other) = self.inner.get(id) {
                    other.character.gold += 1;
                    self.inner.update(id, other);
                }
            }
            self.inner.compare_and_swap(id, expected, session)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    fn contended(interference: usize) -> (GameMaster, SessionId) {
        let store = Arc::new(ContendedStore {
            inner: InMemorySessionStore::new(),
            interference: AtomicUsize::new(0),
        });
        let game = GameMaster::new(store.clone(), Narrator::offline(), GameConfig::default()).with_dice(FixedDice::new(10));
        let id = game.start_session(TestHarness::hero()).unwrap();
        store.interference.store(interference, Ordering::SeqCst);
        (game, id)
    }

    #[test]
    fn test_conflicts_are_retried_without_losing_updates() {
        let (game, id) = contended(3);
        game.spend_skill_point(&id, Skill::Stealth).unwrap();
        let view = game.session_view(&id).unwrap();
        // Both the interfering writes and ours survive.
        assert_eq!(view.character.gold, 103);
        assert_eq!(view.character.skills.get(Skill::Stealth), 1);
        assert_eq!(view.character.skill_points, 1);
    }

    #[test]
    fn test_endless_conflicts_give_up() {
        let (game, id) = contended(MAX_COMMIT_ATTEMPTS);
        assert_eq!(game.spend_skill_point(&id, Skill::Stealth), Err(GameError::Contention(id.clone())));
        assert_eq!(game.session_view(&id).unwrap().character.skill_points, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_actions_keep_every_entry() {
        let narrator = Narrator::new(Arc::new(MockNarrator::repeating("Something stirs.")));
        let game = Arc::new(
            GameMaster::new(Arc::new(InMemorySessionStore::new()), narrator, GameConfig::default())
                .with_dice(FixedDice::new(7)),
        );
        let id = game.start_session(TestHarness::hero()).unwrap();

        let tasks: Vec<_> = (0..MAX_COMMIT_ATTEMPTS)
            .map(|i| {
                let game = Arc::clone(&game);
                let id = id.clone();
                tokio::spawn(async move { game.submit_action(&id, &format!("I wait {i}")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let view = game.session_view(&id).unwrap();
        assert_eq!(view.history.len(), 1 + 3 * MAX_COMMIT_ATTEMPTS);
    }
}
