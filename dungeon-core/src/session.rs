//! Per-player game state.
//!
//! A [`GameSession`] is the aggregate root for one adventure: the character,
//! what they carry, their quests, where they have been, who they met, the
//! combat log and the chat history.

use crate::combat::CombatEvent;
use crate::npc::Npc;
use crate::voices::{detect_voices, VoiceArchetype};
use crate::world::{find_location, Character, Inventory, Location, Quest, QuestId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, process-unique session token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh id from the current time and a random component.
    ///
    /// Collisions are not checked.
    pub fn generate() -> Self {
        let random: u64 = rand::thread_rng().gen();
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        Self(format!("{}{}", to_base36(random), to_base36(millis)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.trim().to_string())
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self::from(id.as_str())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

// ============================================================================
// History
// ============================================================================

/// Who or what produced a history line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Player,
    Dm,
    Roll,
    LevelUp,
    Combat,
}

/// One line of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub content: String,
    /// The d20 result, on roll entries.
    pub roll: Option<u8>,
    /// Voice badges detected in DM text.
    pub voices: Vec<VoiceArchetype>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(kind: HistoryKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            roll: None,
            voices: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn player(content: impl Into<String>) -> Self {
        Self::new(HistoryKind::Player, content)
    }

    /// A DM line, tagged with the voices its wording matches.
    pub fn dm(content: impl Into<String>) -> Self {
        let mut entry = Self::new(HistoryKind::Dm, content);
        entry.voices = detect_voices(&entry.content);
        entry
    }

    pub fn roll(content: impl Into<String>, roll: u8) -> Self {
        let mut entry = Self::new(HistoryKind::Roll, content);
        entry.roll = Some(roll);
        entry
    }

    pub fn level_up(content: impl Into<String>) -> Self {
        Self::new(HistoryKind::LevelUp, content)
    }

    pub fn combat(content: impl Into<String>) -> Self {
        Self::new(HistoryKind::Combat, content)
    }
}

// ============================================================================
// Session
// ============================================================================

/// The complete in-memory state of one adventure.
///
/// `current_location` is always listed in `visited_locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,
    /// Bumped by the store on every successful write.
    pub revision: u64,
    pub character: Character,
    pub inventory: Inventory,
    pub quests: Vec<Quest>,
    /// In discovery order.
    pub visited_locations: Vec<String>,
    pub current_location: String,
    pub encountered_npcs: Vec<Npc>,
    pub combat_log: Vec<CombatEvent>,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(
        id: SessionId,
        character: Character,
        inventory: Inventory,
        quests: Vec<Quest>,
        starting_location: impl Into<String>,
    ) -> Self {
        let start = starting_location.into();
        Self {
            id,
            revision: 0,
            character,
            inventory,
            quests,
            visited_locations: vec![start.clone()],
            current_location: start,
            encountered_npcs: Vec::new(),
            combat_log: Vec::new(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// The most recent DM line, if any.
    pub fn last_dm_line(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|e| e.kind == HistoryKind::Dm)
            .map(|e| e.content.as_str())
    }

    pub fn location(&self) -> Option<&'static Location> {
        find_location(&self.current_location)
    }

    pub fn has_visited(&self, location_id: &str) -> bool {
        self.visited_locations.iter().any(|v| v == location_id)
    }

    /// Move to `location_id`, recording it as visited on first arrival.
    /// Returns true on first arrival.
    pub fn visit(&mut self, location_id: &str) -> bool {
        let first = !self.has_visited(location_id);
        if first {
            self.visited_locations.push(location_id.to_string());
        }
        self.current_location = location_id.to_string();
        first
    }

    pub fn quest(&self, id: QuestId) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn quest_mut(&mut self, id: QuestId) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|q| q.id == id)
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.clone(),
            character: self.character.clone(),
            inventory: self.inventory.clone(),
            quests: self.quests.clone(),
            visited_locations: self.visited_locations.clone(),
            current_location: self.current_location.clone(),
            encountered_npcs: self.encountered_npcs.clone(),
            combat_log: self.combat_log.clone(),
            history: self.history.clone(),
        }
    }
}

/// Read-only snapshot handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub character: Character,
    pub inventory: Inventory,
    pub quests: Vec<Quest>,
    pub visited_locations: Vec<String>,
    pub current_location: String,
    pub encountered_npcs: Vec<Npc>,
    pub combat_log: Vec<CombatEvent>,
    pub history: Vec<HistoryEntry>,
}
