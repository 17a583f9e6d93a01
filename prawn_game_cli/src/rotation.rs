use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shuffle::{shuffled, Randomizer};

/// What the roster store needs to persist after each change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub participants: Vec<String>,
    pub active_index: Option<usize>,
}

/// Whose turn it is. Names may repeat; position tells them apart.
#[derive(Clone, Debug, Default)]
pub struct TurnRotation {
    participants: Vec<String>,
    active: Option<usize>,
}

impl TurnRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: RosterSnapshot) -> Self {
        let len = snapshot.participants.len();
        let active = match snapshot.active_index {
            _ if len == 0 => None,
            Some(i) if i < len => Some(i),
            _ => Some(0),
        };
        Self { participants: snapshot.participants, active }
    }

    /// Blank names are ignored. Returns whether the name was added.
    pub fn add_participant(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.participants.push(name.to_string());
        if self.active.is_none() {
            self.active = Some(0);
        }
        debug!(name, count = self.participants.len(), "participant added");
        true
    }

    pub fn remove_participant(&mut self, index: usize) -> Option<String> {
        if index >= self.participants.len() {
            return None;
        }
        let removed = self.participants.remove(index);
        let len = self.participants.len();
        self.active = match self.active {
            _ if len == 0 => None,
            Some(a) => {
                let a = if index <= a { a.saturating_sub(1) } else { a };
                Some(a.min(len - 1))
            }
            None => Some(0),
        };
        debug!(name = %removed, count = len, "participant removed");
        Some(removed)
    }

    /// Reorders the roster. The active participant keeps the turn.
    pub fn move_participant(&mut self, from: usize, to: usize) -> bool {
        let len = self.participants.len();
        if from >= len || to >= len {
            return false;
        }
        let name = self.participants.remove(from);
        self.participants.insert(to, name);
        if let Some(a) = self.active {
            self.active = Some(if a == from {
                to
            } else if from < a && a <= to {
                a - 1
            } else if to <= a && a < from {
                a + 1
            } else {
                a
            });
        }
        true
    }

    pub fn shuffle_participants(&mut self, rng: &mut impl Randomizer) {
        self.participants = shuffled(&self.participants, rng);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.active = if self.participants.is_empty() { None } else { Some(0) };
    }

    pub fn advance_turn(&mut self) {
        let len = self.participants.len();
        if let Some(a) = self.active.filter(|_| len > 0) {
            self.active = Some((a + 1) % len);
        }
    }

    pub fn retreat_turn(&mut self) {
        let len = self.participants.len();
        if let Some(a) = self.active.filter(|_| len > 0) {
            self.active = Some((a + len - 1) % len);
        }
    }

    pub fn current_participant(&self) -> Option<&str> {
        self.active.and_then(|i| self.participants.get(i)).map(String::as_str)
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot { participants: self.participants.clone(), active_index: self.active }
    }
}
