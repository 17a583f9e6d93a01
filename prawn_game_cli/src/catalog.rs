use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::prompt::{Prompt, PromptId};

const BUILTIN: &str = include_str!("../assets/prompts.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not a valid prompt list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("prompt id {0} appears more than once")]
    DuplicateId(PromptId),
    #[error("prompt {0} has no text")]
    BlankText(PromptId),
}

/// A category the player can switch on or off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSet {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

impl CardSet {
    pub fn new(id: &str, description: &str) -> Self {
        Self { id: id.to_string(), name: id.to_string(), description: description.to_string(), enabled: true }
    }
}

pub fn default_card_sets() -> Vec<CardSet> {
    vec![
        CardSet::new("Reflection", "Self-discovery questions"),
        CardSet::new("Perception", "How others see you"),
        CardSet::new("Connection", "Relationship & bonding"),
        CardSet::new("Family", "Family-related questions"),
        CardSet::new("Self-Love", "Self-care & compassion"),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSelection {
    sets: Vec<CardSet>,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::new(default_card_sets())
    }
}

impl FilterSelection {
    pub fn new(sets: Vec<CardSet>) -> Self {
        Self { sets }
    }

    pub fn sets(&self) -> &[CardSet] {
        &self.sets
    }

    /// Returns false when `id` names no card set.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.sets.iter_mut().find(|s| s.id == id) {
            Some(set) => {
                set.enabled = !set.enabled;
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, id: &str, enabled: bool) -> bool {
        match self.sets.iter_mut().find(|s| s.id == id) {
            Some(set) => {
                set.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, category: &str) -> bool {
        self.sets.iter().any(|s| s.enabled && s.id == category)
    }

    pub fn any_enabled(&self) -> bool {
        self.sets.iter().any(|s| s.enabled)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Categories(FilterSelection),
    /// Single flag gating every wildcard prompt.
    Wildcards { enabled: bool },
}

impl Filter {
    // An uncategorised prompt rides along with *any* enabled set, whichever it
    // is. Kept as-is for compatibility; flagged for product review.
    pub fn admits(&self, prompt: &Prompt) -> bool {
        match self {
            Filter::Categories(selection) => match &prompt.category {
                Some(cat) => selection.is_enabled(cat),
                None => selection.any_enabled(),
            },
            Filter::Wildcards { enabled } => *enabled || !prompt.wildcard,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Catalog {
    prompts: Vec<Prompt>,
}

impl Catalog {
    pub fn new(prompts: Vec<Prompt>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::with_capacity(prompts.len());
        for p in &prompts {
            if !ids.insert(p.id) {
                return Err(CatalogError::DuplicateId(p.id));
            }
            if p.text.trim().is_empty() {
                return Err(CatalogError::BlankText(p.id));
            }
        }
        Ok(Self { prompts })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    pub fn eligible(&self, filter: &Filter) -> Vec<Prompt> {
        self.prompts.iter().filter(|p| filter.admits(p)).cloned().collect()
    }

    pub fn get(&self, id: PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.iter()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}
