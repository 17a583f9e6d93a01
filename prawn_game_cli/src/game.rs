use tracing::{info, warn};

use crate::catalog::{CardSet, Catalog, Filter, FilterSelection};
use crate::deck::{CurrentState, DeckPolicy, DeckSession};
use crate::logger::SessionLog;
use crate::rotation::{RosterSnapshot, TurnRotation};
use crate::shuffle::Randomizer;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FilterVariant {
    #[default]
    Categories,
    WildcardOnly,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct GameSettings {
    pub policy: DeckPolicy,
    pub variant: FilterVariant,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum View {
    Setup,
    Playing,
}

const TABLE: &str = "table";

pub struct Game<R> {
    catalog: Catalog,
    filter: Filter,
    deck: DeckSession<R>,
    rotation: TurnRotation,
    view: View,
    log: SessionLog,
}

impl<R: Randomizer> Game<R> {
    pub fn new(settings: GameSettings, catalog: Catalog, rng: R) -> Self {
        let filter = match settings.variant {
            FilterVariant::Categories => Filter::Categories(FilterSelection::default()),
            FilterVariant::WildcardOnly => Filter::Wildcards { enabled: true },
        };
        Self {
            catalog,
            filter,
            deck: DeckSession::new(rng, settings.policy),
            rotation: TurnRotation::new(),
            view: View::Setup,
            log: SessionLog::new(),
        }
    }

    pub fn with_roster(mut self, roster: TurnRotation) -> Self {
        self.rotation = roster;
        self
    }

    fn actor(&self) -> String {
        self.rotation.current_participant().unwrap_or(TABLE).to_string()
    }

    fn record(&mut self, action: &str) {
        let actor = self.actor();
        self.log.record(&actor, action);
    }

    fn redeal(&mut self) {
        self.deck.initialize(self.catalog.eligible(&self.filter));
        self.log.start_deal(self.deck.generation());
    }

    pub fn can_start(&self) -> bool {
        !self.catalog.eligible(&self.filter).is_empty()
    }

    /// Deals and switches to play. Refused while nothing is eligible.
    pub fn start(&mut self) -> Option<CurrentState> {
        if !self.can_start() {
            warn!("start refused: no eligible prompts");
            return None;
        }
        self.redeal();
        self.rotation.reset();
        self.view = View::Playing;
        info!(players = self.rotation.participants().len(), "game started");
        Some(self.deck.snapshot())
    }

    pub fn open_setup(&mut self) {
        self.view = View::Setup;
    }

    fn filter_changed(&mut self, what: &str) {
        self.record(what);
        if self.view == View::Playing {
            info!(change = what, "filter changed mid-game, re-dealing");
            self.redeal();
        }
    }

    /// Returns false when `id` names no card set or the game uses the
    /// wildcard-only filter.
    pub fn toggle_card_set(&mut self, id: &str) -> bool {
        let Filter::Categories(selection) = &mut self.filter else {
            return false;
        };
        if !selection.toggle(id) {
            return false;
        }
        self.filter_changed(&format!("toggle {id}"));
        true
    }

    /// Returns false when the game filters by card set instead.
    pub fn set_wildcards(&mut self, on: bool) -> bool {
        match &mut self.filter {
            Filter::Wildcards { enabled } if *enabled != on => *enabled = on,
            Filter::Wildcards { .. } => return true,
            Filter::Categories(_) => return false,
        }
        self.filter_changed(if on { "wildcards on" } else { "wildcards off" });
        true
    }

    pub fn advance(&mut self) -> CurrentState {
        self.record("next");
        let had_card = self.deck.current().is_some();
        let before = self.deck.generation();
        let state = self.deck.advance();
        if self.deck.generation() != before {
            self.log.start_deal(self.deck.generation());
        }
        if had_card {
            self.rotation.advance_turn();
        }
        state
    }

    pub fn retreat(&mut self) -> CurrentState {
        if !self.deck.can_retreat() {
            return self.deck.snapshot();
        }
        self.record("prev");
        let state = self.deck.retreat();
        self.rotation.retreat_turn();
        state
    }

    pub fn flip(&mut self) -> CurrentState {
        self.record("flip");
        self.deck.toggle_reveal()
    }

    pub fn add_participant(&mut self, name: &str) -> Option<RosterSnapshot> {
        if !self.rotation.add_participant(name) {
            return None;
        }
        self.record(&format!("added {}", name.trim()));
        Some(self.rotation.snapshot())
    }

    pub fn remove_participant(&mut self, index: usize) -> Option<RosterSnapshot> {
        let removed = self.rotation.remove_participant(index)?;
        self.record(&format!("removed {removed}"));
        Some(self.rotation.snapshot())
    }

    pub fn move_participant(&mut self, from: usize, to: usize) -> Option<RosterSnapshot> {
        if !self.rotation.move_participant(from, to) {
            return None;
        }
        self.record(&format!("moved seat {} to {}", from + 1, to + 1));
        Some(self.rotation.snapshot())
    }

    pub fn shuffle_participants(&mut self) -> RosterSnapshot {
        self.rotation.shuffle_participants(self.deck.randomizer());
        self.record("shuffled players");
        self.rotation.snapshot()
    }

    pub fn current(&self) -> CurrentState {
        self.deck.snapshot()
    }

    pub fn remaining(&self) -> usize {
        self.deck.remaining_count()
    }

    pub fn can_retreat(&self) -> bool {
        self.deck.can_retreat()
    }

    pub fn card_sets(&self) -> &[CardSet] {
        match &self.filter {
            Filter::Categories(selection) => selection.sets(),
            Filter::Wildcards { .. } => &[],
        }
    }

    pub fn wildcards_enabled(&self) -> Option<bool> {
        match self.filter {
            Filter::Wildcards { enabled } => Some(enabled),
            Filter::Categories(_) => None,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn deck(&self) -> &DeckSession<R> {
        &self.deck
    }

    pub fn rotation(&self) -> &TurnRotation {
        &self.rotation
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }
}
