use tracing::{debug, info};

use crate::prompt::Prompt;
use crate::shuffle::{shuffled, Randomizer};

/// What `advance` does once the draw pile runs dry.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ExhaustionPolicy {
    /// Show the end of the deck until the caller re-initializes.
    #[default]
    Manual,
    /// Deal a fresh shuffle of the same eligible set straight away.
    AutoReshuffle,
}

/// Flip state of the card brought back by `retreat`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RetreatReveal {
    #[default]
    Hidden,
    Revealed,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DeckPolicy {
    pub exhaustion: ExhaustionPolicy,
    pub retreat_reveal: RetreatReveal,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DeckState {
    Idle,
    Active,
    Exhausted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentState {
    pub prompt: Option<Prompt>,
    pub remaining: usize,
    pub revealed: bool,
}

/// Draw pile, history and the card on the table for one game.
///
/// For the lifetime of one shuffle generation, `draw_pile`, `history` and
/// `current` together hold every eligible prompt exactly once.
pub struct DeckSession<R> {
    rng: R,
    policy: DeckPolicy,
    state: DeckState,
    eligible: Vec<Prompt>,
    draw_pile: Vec<Prompt>,
    history: Vec<Prompt>,
    current: Option<Prompt>,
    revealed: bool,
    generation: u64,
}

impl<R: Randomizer> DeckSession<R> {
    pub fn new(rng: R, policy: DeckPolicy) -> Self {
        Self {
            rng,
            policy,
            state: DeckState::Idle,
            eligible: Vec::new(),
            draw_pile: Vec::new(),
            history: Vec::new(),
            current: None,
            revealed: false,
            generation: 0,
        }
    }

    /// Starts a new shuffle generation over `eligible`.
    pub fn initialize(&mut self, eligible: Vec<Prompt>) {
        self.eligible = eligible;
        self.deal();
    }

    fn deal(&mut self) {
        let mut pile = shuffled(&self.eligible, &mut self.rng);
        self.current = pile.pop();
        self.draw_pile = pile;
        self.history.clear();
        self.revealed = false;
        self.state = DeckState::Active;
        self.generation += 1;
        info!(
            generation = self.generation,
            eligible = self.eligible.len(),
            "deck shuffled"
        );
    }

    pub fn advance(&mut self) -> CurrentState {
        if let Some(prev) = self.current.take() {
            self.history.push(prev);
        }
        match self.draw_pile.pop() {
            Some(next) => {
                self.current = Some(next);
                self.revealed = false;
            }
            None if self.policy.exhaustion == ExhaustionPolicy::AutoReshuffle && !self.eligible.is_empty() => {
                debug!(generation = self.generation, "draw pile empty, reshuffling");
                self.deal();
            }
            None => {
                if self.state != DeckState::Idle {
                    self.state = DeckState::Exhausted;
                }
                debug!(seen = self.history.len(), "end of deck");
            }
        }
        self.snapshot()
    }

    /// Steps back one card. A no-op while there is no history.
    pub fn retreat(&mut self) -> CurrentState {
        let Some(prev) = self.history.pop() else {
            return self.snapshot();
        };
        if let Some(cur) = self.current.take() {
            self.draw_pile.push(cur);
        }
        self.current = Some(prev);
        self.revealed = self.policy.retreat_reveal == RetreatReveal::Revealed;
        self.state = DeckState::Active;
        self.snapshot()
    }

    pub fn toggle_reveal(&mut self) -> CurrentState {
        self.revealed = !self.revealed;
        self.snapshot()
    }

    pub fn remaining_count(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn snapshot(&self) -> CurrentState {
        CurrentState {
            prompt: self.current.clone(),
            remaining: self.draw_pile.len(),
            revealed: self.revealed,
        }
    }

    pub fn current(&self) -> Option<&Prompt> {
        self.current.as_ref()
    }

    pub fn state(&self) -> DeckState {
        self.state
    }

    pub fn policy(&self) -> DeckPolicy {
        self.policy
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_retreat(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn randomizer(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::catalog::{CardSet, Catalog, Filter, FilterSelection};
    use crate::shuffle::RngShuffler;

    fn prompts(n: u32) -> Vec<Prompt> {
        (1..=n).map(|i| Prompt::new(i, format!("prompt {i}"))).collect()
    }

    fn deck(policy: DeckPolicy) -> DeckSession<RngShuffler> {
        DeckSession::new(RngShuffler::seeded(7), policy)
    }

    fn auto() -> DeckPolicy {
        DeckPolicy { exhaustion: ExhaustionPolicy::AutoReshuffle, ..DeckPolicy::default() }
    }

    fn current_id<R: Randomizer>(d: &DeckSession<R>) -> Option<u32> {
        d.current().map(|p| p.id)
    }

    #[test]
    fn starts_idle_and_initialize_deals_one() {
        let mut d = deck(DeckPolicy::default());
        assert_eq!(d.state(), DeckState::Idle);
        d.initialize(prompts(5));
        assert_eq!(d.state(), DeckState::Active);
        assert!(d.current().is_some());
        assert_eq!(d.remaining_count(), 4);
        assert_eq!(d.history_len(), 0);
        assert!(!d.is_revealed());
        assert_eq!(d.generation(), 1);
    }

    #[test]
    fn initialize_with_nothing_eligible_leaves_table_empty() {
        let mut d = deck(DeckPolicy::default());
        d.initialize(Vec::new());
        assert_eq!(d.state(), DeckState::Active);
        assert!(d.current().is_none());
        assert_eq!(d.advance().prompt, None);
        assert_eq!(d.history_len(), 0);
    }

    #[test]
    fn advancing_past_the_end_stays_exhausted() {
        let mut d = deck(DeckPolicy::default());
        d.initialize(prompts(2));
        assert!(d.advance().prompt.is_some());
        let end = d.advance();
        assert_eq!(end.prompt, None);
        assert_eq!(end.remaining, 0);
        assert_eq!(d.state(), DeckState::Exhausted);
        assert_eq!(d.advance().prompt, None);
        assert_eq!(d.history_len(), 2);
    }

    #[test]
    fn auto_reshuffle_deals_a_fresh_generation() {
        let mut d = deck(auto());
        d.initialize(prompts(3));
        d.advance();
        d.advance();
        let fresh = d.advance();
        assert!(fresh.prompt.is_some());
        assert_eq!(fresh.remaining, 2);
        assert_eq!(d.history_len(), 0);
        assert_eq!(d.generation(), 2);
        assert_eq!(d.state(), DeckState::Active);
    }

    #[test]
    fn auto_reshuffle_with_empty_set_does_not_loop() {
        let mut d = deck(auto());
        d.initialize(Vec::new());
        assert_eq!(d.advance().prompt, None);
        assert_eq!(d.generation(), 1);
    }

    #[test]
    fn retreat_without_history_changes_nothing() {
        let mut d = deck(DeckPolicy::default());
        d.initialize(prompts(4));
        d.toggle_reveal();
        let before = d.snapshot();
        assert_eq!(d.retreat(), before);
        assert_eq!(d.history_len(), 0);
    }

    #[test]
    fn retreat_from_exhausted_brings_back_last_card() {
        let mut d = deck(DeckPolicy::default());
        d.initialize(prompts(1));
        let only = current_id(&d);
        d.advance();
        assert_eq!(d.state(), DeckState::Exhausted);
        let back = d.retreat();
        assert_eq!(back.prompt.map(|p| p.id), only);
        assert_eq!(back.remaining, 0);
        assert_eq!(d.state(), DeckState::Active);
    }

    #[test]
    fn retreated_card_is_drawn_again_next() {
        let mut d = deck(DeckPolicy::default());
        d.initialize(prompts(5));
        d.advance();
        let second = current_id(&d);
        d.retreat();
        assert!(current_id(&d).is_some());
        d.advance();
        assert_eq!(current_id(&d), second);
    }

    #[test]
    fn retreat_reveal_policy_is_honoured() {
        let mut hidden = deck(DeckPolicy::default());
        hidden.initialize(prompts(3));
        hidden.toggle_reveal();
        hidden.advance();
        hidden.toggle_reveal();
        assert!(!hidden.retreat().revealed);

        let mut shown = deck(DeckPolicy { retreat_reveal: RetreatReveal::Revealed, ..DeckPolicy::default() });
        shown.initialize(prompts(3));
        shown.advance();
        assert!(shown.retreat().revealed);
    }

    #[test]
    fn advance_hides_the_new_card() {
        let mut d = deck(DeckPolicy::default());
        d.initialize(prompts(3));
        assert!(d.toggle_reveal().revealed);
        assert!(!d.advance().revealed);
    }

    #[test]
    fn reinitialize_drops_history() {
        let mut d = deck(DeckPolicy::default());
        d.initialize(prompts(6));
        d.advance();
        d.advance();
        assert_eq!(d.history_len(), 2);
        d.initialize(prompts(3));
        assert_eq!(d.history_len(), 0);
        assert_eq!(d.remaining_count(), 2);
        assert_eq!(d.generation(), 2);
    }

    #[test]
    fn two_set_filter_walkthrough() {
        let catalog = Catalog::new(vec![
            Prompt::new(1, "a").in_category("A"),
            Prompt::new(2, "b").in_category("B"),
            Prompt::new(3, "c"),
        ])
        .unwrap();
        let mut sel = FilterSelection::new(vec![CardSet::new("A", ""), CardSet::new("B", "")]);
        sel.set("B", false);
        let mut d = deck(DeckPolicy::default());
        d.initialize(catalog.eligible(&Filter::Categories(sel)));
        let mut seen = BTreeSet::new();
        while let Some(p) = d.current() {
            seen.insert(p.id);
            d.advance();
        }
        assert_eq!(seen, BTreeSet::from([1, 3]));
    }

    proptest! {
        #[test]
        fn full_traversal_sees_each_prompt_once(n in 0u32..40, seed in any::<u64>()) {
            let mut d = DeckSession::new(RngShuffler::seeded(seed), DeckPolicy::default());
            d.initialize(prompts(n));
            let mut seen = Vec::new();
            while let Some(p) = d.current() {
                seen.push(p.id);
                d.advance();
            }
            seen.sort_unstable();
            prop_assert_eq!(seen, (1..=n).collect::<Vec<_>>());
        }

        #[test]
        fn advance_then_retreat_round_trips(n in 1u32..30, steps in 0usize..30, seed in any::<u64>()) {
            let mut d = DeckSession::new(RngShuffler::seeded(seed), DeckPolicy::default());
            d.initialize(prompts(n));
            for _ in 0..steps {
                d.advance();
            }
            let before_id = d.current().map(|p| p.id);
            let before_left = d.remaining_count();
            d.advance();
            d.retreat();
            if before_id.is_some() {
                prop_assert_eq!(d.current().map(|p| p.id), before_id);
                prop_assert_eq!(d.remaining_count(), before_left);
            }
        }

        #[test]
        fn pile_history_and_current_stay_a_permutation(
            n in 1u32..20,
            moves in proptest::collection::vec(any::<bool>(), 0..60),
            seed in any::<u64>(),
        ) {
            let mut d = DeckSession::new(RngShuffler::seeded(seed), DeckPolicy::default());
            d.initialize(prompts(n));
            for forward in moves {
                if forward { d.advance(); } else { d.retreat(); }
                let mut all: Vec<u32> = d.draw_pile.iter().chain(d.history.iter()).map(|p| p.id).collect();
                all.extend(d.current().map(|p| p.id));
                all.sort_unstable();
                prop_assert_eq!(all, (1..=n).collect::<Vec<_>>());
            }
        }
    }
}
