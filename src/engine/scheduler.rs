use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use rand::rngs::SmallRng;
use thiserror::Error;
use tracing::debug;

use crate::engine::cipher_map::{CipherMap, PLAIN_ALPHABET, is_plain_letter};
use crate::engine::history::SessionHistory;
use crate::engine::translator::{self, Direction, UnmappedPolicy};

/// A quizzable unit. The scheduler never looks inside; it only needs the
/// plaintext answer and the rendered prompt.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DrillItem {
    Letter(char),
    Word(String),
}

impl DrillItem {
    pub fn plaintext(&self) -> String {
        match self {
            DrillItem::Letter(ch) => ch.to_string(),
            DrillItem::Word(word) => word.clone(),
        }
    }

    pub fn render(&self, cipher: &CipherMap) -> String {
        let plain = self.plaintext();
        // Tolerant never fails
        translator::translate(&plain, cipher, Direction::Encode, UnmappedPolicy::Tolerant)
            .unwrap_or(plain)
    }

    pub fn letters() -> Vec<DrillItem> {
        PLAIN_ALPHABET.chars().map(DrillItem::Letter).collect()
    }

    /// Word universe from a corpus, keeping only words the cipher fully covers.
    /// Duplicates are kept: they raise the word's draw weight.
    pub fn words(corpus: &[String]) -> Vec<DrillItem> {
        corpus
            .iter()
            .filter(|w| !w.is_empty() && w.chars().all(is_plain_letter))
            .map(|w| DrillItem::Word(w.clone()))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// First attempt matched; carries the time from round start to the answer.
    Correct(Duration),
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemState {
    pub streak: u32,
    pub cooldown: u64,
}

impl ItemState {
    pub fn apply(&mut self, verdict: Verdict) {
        self.streak = match verdict {
            Verdict::Correct(_) => self.streak.saturating_add(1),
            Verdict::Incorrect => self.streak.saturating_sub(1),
        };
        self.cooldown = cooldown_for(self.streak);
    }
}

/// `2^streak - 1`, saturating.
pub fn cooldown_for(streak: u32) -> u64 {
    1u64.checked_shl(streak).map_or(u64::MAX, |v| v - 1)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("cannot drill an empty item universe")]
    EmptyUniverse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presented {
    pub item: DrillItem,
    pub rendered: String,
}

pub struct ItemScheduler<R: Rng = SmallRng> {
    universe: Vec<DrillItem>,
    cipher: CipherMap,
    /// Keyed by rendered form, so two items rendering identically share a state.
    states: HashMap<String, ItemState>,
    first_seen: Vec<String>,
    history: SessionHistory,
    rng: R,
}

impl<R: Rng> ItemScheduler<R> {
    pub fn new(
        universe: Vec<DrillItem>,
        cipher: CipherMap,
        history: SessionHistory,
        rng: R,
    ) -> Result<Self, SchedulerError> {
        if universe.is_empty() {
            return Err(SchedulerError::EmptyUniverse);
        }
        Ok(Self {
            universe,
            cipher,
            states: HashMap::new(),
            first_seen: Vec::new(),
            history,
            rng,
        })
    }

    /// Draw until an item off cooldown comes up. Every draw of an item on
    /// cooldown burns one unit of it, so the loop always terminates.
    pub fn next_item(&mut self) -> Presented {
        let mut skipped = 0usize;
        loop {
            let idx = self.rng.gen_range(0..self.universe.len());
            let item = &self.universe[idx];
            let rendered = item.render(&self.cipher);

            if let Some(state) = self.states.get_mut(&rendered)
                && state.cooldown > 0
            {
                state.cooldown -= 1;
                skipped += 1;
                continue;
            }

            let item = item.clone();
            self.touch(&rendered);
            debug!(%rendered, skipped, "presenting item");
            return Presented { item, rendered };
        }
    }

    pub fn record(&mut self, rendered: &str, verdict: Verdict) -> ItemState {
        let state = self.touch(rendered);
        state.apply(verdict);
        let updated = *state;

        self.history.record_verdict(verdict.is_correct());
        if let Verdict::Correct(elapsed) = verdict {
            self.history.record_answer_time(elapsed);
        }
        debug!(
            %rendered,
            streak = updated.streak,
            cooldown = updated.cooldown,
            correct = verdict.is_correct(),
            "recorded round"
        );
        updated
    }

    pub fn state(&self, rendered: &str) -> Option<ItemState> {
        self.states.get(rendered).copied()
    }

    /// Every item presented so far, weakest first: `(streak, cooldown)` ascending,
    /// ties in first-presented order.
    pub fn priority_view(&self) -> Vec<(&str, ItemState)> {
        let mut view: Vec<(&str, ItemState)> = self
            .first_seen
            .iter()
            .map(|key| (key.as_str(), self.states[key]))
            .collect();
        view.sort_by_key(|(_, s)| (s.streak, s.cooldown));
        view
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn cipher(&self) -> &CipherMap {
        &self.cipher
    }

    pub fn universe_len(&self) -> usize {
        self.universe.len()
    }

    fn touch(&mut self, rendered: &str) -> &mut ItemState {
        if !self.states.contains_key(rendered) {
            self.first_seen.push(rendered.to_string());
        }
        self.states.entry(rendered.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    const OK: Verdict = Verdict::Correct(Duration::from_millis(800));

    fn cipher() -> CipherMap {
        CipherMap::new("bcdefghijklmnopqrstuvwxyza").unwrap()
    }

    fn scheduler(universe: Vec<DrillItem>, seed: u64) -> ItemScheduler<SmallRng> {
        ItemScheduler::new(
            universe,
            cipher(),
            SessionHistory::default(),
            SmallRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_cooldown_formula() {
        assert_eq!(cooldown_for(0), 0);
        assert_eq!(cooldown_for(1), 1);
        assert_eq!(cooldown_for(2), 3);
        assert_eq!(cooldown_for(3), 7);
        assert_eq!(cooldown_for(10), 1023);
        assert_eq!(cooldown_for(64), u64::MAX);
    }

    #[test]
    fn test_three_correct_rounds_from_zero() {
        let mut s = scheduler(DrillItem::letters(), 1);
        let mut streaks = Vec::new();
        let mut cooldowns = Vec::new();
        for _ in 0..3 {
            let st = s.record("b", OK);
            streaks.push(st.streak);
            cooldowns.push(st.cooldown);
        }
        assert_eq!(streaks, vec![1, 2, 3]);
        assert_eq!(cooldowns, vec![1, 3, 7]);
    }

    #[test]
    fn test_miss_at_streak_three() {
        let mut s = scheduler(DrillItem::letters(), 1);
        for _ in 0..3 {
            s.record("b", OK);
        }
        let st = s.record("b", Verdict::Incorrect);
        assert_eq!(st, ItemState { streak: 2, cooldown: 3 });
    }

    #[test]
    fn test_streak_floors_at_zero() {
        let mut s = scheduler(DrillItem::letters(), 1);
        let st = s.record("b", Verdict::Incorrect);
        assert_eq!(st, ItemState { streak: 0, cooldown: 0 });
    }

    #[test]
    fn test_cooldown_invariant_over_random_outcomes() {
        let mut s = scheduler(DrillItem::letters(), 7);
        let mut outcomes = SmallRng::seed_from_u64(99);
        let mut correct_counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..500 {
            let presented = s.next_item();
            let verdict = if outcomes.gen_bool(0.7) { OK } else { Verdict::Incorrect };
            if verdict.is_correct() {
                *correct_counts.entry(presented.rendered.clone()).or_default() += 1;
            }
            let st = s.record(&presented.rendered, verdict);
            assert_eq!(st.cooldown, cooldown_for(st.streak));
            assert!(st.streak <= correct_counts.get(&presented.rendered).copied().unwrap_or(0));
        }
        assert_eq!(s.history().total_rounds(), 500);
    }

    #[test]
    fn test_cooldown_draws_are_skipped_and_decremented() {
        let mut s = scheduler(vec![DrillItem::Word("cab".into())], 3);
        let first = s.next_item();
        assert_eq!(first.rendered, "dbc");
        s.record("dbc", OK);
        s.record("dbc", OK);
        assert_eq!(s.state("dbc").unwrap().cooldown, 3);

        // Only one item: three draws burn the cooldown, the fourth presents it.
        let again = s.next_item();
        assert_eq!(again.item, DrillItem::Word("cab".into()));
        assert_eq!(s.state("dbc").unwrap().cooldown, 0);
        assert_eq!(s.state("dbc").unwrap().streak, 2);
    }

    #[test]
    fn test_duplicates_raise_draw_weight() {
        let universe = vec![
            DrillItem::Letter('a'),
            DrillItem::Letter('a'),
            DrillItem::Letter('a'),
            DrillItem::Letter('b'),
        ];
        let mut s = scheduler(universe, 11);
        let mut a_count = 0;
        for _ in 0..2000 {
            if s.next_item().item == DrillItem::Letter('a') {
                a_count += 1;
            }
        }
        assert!(a_count > 1200, "expected ~1500 draws of 'a', got {a_count}");
    }

    #[test]
    fn test_state_is_created_on_presentation() {
        let mut s = scheduler(DrillItem::letters(), 5);
        assert!(s.priority_view().is_empty());
        let presented = s.next_item();
        assert_eq!(s.state(&presented.rendered), Some(ItemState::default()));
        assert_eq!(s.priority_view().len(), 1);
    }

    #[test]
    fn test_priority_view_orders_weakest_first() {
        let mut s = scheduler(DrillItem::letters(), 5);
        s.record("b", OK);
        s.record("b", OK);
        s.record("c", OK);
        s.record("d", Verdict::Incorrect);
        s.record("e", Verdict::Incorrect);

        let order: Vec<&str> = s.priority_view().iter().map(|(k, _)| *k).collect();
        assert_eq!(order, vec!["d", "e", "c", "b"]);
    }

    #[test]
    fn test_elapsed_only_recorded_for_correct() {
        let mut s = scheduler(DrillItem::letters(), 5);
        s.record("b", Verdict::Incorrect);
        assert_eq!(s.history().recent_secs_per_answer(), None);
        s.record("b", Verdict::Correct(Duration::from_secs(2)));
        assert_eq!(s.history().recent_secs_per_answer(), Some(2.0));
        assert_eq!(s.history().recent_accuracy(), (1, 2));
    }

    #[test]
    fn test_empty_universe_is_rejected() {
        let result = ItemScheduler::new(
            Vec::new(),
            cipher(),
            SessionHistory::default(),
            SmallRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SchedulerError::EmptyUniverse)));
    }

    #[test]
    fn test_word_universe_filters_uncovered_words() {
        let corpus: Vec<String> = ["the", "", "Bob", "it's", "the", "x1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let items = DrillItem::words(&corpus);
        assert_eq!(
            items,
            vec![DrillItem::Word("the".into()), DrillItem::Word("the".into())]
        );
    }
}
