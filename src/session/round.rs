use std::time::Instant;

use crate::engine::scheduler::{DrillItem, Presented, Verdict};

/// Submitting exactly this gives up on the round. Multi-word answers never
/// collide with it since they are never a lone space.
pub const GIVE_UP_SENTINEL: &str = " ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attempt {
    Matched,
    Missed,
    GaveUp,
}

/// One presentation of one item. The round stays open until the plaintext is
/// typed exactly or the learner gives up; only a first-try match is correct.
#[derive(Clone, Debug)]
pub struct Round {
    pub item: DrillItem,
    pub rendered: String,
    answer: String,
    started_at: Instant,
    pub misses: usize,
    verdict: Option<Verdict>,
    gave_up: bool,
}

impl Round {
    pub fn new(presented: Presented) -> Self {
        Self::starting_at(presented, Instant::now())
    }

    pub fn starting_at(presented: Presented, started_at: Instant) -> Self {
        let answer = presented.item.plaintext();
        Self {
            item: presented.item,
            rendered: presented.rendered,
            answer,
            started_at,
            misses: 0,
            verdict: None,
            gave_up: false,
        }
    }

    pub fn submit(&mut self, input: &str) -> Option<Attempt> {
        self.submit_at(input, Instant::now())
    }

    pub fn submit_at(&mut self, input: &str, now: Instant) -> Option<Attempt> {
        if self.is_finished() {
            return None;
        }

        if input == GIVE_UP_SENTINEL {
            self.gave_up = true;
            self.verdict = Some(Verdict::Incorrect);
            return Some(Attempt::GaveUp);
        }

        if input == self.answer {
            self.verdict = Some(if self.misses == 0 {
                Verdict::Correct(now.saturating_duration_since(self.started_at))
            } else {
                Verdict::Incorrect
            });
            Some(Attempt::Matched)
        } else {
            self.misses += 1;
            Some(Attempt::Missed)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.verdict.is_some()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn gave_up(&self) -> bool {
        self.gave_up
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}
