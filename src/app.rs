use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::SmallRng;
use tracing::info;

use crate::corpus::WordCorpus;
use crate::engine::mnemonic::{Hint, MnemonicOverrides, MnemonicResolver};
use crate::engine::scheduler::{ItemScheduler, ItemState};
use crate::session::round::{Attempt, Round};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Drill,
    Hints,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillMode {
    Letters,
    Words,
}

impl DrillMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DrillMode::Letters => "letters",
            DrillMode::Words => "words",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// Wrong attempt on the current round.
    Missed,
    /// Previous round answered on the first try.
    Correct,
    /// Previous round answered after at least one miss.
    Corrected,
}

pub struct App {
    pub screen: AppScreen,
    pub mode: DrillMode,
    pub round: Round,
    pub input: LineInput,
    pub feedback: Option<Feedback>,
    pub hints: Vec<Hint>,
    pub theme: Theme,
    pub should_quit: bool,
    scheduler: ItemScheduler<SmallRng>,
    corpus: WordCorpus,
    overrides: MnemonicOverrides,
}

impl App {
    pub fn new(
        mode: DrillMode,
        mut scheduler: ItemScheduler<SmallRng>,
        corpus: WordCorpus,
        overrides: MnemonicOverrides,
        theme: Theme,
    ) -> Self {
        let round = Round::new(scheduler.next_item());
        Self {
            screen: AppScreen::Drill,
            mode,
            round,
            input: LineInput::new(),
            feedback: None,
            hints: Vec::new(),
            theme,
            should_quit: false,
            scheduler,
            corpus,
            overrides,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            AppScreen::Drill => match self.input.handle(key) {
                InputResult::Submit => {
                    let text = self.input.take();
                    self.submit(&text);
                }
                InputResult::Cancel => self.should_quit = true,
                InputResult::Continue => {}
            },
            // Any key acknowledges the hints
            AppScreen::Hints => self.start_round(),
        }
    }

    pub fn submit(&mut self, text: &str) {
        match self.round.submit(text) {
            Some(Attempt::Missed) => self.feedback = Some(Feedback::Missed),
            Some(Attempt::Matched) => {
                let clean = self.round.misses == 0;
                self.finish_round();
                self.feedback = Some(if clean {
                    Feedback::Correct
                } else {
                    Feedback::Corrected
                });
                self.start_round();
            }
            Some(Attempt::GaveUp) => {
                self.finish_round();
                let resolver = MnemonicResolver::new(self.corpus.words(), &self.overrides);
                self.hints = resolver.hints_for(self.round.answer(), self.scheduler.cipher());
                self.feedback = None;
                self.screen = AppScreen::Hints;
            }
            None => {}
        }
    }

    fn finish_round(&mut self) {
        if let Some(verdict) = self.round.verdict() {
            let state = self.scheduler.record(&self.round.rendered, verdict);
            info!(
                item = %self.round.rendered,
                correct = verdict.is_correct(),
                gave_up = self.round.gave_up(),
                streak = state.streak,
                "round finished"
            );
        }
    }

    fn start_round(&mut self) {
        self.round = Round::new(self.scheduler.next_item());
        self.hints.clear();
        self.input = LineInput::new();
        self.screen = AppScreen::Drill;
    }

    pub fn readout(&self) -> String {
        self.scheduler.history().readout()
    }

    /// Only letters mode shows the table; word universes are too large to list.
    pub fn priority_view(&self) -> Option<Vec<(&str, ItemState)>> {
        (self.mode == DrillMode::Letters).then(|| self.scheduler.priority_view())
    }

    pub fn scheduler(&self) -> &ItemScheduler<SmallRng> {
        &self.scheduler
    }
}
