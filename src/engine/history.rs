use std::time::Duration;

pub const DEFAULT_HISTORY_WINDOW: usize = 50;

/// Session-scoped answer log. Grows without bound; every read looks only at the
/// trailing `window` entries.
#[derive(Clone, Debug)]
pub struct SessionHistory {
    verdicts: Vec<bool>,
    answer_times: Vec<Duration>,
    window: usize,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::with_window(DEFAULT_HISTORY_WINDOW)
    }
}

impl SessionHistory {
    pub fn with_window(window: usize) -> Self {
        Self {
            verdicts: Vec::new(),
            answer_times: Vec::new(),
            window: window.max(1),
        }
    }

    pub fn record_verdict(&mut self, correct: bool) {
        self.verdicts.push(correct);
    }

    pub fn record_answer_time(&mut self, elapsed: Duration) {
        self.answer_times.push(elapsed);
    }

    pub fn total_rounds(&self) -> usize {
        self.verdicts.len()
    }

    /// `(correct, total)` over the trailing window.
    pub fn recent_accuracy(&self) -> (usize, usize) {
        let recent = trailing(&self.verdicts, self.window);
        (recent.iter().filter(|&&c| c).count(), recent.len())
    }

    /// Mean seconds per answer over the trailing window of timed answers.
    pub fn recent_secs_per_answer(&self) -> Option<f64> {
        let recent = trailing(&self.answer_times, self.window);
        if recent.is_empty() {
            return None;
        }
        let total: f64 = recent.iter().map(Duration::as_secs_f64).sum();
        Some(total / recent.len() as f64)
    }

    pub fn readout(&self) -> String {
        let (correct, total) = self.recent_accuracy();
        let pace = match self.recent_secs_per_answer() {
            Some(secs) => format!("{secs:.2}"),
            None => "inf".to_string(),
        };
        format!("{correct}/{total} recent | {pace} s/answer")
    }
}

fn trailing<T>(items: &[T], window: usize) -> &[T] {
    &items[items.len().saturating_sub(window)..]
}
