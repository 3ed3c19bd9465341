use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::classifier::{Classifier, Features};
use crate::error::{HistoryError, SessionError};
use crate::history::{self, SessionRecord};
use crate::metrics::{self, SessionMetrics};

pub const DEFAULT_HESITATION_THRESHOLD_SECS: f64 = 1.5;
pub const MIN_HESITATION_THRESHOLD_SECS: f64 = 0.5;
pub const MAX_HESITATION_THRESHOLD_SECS: f64 = 3.0;

/// Keep a threshold inside the supported range
pub fn clamp_threshold(secs: f64) -> f64 {
    if secs.is_nan() {
        return DEFAULT_HESITATION_THRESHOLD_SECS;
    }
    secs.clamp(MIN_HESITATION_THRESHOLD_SECS, MAX_HESITATION_THRESHOLD_SECS)
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub test_started: bool,
    pub start_time: Option<DateTime<Local>>,
    pub last_event_time: Option<DateTime<Local>>,
    pub hesitation_count: u32,
    pub current_text: String,
    pub history: Vec<SessionRecord>,
}

impl SessionState {
    /// Forget the current attempt, keep the history
    fn clear_attempt(&mut self) {
        self.start_time = None;
        self.last_event_time = None;
        self.hesitation_count = 0;
        self.current_text.clear();
    }
}

/// Snapshot shown while typing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStats {
    pub char_count: usize,
    pub elapsed_secs: f64,
    pub hesitations: u32,
}

fn secs_between(from: DateTime<Local>, to: DateTime<Local>) -> f64 {
    (to - from)
        .num_microseconds()
        .map(|us| us as f64 / 1_000_000.0)
        .unwrap_or_else(|| (to - from).num_milliseconds() as f64 / 1000.0)
}

/// Per-session tracker: timing, hesitations, scoring and history
#[derive(Debug, Clone)]
pub struct SessionTracker {
    state: SessionState,
    hesitation_threshold_secs: f64,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HESITATION_THRESHOLD_SECS)
    }
}

impl SessionTracker {
    pub fn new(hesitation_threshold_secs: f64) -> Self {
        Self {
            state: SessionState::default(),
            hesitation_threshold_secs: clamp_threshold(hesitation_threshold_secs),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        self.state.test_started
    }

    pub fn current_text(&self) -> &str {
        &self.state.current_text
    }

    pub fn history(&self) -> &[SessionRecord] {
        &self.state.history
    }

    pub fn hesitation_threshold(&self) -> f64 {
        self.hesitation_threshold_secs
    }

    pub fn set_hesitation_threshold(&mut self, secs: f64) {
        self.hesitation_threshold_secs = clamp_threshold(secs);
    }

    /// Begin a fresh attempt. Starting while an attempt runs restarts it.
    pub fn start_attempt(&mut self) {
        self.state.clear_attempt();
        self.state.test_started = true;
        debug!("attempt started");
    }

    /// Drop the running attempt without recording anything
    pub fn abandon_attempt(&mut self) {
        self.state.clear_attempt();
        self.state.test_started = false;
        debug!("attempt abandoned");
    }

    /// Record that the input now reads `new_text` as of `now`
    pub fn observe_input(&mut self, new_text: &str, now: DateTime<Local>) {
        if !self.state.test_started {
            return;
        }

        if !new_text.is_empty() && self.state.start_time.is_none() {
            self.state.start_time = Some(now);
        }

        if let Some(last) = self.state.last_event_time {
            let gap = secs_between(last, now);
            if gap > self.hesitation_threshold_secs {
                self.state.hesitation_count += 1;
                debug!(
                    gap,
                    count = self.state.hesitation_count,
                    "hesitation counted"
                );
            }
        }

        self.state.last_event_time = Some(now);
        new_text.clone_into(&mut self.state.current_text);
    }

    pub fn live_stats(&self, now: DateTime<Local>) -> LiveStats {
        LiveStats {
            char_count: metrics::char_count(&self.state.current_text),
            elapsed_secs: self
                .state
                .start_time
                .map_or(0.0, |start| secs_between(start, now)),
            hesitations: self.state.hesitation_count,
        }
    }

    /// Share of `target` typed so far
    pub fn progress(&self, target: &str) -> f64 {
        metrics::progress(&self.state.current_text, target)
    }

    /// Score the attempt, append it to the history and go idle.
    ///
    /// Fails with [`SessionError::EmptyInput`] when nothing was typed; the
    /// attempt is then left running untouched.
    pub fn submit<C: Classifier + ?Sized>(
        &mut self,
        now: DateTime<Local>,
        target_sentence: &str,
        user_name: Option<&str>,
        classifier: &C,
    ) -> Result<SessionRecord, SessionError> {
        let start = match self.state.start_time {
            Some(start) if !self.state.current_text.is_empty() => start,
            _ => return Err(SessionError::EmptyInput),
        };

        let scored = SessionMetrics::compute(
            &self.state.current_text,
            target_sentence,
            secs_between(start, now),
        );
        let hesitations = self.state.hesitation_count;
        let personality = classifier.predict(&Features {
            average_delay_secs: scored.average_delay_secs,
            total_time_secs: scored.total_time_secs,
            hesitations,
        });

        let record = SessionRecord {
            timestamp: now,
            user_name: user_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            average_delay_secs: scored.average_delay_secs,
            total_time_secs: scored.total_time_secs,
            hesitations,
            words_per_minute: scored.words_per_minute,
            chars_per_minute: scored.chars_per_minute,
            accuracy_percent: scored.accuracy_percent,
            personality,
        };

        self.state.history.push(record.clone());
        self.state.clear_attempt();
        self.state.test_started = false;

        info!(
            wpm = record.words_per_minute,
            accuracy = record.accuracy_percent,
            hesitations,
            personality = %record.personality,
            "attempt submitted"
        );

        Ok(record)
    }

    pub fn export_history_csv(&self) -> Result<String, HistoryError> {
        history::export_csv(&self.state.history)
    }

    pub fn reset_history(&mut self) {
        self.state.history.clear();
        info!("history cleared");
    }
}
