//! Event handling for one interactive session.
//!
//! Every user interaction becomes an [`AppEvent`] and is applied to the
//! [`App`] in a single synchronous pass. Terminal keys are translated into
//! events by [`App::translate_key`], so the whole flow can be driven without
//! a terminal.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::classifier::PersonalityModel;
use crate::config::{Config, ConfigStore};
use crate::error::SessionError;
use crate::history::{self, SessionRecord};
use crate::sentences::SentenceChoice;
use crate::session::{LiveStats, SessionTracker};

/// Step used by the threshold keys
pub const THRESHOLD_STEP_SECS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// choosing a sentence, nothing running
    Setup,
    Typing,
    /// idle again, last result on screen
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Start,
    TextChanged { text: String, at: DateTime<Local> },
    Submit { at: DateTime<Local> },
    Abandon,
    ResetHistory,
    SelectSentence(usize),
    NextSentence,
    PreviousSentence,
    PickRandomSentence,
    ToggleLiveStats,
    AdjustThreshold(f64),
    /// open the name field, pre-filled with the current name
    EditName,
    NameDraftChanged(String),
    /// commit the name field; blank clears the name
    SetUserName(Option<String>),
    CancelNameEdit,
    ExportHistory,
}

/// What a key press asks the main loop to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Apply(AppEvent),
    Quit,
}

/// Message shown under the main view until the next event
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

pub struct App {
    pub tracker: SessionTracker,
    pub sentence: SentenceChoice,
    pub config: Config,
    pub phase: Phase,
    pub last_record: Option<SessionRecord>,
    pub notice: Option<Notice>,
    pub export_dir: PathBuf,
    /// name being typed in Setup/Results, `None` when not editing
    pub name_draft: Option<String>,
    model: PersonalityModel,
    config_store: Option<Box<dyn ConfigStore>>,
}

impl App {
    /// `model` is trained once by the caller and owned here for the whole
    /// session.
    pub fn new(config: Config, model: PersonalityModel, export_dir: PathBuf) -> Self {
        Self {
            tracker: SessionTracker::new(config.hesitation_threshold_secs),
            sentence: SentenceChoice::default(),
            config,
            phase: Phase::Setup,
            last_record: None,
            notice: None,
            export_dir,
            name_draft: None,
            model,
            config_store: None,
        }
    }

    /// Persist settings changes through `store`. `config` may carry per-run
    /// overrides; only the field an event changes is written back.
    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn with_sentence(mut self, sentence: SentenceChoice) -> Self {
        self.sentence = sentence;
        self
    }

    pub fn target(&self) -> &'static str {
        self.sentence.text()
    }

    pub fn live_stats(&self, now: DateTime<Local>) -> LiveStats {
        self.tracker.live_stats(now)
    }

    pub fn progress(&self) -> f64 {
        self.tracker.progress(self.target())
    }

    /// Apply one event
    pub fn handle(&mut self, event: AppEvent) {
        self.notice = None;

        match event {
            AppEvent::Start => {
                self.tracker.start_attempt();
                self.phase = Phase::Typing;
            }
            AppEvent::TextChanged { text, at } => {
                if self.phase == Phase::Typing {
                    self.tracker.observe_input(&text, at);
                }
            }
            AppEvent::Submit { at } => {
                if self.phase == Phase::Typing {
                    self.submit(at);
                }
            }
            AppEvent::Abandon => {
                if self.phase == Phase::Typing {
                    self.tracker.abandon_attempt();
                    self.phase = if self.last_record.is_some() {
                        Phase::Results
                    } else {
                        Phase::Setup
                    };
                }
            }
            AppEvent::ResetHistory => {
                self.tracker.reset_history();
                self.notice = Some(Notice::Info("History cleared.".into()));
            }
            AppEvent::SelectSentence(idx) => self.change_sentence(SentenceChoice::new(idx)),
            AppEvent::NextSentence => self.change_sentence(self.sentence.next()),
            AppEvent::PreviousSentence => self.change_sentence(self.sentence.previous()),
            AppEvent::PickRandomSentence => {
                self.change_sentence(SentenceChoice::random(&mut rand::thread_rng()))
            }
            AppEvent::ToggleLiveStats => {
                let show = !self.config.show_live_stats;
                self.config.show_live_stats = show;
                self.save_config(|stored| stored.show_live_stats = show);
            }
            AppEvent::AdjustThreshold(delta) => {
                let stepped =
                    ((self.tracker.hesitation_threshold() + delta) * 10.0).round() / 10.0;
                self.tracker.set_hesitation_threshold(stepped);
                let threshold = self.tracker.hesitation_threshold();
                self.config.hesitation_threshold_secs = threshold;
                self.save_config(|stored| stored.hesitation_threshold_secs = threshold);
            }
            AppEvent::EditName => {
                if self.phase != Phase::Typing {
                    self.name_draft = Some(self.config.user_name.clone().unwrap_or_default());
                }
            }
            AppEvent::NameDraftChanged(draft) => {
                if self.name_draft.is_some() {
                    self.name_draft = Some(draft);
                }
            }
            AppEvent::SetUserName(name) => {
                self.name_draft = None;
                let name = name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty());
                self.config.user_name = name.clone();
                self.save_config(|stored| stored.user_name = name);
            }
            AppEvent::CancelNameEdit => self.name_draft = None,
            AppEvent::ExportHistory => self.export(),
        }
    }

    fn submit(&mut self, at: DateTime<Local>) {
        let target = self.sentence.text();
        match self
            .tracker
            .submit(at, target, self.config.user_name.as_deref(), &self.model)
        {
            Ok(record) => {
                self.notice = Some(Notice::Info("Typing test complete!".into()));
                self.last_record = Some(record);
                self.phase = Phase::Results;
            }
            Err(e @ SessionError::EmptyInput) => {
                debug!("empty submission rejected");
                self.notice = Some(Notice::Warning(capitalize(&e.to_string())));
            }
        }
    }

    fn change_sentence(&mut self, choice: SentenceChoice) {
        if self.phase == Phase::Typing {
            return;
        }
        self.sentence = choice;
    }

    fn export(&mut self) {
        self.notice = Some(
            match history::write_csv_file(self.tracker.history(), &self.export_dir) {
                Ok(path) => Notice::Info(format!("Saved {}", path.display())),
                Err(e) => {
                    warn!(error = %e, "history export failed");
                    Notice::Error(format!("Export failed: {e}"))
                }
            },
        );
    }

    /// Apply `change` to the stored settings and write them back
    fn save_config<F: FnOnce(&mut Config)>(&self, change: F) {
        if let Some(store) = &self.config_store {
            let mut stored = store.load();
            change(&mut stored);
            if let Err(e) = store.save(&stored.normalized()) {
                warn!(error = %e, "could not save config");
            }
        }
    }

    /// Map a key press to what it means in the current phase
    pub fn translate_key(&self, key: KeyEvent, now: DateTime<Local>) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        if let Some(draft) = &self.name_draft {
            return Self::translate_name_key(key, draft);
        }

        match self.phase {
            Phase::Typing => self.translate_typing_key(key, now),
            Phase::Setup | Phase::Results => {
                let event = match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Some(Action::Quit),
                    KeyCode::Enter | KeyCode::Char(' ') => AppEvent::Start,
                    KeyCode::Right | KeyCode::Down => AppEvent::NextSentence,
                    KeyCode::Left | KeyCode::Up => AppEvent::PreviousSentence,
                    KeyCode::Char(c @ '1'..='3') => {
                        AppEvent::SelectSentence(c as usize - '1' as usize)
                    }
                    KeyCode::Char('r') => AppEvent::PickRandomSentence,
                    KeyCode::Char('l') => AppEvent::ToggleLiveStats,
                    KeyCode::Char('n') => AppEvent::EditName,
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        AppEvent::AdjustThreshold(THRESHOLD_STEP_SECS)
                    }
                    KeyCode::Char('-') => AppEvent::AdjustThreshold(-THRESHOLD_STEP_SECS),
                    KeyCode::Char('x') => AppEvent::ResetHistory,
                    KeyCode::Char('d') => AppEvent::ExportHistory,
                    _ => return None,
                };
                Some(Action::Apply(event))
            }
        }
    }

    fn translate_name_key(key: KeyEvent, draft: &str) -> Option<Action> {
        let event = match key.code {
            KeyCode::Esc => AppEvent::CancelNameEdit,
            KeyCode::Enter => AppEvent::SetUserName(Some(draft.to_string())),
            KeyCode::Backspace => {
                let mut text = draft.to_string();
                text.pop()?;
                AppEvent::NameDraftChanged(text)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = draft.to_string();
                text.push(c);
                AppEvent::NameDraftChanged(text)
            }
            _ => return None,
        };
        Some(Action::Apply(event))
    }

    fn translate_typing_key(&self, key: KeyEvent, now: DateTime<Local>) -> Option<Action> {
        let current = self.tracker.current_text();
        let event = match key.code {
            KeyCode::Esc => AppEvent::Abandon,
            KeyCode::Enter => AppEvent::Submit { at: now },
            KeyCode::Backspace => {
                if current.is_empty() {
                    return None;
                }
                let mut text = current.to_string();
                text.pop();
                AppEvent::TextChanged { text, at: now }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                AppEvent::TextChanged {
                    text: String::new(),
                    at: now,
                }
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return None;
                }
                let mut text = current.to_string();
                text.push(c);
                AppEvent::TextChanged { text, at: now }
            }
            _ => return None,
        };
        Some(Action::Apply(event))
    }

    /// Pasted text is appended to the input (or the name field) as one change
    pub fn translate_paste(&self, pasted: &str, now: DateTime<Local>) -> Option<Action> {
        let pasted: String = pasted.chars().filter(|c| !c.is_control()).collect();
        if pasted.is_empty() {
            return None;
        }
        if let Some(draft) = &self.name_draft {
            return Some(Action::Apply(AppEvent::NameDraftChanged(format!("{draft}{pasted}"))));
        }
        if self.phase != Phase::Typing {
            return None;
        }
        let mut text = self.tracker.current_text().to_string();
        text.push_str(&pasted);
        Some(Action::Apply(AppEvent::TextChanged { text, at: now }))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
