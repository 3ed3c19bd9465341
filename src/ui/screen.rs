use chrono::{DateTime, Local};
use ratatui::{layout::Rect, Frame};

use crate::app::{App, Phase};

/// A UI screen boundary: renders one phase of the app into `area`
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect, now: DateTime<Local>);
}

/// Sentence choice, settings and history
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect, now: DateTime<Local>) {
        super::render_setup(app, f, area, now);
    }
}

/// Prompt, input, progress and live stats
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect, now: DateTime<Local>) {
        super::render_typing(app, f, area, now);
    }
}

/// Personality, metrics, trend chart and history
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect, now: DateTime<Local>) {
        super::render_results(app, f, area, now);
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Setup => Box::new(SetupScreen),
        Phase::Typing => Box::new(TypingScreen),
        Phase::Results => Box::new(ResultsScreen),
    }
}
