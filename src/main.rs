use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{error::Error, io, path::PathBuf, time::Duration};
use tracing::info;

use thinktype::{
    app::{Action, App},
    app_dirs::AppDirs,
    classifier::PersonalityModel,
    config::{ConfigOverrides, ConfigStore, FileConfigStore},
    error::ClassifierError,
    logging,
    runtime::{ChannelEventSource, EventSource, Runner, TermEvent, TICK_RATE_MS},
    sentences::{SentenceChoice, SENTENCES},
    session::{MAX_HESITATION_THRESHOLD_SECS, MIN_HESITATION_THRESHOLD_SECS},
    ui,
};

/// typing personality tui: type a sentence, get timed, get labelled
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Times you typing a sample sentence, measures speed, accuracy and hesitations, and guesses whether you are Focused, Neutral or Stressed."
)]
pub struct Cli {
    /// seconds between keystrokes that count as a hesitation (0.5 - 3.0)
    #[clap(short = 't', long, value_parser = parse_threshold)]
    threshold: Option<f64>,

    /// hide the live stats panel while typing
    #[clap(long)]
    no_live_stats: bool,

    /// name recorded with each attempt
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// sentence to start with (1-3)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u8).range(1..=3))]
    sentence: Option<u8>,

    /// directory typing_history.csv is written to (default: current directory)
    #[clap(short = 'o', long)]
    export_dir: Option<PathBuf>,

    /// print the candidate sentences and exit
    #[clap(long)]
    list_sentences: bool,

    /// write debug logs to the state directory
    #[clap(long)]
    debug: bool,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (MIN_HESITATION_THRESHOLD_SECS..=MAX_HESITATION_THRESHOLD_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(format!(
            "threshold must be between {MIN_HESITATION_THRESHOLD_SECS} and {MAX_HESITATION_THRESHOLD_SECS} seconds"
        ))
    }
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            hesitation_threshold_secs: self.threshold,
            hide_live_stats: self.no_live_stats,
            user_name: self.name.clone(),
        }
    }

    fn build_app(&self) -> Result<App, ClassifierError> {
        let store = FileConfigStore::new();
        let config = self.overrides().apply(store.load());

        let export_dir = self
            .export_dir
            .clone()
            .unwrap_or_else(AppDirs::default_export_dir);
        let sentence = SentenceChoice::new(self.sentence.map_or(0, |s| s as usize - 1));

        Ok(App::new(config, PersonalityModel::train()?, export_dir)
            .with_sentence(sentence)
            .with_config_store(Box::new(store)))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_sentences {
        for (i, sentence) in SENTENCES.iter().enumerate() {
            println!("{}. {sentence}", i + 1);
        }
        return Ok(());
    }

    if !io::stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init_tracing(cli.debug, AppDirs::log_path().as_deref())?;

    let mut app = cli.build_app()?;
    info!(
        threshold = app.tracker.hesitation_threshold(),
        sentence = app.sentence.index() + 1,
        "starting"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        ChannelEventSource::from_terminal(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = run(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(f, app, Local::now()))?;

    loop {
        let now = Local::now();
        let action = match runner.step() {
            TermEvent::Key(key) => app.translate_key(key, now),
            TermEvent::Paste(text) => app.translate_paste(&text, now),
            TermEvent::Resize | TermEvent::Tick => None,
        };

        match action {
            Some(Action::Quit) => break,
            Some(Action::Apply(event)) => app.handle(event),
            None => {}
        }

        terminal.draw(|f| ui::draw(f, app, Local::now()))?;
    }

    info!(attempts = app.tracker.history().len(), "quitting");
    Ok(())
}
