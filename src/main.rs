pub mod ui;

use anaquiz::art::{ArtResolver, EmbeddedArtStore};
use anaquiz::config::{Config, ConfigStore, FileConfigStore};
use anaquiz::dataset::{Dataset, Region};
use anaquiz::runtime::{CrosstermEventSource, QuizEvent, Runner};
use anaquiz::session::{Mode, Session, SessionSettings};
use anaquiz::TICK_RATE_MS;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crate::ui::OPTION_KEYS;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

/// interactive anatomy quiz in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "An interactive anatomy quiz: identify the highlighted muscle in each pose, keep your streak alive, and review your misses at the end."
)]
pub struct Cli {
    /// maximum number of questions per practice session
    #[clap(short = 'q', long)]
    questions: Option<u32>,

    /// milliseconds a correct answer stays on screen before auto-advancing
    #[clap(long)]
    delay_ms: Option<u64>,

    /// body region to start practicing
    #[clap(short = 'r', long, value_enum)]
    region: Option<RegionArg>,

    /// fixed rng seed for a reproducible question order
    #[clap(long)]
    seed: Option<u64>,

    /// ignore the config file and use built-in defaults
    #[clap(long)]
    no_config: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum RegionArg {
    UpperBody,
    Trunk,
    LowerBody,
}

impl RegionArg {
    fn as_region(&self) -> Region {
        match self {
            RegionArg::UpperBody => Region::UpperBody,
            RegionArg::Trunk => Region::Trunk,
            RegionArg::LowerBody => Region::LowerBody,
        }
    }
}

/// Modal overlays layered on top of the question screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    None,
    ConfirmFinish,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub resolver: ArtResolver,
    pub prompt: Prompt,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self, Box<dyn Error>> {
        let dataset = Dataset::load()?;
        let config = if cli.no_config {
            Config::default()
        } else {
            FileConfigStore::new().load()
        };

        let settings = SessionSettings {
            question_cap: cli.questions.unwrap_or(config.question_cap),
            advance_delay_ms: cli.delay_ms.unwrap_or(config.advance_delay_ms),
        };
        let region = cli.region.map(|r| r.as_region()).unwrap_or(config.region);

        let session = match cli.seed {
            Some(seed) => Session::with_seed(dataset, settings, region, seed),
            None => Session::new(dataset, settings, region),
        };

        let mut app = Self {
            session,
            resolver: ArtResolver::new(),
            prompt: Prompt::None,
        };
        app.refresh_art();
        Ok(app)
    }

    pub fn restart(&mut self) {
        self.session.start();
        self.prompt = Prompt::None;
        self.refresh_art();
    }

    /// Re-points the art resolver at the current pose and drives its fallback
    /// chain. A no-op when the pose hasn't changed.
    pub fn refresh_art(&mut self) {
        if let Some(id) = self.session.state.current_pose_id.clone() {
            self.resolver.set_pose(&id);
            self.resolver.resolve_with(&EmbeddedArtStore);
        }
    }

    /// Advances the session clock and keeps the art resolver current.
    /// Returns true when the screen needs redrawing: always during practice
    /// (the timer readout is live), and on any tick that changed the mode,
    /// such as an auto-advance that ended the session.
    pub fn on_tick(&mut self, elapsed_ms: u64) -> bool {
        let mode_before = self.session.state.mode;
        self.session.on_tick(elapsed_ms);
        self.refresh_art();

        self.session.state.mode == Mode::Practice || self.session.state.mode != mode_before
    }

    /// Applies one key press. Returns false when the app should exit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        if self.prompt == Prompt::ConfirmFinish {
            match key.code {
                KeyCode::Char('y') => {
                    self.prompt = Prompt::None;
                    self.session.finish_early();
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.prompt = Prompt::None;
                }
                _ => {}
            }
            return true;
        }

        if key.code == KeyCode::Esc {
            return false;
        }

        match self.session.state.mode {
            Mode::Practice | Mode::Review => self.on_question_key(key),
            Mode::Summary => self.on_summary_key(key),
        }

        self.refresh_art();
        true
    }

    fn on_question_key(&mut self, key: KeyEvent) {
        let mode = self.session.state.mode;

        match key.code {
            KeyCode::Enter => self.explicit_advance(),
            KeyCode::Char('n') => self.explicit_advance(),
            KeyCode::Char('f') => {
                if mode == Mode::Practice {
                    self.prompt = Prompt::ConfirmFinish;
                }
            }
            KeyCode::Char('u') => self.session.change_region(Region::UpperBody),
            KeyCode::Char('t') => self.session.change_region(Region::Trunk),
            KeyCode::Char('l') => self.session.change_region(Region::LowerBody),
            KeyCode::Char(c) => {
                if let Some(idx) = OPTION_KEYS.iter().position(|&k| k == c) {
                    let option_id = self
                        .session
                        .state
                        .shuffled_options
                        .get(idx)
                        .map(|o| o.id.clone());
                    if let Some(id) = option_id {
                        self.session.submit(&id);
                    }
                }
            }
            _ => {}
        }
    }

    /// The "next" action. In practice it only applies to an answered question
    /// (the unanswered path would skip scoring); in review advancing is always
    /// the learner's call.
    fn explicit_advance(&mut self) {
        match self.session.state.mode {
            Mode::Practice if self.session.state.is_answered => self.session.advance(),
            Mode::Review => self.session.advance(),
            _ => {}
        }
    }

    fn on_summary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('m') => self.session.start_review(),
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(cli)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            QuizEvent::Tick { elapsed_ms } => {
                if app.on_tick(elapsed_ms) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            QuizEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            QuizEvent::Key(key) => {
                if !app.on_key(key) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
