use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{cursor, execute};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cipher_drill::app::{App, AppScreen, DrillMode};
use cipher_drill::cheatsheet;
use cipher_drill::config::Config;
use cipher_drill::corpus::{self, WordCorpus};
use cipher_drill::engine::cipher_map::CipherMap;
use cipher_drill::engine::history::SessionHistory;
use cipher_drill::engine::mnemonic::{MnemonicOverrides, MnemonicResolver};
use cipher_drill::engine::scheduler::{DrillItem, ItemScheduler};
use cipher_drill::engine::translator::{self, Direction, UnmappedPolicy};
use cipher_drill::event::{AppEvent, EventHandler};
use cipher_drill::store::cipher_file;
use cipher_drill::ui::components::hint_panel::HintPanel;
use cipher_drill::ui::components::priority_table::PriorityTable;
use cipher_drill::ui::components::prompt_panel::PromptPanel;
use cipher_drill::ui::layout::DrillLayout;
use cipher_drill::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "cipher-drill",
    version,
    about = "Drill a letter-substitution cipher until it sticks"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Cipher file (one line of 26 characters)")]
    cipher_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Mnemonic override words, one per line")]
    overrides: Option<PathBuf>,

    #[arg(long, global = true, help = "Word list to use instead of the downloaded corpus")]
    corpus_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Adaptive drill (the default)
    Drill {
        #[arg(short, long, help = "Drill single letters instead of words")]
        letters: bool,
    },
    /// Print the cipher table with one mnemonic per letter
    Cheatsheet {
        #[arg(long, help = "Emit JSON instead of text")]
        json: bool,
    },
    /// Enter a new cipher and save it
    SetCipher,
    /// Encode standard input through the cipher
    Translate {
        #[arg(long, help = "Fail on characters the cipher does not cover")]
        strict: bool,
    },
    /// Decode standard input through the cipher
    Untranslate {
        #[arg(long, help = "Fail on characters the cipher does not cover")]
        strict: bool,
    },
}

struct Paths {
    cipher: PathBuf,
    overrides: PathBuf,
    corpus: Option<PathBuf>,
}

impl Paths {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            cipher: cli
                .cipher_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.cipher_file)),
            overrides: cli
                .overrides
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.overrides_file)),
            corpus: cli
                .corpus_file
                .clone()
                .or_else(|| config.corpus_file.as_ref().map(PathBuf::from)),
        }
    }
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Command::Drill { letters: false });
    init_tracing(!matches!(command, Command::Drill { .. }));

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "using default config");
            Config::default()
        }
    };
    let paths = Paths::resolve(&cli, &config);

    match command {
        Command::Drill { letters } => {
            let mode = if letters {
                DrillMode::Letters
            } else {
                DrillMode::Words
            };
            let cipher = cipher_file::load_or_prompt(&paths.cipher, io::stdin().lock(), io::stdout())?;
            run_drill(mode, cipher, &paths, &config)
        }
        Command::Cheatsheet { json } => {
            let cipher = cipher_file::load_or_prompt(&paths.cipher, io::stdin().lock(), io::stdout())?;
            print_cheatsheet(&cipher, &paths, &config, json)
        }
        Command::SetCipher => {
            let cipher =
                cipher_file::set_interactively(&paths.cipher, io::stdin().lock(), io::stdout())?;
            println!("saved {cipher} to {}", paths.cipher.display());
            Ok(())
        }
        Command::Translate { strict } => translate_stdin(&paths.cipher, Direction::Encode, strict),
        Command::Untranslate { strict } => translate_stdin(&paths.cipher, Direction::Decode, strict),
    }
}

/// Logs go to a file; the drill owns the terminal, so when no file can be
/// opened it runs without logs rather than writing over the screen.
fn init_tracing(stderr_fallback: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some((path, file)) = open_log_file() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        info!(path = %path.display(), "logging initialized");
    } else if stderr_fallback {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(env_filter)
            .init();
    }
}

fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let dir = dirs::data_dir()?.join("cipher-drill");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("cipher-drill.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    Some((path, file))
}

fn load_overrides(paths: &Paths) -> MnemonicOverrides {
    corpus::overrides::load(&paths.overrides).unwrap_or_else(|err| {
        warn!(error = %format!("{err:#}"), "ignoring mnemonic overrides");
        MnemonicOverrides::default()
    })
}

fn run_drill(mode: DrillMode, cipher: CipherMap, paths: &Paths, config: &Config) -> Result<()> {
    let corpus = match (mode, WordCorpus::acquire(paths.corpus.as_deref(), &config.corpus_url)) {
        (_, Ok(corpus)) => corpus,
        (DrillMode::Letters, Err(err)) => {
            warn!(error = %format!("{err:#}"), "no corpus; mnemonics fall back to letter pairs");
            WordCorpus::default()
        }
        (DrillMode::Words, Err(err)) => return Err(err),
    };
    let universe = match mode {
        DrillMode::Letters => DrillItem::letters(),
        DrillMode::Words => DrillItem::words(corpus.words()),
    };
    let scheduler = ItemScheduler::new(
        universe,
        cipher,
        SessionHistory::with_window(config.history_window),
        SmallRng::from_entropy(),
    )
    .context("nothing to drill")?;
    info!(mode = mode.as_str(), items = scheduler.universe_len(), "starting drill");

    let theme = Theme::load_user().unwrap_or_default();
    let mut app = App::new(mode, scheduler, corpus, load_overrides(paths), theme);

    enable_raw_mode()?;
    let result = restore_after(|| drive_terminal(&mut app), restore_terminal);

    println!("{}", app.readout());
    result
}

/// Runs `body`, then `restore` whether or not `body` failed. The body's error
/// wins when both fail.
fn restore_after<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn drive_terminal(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let events = EventHandler::new(Duration::from_millis(250));
    run_app(&mut terminal, app, &events)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Redraw => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let rows = app.priority_view();
    let table_height = rows
        .as_deref()
        .map_or(0, |rows| PriorityTable::height_for(rows, area.width));
    let layout = DrillLayout::new(area, table_height);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " cipher-drill ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} | {}", app.mode.as_str(), app.readout()),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    if let (Some(rows), Some(table_area)) = (rows.as_deref(), layout.table) {
        frame.render_widget(PriorityTable::new(rows, &app.theme), table_area);
    }

    let footer_text = match app.screen {
        AppScreen::Drill => {
            frame.render_widget(
                PromptPanel::new(&app.round.rendered, &app.input, app.feedback, &app.theme),
                layout.body,
            );
            " [Enter] Answer  [Space, Enter] Give up  [Esc] Quit "
        }
        AppScreen::Hints => {
            frame.render_widget(
                HintPanel::new(&app.round.rendered, app.round.answer(), &app.hints, &app.theme),
                layout.body,
            );
            " [any key] Next  [Ctrl+C] Quit "
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn print_cheatsheet(cipher: &CipherMap, paths: &Paths, config: &Config, json: bool) -> Result<()> {
    let corpus = WordCorpus::acquire(paths.corpus.as_deref(), &config.corpus_url)?;
    let overrides = load_overrides(paths);
    let resolver = MnemonicResolver::new(corpus.words(), &overrides);
    let entries = cheatsheet::build(cipher, &resolver);

    let mut stdout = io::stdout().lock();
    if json {
        writeln!(stdout, "{}", cheatsheet::render_json(&entries)?)?;
    } else {
        write!(stdout, "{}", cheatsheet::render_text(&entries))?;
    }
    Ok(())
}

/// Standard input carries the text, so a missing cipher is asked for on the
/// controlling terminal instead.
fn translate_stdin(cipher_path: &Path, direction: Direction, strict: bool) -> Result<()> {
    let cipher = cipher_file::load_or_prompt_via(cipher_path, || {
        let tty = OpenOptions::new().read(true).write(true).open("/dev/tty")?;
        Ok((io::BufReader::new(tty.try_clone()?), tty))
    })?;
    let policy = if strict {
        UnmappedPolicy::Strict
    } else {
        UnmappedPolicy::Tolerant
    };
    translator::translate_lines(io::stdin().lock(), io::stdout().lock(), &cipher, direction, policy)
}
