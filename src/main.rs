mod config;
mod error;
mod services;
mod ui;

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::JsonFileStore;
use crate::error::PrefsError;
use crate::services::theme_controller::ThemeController;
use crate::ui::app::App;
use crate::ui::modal::TerminalDialogRunner;
use crate::ui::theme_loader::BuiltinStyler;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shown in the preferences dialog title
const DIALOG_ICON: &str = "◐";

fn print_help() {
    println!("themeprefs {} - Theme and accent color preferences", VERSION);
    println!();
    println!("USAGE:");
    println!("    themeprefs [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print help information");
    println!("    -v, --version           Print version information");
    println!("    --show                  Print the stored theme and accent, then exit");
    println!("    --reset                 Restore the default theme and accent, then exit");
    println!("    --settings <FILE>       Use FILE instead of ~/.themeprefs/settings.json");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}         Config directory (default: ~/.themeprefs)", config::HOME_ENV);
    println!("    RUST_LOG                Log filter for themeprefs.log (default: info)");
}

fn print_version() {
    println!("themeprefs {}", VERSION);
}

#[derive(Debug, Default)]
struct Options {
    show: bool,
    reset: bool,
    settings: Option<PathBuf>,
}

/// Logs go to <config dir>/themeprefs.log; the terminal belongs to the TUI
fn init_logging() {
    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if config::ensure_dir(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn open_store(options: &Options) -> Result<JsonFileStore, PrefsError> {
    match options.settings {
        Some(ref path) => Ok(JsonFileStore::open(path)),
        None => JsonFileStore::open_default(),
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-v" | "--version" => {
                print_version();
                return Ok(());
            }
            "--show" => options.show = true,
            "--reset" => options.reset = true,
            "--settings" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --settings requires a file argument");
                    eprintln!("Usage: themeprefs --settings <FILE>");
                    return Ok(());
                }
                i += 1;
                options.settings = Some(PathBuf::from(&args[i]));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                return Ok(());
            }
        }
        i += 1;
    }

    init_logging();

    if let Err(err) = run(&options) {
        tracing::error!("{}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run(options: &Options) -> Result<(), PrefsError> {
    let store = open_store(options)?;
    let settings_path = store.path().to_path_buf();

    if options.reset {
        let controller = ThemeController::reset(store, Box::new(BuiltinStyler), None)?;
        println!("theme={}", controller.current_theme());
        println!("accent={}", controller.current_accent());
        return Ok(());
    }

    let mut controller = ThemeController::new(store, Box::new(BuiltinStyler), Some(DIALOG_ICON.to_string()))?;

    if options.show {
        println!("theme={}", controller.current_theme());
        println!("accent={}", controller.current_accent());
        return Ok(());
    }

    let mut app = App::new(Some(settings_path));
    controller.apply_theme(&mut app)?;

    enable_raw_mode()?;
    // 설정 중 실패해도 터미널은 항상 복구
    let result = run_tui(&mut app, &mut controller);
    let restored = restore_terminal();
    result?;
    restored?;
    Ok(())
}

fn run_tui(app: &mut App, controller: &mut ThemeController<JsonFileStore>) -> Result<(), PrefsError> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    info!("TUI started");
    run_app(&mut terminal, app, controller)
}

fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        crossterm::cursor::Show
    )?;
    raw
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    controller: &mut ThemeController<JsonFileStore>,
) -> Result<(), PrefsError> {
    loop {
        let background = terminal.draw(|f| ui::draw::draw(f, app))?.buffer.clone();

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.message = None;
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Up => app.move_cursor(-1),
                KeyCode::Down => app.move_cursor(1),
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    let mut runner = TerminalDialogRunner::new(terminal, background, app.style.clone());
                    let accepted = controller.open_preferences(&mut runner, app)?;
                    app.message = Some(if accepted {
                        "Preferences saved".to_string()
                    } else {
                        "Preferences unchanged".to_string()
                    });
                }
                _ => {}
            }
        }
    }
}
