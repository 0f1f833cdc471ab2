mod api;
mod app;
mod config;
mod error;
mod model;
mod render;
mod ui;

use api::{MealDbClient, RecipeApi};
use app::{App, InputMode};
use clap::Parser;
use config::AppConfig;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use error::AppError;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search TheMealDB recipes from the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Search for this dish on startup instead of loading popular recipes
    #[arg(short, long)]
    query: Option<String>,

    /// Base URL of the recipe API
    #[arg(long)]
    api_base: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log (defaults to the cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut app = match setup(cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    // Init terminal
    let mut terminal = ratatui::init();
    or_restore(
        execute!(std::io::stdout(), EnableMouseCapture),
        ratatui::restore,
    )?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Hand a failed terminal setup step back to the caller, restoring the
/// terminal first so the shell is not left in raw mode.
fn or_restore<T>(result: std::io::Result<T>, restore: impl FnOnce()) -> std::io::Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

/// Build the application context: config, logging, API client, and the
/// first queued action.
fn setup(cli: Cli) -> Result<App<MealDbClient>, AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }

    let log_path = match cli.log_file {
        Some(p) => p,
        None => config::default_log_path()?,
    };
    init_tracing(&log_path)?;
    info!(api_base = %config.api_base, "starting recipe-finder");

    let api = MealDbClient::new(&config)?;
    let mut app = App::new(api, config);

    match cli.query {
        Some(query) => {
            app.input = query;
            app.submit();
        }
        None => app.request_popular(),
    }
    Ok(app)
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing(path: &std::path::Path) -> Result<(), AppError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

async fn run_app<A: RecipeApi>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // The frame above shows the loading indicator; now do the work.
        if app.has_pending() {
            app.run_pending().await;
            continue;
        }

        app.expire_messages(Instant::now());

        // Poll for events with a 250ms timeout
        if crossterm::event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(app, mouse, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }
    }
}

fn handle_key<A: RecipeApi>(app: &mut App<A>, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.modal.is_some() {
        handle_modal_key(app, key);
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }

    handle_results_key(app, key);
}

fn handle_search_input<A: RecipeApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit(),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => {
            app.input.push(c);
        }
        _ => {}
    }
}

fn handle_results_key<A: RecipeApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('/') | KeyCode::Char('i') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char('g') => app.select_first(),
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.request_details(),
        KeyCode::Char('o') => app.open_video(),
        KeyCode::Char('r') => app.request_popular(),
        _ => {}
    }
}

fn handle_modal_key<A: RecipeApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => app.close_modal(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::PageDown => {
            for _ in 0..10 {
                app.scroll_down();
            }
        }
        KeyCode::PageUp => {
            for _ in 0..10 {
                app.scroll_up();
            }
        }
        _ => {}
    }
}

fn handle_mouse<A: RecipeApi>(app: &mut App<A>, mouse: MouseEvent, area: Rect) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.show_help = false;
            } else if app.modal.is_some() {
                if ui::click_dismisses_modal(area, mouse.column, mouse.row) {
                    app.close_modal();
                }
            } else if let Some(index) = ui::card_at(app, area, mouse.column, mouse.row) {
                app.selected = index;
                app.request_details();
            }
        }
        MouseEventKind::ScrollDown if app.modal.is_some() => app.scroll_down(),
        MouseEventKind::ScrollUp if app.modal.is_some() => app.scroll_up(),
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_prev(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::app::PendingAction;
    use crate::model::Recipe;
    use crate::render::render_modal;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> App<FakeApi> {
        App::new(FakeApi::default(), AppConfig::default())
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "recipe-finder",
            "--query",
            "chicken",
            "--api-base",
            "http://localhost:9000/",
        ])
        .unwrap();
        assert_eq!(cli.query.as_deref(), Some("chicken"));
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:9000/"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_failed_setup_step_restores_terminal() {
        let mut restored = false;
        let result = or_restore(
            Err::<(), _>(std::io::Error::other("no mouse support")),
            || restored = true,
        );
        assert!(result.is_err());
        assert!(restored);

        let mut restored = false;
        or_restore(Ok(()), || restored = true).unwrap();
        assert!(!restored);
    }

    #[test]
    fn test_typing_and_submitting_queues_search() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('/')));
        for c in "soup".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            app.pending.front(),
            Some(&PendingAction::Search("soup".to_string()))
        );
    }

    #[test]
    fn test_blank_submit_keeps_focus() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('/')));
        handle_key(&mut app, press(KeyCode::Char(' ')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.input_error.is_some());
        assert!(!app.has_pending());
    }

    #[test]
    fn test_modal_keys_close_it() {
        let mut app = app();
        app.modal = Some(render_modal(&Recipe::named("1", "Soup")));
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.modal_scroll, 1);
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.modal.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_click_outside_modal_closes_it() {
        let mut app = app();
        let area = Rect::new(0, 0, 100, 40);
        app.modal = Some(render_modal(&Recipe::named("1", "Soup")));
        handle_mouse(&mut app, click(50, 20), area);
        assert!(app.modal.is_some());
        handle_mouse(&mut app, click(0, 0), area);
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_click_card_queues_details() {
        let mut app = app();
        app.results.cards = crate::render::render_cards(&[
            Recipe::named("10", "Apam balik"),
            Recipe::named("20", "Bakewell tart"),
        ]);
        let area = Rect::new(0, 0, 80, 40);
        let cards = ui::layout(&app, area).cards;
        handle_mouse(&mut app, click(4, cards.y + 1 + ui::CARD_HEIGHT), area);
        assert_eq!(app.selected, 1);
        assert_eq!(
            app.pending.front(),
            Some(&PendingAction::Details("20".to_string()))
        );
    }

    #[test]
    fn test_quit_and_help() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
