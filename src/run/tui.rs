use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::config::Config;
use crate::db::{Database, StoreEvent};
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

const TICK: Duration = Duration::from_millis(500);

pub(crate) fn as_tui(db: &mut Database, config: &Config) -> Result<()> {
    let events = db.subscribe();
    let mut app = App::new(config);
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    tracing::info!("tui started");

    let result = run_app(&mut terminal, &mut app, db, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "tui exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
    events: &Receiver<StoreEvent>,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, app, db)?;
                }
            }
        } else {
            app.tick(Local::now());
        }

        drain_store_events(events, app, db)?;
    }
    Ok(())
}

/// Pull fresh snapshots once per batch of store notifications.
fn drain_store_events(
    events: &Receiver<StoreEvent>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    let batch: Vec<StoreEvent> = events.try_iter().collect();
    if batch.is_empty() {
        return Ok(());
    }
    tracing::debug!(count = batch.len(), "store changed, refreshing");
    app.refresh_all(db)
}

fn handle_key(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, db),
        InputMode::Command => handle_command_input(key, app, db),
        InputMode::Editing => handle_editing_input(key, app, db),
        InputMode::Confirm => handle_confirm_input(key, app, db),
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, Motion::Down),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, Motion::Up),
        KeyCode::Char('1') => switch_screen(app, Screen::Expenses),
        KeyCode::Char('2') => switch_screen(app, Screen::Analytics),
        KeyCode::Char('3') => switch_screen(app, Screen::Categories),
        KeyCode::Tab => {
            let next = app.screen.next();
            switch_screen(app, next);
        }
        KeyCode::BackTab => {
            let prev = app.screen.prev();
            switch_screen(app, prev);
        }
        KeyCode::Esc => app.set_status(""),
        KeyCode::Char('g') => move_cursor(app, Motion::Top),
        KeyCode::Char('G') => move_cursor(app, Motion::Bottom),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            move_cursor(app, Motion::HalfPageDown);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            move_cursor(app, Motion::HalfPageUp);
        }
        KeyCode::Char('a') if app.screen == Screen::Expenses => {
            prefill_command(app, "add ");
        }
        KeyCode::Char('f') if app.screen == Screen::Expenses => {
            let next = app.preset.next();
            app.set_preset(next);
        }
        KeyCode::Char('F') if app.screen == Screen::Expenses => {
            let prev = app.preset.prev();
            app.set_preset(prev);
        }
        KeyCode::Char('D') if app.screen == Screen::Expenses => {
            commands::handle_command("delete-expense", app, db)?;
        }
        KeyCode::Char('R') if app.screen == Screen::Analytics => {
            app.toggle_analytics_range();
        }
        KeyCode::Char('n') if app.screen == Screen::Categories => {
            prefill_command(app, "category ");
        }
        KeyCode::Char('r') | KeyCode::Enter if app.screen == Screen::Categories => {
            commands::handle_command("rename", app, db)?;
        }
        KeyCode::Char('i') if app.screen == Screen::Categories => {
            prefill_command(app, "icon ");
        }
        KeyCode::Char('c') if app.screen == Screen::Categories => {
            prefill_command(app, "color ");
        }
        KeyCode::Char('D') if app.screen == Screen::Categories => {
            commands::handle_command("delete-category", app, db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let new_name = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            if let Some(id) = app.editing_category.take() {
                commands::rename_category(&id, &new_name, app, db)?;
            }
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.editing_category = None;
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                commands::run_pending(action, app, db)?;
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn prefill_command(app: &mut App, text: &str) {
    app.input_mode = InputMode::Command;
    app.command_input = text.to_string();
}

fn switch_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    app.set_status(format!("{screen}"));
}

#[derive(Clone, Copy)]
enum Motion {
    Down,
    Up,
    HalfPageDown,
    HalfPageUp,
    Top,
    Bottom,
}

/// Cursor, scroll offset, row count and page size of the list on screen.
fn focused_list(app: &mut App) -> (&mut usize, &mut usize, usize, usize) {
    match app.screen {
        Screen::Expenses => {
            let (len, page) = (app.expenses_view.expenses.len(), app.expense_page());
            (&mut app.expense_index, &mut app.expense_scroll, len, page)
        }
        Screen::Analytics => {
            let len = app.analytics_view.aggregation.breakdown.len();
            let page = app.breakdown_page();
            (&mut app.breakdown_index, &mut app.breakdown_scroll, len, page)
        }
        Screen::Categories => {
            let (len, page) = (app.categories.len(), app.category_page());
            (&mut app.category_index, &mut app.category_scroll, len, page)
        }
    }
}

fn move_cursor(app: &mut App, motion: Motion) {
    let (index, scroll, len, page) = focused_list(app);
    let half = (page / 2).max(1);
    match motion {
        Motion::Down => scroll_down(index, scroll, len, page),
        Motion::Up => scroll_up(index, scroll),
        Motion::HalfPageDown => {
            for _ in 0..half {
                scroll_down(index, scroll, len, page);
            }
        }
        Motion::HalfPageUp => {
            for _ in 0..half {
                scroll_up(index, scroll);
            }
        }
        Motion::Top => scroll_to_top(index, scroll),
        Motion::Bottom => scroll_to_bottom(index, scroll, len, page),
    }
}
