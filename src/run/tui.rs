use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::db::Database;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;

/// Redraw at least this often so notices expire without a key press.
const TICK: Duration = Duration::from_millis(250);

pub(crate) fn as_tui(config: &Config, db: &mut Database) -> Result<()> {
    let mut app = App::new(config.export_dir.clone());
    app.refresh_all(db)?;
    tracing::info!(
        transactions = app.view.all().len(),
        categories = app.categories.len(),
        "starting tui"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("tui exited with error: {e:#}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        app.expire_notice(Instant::now());
        terminal.draw(|f| crate::ui::render::render(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if app.show_help {
            app.show_help = false;
            continue;
        }
        match app.input_mode {
            InputMode::Normal => handle_normal_input(key, app, db)?,
            InputMode::Command => handle_command_input(key, app, db)?,
            InputMode::Editing => handle_editing_input(key, app, db),
            InputMode::Confirm => handle_confirm_input(key, app, db),
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char(':') => open_command(app, ""),
        KeyCode::Char('f') => open_command(app, "from "),
        KeyCode::Char('t') => open_command(app, "to "),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => app.prev_page(),
        KeyCode::Char('e') | KeyCode::Enter => app.begin_edit(),
        KeyCode::Char('D') | KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('x') => commands::handle_command("export", app, db)?,
        KeyCode::Char('c') => app.clear_range(),
        KeyCode::Char('r') => commands::handle_command("reload", app, db)?,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.notice = None,
        _ => {}
    }
    Ok(())
}

fn open_command(app: &mut App, prefill: &str) {
    app.input_mode = InputMode::Command;
    app.command_input.clear();
    app.command_input.push_str(prefill);
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
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &mut Database) {
    match key.code {
        KeyCode::Enter => app.save_edit(db),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Tab => {
            if let Some(form) = app.edit.form_mut() {
                form.field = form.field.next();
            }
        }
        KeyCode::BackTab => {
            if let Some(form) = app.edit.form_mut() {
                form.field = form.field.prev();
            }
        }
        KeyCode::Left | KeyCode::Right => {
            let delta = if key.code == KeyCode::Left { -1 } else { 1 };
            let categories = &app.categories;
            if let Some(form) = app.edit.form_mut() {
                form.cycle(delta, categories);
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.edit.form_mut() {
                form.pop_char();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.edit.form_mut() {
                if form.field.is_text() {
                    form.push_char(c);
                } else if c == ' ' {
                    form.cycle(1, &app.categories);
                }
            }
        }
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_yes(db),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_no(),
        _ => {}
    }
}
