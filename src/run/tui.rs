use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};

use crate::config::Config;
use crate::ledger::Ledger;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;
use crate::ui::render::CHROME_HEIGHT;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(ledger: &mut Ledger, config: &Config) -> Result<()> {
    let mut app = App::new(config);
    app.refresh(ledger);
    if app.unsaved {
        app.set_status("Some changes are not saved yet. Run :save to retry");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(expenses = ledger.len(), "Starting TUI");
    let result = run_app(&mut terminal, &mut app, ledger);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }
    if ledger.has_unsaved_changes() {
        eprintln!("Warning: some changes could not be saved");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ledger: &mut Ledger,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(CHROME_HEIGHT) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

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

        // Action failures land in the status bar. The ledger keeps
        // in-memory changes when a write fails, so the session goes on.
        let handled = if app.preview.is_some() {
            handle_preview_input(key, app, ledger)
        } else {
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, ledger),
                InputMode::Command => handle_command_input(key, app, ledger),
                InputMode::Editing => handle_editing_input(key, app, ledger),
                InputMode::Confirm => handle_confirm_input(key, app, ledger),
            }
        };
        if let Err(e) = handled {
            warn!("{e:#}");
            app.set_status(format!("Error: {e:#}"));
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
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
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') | KeyCode::Home => {
            scroll_to_top(&mut app.expense_index, &mut app.expense_scroll);
        }
        KeyCode::Char('G') | KeyCode::End => {
            let page = app.expense_page();
            scroll_to_bottom(
                &mut app.expense_index,
                &mut app.expense_scroll,
                app.rows.len(),
                page,
            );
        }
        KeyCode::Char('a') => commands::handle_command("add", app, ledger)?,
        KeyCode::Char('e') | KeyCode::Enter => commands::handle_command("edit", app, ledger)?,
        KeyCode::Char('d') | KeyCode::Delete => {
            commands::handle_command("delete", app, ledger)?;
        }
        KeyCode::Char('v') => commands::handle_command("view", app, ledger)?,
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, ledger)?;
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

fn handle_editing_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    if key.code == KeyCode::Enter {
        return commands::submit_form(app, ledger);
    }
    if key.code == KeyCode::Esc {
        app.close_form();
        return Ok(());
    }

    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return Ok(());
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left if form.focus.is_choice() => form.cycle(-1),
        KeyCode::Right if form.focus.is_choice() => form.cycle(1),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.input_char(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => commands::confirm_pending(app, ledger)?,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            commands::cancel_pending(app);
        }
        _ => {}
    }
    Ok(())
}

fn handle_preview_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    if key.code == KeyCode::Char('s') {
        commands::handle_command("save-image", app, ledger)?;
    }
    app.preview = None;
    Ok(())
}

fn handle_move_down(app: &mut App) {
    let page = app.expense_page();
    scroll_down(
        &mut app.expense_index,
        &mut app.expense_scroll,
        app.rows.len(),
        page,
    );
}

fn handle_move_up(app: &mut App) {
    scroll_up(&mut app.expense_index, &mut app.expense_scroll);
}
