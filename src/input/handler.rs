use crate::app::{local_now, AppState};
use crate::domain::{Screen, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Searching => handle_search_mode(app, key),
        UiMode::TaskForm => handle_task_form_mode(app, key),
        UiMode::HabitForm => handle_habit_form_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let handled = match app.screen {
        Screen::Tasks => handle_tasks_screen(app, key),
        Screen::Habits => handle_habits_screen(app, key),
        Screen::Timer => handle_timer_screen(app, key),
        Screen::Progress => handle_progress_screen(app, key),
    };
    if handled {
        return Ok(false);
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        // Screen switching
        KeyCode::Tab => app.next_screen(),
        KeyCode::Char('1') => app.switch_screen(Screen::Tasks),
        KeyCode::Char('2') => app.switch_screen(Screen::Habits),
        KeyCode::Char('3') => app.switch_screen(Screen::Timer),
        KeyCode::Char('4') => app.switch_screen(Screen::Progress),

        // Refresh
        KeyCode::Char('r') | KeyCode::Char('R') => app.refresh_current(),
        KeyCode::Char('g') | KeyCode::Char('G') => app.refresh_advice(),

        _ => {}
    }
    Ok(false)
}

/// Task list keys; false when the key is not a task-list key
fn handle_tasks_screen(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.tasks.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.tasks.move_down(),

        // Toggle pending/complete
        KeyCode::Enter | KeyCode::Char(' ') => {
            let command = app.tasks.toggle_selected();
            app.run(command);
        }

        KeyCode::Char('a') => {
            app.tasks.open_create_form();
            app.ui_mode = UiMode::TaskForm;
        }
        KeyCode::Char('e') => {
            app.tasks.open_edit_form();
            if app.tasks.form.is_some() {
                app.ui_mode = UiMode::TaskForm;
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            let command = app.tasks.delete_selected();
            app.run(command);
        }

        KeyCode::Char('f') => app.tasks.cycle_filter(),
        KeyCode::Char('s') => app.tasks.cycle_sort(),
        KeyCode::Char('/') => app.ui_mode = UiMode::Searching,
        KeyCode::Esc => app.tasks.clear_search(),

        _ => return false,
    }
    true
}

fn handle_habits_screen(app: &mut AppState, key: KeyEvent) -> bool {
    let now = local_now();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.habits.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.habits.move_down(now),

        // Check in
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('c') => {
            let command = app.habits.check_in_selected(now);
            app.run(command);
        }

        KeyCode::Char('a') => {
            app.habits.open_form();
            app.ui_mode = UiMode::HabitForm;
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            if app.habits.request_delete(now) {
                app.ui_mode = UiMode::ConfirmDelete;
            }
        }
        KeyCode::Char('t') => app.habits.cycle_tab(now),

        _ => return false,
    }
    true
}

fn handle_timer_screen(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_countdown(Instant::now()),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset_countdown(),
        _ => return false,
    }
    true
}

fn handle_progress_screen(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Right | KeyCode::Char(']') | KeyCode::Char('n') => {
            let command = app.progress.next_range();
            app.run(Some(command));
        }
        _ => return false,
    }
    true
}

/// Handle keys while typing a search term
fn handle_search_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Keep the term and go back to the list
        KeyCode::Enter => app.ui_mode = UiMode::Normal,

        // Drop the term
        KeyCode::Esc => {
            app.tasks.clear_search();
            app.ui_mode = UiMode::Normal;
        }

        KeyCode::Backspace => app.tasks.pop_search_char(),
        KeyCode::Char(c) => app.tasks.push_search_char(c),

        _ => {}
    }
    Ok(false)
}

/// Handle keys in the task form (create or edit)
fn handle_task_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form; it stays open until the server answers
        KeyCode::Enter => {
            let command = app.tasks.submit_form();
            app.run(command);
        }

        // Cancel form
        KeyCode::Esc => {
            app.tasks.cancel_form();
            app.ui_mode = UiMode::Normal;
        }

        // Switch between title, description and due date
        KeyCode::Tab => {
            if let Some(form) = app.tasks.form.as_mut() {
                form.next_field();
            }
        }

        KeyCode::Backspace => {
            if let Some(form) = app.tasks.form.as_mut() {
                form.backspace();
            }
        }

        KeyCode::Char(c) => {
            if let Some(form) = app.tasks.form.as_mut() {
                form.push_char(c);
            }
        }

        _ => {}
    }
    Ok(false)
}

/// Handle keys in the new-habit form
fn handle_habit_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            let command = app.habits.submit_form();
            app.run(command);
        }

        KeyCode::Esc => {
            app.habits.cancel_form();
            app.ui_mode = UiMode::Normal;
        }

        // Switch frequency
        KeyCode::Tab => {
            if let Some(form) = app.habits.form.as_mut() {
                form.frequency = form.frequency.toggled();
            }
        }

        KeyCode::Backspace => {
            if let Some(form) = app.habits.form.as_mut() {
                form.name.pop();
            }
        }

        KeyCode::Char(c) => {
            if let Some(form) = app.habits.form.as_mut() {
                form.name.push(c);
            }
        }

        _ => {}
    }
    Ok(false)
}

/// Handle keys in the delete confirmation modal
fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let command = app.habits.confirm_delete();
            app.run(command);
            app.ui_mode = UiMode::Normal;
        }

        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.habits.cancel_delete();
            app.ui_mode = UiMode::Normal;
        }

        _ => {}
    }
    Ok(false)
}
