pub mod advice_pane;
pub mod habits_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod progress_pane;
pub mod styles;
pub mod tasks_pane;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::{Screen, UiMode};
use advice_pane::render_advice_pane;
use habits_pane::render_habits_pane;
use input_form::{render_habit_form, render_task_form};
use keybindings::render_keybindings;
use layout::create_layout;
use modal::render_confirm_delete_modal;
use progress_pane::render_progress_pane;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use styles::{active_tab_style, hint_style};
use tasks_pane::render_tasks_pane;
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_tabs(f, app, layout.tabs_area);
    render_keybindings(f, app, layout.keybindings_area);

    match app.screen {
        Screen::Tasks => render_tasks_pane(f, app, layout.main_area),
        Screen::Habits => render_habits_pane(f, app, layout.main_area),
        Screen::Timer => render_timer_pane(f, app, layout.main_area),
        Screen::Progress => render_progress_pane(f, app, layout.main_area),
    }
    render_advice_pane(f, app, layout.advice_area);

    // Overlays
    match app.ui_mode {
        UiMode::TaskForm => render_task_form(f, app, size),
        UiMode::HabitForm => render_habit_form(f, app, size),
        UiMode::ConfirmDelete => render_confirm_delete_modal(f, app, size),
        UiMode::Normal | UiMode::Searching => {}
    }
}

/// Screen tabs with the request indicator on the right
fn render_tabs(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (idx, screen) in Screen::all().iter().enumerate() {
        let style = if *screen == app.screen { active_tab_style() } else { hint_style() };
        spans.push(Span::styled(format!(" {} {} ", idx + 1, screen.name()), style));
        spans.push(Span::raw(" "));
    }

    let pending = app.pending_requests();
    if pending > 0 {
        spans.push(Span::styled(format!("  ⟳ {}", pending), hint_style()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
