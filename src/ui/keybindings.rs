use crate::app::AppState;
use crate::domain::{Screen, UiMode};
use crate::ui::styles::{hint_style, modal_title_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Key/label pairs for the current screen and mode
fn hints(screen: Screen, mode: UiMode) -> &'static [(&'static str, &'static str)] {
    match mode {
        UiMode::Searching => &[("type", "search"), ("Enter", "keep"), ("Esc", "clear")],
        UiMode::TaskForm => &[("Tab", "next field"), ("Enter", "save"), ("Esc", "cancel")],
        UiMode::HabitForm => &[("Tab", "frequency"), ("Enter", "save"), ("Esc", "cancel")],
        UiMode::ConfirmDelete => &[("y", "delete"), ("n", "keep")],
        UiMode::Normal => match screen {
            Screen::Tasks => &[
                ("↑/↓", "select"),
                ("Enter", "toggle"),
                ("a", "add"),
                ("e", "edit"),
                ("x", "delete"),
                ("f", "filter"),
                ("s", "sort"),
                ("/", "search"),
                ("r", "refresh"),
                ("g", "advice"),
                ("Tab", "screen"),
                ("q", "quit"),
            ],
            Screen::Habits => &[
                ("↑/↓", "select"),
                ("Enter", "check in"),
                ("a", "add"),
                ("x", "delete"),
                ("t", "tab"),
                ("r", "refresh"),
                ("g", "advice"),
                ("Tab", "screen"),
                ("q", "quit"),
            ],
            Screen::Timer => &[
                ("Space", "start/pause"),
                ("r", "reset"),
                ("g", "advice"),
                ("Tab", "screen"),
                ("q", "quit"),
            ],
            Screen::Progress => &[
                ("→", "range"),
                ("r", "refresh"),
                ("g", "advice"),
                ("Tab", "screen"),
                ("q", "quit"),
            ],
        },
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints(app.screen, app.ui_mode) {
        spans.push(Span::styled(*key, modal_title_style()));
        spans.push(Span::raw(format!(" {}   ", label)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(hint_style());
    f.render_widget(paragraph, area);
}
