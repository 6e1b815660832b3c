use crate::app::{local_now, AppState};
use crate::domain::{format_last_checkin, Habit, HabitTab};
use crate::ui::styles::{
    active_tab_style, border_style, default_style, done_style, hint_style, muted_style,
    selected_style, tag_style, title_style,
};
use crate::ui::tasks_pane::status_line;
use chrono::NaiveDateTime;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const TABS: [HabitTab; 4] = [HabitTab::All, HabitTab::Daily, HabitTab::Weekly, HabitTab::Completed];

/// Render the habit list under its tab strip
pub fn render_habits_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let ctrl = &app.habits;
    let now = local_now();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Habits ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let mut tab_spans = Vec::new();
    for tab in TABS {
        let style = if tab == ctrl.tab { active_tab_style() } else { hint_style() };
        tab_spans.push(Span::styled(format!(" {} ", tab.label()), style));
        tab_spans.push(Span::raw(" "));
    }
    let header = vec![
        Line::from(tab_spans),
        status_line(ctrl.error.as_deref(), ctrl.notice.as_deref(), ctrl.loading),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    let visible = ctrl.visible(now);
    if visible.is_empty() {
        let empty = match ctrl.tab {
            HabitTab::Completed => "Nothing checked in for this period yet.",
            _ if ctrl.habits.is_empty() => "No habits yet. Press 'a' to add one.",
            _ => "No habits under this tab.",
        };
        f.render_widget(Paragraph::new(empty).style(muted_style()), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(idx, habit)| {
            let line = create_habit_line(habit, now, ctrl.is_busy(habit.id));
            let style = if idx == ctrl.selected { selected_style() } else { default_style() };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items), chunks[1]);
}

/// Format: ✓ Stretch [daily]  streak 3  Last: Today at 08:15
fn create_habit_line(habit: &Habit, now: NaiveDateTime, busy: bool) -> Line<'static> {
    let done = habit.checked_in_recently(now);
    let mark = if done {
        Span::styled("✓ ", done_style())
    } else {
        Span::raw("  ")
    };

    let mut spans = vec![
        mark,
        Span::raw(habit.name.clone()),
        Span::styled(format!(" [{}]", habit.frequency.label()), tag_style()),
        Span::raw(format!("  streak {}", habit.streak)),
        Span::styled(
            format!("  Last: {}", format_last_checkin(habit.last_checkin, now)),
            muted_style(),
        ),
    ];
    if busy {
        spans.push(Span::styled("  saving…", hint_style()));
    }
    Line::from(spans)
}
