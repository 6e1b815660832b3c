use crate::app::AppState;
use crate::domain::{status_badge, Task, TaskStatus, UiMode};
use crate::ui::styles::{
    border_style, default_style, done_style, error_style, hint_style, muted_style, overdue_style,
    pending_style, selected_style, title_style,
};
use chrono::{Local, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the task list with its filter/sort/search header
pub fn render_tasks_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let ctrl = &app.tasks;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" Tasks ({}) ", status_counts(&ctrl.tasks)),
            title_style(),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    // Header: view settings, then the status line
    let searching = app.ui_mode == UiMode::Searching;
    let mut header = vec![Line::from(vec![
        Span::styled("Filter: ", hint_style()),
        Span::raw(ctrl.filter.label()),
        Span::styled("  Sort: ", hint_style()),
        Span::raw(ctrl.sort.label()),
        Span::styled("  Search: ", hint_style()),
        Span::raw(ctrl.search.clone()),
        Span::raw(if searching { "█" } else { "" }),
    ])];
    header.push(status_line(ctrl.error.as_deref(), ctrl.notice.as_deref(), ctrl.loading));
    f.render_widget(Paragraph::new(header), chunks[0]);

    let today = Local::now().date_naive();
    let visible = ctrl.visible();
    if visible.is_empty() {
        let empty = if ctrl.tasks.is_empty() {
            "No tasks yet. Press 'a' to add one."
        } else {
            "No tasks match the current filter."
        };
        f.render_widget(Paragraph::new(empty).style(muted_style()), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let busy = ctrl.is_busy(task.id);
            let line = create_task_line(task, app.use_emoji, today, busy);
            let style = if idx == ctrl.selected {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items), chunks[1]);
}

/// "2 PENDING · 1 COMPLETE" over the whole fetched list
fn status_counts(tasks: &[Task]) -> String {
    [TaskStatus::Pending, TaskStatus::Complete]
        .iter()
        .map(|status| {
            let count = tasks.iter().filter(|t| t.status == *status).count();
            format!("{} {}", count, status.label())
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

/// One-line status: error wins over notice, notice over loading
pub fn status_line(error: Option<&str>, notice: Option<&str>, loading: bool) -> Line<'static> {
    if let Some(error) = error {
        Line::from(Span::styled(error.to_string(), error_style()))
    } else if let Some(notice) = notice {
        Line::from(Span::styled(notice.to_string(), pending_style()))
    } else if loading {
        Line::from(Span::styled("Loading…", hint_style()))
    } else {
        Line::raw("")
    }
}

/// Format: ⬜ Write proposal  2024-05-20  (description)
fn create_task_line(task: &Task, use_emoji: bool, today: NaiveDate, busy: bool) -> Line<'static> {
    let mut spans = Vec::new();

    let badge_style = match task.status {
        TaskStatus::Complete => done_style(),
        TaskStatus::Pending => pending_style(),
    };
    spans.push(Span::styled(format!("{} ", status_badge(task, use_emoji)), badge_style));
    spans.push(Span::raw(task.title.clone()));
    spans.push(Span::raw("  "));

    let due_style = if task.is_overdue(today) {
        overdue_style()
    } else {
        muted_style()
    };
    spans.push(Span::styled(task.due_label(), due_style));

    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        spans.push(Span::styled(format!("  {}", description), muted_style()));
    }

    if busy {
        spans.push(Span::styled("  saving…", hint_style()));
    }

    Line::from(spans)
}
