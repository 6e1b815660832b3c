use crate::app::AppState;
use crate::domain::{ProgressRange, ProgressSnapshot};
use crate::ui::styles::{
    active_tab_style, border_style, done_style, error_style, gauge_style, hint_style, muted_style,
    overdue_style, pending_style, title_style,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, Paragraph, Sparkline},
    Frame,
};

/// Render the progress dashboard: status split, completion trend, per-habit rates
pub fn render_progress_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let ctrl = &app.progress;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Progress ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),      // Range tabs + status
            Constraint::Length(3),      // Completion gauge + counts
            Constraint::Percentage(40), // Trend
            Constraint::Min(0),         // Habits
        ])
        .split(inner);

    let mut range_spans = Vec::new();
    for range in ProgressRange::all() {
        let style = if *range == ctrl.range { active_tab_style() } else { hint_style() };
        range_spans.push(Span::styled(format!(" {} ", range.label()), style));
        range_spans.push(Span::raw(" "));
    }
    let status = if let Some(error) = &ctrl.error {
        Line::from(Span::styled(error.clone(), error_style()))
    } else if ctrl.loading {
        Line::from(Span::styled("Loading…", hint_style()))
    } else {
        Line::raw("")
    };
    f.render_widget(Paragraph::new(vec![Line::from(range_spans), status]), chunks[0]);

    let Some(snapshot) = ctrl.snapshot.as_ref() else {
        f.render_widget(
            Paragraph::new("No progress data yet.").style(muted_style()),
            chunks[1],
        );
        return;
    };

    render_counts(f, snapshot, chunks[1]);
    render_trend(f, snapshot, ctrl.is_stale(), chunks[2]);
    render_habits(f, snapshot, chunks[3]);
}

fn render_counts(f: &mut Frame, snapshot: &ProgressSnapshot, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let counts = &snapshot.counts;
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(counts.completion_percent().round().clamp(0.0, 100.0) as u16)
        .label(format!("{:.0}% complete", counts.completion_percent()));
    f.render_widget(gauge, rows[0]);

    let line = Line::from(vec![
        Span::styled(format!("Completed {}", counts.completed), done_style()),
        Span::raw("   "),
        Span::styled(format!("Pending {}", counts.pending), pending_style()),
        Span::raw("   "),
        Span::styled(format!("Overdue {}", counts.overdue), overdue_style()),
    ]);
    f.render_widget(Paragraph::new(line), rows[2]);
}

fn render_trend(f: &mut Frame, snapshot: &ProgressSnapshot, stale: bool, area: Rect) {
    let data = trend_values(snapshot);
    let mut title = format!(" Completed per day ({}) ", snapshot.range.label());
    if stale {
        title.push_str("[previous range] ");
    }

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(border_style())
                .title(Span::styled(title, hint_style())),
        )
        .data(data.as_slice())
        .style(done_style());
    f.render_widget(sparkline, area);
}

fn render_habits(f: &mut Frame, snapshot: &ProgressSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(border_style())
        .title(Span::styled(" Habit completion % ", hint_style()));

    if snapshot.per_habit.is_empty() {
        f.render_widget(
            Paragraph::new("No habits tracked.").style(muted_style()).block(block),
            area,
        );
        return;
    }

    let labels = habit_bars(snapshot);
    let data: Vec<(&str, u64)> = labels.iter().map(|(name, v)| (name.as_str(), *v)).collect();

    let chart = BarChart::default()
        .block(block)
        .data(data.as_slice())
        .bar_width(9)
        .bar_gap(2)
        .max(100)
        .bar_style(pending_style())
        .value_style(title_style());
    f.render_widget(chart, area);
}

/// Trend as plain values in date order
fn trend_values(snapshot: &ProgressSnapshot) -> Vec<u64> {
    snapshot.trend.iter().map(|p| p.completed as u64).collect()
}

/// Bar label and completion rate per habit
fn habit_bars(snapshot: &ProgressSnapshot) -> Vec<(String, u64)> {
    snapshot
        .per_habit
        .iter()
        .map(|h| (h.short_name(), h.completion_rate.min(100) as u64))
        .collect()
}
