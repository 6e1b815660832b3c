use crate::api::GoalSuggestion;
use crate::app::AppState;
use crate::controller::advice::AdviceSlot;
use crate::ui::styles::{
    border_style, default_style, error_style, hint_style, modal_title_style, muted_style, tag_style,
    title_style,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the AI side panel: motivation on top, suggested goals below
pub fn render_advice_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" Hi, {} ", app.user_name),
            title_style(),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Min(0)])
        .split(inner);

    let motivation = motivation_lines(&app.advice.motivation);
    f.render_widget(
        Paragraph::new(motivation)
            .block(section_block(" Motivation "))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let goals = goal_lines(&app.advice.goals);
    f.render_widget(
        Paragraph::new(goals)
            .block(section_block(" Suggested goals "))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );
}

fn section_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::TOP)
        .border_style(border_style())
        .title(Span::styled(title, hint_style()))
}

/// Loading and error are shown per slot, above whatever value is held
fn slot_status<T>(slot: &AdviceSlot<T>) -> Option<Line<'static>> {
    if let Some(error) = &slot.error {
        Some(Line::from(Span::styled(error.clone(), error_style())))
    } else if slot.loading {
        Some(Line::from(Span::styled("Thinking…", hint_style())))
    } else {
        None
    }
}

fn motivation_lines(slot: &AdviceSlot<String>) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = slot_status(slot).into_iter().collect();
    match &slot.value {
        Some(message) => lines.push(Line::from(Span::styled(message.clone(), default_style()))),
        None if lines.is_empty() => lines.push(Line::from(Span::styled(
            "Press 'g' for a nudge.",
            muted_style(),
        ))),
        None => {}
    }
    lines
}

fn goal_lines(slot: &AdviceSlot<Vec<GoalSuggestion>>) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = slot_status(slot).into_iter().collect();
    let goals = slot.value.as_deref().unwrap_or_default();
    if goals.is_empty() && slot.value.is_some() {
        lines.push(Line::from(Span::styled("No suggestions right now.", muted_style())));
    }

    for goal in goals {
        let mut head = vec![
            Span::styled("• ", modal_title_style()),
            Span::raw(goal.title.clone()),
        ];
        if let Some(difficulty) = &goal.difficulty {
            head.push(Span::styled(format!(" [{}]", difficulty), tag_style()));
        }
        lines.push(Line::from(head));
        if !goal.why.is_empty() {
            lines.push(Line::from(Span::styled(format!("  {}", goal.why), muted_style())));
        }
    }
    lines
}
