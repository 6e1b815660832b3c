use crate::app::AppState;
use crate::countdown::CountdownState;
use crate::domain::{format_countdown, Phase};
use crate::ui::styles::{border_style, done_style, gauge_style, hint_style, modal_title_style, title_style};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Share of the current phase already elapsed, 0.0..=1.0
fn phase_ratio(state: &CountdownState) -> f64 {
    let total = state.phase.duration_secs() as f64;
    let remaining = (state.remaining_secs as f64).min(total);
    (total - remaining) / total
}

/// Render the pomodoro countdown
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let state = app.countdown_state();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Pomodoro ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Phase
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Clock
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // State
            Constraint::Min(0),
        ])
        .split(inner);

    let phase_style = match state.phase {
        Phase::Focus => modal_title_style(),
        Phase::Break => done_style(),
    };
    let phase = Paragraph::new(Line::from(Span::styled(state.phase.title(), phase_style)))
        .alignment(Alignment::Center);
    f.render_widget(phase, chunks[1]);

    let clock = Paragraph::new(Line::from(Span::styled(
        format_countdown(state.remaining_secs),
        title_style(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(clock, chunks[3]);

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(phase_ratio(&state))
        .label("");
    f.render_widget(gauge, chunks[5]);

    let status = if state.running { "Running" } else { "Paused" };
    let status = Paragraph::new(Line::from(Span::styled(status, hint_style())))
        .alignment(Alignment::Center);
    f.render_widget(status, chunks[7]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ratio() {
        let fresh = CountdownState::default();
        assert_eq!(phase_ratio(&fresh), 0.0);

        let half = CountdownState { remaining_secs: 150, phase: Phase::Break, running: true };
        assert_eq!(phase_ratio(&half), 0.5);

        let done = CountdownState { remaining_secs: 0, phase: Phase::Focus, running: true };
        assert_eq!(phase_ratio(&done), 1.0);
    }
}
