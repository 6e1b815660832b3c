use crate::app::AppState;
use crate::controller::{HabitForm, TaskForm};
use crate::domain::Frequency;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Label line plus "> value█" line for one field
fn field_lines(label: &str, value: &str, active: bool) -> [Line<'static>; 2] {
    let label = if active {
        format!("{} (editing)", label)
    } else {
        label.to_string()
    };
    [
        Line::raw(label),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), modal_title_style()),
            if active {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]),
    ]
}

fn task_form_lines(form: &TaskForm, saving: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::raw("")];
    let fields = [
        ("Title:", form.title.as_str()),
        ("Description:", form.description.as_str()),
        ("Due date (YYYY-MM-DD):", form.due_date.as_str()),
    ];
    for (idx, (label, value)) in fields.iter().enumerate() {
        lines.extend(field_lines(label, value, form.field == idx));
        lines.push(Line::raw(""));
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), error_style())));
    } else if saving {
        lines.push(Line::from(Span::styled("Saving…", hint_style())));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));
    lines
}

fn habit_form_lines(form: &HabitForm, saving: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::raw("")];
    lines.extend(field_lines("Name:", &form.name, true));
    lines.push(Line::raw(""));

    let option = |freq: Frequency| {
        let marker = if form.frequency == freq { "(•)" } else { "( )" };
        Span::styled(format!("{} {}  ", marker, freq.label()), modal_title_style())
    };
    lines.push(Line::from(vec![
        Span::raw("Frequency: "),
        option(Frequency::Daily),
        option(Frequency::Weekly),
    ]));
    lines.push(Line::raw(""));

    if saving {
        lines.push(Line::from(Span::styled("Saving…", hint_style())));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::raw("Tab to switch frequency  ·  Enter to save  ·  Esc to cancel"));
    lines
}

fn render_form(f: &mut Frame, area: Rect, title: &'static str, lines: Vec<Line<'static>>) {
    let modal_area = create_modal_area(area, lines.len() as u16 + 2);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the task add/edit form
pub fn render_task_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.tasks.form {
        let title = if form.editing.is_some() {
            " Edit Task "
        } else {
            " Add Task "
        };
        render_form(f, area, title, task_form_lines(form, app.tasks.is_saving_form()));
    }
}

/// Render the new-habit form
pub fn render_habit_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.habits.form {
        render_form(f, area, " Add Habit ", habit_form_lines(form, app.habits.is_saving_form()));
    }
}
