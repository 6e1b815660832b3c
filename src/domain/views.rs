use super::enums::{HabitTab, SortKey, StatusFilter, TaskStatus};
use super::habit::Habit;
use super::task::Task;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Filter, search and sort the last fetched task snapshot.
///
/// Pure projection: never touches the network and never reorders the
/// underlying snapshot. All sorts are stable.
pub fn project_tasks<'a>(
    tasks: &'a [Task],
    filter: StatusFilter,
    search: &str,
    sort: SortKey,
) -> Vec<&'a Task> {
    let needle = search.to_lowercase();
    let mut rows: Vec<&Task> = tasks
        .iter()
        .filter(|t| filter.matches(t.status))
        .filter(|t| t.matches_search(&needle))
        .collect();

    match sort {
        SortKey::None => {}
        SortKey::DueDate => rows.sort_by(|a, b| compare_due(a, b, false)),
        SortKey::DueDateDesc => rows.sort_by(|a, b| compare_due(a, b, true)),
        SortKey::Status => rows.sort_by_key(|t| status_rank(t.status)),
    }

    rows
}

/// Undated tasks go last whichever way dated ones are ordered
fn compare_due(a: &Task, b: &Task, descending: bool) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => {
            if descending {
                y.cmp(&x)
            } else {
                x.cmp(&y)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn status_rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::Pending => 0,
        _ => 1,
    }
}

/// Habits visible under the selected tab
pub fn filter_habits(habits: &[Habit], tab: HabitTab, now: NaiveDateTime) -> Vec<&Habit> {
    habits
        .iter()
        .filter(|h| match tab {
            HabitTab::All => true,
            HabitTab::Daily => h.frequency == super::enums::Frequency::Daily,
            HabitTab::Weekly => h.frequency == super::enums::Frequency::Weekly,
            HabitTab::Completed => h.checked_in_recently(now),
        })
        .collect()
}

/// Countdown display as "MM:SS"
pub fn format_countdown(remaining_secs: u32) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Status badge shown next to a task
pub fn status_badge(task: &Task, use_emoji: bool) -> &'static str {
    match (task.status, use_emoji) {
        (TaskStatus::Complete, true) => "✅",
        (TaskStatus::Pending, true) => "⬜",
        (TaskStatus::Complete, false) => "[x]",
        (TaskStatus::Pending, false) => "[ ]",
    }
}

/// Keep a selection index inside a list that may have shrunk
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        selected.min(len - 1)
    }
}
