pub mod enums;
pub mod habit;
pub mod progress;
pub mod task;
pub mod views;

pub use enums::{
    Frequency, HabitTab, Phase, ProgressRange, Screen, SortKey, StatusFilter, TaskStatus, UiMode,
};
pub use habit::{format_last_checkin, Habit, HabitDraft};
pub use progress::{ProgressResponse, ProgressSnapshot};
pub use task::{EntityId, Task, TaskDraft};
#[cfg(test)]
pub use task::parse_timestamp;
pub use views::{clamp_selection, filter_habits, format_countdown, project_tasks, status_badge};
