use serde::{Deserialize, Serialize};

/// Completion status of a task as stored by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Complete,
}

impl TaskStatus {
    /// Status a task moves to when toggled
    pub fn toggled(&self) -> Self {
        match self {
            Self::Complete => Self::Pending,
            Self::Pending => Self::Complete,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Complete => "COMPLETE",
        }
    }
}

/// How often a habit is meant to be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Daily => Self::Weekly,
            Self::Weekly => Self::Daily,
        }
    }
}

/// Pomodoro phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// Fixed length of this phase in seconds
    pub fn duration_secs(&self) -> u32 {
        match self {
            Phase::Focus => 1500,
            Phase::Break => 300,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus Time",
            Phase::Break => "Break Time",
        }
    }
}

/// Time window requested from the progress endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressRange {
    Week,
    Month,
    Quarter,
}

impl ProgressRange {
    /// Query-string value
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Week => "7 Days",
            Self::Month => "30 Days",
            Self::Quarter => "90 Days",
        }
    }

    pub fn from_query(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            _ => None,
        }
    }

    pub fn all() -> &'static [ProgressRange] {
        &[Self::Week, Self::Month, Self::Quarter]
    }
}

/// Status filter applied to the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Complete,
}

impl StatusFilter {
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == TaskStatus::Pending,
            Self::Complete => status == TaskStatus::Complete,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Complete,
            Self::Complete => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Statuses",
            Self::Pending => "Pending",
            Self::Complete => "Complete",
        }
    }
}

/// Sort applied to the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    DueDate,
    DueDateDesc,
    Status,
}

impl SortKey {
    pub fn next(&self) -> Self {
        match self {
            Self::None => Self::DueDate,
            Self::DueDate => Self::DueDateDesc,
            Self::DueDateDesc => Self::Status,
            Self::Status => Self::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Unsorted",
            Self::DueDate => "Due date ↑",
            Self::DueDateDesc => "Due date ↓",
            Self::Status => "Status",
        }
    }
}

/// Tabs on the habits screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HabitTab {
    #[default]
    All,
    Daily,
    Weekly,
    Completed,
}

impl HabitTab {
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Daily,
            Self::Daily => Self::Weekly,
            Self::Weekly => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Completed => "Completed",
        }
    }
}

/// Top-level screen shown in the main area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Tasks,
    Habits,
    Timer,
    Progress,
}

impl Screen {
    pub fn all() -> &'static [Screen] {
        &[Screen::Tasks, Screen::Habits, Screen::Timer, Screen::Progress]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Tasks => "Tasks",
            Screen::Habits => "Habits",
            Screen::Timer => "Pomodoro",
            Screen::Progress => "Progress",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Screen::Tasks => Screen::Habits,
            Screen::Habits => Screen::Timer,
            Screen::Timer => Screen::Progress,
            Screen::Progress => Screen::Tasks,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Searching,
    TaskForm,
    HabitForm,
    ConfirmDelete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_toggle() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Complete);
        assert_eq!(TaskStatus::Complete.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_task_status_wire_names() {
        let status: TaskStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(status, TaskStatus::Complete);
        assert_eq!(serde_json::to_string(&TaskStatus::Pending).unwrap(), "\"pending\"");
    }

    #[test]
    fn test_phase_durations() {
        assert_eq!(Phase::Focus.duration_secs(), 1500);
        assert_eq!(Phase::Break.duration_secs(), 300);
        assert_eq!(Phase::Focus.flipped(), Phase::Break);
    }

    #[test]
    fn test_progress_range_query() {
        assert_eq!(ProgressRange::from_query("Month"), Some(ProgressRange::Month));
        assert_eq!(ProgressRange::from_query("year"), None);
        assert_eq!(ProgressRange::Quarter.as_query(), "quarter");
    }

    #[test]
    fn test_status_filter_cycle() {
        let filter = StatusFilter::default();
        assert!(filter.matches(TaskStatus::Complete));
        assert_eq!(filter.next(), StatusFilter::Pending);
        assert!(!StatusFilter::Pending.matches(TaskStatus::Complete));
        assert_eq!(StatusFilter::Complete.next(), StatusFilter::All);
    }

    #[test]
    fn test_screen_cycle_visits_all() {
        let mut screen = Screen::Tasks;
        for _ in 0..Screen::all().len() {
            screen = screen.next();
        }
        assert_eq!(screen, Screen::Tasks);
    }
}
