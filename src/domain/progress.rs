use super::enums::ProgressRange;
use super::task::EntityId;
use serde::Deserialize;

/// Task status counts for the pie chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TaskStatusCounts {
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub overdue: u32,
}

impl TaskStatusCounts {
    pub fn total(&self) -> u32 {
        self.completed + self.pending
    }

    /// Share of completed tasks, 0.0 when there are none
    pub fn completion_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.completed as f64 / total as f64 * 100.0
    }
}

/// One day of the completion trend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(default)]
    pub completed: u32,
}

/// Server-computed statistics for one habit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HabitStats {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub completion_rate: u32,
}

impl HabitStats {
    /// Chart label, truncated the way the bar chart expects
    pub fn short_name(&self) -> String {
        if self.name.chars().count() > 10 {
            let head: String = self.name.chars().take(8).collect();
            format!("{}...", head)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TaskSection {
    #[serde(flatten)]
    counts: TaskStatusCounts,
    #[serde(default)]
    trend_last_7: Vec<TrendPoint>,
    #[serde(default)]
    trend_last_30: Vec<TrendPoint>,
    #[serde(default)]
    trend_last_90: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct HabitSection {
    #[serde(default)]
    per_habit: Vec<HabitStats>,
}

/// Raw body of `GET /api/progress`
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressResponse {
    tasks: TaskSection,
    #[serde(default)]
    habits: HabitSection,
}

impl ProgressResponse {
    /// Pick the trend matching `range` and assemble a snapshot
    pub fn into_snapshot(self, range: ProgressRange) -> ProgressSnapshot {
        let ProgressResponse { tasks, habits } = self;
        let trend = match range {
            ProgressRange::Week => tasks.trend_last_7,
            ProgressRange::Month => tasks.trend_last_30,
            ProgressRange::Quarter => tasks.trend_last_90,
        };

        ProgressSnapshot {
            range,
            counts: tasks.counts,
            trend,
            per_habit: habits.per_habit,
        }
    }
}

/// The three datasets behind the progress screen
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub range: ProgressRange,
    pub counts: TaskStatusCounts,
    pub trend: Vec<TrendPoint>,
    pub per_habit: Vec<HabitStats>,
}
