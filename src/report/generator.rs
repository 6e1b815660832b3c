use crate::api::ApiClient;
use crate::domain::{ProgressRange, ProgressSnapshot};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Render a progress snapshot as Markdown
pub fn render_report(snapshot: &ProgressSnapshot, generated: NaiveDate) -> String {
    let mut report = String::new();
    let counts = &snapshot.counts;

    // Header
    let _ = writeln!(
        report,
        "# Progress Report - {} ({})\n",
        generated,
        snapshot.range.label()
    );

    // Summary Section
    report.push_str("## Tasks\n\n");
    let _ = writeln!(report, "- **Total Tasks:** {}", counts.total());
    let _ = writeln!(report, "- **Completed:** {}", counts.completed);
    let _ = writeln!(report, "- **Pending:** {}", counts.pending);
    let _ = writeln!(report, "- **Overdue:** {}", counts.overdue);
    let _ = writeln!(
        report,
        "- **Completion Rate:** {}\n",
        format_percent(counts.completion_percent())
    );

    // Trend Section
    report.push_str("## Completion Trend\n\n");
    if snapshot.trend.is_empty() {
        report.push_str("No completions recorded in this range.\n\n");
    } else {
        report.push_str("| Date | Completed |\n|------|-----------|\n");
        for point in &snapshot.trend {
            let _ = writeln!(report, "| {} | {} |", point.date, point.completed);
        }
        let total: u32 = snapshot.trend.iter().map(|p| p.completed).sum();
        let _ = writeln!(report, "\n- **Completed in range:** {}\n", total);
    }

    // Habits Section
    report.push_str("## Habits\n\n");
    if snapshot.per_habit.is_empty() {
        report.push_str("No habits tracked.\n");
    } else {
        report.push_str("| Habit | Current Streak | Longest Streak | Completion |\n");
        report.push_str("|-------|----------------|----------------|------------|\n");
        for habit in &snapshot.per_habit {
            let _ = writeln!(
                report,
                "| {} | {} | {} | {}% |",
                habit.name, habit.current_streak, habit.longest_streak, habit.completion_rate
            );
        }
    }

    report
}

/// Fetch progress for `range` and write a Markdown report.
///
/// Without an explicit output path the report lands in `dir` as
/// `report-YYYY-MM-DD-<range>.md`.
pub fn generate_report(
    api: &dyn ApiClient,
    range: ProgressRange,
    output_path: Option<PathBuf>,
    dir: &Path,
) -> Result<PathBuf> {
    let snapshot = api
        .progress(range)
        .context("Failed to load progress data")?
        .into_snapshot(range);

    let today = Local::now().date_naive();
    let report = render_report(&snapshot, today);

    let output = output_path
        .unwrap_or_else(|| dir.join(format!("report-{}-{}.md", today, range.as_query())));

    std::fs::write(&output, report)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;
    tracing::info!(path = %output.display(), range = range.as_query(), "report written");

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    fn snapshot() -> ProgressSnapshot {
        let body = r#"{
            "tasks": {
                "completed": 3, "pending": 1, "overdue": 1,
                "trend_last_7": [{"date": "2024-05-14", "completed": 1}, {"date": "2024-05-15", "completed": 2}]
            },
            "habits": {"per_habit": [
                {"name": "Read", "current_streak": 2, "longest_streak": 5, "completion_rate": 40}
            ]}
        }"#;
        let response: crate::domain::ProgressResponse = serde_json::from_str(body).unwrap();
        response.into_snapshot(ProgressRange::Week)
    }

    #[test]
    fn test_render_report_sections() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let report = render_report(&snapshot(), date);

        assert!(report.starts_with("# Progress Report - 2024-05-15 (7 Days)"));
        assert!(report.contains("- **Total Tasks:** 4"));
        assert!(report.contains("- **Completion Rate:** 75.0%"));
        assert!(report.contains("| 2024-05-15 | 2 |"));
        assert!(report.contains("- **Completed in range:** 3"));
        assert!(report.contains("| Read | 2 | 5 | 40% |"));
    }

    #[test]
    fn test_render_report_empty_sections() {
        let empty = ProgressSnapshot {
            range: ProgressRange::Month,
            counts: Default::default(),
            trend: Vec::new(),
            per_habit: Vec::new(),
        };
        let report = render_report(&empty, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(report.contains("No completions recorded in this range."));
        assert!(report.contains("No habits tracked."));
        assert!(report.contains("- **Completion Rate:** 0.0%"));
    }

    #[test]
    fn test_generate_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi::new();
        let out = dir.path().join("out.md");

        let path = generate_report(&api, ProgressRange::Week, Some(out.clone()), dir.path()).unwrap();
        assert_eq!(path, out);
        assert!(std::fs::read_to_string(&out).unwrap().contains("## Tasks"));
        assert_eq!(api.calls(), vec!["progress"]);
    }

    #[test]
    fn test_generate_report_propagates_failure() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi::new();
        api.fail("progress");
        assert!(generate_report(&api, ProgressRange::Week, None, dir.path()).is_err());
    }
}
