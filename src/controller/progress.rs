use crate::api::ApiError;
use crate::dispatch::Command;
use crate::domain::{ProgressRange, ProgressResponse, ProgressSnapshot};

const FETCH_FAILED: &str = "Failed to load dashboard data. Please try again.";

/// Read-only progress dashboard.
///
/// A fetch replaces all three datasets at once. A failed fetch leaves the
/// previous datasets on screen under an error banner. Only the newest fetch
/// generation is applied.
#[derive(Debug)]
pub struct ProgressController {
    pub range: ProgressRange,
    pub snapshot: Option<ProgressSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl Default for ProgressController {
    fn default() -> Self {
        Self {
            range: ProgressRange::Week,
            snapshot: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl ProgressController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self) -> Command {
        self.loading = true;
        self.error = None;
        self.generation += 1;
        Command::FetchProgress {
            range: self.range,
            generation: self.generation,
        }
    }

    pub fn select_range(&mut self, range: ProgressRange) -> Command {
        self.range = range;
        self.load()
    }

    pub fn next_range(&mut self) -> Command {
        let ranges = ProgressRange::all();
        let idx = ranges.iter().position(|r| *r == self.range).unwrap_or(0);
        self.select_range(ranges[(idx + 1) % ranges.len()])
    }

    /// Whether the snapshot on screen belongs to another range than selected
    pub fn is_stale(&self) -> bool {
        self.snapshot
            .as_ref()
            .map(|s| s.range != self.range)
            .unwrap_or(false)
    }

    /// Apply a fetched snapshot; anything but the newest request is dropped
    pub fn on_fetched(
        &mut self,
        range: ProgressRange,
        generation: u64,
        result: Result<ProgressResponse, ApiError>,
    ) {
        if generation != self.generation {
            tracing::debug!(?range, generation, current = self.generation, "dropping stale progress");
            return;
        }

        self.loading = false;
        match result {
            Ok(response) => {
                self.snapshot = Some(response.into_snapshot(range));
                self.error = None;
            }
            Err(err) => {
                tracing::error!(error = %err, ?range, "fetching progress failed");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
    }
}
