use crate::api::{ApiError, GoalSuggestion};
use crate::dispatch::Command;

/// Loading/error/value triple for one independent fetch
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceSlot<T> {
    pub value: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for AdviceSlot<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> AdviceSlot<T> {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn settle(&mut self, result: Result<T, ApiError>, failure: &str) {
        self.loading = false;
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(err) => {
                tracing::error!(error = %err, "{}", failure);
                self.error = Some(failure.to_string());
            }
        }
    }
}

/// AI side panel: a motivational message and a list of suggested goals.
///
/// The two requests go out together but each has its own loading flag and
/// error, so one failing never hides the other's answer.
#[derive(Debug)]
pub struct AdviceController {
    tone: String,
    pub motivation: AdviceSlot<String>,
    pub goals: AdviceSlot<Vec<GoalSuggestion>>,
}

impl AdviceController {
    pub fn new(tone: impl Into<String>) -> Self {
        Self {
            tone: tone.into(),
            motivation: AdviceSlot::default(),
            goals: AdviceSlot::default(),
        }
    }

    pub fn load(&mut self) -> Vec<Command> {
        self.motivation.begin();
        self.goals.begin();
        vec![
            Command::FetchMotivation {
                tone: self.tone.clone(),
            },
            Command::FetchGoals,
        ]
    }

    pub fn on_motivation(&mut self, result: Result<String, ApiError>) {
        self.motivation.settle(result, "Failed to load motivation.");
    }

    pub fn on_goals(&mut self, result: Result<Vec<GoalSuggestion>, ApiError>) {
        self.goals.settle(result, "Failed to load goal suggestions.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::dispatch::{execute, Outcome};

    fn apply(ctrl: &mut AdviceController, outcome: Outcome) {
        match outcome {
            Outcome::MotivationFetched(result) => ctrl.on_motivation(result),
            Outcome::GoalsFetched(result) => ctrl.on_goals(result),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_load_issues_both_requests() {
        let mut ctrl = AdviceController::new("encouraging");
        let commands = ctrl.load();
        assert_eq!(
            commands,
            vec![
                Command::FetchMotivation { tone: "encouraging".to_string() },
                Command::FetchGoals
            ]
        );
        assert!(ctrl.motivation.loading);
        assert!(ctrl.goals.loading);
    }

    #[test]
    fn test_goal_failure_does_not_hide_motivation() {
        let api = FakeApi::new();
        api.fail("suggest_goals");
        let mut ctrl = AdviceController::new("calm");

        for command in ctrl.load() {
            apply(&mut ctrl, execute(&api, command));
        }

        assert_eq!(ctrl.motivation.value.as_deref(), Some("Keep going (calm)"));
        assert!(ctrl.motivation.error.is_none());
        assert!(!ctrl.motivation.loading);

        assert_eq!(ctrl.goals.error.as_deref(), Some("Failed to load goal suggestions."));
        assert!(!ctrl.goals.loading);
        assert!(ctrl.goals.value.is_none());
    }

    #[test]
    fn test_motivation_failure_does_not_hide_goals() {
        let api = FakeApi::new();
        api.fail("motivation");
        let mut ctrl = AdviceController::new("encouraging");

        // Settle in reverse order to show ordering does not matter
        let mut outcomes: Vec<Outcome> = ctrl.load().into_iter().map(|c| execute(&api, c)).collect();
        outcomes.reverse();
        for outcome in outcomes {
            apply(&mut ctrl, outcome);
        }

        assert_eq!(ctrl.goals.value.as_ref().unwrap().len(), 1);
        assert!(ctrl.motivation.error.is_some());
        assert!(ctrl.goals.error.is_none());
    }
}
