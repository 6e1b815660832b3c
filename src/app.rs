use crate::api::ApiClient;
use crate::config::Config;
use crate::controller::{AdviceController, HabitController, ProgressController, TaskListController};
use crate::countdown::{Countdown, CountdownState, PhaseChange};
use crate::dispatch::{Command, Dispatcher, Outcome};
use crate::domain::{Screen, UiMode};
use crate::notifications;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Instant;

/// Main application state
pub struct AppState {
    pub user_name: String,
    pub screen: Screen,
    pub ui_mode: UiMode,
    pub use_emoji: bool,
    pub tasks: TaskListController,
    pub habits: HabitController,
    pub progress: ProgressController,
    pub advice: AdviceController,
    /// Only exists while the timer screen is shown
    pub countdown: Option<Countdown>,
    dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(api: Arc<dyn ApiClient>, config: &Config, user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            screen: Screen::Tasks,
            ui_mode: UiMode::Normal,
            use_emoji: config.use_emoji,
            tasks: TaskListController::new(),
            habits: HabitController::new(),
            progress: ProgressController::new(),
            advice: AdviceController::new(config.motivation_tone.clone()),
            countdown: None,
            dispatcher: Dispatcher::new(api),
        }
    }

    /// Kick off the initial fetch for every pane
    pub fn load_all(&mut self) {
        let mut commands = vec![self.tasks.load(), self.habits.load(), self.progress.load()];
        commands.extend(self.advice.load());
        self.dispatcher.submit_all(commands);
    }

    /// Queue a command if the controller produced one
    pub fn run(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.dispatcher.submit(command);
        }
    }

    pub fn run_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.dispatcher.submit_all(commands);
    }

    /// Requests still on the wire
    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Apply every settled request and queue any follow-ups
    pub fn pump(&mut self) {
        for outcome in self.dispatcher.drain() {
            let follow_ups = self.route(outcome);
            self.dispatcher.submit_all(follow_ups);
        }
        self.sync_mode();
    }

    /// Hand an outcome to the controller that asked for it
    pub fn route(&mut self, outcome: Outcome) -> Vec<Command> {
        match outcome {
            Outcome::TasksFetched { generation, result } => {
                self.tasks.on_fetched(generation, result);
                Vec::new()
            }
            Outcome::TaskMutated { action, result } => {
                self.tasks.on_mutated(action, result).into_iter().collect()
            }
            Outcome::HabitsFetched { generation, result } => {
                self.habits.on_fetched(generation, result, local_now());
                Vec::new()
            }
            Outcome::HabitMutated { action, result } => {
                self.habits.on_mutated(action, result).into_iter().collect()
            }
            Outcome::ProgressFetched {
                range,
                generation,
                result,
            } => {
                self.progress.on_fetched(range, generation, result);
                Vec::new()
            }
            Outcome::MotivationFetched(result) => {
                self.advice.on_motivation(result);
                Vec::new()
            }
            Outcome::GoalsFetched(result) => {
                self.advice.on_goals(result);
                Vec::new()
            }
        }
    }

    /// Drop back to normal mode once a form the mode belonged to has closed
    fn sync_mode(&mut self) {
        let closed = match self.ui_mode {
            UiMode::TaskForm => self.tasks.form.is_none(),
            UiMode::HabitForm => self.habits.form.is_none(),
            UiMode::ConfirmDelete => self.habits.confirm_delete.is_none(),
            UiMode::Normal | UiMode::Searching => false,
        };
        if closed {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Advance the countdown; returns the phase flips that happened
    pub fn tick(&mut self, now: Instant) -> Vec<PhaseChange> {
        let Some(countdown) = self.countdown.as_mut() else {
            return Vec::new();
        };

        let changes = countdown.advance(now);
        for change in &changes {
            notifications::notify_phase_change(change);
        }
        changes
    }

    /// Countdown shown on the timer screen, or the idle default elsewhere
    pub fn countdown_state(&self) -> CountdownState {
        self.countdown
            .as_ref()
            .map(Countdown::state)
            .unwrap_or_default()
    }

    pub fn toggle_countdown(&mut self, now: Instant) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.toggle(now);
        }
    }

    pub fn reset_countdown(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.reset();
        }
    }

    /// Show another screen. Leaving the timer discards its countdown;
    /// entering it starts from a stopped focus interval.
    pub fn switch_screen(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }

        if self.screen == Screen::Timer {
            if let Some(countdown) = self.countdown.take() {
                let last = countdown.teardown();
                tracing::debug!(remaining = last.remaining_secs, phase = ?last.phase, "countdown discarded");
            }
        }
        if screen == Screen::Timer {
            self.countdown = Some(Countdown::new());
        }

        tracing::debug!(from = ?self.screen, to = ?screen, "switching screen");
        self.screen = screen;
        self.ui_mode = UiMode::Normal;
    }

    pub fn next_screen(&mut self) {
        self.switch_screen(self.screen.next());
    }

    /// Re-fetch whatever the current screen shows
    pub fn refresh_current(&mut self) {
        let command = match self.screen {
            Screen::Tasks => Some(self.tasks.load()),
            Screen::Habits => Some(self.habits.load()),
            Screen::Progress => Some(self.progress.load()),
            Screen::Timer => None,
        };
        self.run(command);
    }

    pub fn refresh_advice(&mut self) {
        let commands = self.advice.load();
        self.run_all(commands);
    }
}

/// Wall-clock time used for habit recency and check-in labels
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::domain::{Phase, TaskStatus};
    use std::time::Duration;

    fn test_app() -> (AppState, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::new());
        let app = AppState::new(api.clone(), &Config::default(), "Ada");
        (app, api)
    }

    /// Pump until every request and follow-up has settled
    fn settle(app: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.pump();
            if app.pending_requests() == 0 {
                break;
            }
            assert!(Instant::now() < deadline, "requests did not settle");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_load_all_populates_every_pane() {
        let (mut app, api) = test_app();
        app.load_all();
        settle(&mut app);

        assert!(!app.tasks.loading);
        assert!(!app.habits.loading);
        assert!(app.progress.snapshot.is_some());
        assert_eq!(app.advice.motivation.value.as_deref(), Some("Keep going (encouraging)"));
        assert_eq!(app.advice.goals.value.as_ref().map(Vec::len), Some(1));
        assert_eq!(api.calls().len(), 5);
    }

    #[test]
    fn test_create_then_toggle_end_to_end() {
        let (mut app, api) = test_app();
        let load = app.tasks.load();
        app.run(Some(load));
        settle(&mut app);

        app.tasks.open_create_form();
        app.ui_mode = UiMode::TaskForm;
        if let Some(form) = app.tasks.form.as_mut() {
            form.title = "Read chapter 3".to_string();
        }
        let submit = app.tasks.submit_form();
        app.run(submit);
        settle(&mut app);

        assert!(app.tasks.form.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.tasks.tasks.len(), 1);

        let toggle = app.tasks.toggle_selected();
        app.run(toggle);
        settle(&mut app);

        assert_eq!(app.tasks.tasks[0].status, TaskStatus::Complete);
        // one initial load plus one refetch per mutation
        assert_eq!(api.count("list_tasks"), 3);
    }

    #[test]
    fn test_one_failing_pane_leaves_others_alone() {
        let (mut app, api) = test_app();
        api.fail("list_habits");
        app.load_all();
        settle(&mut app);

        assert!(app.habits.error.is_some());
        assert!(app.tasks.error.is_none());
        assert!(app.progress.error.is_none());
    }

    #[test]
    fn test_leaving_timer_tears_down_countdown() {
        let (mut app, _api) = test_app();
        let t0 = Instant::now();

        app.switch_screen(Screen::Timer);
        app.toggle_countdown(t0);
        assert!(app.countdown_state().running);

        app.tick(t0 + Duration::from_secs(3));
        assert_eq!(app.countdown_state().remaining_secs, 1497);

        app.switch_screen(Screen::Progress);
        assert!(app.countdown.is_none());
        assert!(app.tick(t0 + Duration::from_secs(10)).is_empty());

        app.switch_screen(Screen::Timer);
        assert_eq!(app.countdown_state(), CountdownState::default());
    }

    #[test]
    fn test_tick_reports_phase_changes() {
        let (mut app, _api) = test_app();
        let t0 = Instant::now();
        app.switch_screen(Screen::Timer);
        app.toggle_countdown(t0);

        // 1500 decrements then the flip
        let changes = app.tick(t0 + Duration::from_secs(1501));
        assert_eq!(changes, vec![PhaseChange { from: Phase::Focus, to: Phase::Break }]);
        assert_eq!(app.countdown_state().phase, Phase::Break);
        assert_eq!(app.countdown_state().remaining_secs, 300);
    }

    #[test]
    fn test_next_screen_cycles() {
        let (mut app, _api) = test_app();
        app.ui_mode = UiMode::Searching;
        app.next_screen();
        assert_eq!(app.screen, Screen::Habits);
        assert_eq!(app.ui_mode, UiMode::Normal);
    }
}
