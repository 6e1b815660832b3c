use super::guard::InFlight;
use crate::api::ApiError;
use crate::dispatch::{Command, HabitAction, HabitMutation};
use crate::domain::{clamp_selection, filter_habits, EntityId, Frequency, Habit, HabitDraft, HabitTab};
use chrono::NaiveDateTime;

const FETCH_FAILED: &str = "Failed to fetch habits. Please try again.";

/// New-habit form
#[derive(Debug, Clone, PartialEq)]
pub struct HabitForm {
    pub name: String,
    pub frequency: Frequency,
    /// Set once this form's request has been sent
    pub submitted: bool,
}

impl Default for HabitForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            frequency: Frequency::Daily,
            submitted: false,
        }
    }
}

/// Habit screen state. Same fetch-mutate-refetch cycle as tasks.
#[derive(Debug, Default)]
pub struct HabitController {
    pub habits: Vec<Habit>,
    pub tab: HabitTab,
    pub selected: usize,
    pub form: Option<HabitForm>,
    /// Habit awaiting a delete confirmation
    pub confirm_delete: Option<EntityId>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    generation: u64,
    in_flight: InFlight,
}

impl HabitController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self) -> Command {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        Command::FetchHabits {
            generation: self.generation,
        }
    }

    pub fn visible(&self, now: NaiveDateTime) -> Vec<&Habit> {
        filter_habits(&self.habits, self.tab, now)
    }

    pub fn selected_habit(&self, now: NaiveDateTime) -> Option<&Habit> {
        self.visible(now).get(self.selected).copied()
    }

    pub fn is_busy(&self, id: EntityId) -> bool {
        self.in_flight.is_busy(id)
    }

    pub fn is_saving_form(&self) -> bool {
        self.form.as_ref().is_some_and(|f| f.submitted) && self.in_flight.is_creating()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, now: NaiveDateTime) {
        if self.selected + 1 < self.visible(now).len() {
            self.selected += 1;
        }
    }

    pub fn cycle_tab(&mut self, now: NaiveDateTime) {
        self.tab = self.tab.next();
        self.selected = clamp_selection(self.selected, self.visible(now).len());
    }

    pub fn open_form(&mut self) {
        self.form = Some(HabitForm::default());
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    pub fn submit_form(&mut self) -> Option<Command> {
        let form = self.form.as_ref()?;
        let name = form.name.trim();
        if name.is_empty() {
            return None;
        }
        let draft = HabitDraft {
            name: name.to_string(),
            frequency: form.frequency,
        };
        let command = self.mutate(HabitMutation::Create(draft))?;
        if let Some(form) = self.form.as_mut() {
            form.submitted = true;
        }
        Some(command)
    }

    pub fn check_in_selected(&mut self, now: NaiveDateTime) -> Option<Command> {
        let id = self.selected_habit(now)?.id;
        self.mutate(HabitMutation::CheckIn(id))
    }

    /// First step of deletion: remember what to delete and wait for a yes
    pub fn request_delete(&mut self, now: NaiveDateTime) -> bool {
        let id = self.selected_habit(now).map(|h| h.id);
        self.confirm_delete = id;
        id.is_some()
    }

    pub fn confirm_delete(&mut self) -> Option<Command> {
        let id = self.confirm_delete.take()?;
        self.mutate(HabitMutation::Delete(id))
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    fn mutate(&mut self, mutation: HabitMutation) -> Option<Command> {
        let target = mutation.action().target();
        if !self.in_flight.try_begin(target) {
            tracing::debug!(?target, "habit mutation rejected, previous one still in flight");
            self.notice = Some("Still saving the previous change…".to_string());
            return None;
        }
        self.notice = None;
        Some(Command::MutateHabit(mutation))
    }

    pub fn on_fetched(
        &mut self,
        generation: u64,
        result: Result<Vec<Habit>, ApiError>,
        now: NaiveDateTime,
    ) {
        if generation != self.generation {
            return;
        }

        self.loading = false;
        match result {
            Ok(habits) => {
                tracing::info!(count = habits.len(), "habits loaded");
                self.habits = habits;
                self.selected = clamp_selection(self.selected, self.visible(now).len());
            }
            Err(err) => {
                tracing::error!(error = %err, "fetching habits failed");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
    }

    pub fn on_mutated(&mut self, action: HabitAction, result: Result<(), ApiError>) -> Option<Command> {
        self.in_flight.finish(action.target());
        let owns_form = action == HabitAction::Create && self.form.as_ref().is_some_and(|f| f.submitted);

        match result {
            Ok(()) => {
                tracing::info!(?action, "habit mutation saved");
                if owns_form {
                    self.form = None;
                }
                Some(self.load())
            }
            Err(err) => {
                tracing::error!(?action, error = %err, "habit mutation failed");
                if owns_form {
                    if let Some(form) = self.form.as_mut() {
                        form.submitted = false;
                    }
                }
                self.error = Some(action.failure_message().to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::dispatch::{execute, Outcome};
    use crate::domain::parse_timestamp;

    fn drive(ctrl: &mut HabitController, api: &FakeApi, first: Command) {
        let mut queue = vec![first];
        while let Some(command) = queue.pop() {
            match execute(api, command) {
                Outcome::HabitsFetched { generation, result } => {
                    ctrl.on_fetched(generation, result, now())
                }
                Outcome::HabitMutated { action, result } => queue.extend(ctrl.on_mutated(action, result)),
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    fn now() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    #[test]
    fn test_create_and_check_in() {
        let api = FakeApi::new();
        let mut ctrl = HabitController::new();

        ctrl.open_form();
        ctrl.form.as_mut().unwrap().name = "Drink water".to_string();
        let create = ctrl.submit_form().unwrap();
        drive(&mut ctrl, &api, create);

        assert!(ctrl.form.is_none());
        assert_eq!(ctrl.habits.len(), 1);
        assert_eq!(ctrl.habits[0].frequency, Frequency::Daily);

        let check_in = ctrl.check_in_selected(now()).unwrap();
        drive(&mut ctrl, &api, check_in);

        assert_eq!(api.count("list_habits"), 2);
        assert!(ctrl.habits[0].checked_in_recently(now()));
    }

    #[test]
    fn test_blank_name_is_not_sent() {
        let mut ctrl = HabitController::new();
        ctrl.open_form();
        ctrl.form.as_mut().unwrap().name = "   ".to_string();
        assert!(ctrl.submit_form().is_none());
        assert!(!ctrl.is_saving_form());
    }

    #[test]
    fn test_reopened_form_survives_earlier_create_settling() {
        let mut ctrl = HabitController::new();
        ctrl.open_form();
        ctrl.form.as_mut().unwrap().name = "Stretch".to_string();
        assert!(ctrl.submit_form().is_some());
        assert!(ctrl.is_saving_form());

        ctrl.cancel_form();
        ctrl.open_form();
        ctrl.form.as_mut().unwrap().name = "Rea".to_string();
        assert!(!ctrl.is_saving_form());

        assert!(ctrl.on_mutated(HabitAction::Create, Ok(())).is_some());
        assert_eq!(ctrl.form.as_ref().unwrap().name, "Rea");
    }

    #[test]
    fn test_refetch_clamps_selection_to_visible_tab() {
        let at = parse_timestamp("2024-05-15T10:00:00").unwrap();
        let habit = |id, last: Option<&str>| Habit {
            id,
            name: format!("habit {}", id),
            frequency: Frequency::Daily,
            last_checkin: last.and_then(parse_timestamp),
            streak: 0,
        };
        let mut ctrl = HabitController::new();
        ctrl.tab = HabitTab::Completed;
        ctrl.selected = 2;

        let Command::FetchHabits { generation } = ctrl.load() else {
            panic!("expected fetch");
        };
        let habits = vec![
            habit(1, None),
            habit(2, Some("2024-05-15T08:00:00")),
            habit(3, Some("2024-05-10T08:00:00")),
        ];
        ctrl.on_fetched(generation, Ok(habits), at);

        assert_eq!(ctrl.visible(at).len(), 1);
        assert_eq!(ctrl.selected, 0);
        assert_eq!(ctrl.selected_habit(at).map(|h| h.id), Some(2));
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let api = FakeApi::new();
        api.state.lock().unwrap().habits = vec![Habit {
            id: 4,
            name: "Journal".to_string(),
            frequency: Frequency::Weekly,
            last_checkin: parse_timestamp("2024-01-01"),
            streak: 1,
        }];
        let mut ctrl = HabitController::new();
        let load = ctrl.load();
        drive(&mut ctrl, &api, load);

        assert!(ctrl.request_delete(now()));
        assert_eq!(ctrl.confirm_delete, Some(4));
        ctrl.cancel_delete();
        assert!(ctrl.confirm_delete().is_none());

        ctrl.request_delete(now());
        let delete = ctrl.confirm_delete().unwrap();
        drive(&mut ctrl, &api, delete);
        assert!(ctrl.habits.is_empty());
    }

    #[test]
    fn test_failed_check_in_keeps_list() {
        let api = FakeApi::new();
        api.fail("check_in_habit");
        let mut ctrl = HabitController::new();
        ctrl.habits = vec![Habit {
            id: 1,
            name: "Walk".to_string(),
            frequency: Frequency::Daily,
            last_checkin: None,
            streak: 0,
        }];

        let check_in = ctrl.check_in_selected(now()).unwrap();
        assert!(ctrl.is_busy(1));
        assert!(ctrl.check_in_selected(now()).is_none());
        drive(&mut ctrl, &api, check_in);

        assert!(!ctrl.is_busy(1));
        assert_eq!(ctrl.error.as_deref(), Some("Failed to check in. Please try again."));
        assert_eq!(api.count("list_habits"), 0);
        assert_eq!(ctrl.habits.len(), 1);
    }
}
