use super::guard::InFlight;
use crate::api::ApiError;
use crate::dispatch::{Command, TaskAction, TaskMutation};
use crate::domain::{
    clamp_selection, project_tasks, EntityId, SortKey, StatusFilter, Task, TaskDraft, TaskStatus,
};
use chrono::NaiveDate;

const FETCH_FAILED: &str = "Failed to fetch tasks. Please try again.";

/// Add/edit form for a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    /// Task being edited; None when creating
    pub editing: Option<EntityId>,
    pub status: Option<TaskStatus>,
    pub field: usize, // 0 = title, 1 = description, 2 = due date
    pub error: Option<String>,
    /// Set once this form's request has been sent
    pub submitted: bool,
}

impl TaskForm {
    pub fn for_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.date().format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            editing: Some(task.id),
            status: Some(task.status),
            field: 0,
            error: None,
            submitted: false,
        }
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % 3;
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.title,
            1 => &mut self.description,
            _ => &mut self.due_date,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.current_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.current_mut().pop();
    }

    /// Validate and build the request body
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }

        let due = self.due_date.trim();
        let due_date = if due.is_empty() {
            None
        } else {
            NaiveDate::parse_from_str(due, "%Y-%m-%d")
                .map_err(|_| "Due date must be YYYY-MM-DD".to_string())?;
            Some(due.to_string())
        };

        Ok(TaskDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            due_date,
            status: self.status.unwrap_or(TaskStatus::Pending),
        })
    }
}

/// Task screen state: the last fetched snapshot plus local projection.
///
/// Every successful mutation is followed by a full refetch instead of a
/// local patch, so the list always converges on what the server holds at
/// the cost of a second round trip. Overlapping fetches are resolved by
/// generation: only the newest one is applied.
#[derive(Debug, Default)]
pub struct TaskListController {
    pub tasks: Vec<Task>,
    pub filter: StatusFilter,
    pub search: String,
    pub sort: SortKey,
    pub selected: usize,
    pub form: Option<TaskForm>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    generation: u64,
    in_flight: InFlight,
}

impl TaskListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a full fetch, superseding any fetch still outstanding
    pub fn load(&mut self) -> Command {
        self.generation += 1;
        self.loading = true;
        Command::FetchTasks {
            generation: self.generation,
        }
    }

    /// Filtered, searched and sorted rows currently shown
    pub fn visible(&self) -> Vec<&Task> {
        project_tasks(&self.tasks, self.filter, &self.search, self.sort)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible().get(self.selected).copied()
    }

    pub fn is_busy(&self, id: EntityId) -> bool {
        self.in_flight.is_busy(id)
    }

    pub fn is_saving_form(&self) -> bool {
        match self.form.as_ref() {
            Some(form) if form.submitted => match form.editing {
                Some(id) => self.in_flight.is_busy(id),
                None => self.in_flight.is_creating(),
            },
            _ => false,
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.visible().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.reclamp();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.reclamp();
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.reclamp();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.reclamp();
    }

    fn reclamp(&mut self) {
        self.selected = clamp_selection(self.selected, self.visible().len());
    }

    pub fn open_create_form(&mut self) {
        self.form = Some(TaskForm::default());
    }

    pub fn open_edit_form(&mut self) {
        let form = self.selected_task().map(TaskForm::for_task);
        if form.is_some() {
            self.form = form;
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validate the open form and turn it into a create or update request.
    /// The form stays open until the server answers. Only a form that sent
    /// the request is closed by its answer.
    pub fn submit_form(&mut self) -> Option<Command> {
        let form = self.form.as_mut()?;
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(message) => {
                form.error = Some(message);
                return None;
            }
        };
        form.error = None;

        let mutation = match form.editing {
            Some(id) => TaskMutation::Update(id, draft),
            None => TaskMutation::Create(draft),
        };
        let command = self.mutate(mutation)?;
        if let Some(form) = self.form.as_mut() {
            form.submitted = true;
        }
        Some(command)
    }

    pub fn toggle_selected(&mut self) -> Option<Command> {
        let task = self.selected_task()?;
        let mutation = TaskMutation::Toggle(task.id, TaskDraft::toggled_from(task));
        self.mutate(mutation)
    }

    pub fn delete_selected(&mut self) -> Option<Command> {
        let id = self.selected_task()?.id;
        self.mutate(TaskMutation::Delete(id))
    }

    fn mutate(&mut self, mutation: TaskMutation) -> Option<Command> {
        let target = mutation.action().target();
        if !self.in_flight.try_begin(target) {
            tracing::debug!(?target, "mutation rejected, previous one still in flight");
            self.notice = Some("Still saving the previous change…".to_string());
            return None;
        }
        self.notice = None;
        Some(Command::MutateTask(mutation))
    }

    /// Apply a fetched list; stale generations are dropped
    pub fn on_fetched(&mut self, generation: u64, result: Result<Vec<Task>, ApiError>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale task list");
            return;
        }

        self.loading = false;
        match result {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.error = None;
                self.reclamp();
            }
            Err(err) => {
                tracing::error!(error = %err, "fetching tasks failed");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
    }

    /// Settle a mutation; success triggers the refetch
    pub fn on_mutated(&mut self, action: TaskAction, result: Result<(), ApiError>) -> Option<Command> {
        self.in_flight.finish(action.target());

        let owns_form = match (action, self.form.as_ref()) {
            (TaskAction::Create, Some(form)) => form.submitted && form.editing.is_none(),
            (TaskAction::Update(id), Some(form)) => form.submitted && form.editing == Some(id),
            _ => false,
        };

        match result {
            Ok(()) => {
                tracing::info!(?action, "task mutation saved");
                if owns_form {
                    self.form = None;
                }
                self.error = None;
                Some(self.load())
            }
            Err(err) => {
                tracing::error!(?action, error = %err, "task mutation failed");
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

    /// Run commands to completion against the fake, feeding follow-ups back in
    fn drive(ctrl: &mut TaskListController, api: &FakeApi, first: Command) {
        let mut queue = vec![first];
        while let Some(command) = queue.pop() {
            match execute(api, command) {
                Outcome::TasksFetched { generation, result } => ctrl.on_fetched(generation, result),
                Outcome::TaskMutated { action, result } => queue.extend(ctrl.on_mutated(action, result)),
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    fn task(id: EntityId, title: &str, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            due_date: None,
            status,
        }
    }

    #[test]
    fn test_create_then_toggle_refetches_twice() {
        let api = FakeApi::new();
        let mut ctrl = TaskListController::new();

        ctrl.open_create_form();
        for c in "Read a chapter".chars() {
            ctrl.form.as_mut().unwrap().push_char(c);
        }
        let create = ctrl.submit_form().expect("create command");
        drive(&mut ctrl, &api, create);

        assert!(ctrl.form.is_none());
        assert_eq!(ctrl.tasks.len(), 1);
        assert_eq!(ctrl.tasks[0].status, TaskStatus::Pending);

        let toggle = ctrl.toggle_selected().expect("toggle command");
        drive(&mut ctrl, &api, toggle);

        assert_eq!(api.count("list_tasks"), 2);
        assert_eq!(ctrl.tasks[0].status, TaskStatus::Complete);
        assert_eq!(api.calls(), vec!["create_task", "list_tasks", "update_task", "list_tasks"]);
    }

    #[test]
    fn test_failed_create_keeps_form_and_list() {
        let api = FakeApi::new();
        api.fail("create_task");
        let mut ctrl = TaskListController::new();
        ctrl.tasks = vec![task(1, "Existing", TaskStatus::Pending)];

        ctrl.open_create_form();
        ctrl.form.as_mut().unwrap().title = "New".to_string();
        let create = ctrl.submit_form().unwrap();
        drive(&mut ctrl, &api, create);

        assert_eq!(ctrl.form.as_ref().unwrap().title, "New");
        assert_eq!(ctrl.tasks.len(), 1);
        assert_eq!(ctrl.error.as_deref(), Some("Failed to create task. Please try again."));
        assert_eq!(api.count("list_tasks"), 0);
        assert!(!ctrl.is_saving_form());
    }

    #[test]
    fn test_reopened_form_survives_earlier_create_settling() {
        let mut ctrl = TaskListController::new();
        ctrl.open_create_form();
        ctrl.form.as_mut().unwrap().title = "first".to_string();
        assert!(ctrl.submit_form().is_some());
        assert!(ctrl.is_saving_form());

        ctrl.cancel_form();
        ctrl.open_create_form();
        ctrl.form.as_mut().unwrap().title = "second, half typed".to_string();
        assert!(!ctrl.is_saving_form());

        let refetch = ctrl.on_mutated(TaskAction::Create, Ok(()));
        assert!(matches!(refetch, Some(Command::FetchTasks { .. })));
        assert_eq!(ctrl.form.as_ref().unwrap().title, "second, half typed");
    }

    #[test]
    fn test_overlapping_mutation_on_same_task_is_rejected() {
        let mut ctrl = TaskListController::new();
        ctrl.tasks = vec![task(5, "Pay rent", TaskStatus::Pending)];

        let first = ctrl.toggle_selected();
        assert!(first.is_some());
        assert!(ctrl.is_busy(5));

        assert!(ctrl.toggle_selected().is_none());
        assert!(ctrl.delete_selected().is_none());
        assert!(ctrl.notice.is_some());

        ctrl.on_mutated(TaskAction::Toggle(5), Ok(()));
        assert!(!ctrl.is_busy(5));
        assert!(ctrl.delete_selected().is_some());
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let mut ctrl = TaskListController::new();
        let Command::FetchTasks { generation: old } = ctrl.load() else {
            panic!("expected fetch");
        };
        let Command::FetchTasks { generation: new } = ctrl.load() else {
            panic!("expected fetch");
        };

        ctrl.on_fetched(new, Ok(vec![task(2, "fresh", TaskStatus::Pending)]));
        ctrl.on_fetched(old, Ok(vec![task(1, "stale", TaskStatus::Pending)]));

        assert_eq!(ctrl.tasks[0].title, "fresh");
        assert!(!ctrl.loading);
    }

    #[test]
    fn test_failed_fetch_sets_error_and_clears_loading() {
        let mut ctrl = TaskListController::new();
        ctrl.tasks = vec![task(1, "kept", TaskStatus::Pending)];
        let Command::FetchTasks { generation } = ctrl.load() else {
            panic!("expected fetch");
        };
        ctrl.on_fetched(generation, Err(ApiError::Transport("offline".to_string())));

        assert!(!ctrl.loading);
        assert_eq!(ctrl.error.as_deref(), Some(FETCH_FAILED));
        assert_eq!(ctrl.tasks.len(), 1);
    }

    #[test]
    fn test_form_validation() {
        let mut form = TaskForm::default();
        assert_eq!(form.to_draft().unwrap_err(), "Title is required");

        form.title = "Ship".to_string();
        form.due_date = "tomorrow".to_string();
        assert_eq!(form.to_draft().unwrap_err(), "Due date must be YYYY-MM-DD");

        form.due_date = "2024-07-01".to_string();
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.due_date.as_deref(), Some("2024-07-01"));
        assert_eq!(draft.status, TaskStatus::Pending);
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let mut ctrl = TaskListController::new();
        ctrl.open_create_form();
        assert!(ctrl.submit_form().is_none());
        assert!(ctrl.form.as_ref().unwrap().error.is_some());
        assert!(!ctrl.is_saving_form());
    }

    #[test]
    fn test_edit_form_prefills_and_updates() {
        let api = FakeApi::new();
        {
            let mut state = api.state.lock().unwrap();
            state.tasks = vec![task(8, "Old title", TaskStatus::Complete)];
        }
        let mut ctrl = TaskListController::new();
        let load = ctrl.load();
        drive(&mut ctrl, &api, load);

        ctrl.open_edit_form();
        let form = ctrl.form.as_mut().unwrap();
        assert_eq!(form.editing, Some(8));
        form.title = "New title".to_string();

        let update = ctrl.submit_form().unwrap();
        assert!(matches!(&update, Command::MutateTask(TaskMutation::Update(8, d)) if d.status == TaskStatus::Complete));
        drive(&mut ctrl, &api, update);

        assert!(ctrl.form.is_none());
        assert_eq!(ctrl.tasks[0].title, "New title");
    }

    #[test]
    fn test_search_keeps_selection_in_range() {
        let mut ctrl = TaskListController::new();
        ctrl.tasks = vec![
            task(1, "alpha", TaskStatus::Pending),
            task(2, "beta", TaskStatus::Pending),
            task(3, "gamma", TaskStatus::Pending),
        ];
        ctrl.selected = 2;
        for c in "beta".chars() {
            ctrl.push_search_char(c);
        }
        assert_eq!(ctrl.selected, 0);
        assert_eq!(ctrl.selected_task().unwrap().id, 2);
    }

    #[test]
    fn test_projection_does_not_reorder_snapshot() {
        let mut ctrl = TaskListController::new();
        let mut dated = task(1, "dated", TaskStatus::Pending);
        dated.due_date = parse_timestamp("2024-01-01");
        ctrl.tasks = vec![task(2, "undated", TaskStatus::Pending), dated];
        ctrl.sort = SortKey::DueDate;

        assert_eq!(ctrl.visible()[0].id, 1);
        assert_eq!(ctrl.tasks[0].id, 2);
    }
}
