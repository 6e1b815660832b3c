use crate::api::{ApiClient, ApiError, GoalSuggestion};
use crate::domain::{EntityId, Habit, HabitDraft, ProgressRange, ProgressResponse, Task, TaskDraft};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// A change to a task on the server
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMutation {
    Create(TaskDraft),
    Update(EntityId, TaskDraft),
    Toggle(EntityId, TaskDraft),
    Delete(EntityId),
}

/// What a task mutation was, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Create,
    Update(EntityId),
    Toggle(EntityId),
    Delete(EntityId),
}

impl TaskMutation {
    pub fn action(&self) -> TaskAction {
        match self {
            Self::Create(_) => TaskAction::Create,
            Self::Update(id, _) => TaskAction::Update(*id),
            Self::Toggle(id, _) => TaskAction::Toggle(*id),
            Self::Delete(id) => TaskAction::Delete(*id),
        }
    }
}

impl TaskAction {
    /// Entity the mutation targets; creation has none yet
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Self::Create => None,
            Self::Update(id) | Self::Toggle(id) | Self::Delete(id) => Some(*id),
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Create => "Failed to create task. Please try again.",
            Self::Update(_) => "Failed to update task. Please try again.",
            Self::Toggle(_) => "Failed to change task status. Please try again.",
            Self::Delete(_) => "Failed to delete task. Please try again.",
        }
    }
}

/// A change to a habit on the server
#[derive(Debug, Clone, PartialEq)]
pub enum HabitMutation {
    Create(HabitDraft),
    CheckIn(EntityId),
    Delete(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitAction {
    Create,
    CheckIn(EntityId),
    Delete(EntityId),
}

impl HabitMutation {
    pub fn action(&self) -> HabitAction {
        match self {
            Self::Create(_) => HabitAction::Create,
            Self::CheckIn(id) => HabitAction::CheckIn(*id),
            Self::Delete(id) => HabitAction::Delete(*id),
        }
    }
}

impl HabitAction {
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Self::Create => None,
            Self::CheckIn(id) | Self::Delete(id) => Some(*id),
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Create => "Failed to create habit. Please try again.",
            Self::CheckIn(_) => "Failed to check in. Please try again.",
            Self::Delete(_) => "Failed to delete habit. Please try again.",
        }
    }
}

/// A request a screen wants made
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchTasks { generation: u64 },
    MutateTask(TaskMutation),
    FetchHabits { generation: u64 },
    MutateHabit(HabitMutation),
    FetchProgress { range: ProgressRange, generation: u64 },
    FetchMotivation { tone: String },
    FetchGoals,
}

/// The settled result of a [`Command`]
#[derive(Debug)]
pub enum Outcome {
    TasksFetched {
        generation: u64,
        result: Result<Vec<Task>, ApiError>,
    },
    TaskMutated {
        action: TaskAction,
        result: Result<(), ApiError>,
    },
    HabitsFetched {
        generation: u64,
        result: Result<Vec<Habit>, ApiError>,
    },
    HabitMutated {
        action: HabitAction,
        result: Result<(), ApiError>,
    },
    ProgressFetched {
        range: ProgressRange,
        generation: u64,
        result: Result<ProgressResponse, ApiError>,
    },
    MotivationFetched(Result<String, ApiError>),
    GoalsFetched(Result<Vec<GoalSuggestion>, ApiError>),
}

/// Run one command against the API, blocking until it settles
pub fn execute(api: &dyn ApiClient, command: Command) -> Outcome {
    tracing::debug!(?command, "executing");
    match command {
        Command::FetchTasks { generation } => Outcome::TasksFetched {
            generation,
            result: api.list_tasks(),
        },
        Command::MutateTask(mutation) => {
            let action = mutation.action();
            let result = match &mutation {
                TaskMutation::Create(draft) => api.create_task(draft),
                TaskMutation::Update(id, draft) | TaskMutation::Toggle(id, draft) => {
                    api.update_task(*id, draft)
                }
                TaskMutation::Delete(id) => api.delete_task(*id),
            };
            Outcome::TaskMutated { action, result }
        }
        Command::FetchHabits { generation } => Outcome::HabitsFetched {
            generation,
            result: api.list_habits(),
        },
        Command::MutateHabit(mutation) => {
            let action = mutation.action();
            let result = match &mutation {
                HabitMutation::Create(draft) => api.create_habit(draft),
                HabitMutation::CheckIn(id) => api.check_in_habit(*id),
                HabitMutation::Delete(id) => api.delete_habit(*id),
            };
            Outcome::HabitMutated { action, result }
        }
        Command::FetchProgress { range, generation } => Outcome::ProgressFetched {
            range,
            generation,
            result: api.progress(range),
        },
        Command::FetchMotivation { tone } => Outcome::MotivationFetched(api.motivation(&tone)),
        Command::FetchGoals => Outcome::GoalsFetched(api.suggest_goals()),
    }
}

/// Runs commands off the UI thread.
///
/// Each command gets its own short-lived worker; results come back over a
/// channel the event loop drains once per iteration. There is no retry and
/// no cancellation: a slow request just settles late.
pub struct Dispatcher {
    api: Arc<dyn ApiClient>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
    pending: usize,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn submit(&mut self, command: Command) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.pending += 1;
        thread::spawn(move || {
            let outcome = execute(api.as_ref(), command);
            // The receiver only goes away at shutdown
            let _ = tx.send(outcome);
        });
    }

    pub fn submit_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.submit(command);
        }
    }

    /// Outcomes that settled since the last call
    pub fn drain(&mut self) -> Vec<Outcome> {
        let outcomes: Vec<Outcome> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(outcomes.len());
        outcomes
    }

    /// Requests submitted but not yet drained
    pub fn pending(&self) -> usize {
        self.pending
    }
}
