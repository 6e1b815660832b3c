//! Remote productivity API.
//!
//! [`ApiClient`] is the seam between the screens and the network: the real
//! implementation is [`http::HttpApi`], tests script their own.

pub mod http;

use crate::domain::{EntityId, Habit, HabitDraft, ProgressRange, ProgressResponse, Task, TaskDraft};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpApi;

/// Every way a request can fail. Screens show one generic message for all
/// of them; the detail goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not logged in")]
    NotLoggedIn,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// `POST /api/signup` body
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MotivationRequest<'a> {
    pub tone: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MotivationResponse {
    pub message: String,
}

/// One AI-suggested goal
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoalSuggestion {
    pub title: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoalsResponse {
    #[serde(default)]
    pub suggestions: Vec<GoalSuggestion>,
}

/// Operations offered by the remote service.
///
/// Everything except `signup` and `login` is authenticated with the
/// session's bearer token.
pub trait ApiClient: Send + Sync {
    fn signup(&self, request: &SignupRequest) -> Result<(), ApiError>;
    /// Returns the access token
    fn login(&self, email: &str, password: &str) -> Result<String, ApiError>;

    fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError>;
    fn update_task(&self, id: EntityId, draft: &TaskDraft) -> Result<(), ApiError>;
    fn delete_task(&self, id: EntityId) -> Result<(), ApiError>;

    fn list_habits(&self) -> Result<Vec<Habit>, ApiError>;
    fn create_habit(&self, draft: &HabitDraft) -> Result<(), ApiError>;
    fn check_in_habit(&self, id: EntityId) -> Result<(), ApiError>;
    fn delete_habit(&self, id: EntityId) -> Result<(), ApiError>;

    fn progress(&self, range: ProgressRange) -> Result<ProgressResponse, ApiError>;

    fn motivation(&self, tone: &str) -> Result<String, ApiError>;
    fn suggest_goals(&self) -> Result<Vec<GoalSuggestion>, ApiError>;
}

#[cfg(test)]
pub mod fake {
    //! In-memory API used by controller and end-to-end tests

    use super::*;
    use crate::domain::TaskStatus;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct FakeState {
        pub tasks: Vec<Task>,
        pub habits: Vec<Habit>,
        pub next_id: EntityId,
        pub calls: Vec<String>,
        /// Calls whose name is listed here fail with a 500
        pub failing: Vec<&'static str>,
        pub progress_body: Option<String>,
    }

    #[derive(Debug, Default)]
    pub struct FakeApi {
        pub state: Mutex<FakeState>,
    }

    impl FakeApi {
        pub fn new() -> Self {
            let api = Self::default();
            api.state.lock().unwrap().next_id = 1;
            api
        }

        pub fn fail(&self, call: &'static str) {
            self.state.lock().unwrap().failing.push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn count(&self, call: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == call).count()
        }

        fn enter(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, FakeState>, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call.to_string());
            if state.failing.contains(&call) {
                return Err(ApiError::Status {
                    status: 500,
                    body: format!("{} failed", call),
                });
            }
            Ok(state)
        }
    }

    impl ApiClient for FakeApi {
        fn signup(&self, _request: &SignupRequest) -> Result<(), ApiError> {
            self.enter("signup").map(|_| ())
        }

        fn login(&self, _email: &str, _password: &str) -> Result<String, ApiError> {
            self.enter("login").map(|_| "header.eyJzdWIiOiI0MiJ9.sig".to_string())
        }

        fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
            self.enter("list_tasks").map(|s| s.tasks.clone())
        }

        fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
            let mut state = self.enter("create_task")?;
            let id = state.next_id;
            state.next_id += 1;
            state.tasks.push(Task {
                id,
                title: draft.title.clone(),
                description: Some(draft.description.clone()).filter(|d| !d.is_empty()),
                due_date: draft.due_date.as_deref().and_then(crate::domain::parse_timestamp),
                status: draft.status,
            });
            Ok(())
        }

        fn update_task(&self, id: EntityId, draft: &TaskDraft) -> Result<(), ApiError> {
            let mut state = self.enter("update_task")?;
            let task = state
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(ApiError::Status { status: 404, body: "not found".to_string() })?;
            task.title = draft.title.clone();
            task.status = draft.status;
            Ok(())
        }

        fn delete_task(&self, id: EntityId) -> Result<(), ApiError> {
            let mut state = self.enter("delete_task")?;
            state.tasks.retain(|t| t.id != id);
            Ok(())
        }

        fn list_habits(&self) -> Result<Vec<Habit>, ApiError> {
            self.enter("list_habits").map(|s| s.habits.clone())
        }

        fn create_habit(&self, draft: &HabitDraft) -> Result<(), ApiError> {
            let mut state = self.enter("create_habit")?;
            let id = state.next_id;
            state.next_id += 1;
            state.habits.push(Habit {
                id,
                name: draft.name.clone(),
                frequency: draft.frequency,
                last_checkin: None,
                streak: 0,
            });
            Ok(())
        }

        fn check_in_habit(&self, id: EntityId) -> Result<(), ApiError> {
            let mut state = self.enter("check_in_habit")?;
            if let Some(habit) = state.habits.iter_mut().find(|h| h.id == id) {
                habit.last_checkin = Some(chrono::Local::now().naive_local());
                habit.streak += 1;
            }
            Ok(())
        }

        fn delete_habit(&self, id: EntityId) -> Result<(), ApiError> {
            let mut state = self.enter("delete_habit")?;
            state.habits.retain(|h| h.id != id);
            Ok(())
        }

        fn progress(&self, _range: ProgressRange) -> Result<ProgressResponse, ApiError> {
            let state = self.enter("progress")?;
            let completed = state.tasks.iter().filter(|t| t.status == TaskStatus::Complete).count();
            let pending = state.tasks.len() - completed;
            let body = state.progress_body.clone().unwrap_or_else(|| {
                format!(
                    r#"{{"tasks": {{"completed": {}, "pending": {}, "overdue": 0}}}}"#,
                    completed, pending
                )
            });
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
        }

        fn motivation(&self, tone: &str) -> Result<String, ApiError> {
            self.enter("motivation").map(|_| format!("Keep going ({})", tone))
        }

        fn suggest_goals(&self) -> Result<Vec<GoalSuggestion>, ApiError> {
            self.enter("suggest_goals").map(|_| {
                vec![GoalSuggestion {
                    title: "Complete 2 tasks".to_string(),
                    why: "Helps reduce backlog".to_string(),
                    difficulty: Some("medium".to_string()),
                }]
            })
        }
    }
}
