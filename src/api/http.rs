use super::{
    ApiClient, ApiError, GoalSuggestion, GoalsResponse, LoginRequest, LoginResponse,
    MotivationRequest, MotivationResponse, SignupRequest,
};
use crate::domain::{EntityId, Habit, HabitDraft, ProgressRange, ProgressResponse, Task, TaskDraft};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Blocking reqwest client for the remote API.
///
/// Calls block the calling thread; the TUI only ever invokes them from
/// dispatcher worker threads.
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotLoggedIn)?;
        Ok(builder.bearer_auth(token))
    }

    fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %body, "request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(builder)?;
        response.json::<T>().map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::send(builder).map(|_| ())
    }
}

impl ApiClient for HttpApi {
    fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        tracing::info!(email = %request.email, "signing up");
        Self::send_empty(self.client.post(self.url("/signup")).json(request))
    }

    fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        tracing::info!(%email, "logging in");
        let body = LoginRequest { email, password };
        let response: LoginResponse =
            Self::send_json(self.client.post(self.url("/login")).json(&body))?;
        Ok(response.access_token)
    }

    fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        Self::send_json(self.authed(self.client.get(self.url("/tasks")))?)
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        Self::send_empty(self.authed(self.client.post(self.url("/tasks")))?.json(draft))
    }

    fn update_task(&self, id: EntityId, draft: &TaskDraft) -> Result<(), ApiError> {
        let url = self.url(&format!("/tasks/{}", id));
        Self::send_empty(self.authed(self.client.put(url))?.json(draft))
    }

    fn delete_task(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.url(&format!("/tasks/{}", id));
        Self::send_empty(self.authed(self.client.delete(url))?)
    }

    fn list_habits(&self) -> Result<Vec<Habit>, ApiError> {
        Self::send_json(self.authed(self.client.get(self.url("/habits")))?)
    }

    fn create_habit(&self, draft: &HabitDraft) -> Result<(), ApiError> {
        Self::send_empty(self.authed(self.client.post(self.url("/habits")))?.json(draft))
    }

    fn check_in_habit(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.url(&format!("/habits/{}/checkin", id));
        Self::send_empty(self.authed(self.client.post(url))?.json(&serde_json::json!({})))
    }

    fn delete_habit(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.url(&format!("/habits/{}", id));
        Self::send_empty(self.authed(self.client.delete(url))?)
    }

    fn progress(&self, range: ProgressRange) -> Result<ProgressResponse, ApiError> {
        let request = self
            .client
            .get(self.url("/progress"))
            .query(&[("range", range.as_query())]);
        Self::send_json(self.authed(request)?)
    }

    fn motivation(&self, tone: &str) -> Result<String, ApiError> {
        let body = MotivationRequest { tone };
        let response: MotivationResponse =
            Self::send_json(self.authed(self.client.post(self.url("/ai/motivation")))?.json(&body))?;
        Ok(response.message.trim().to_string())
    }

    fn suggest_goals(&self) -> Result<Vec<GoalSuggestion>, ApiError> {
        let request = self
            .authed(self.client.post(self.url("/ai/suggest-goals")))?
            .json(&serde_json::json!({}));
        let response: GoalsResponse = Self::send_json(request)?;
        Ok(response.suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(token: Option<&str>) -> HttpApi {
        HttpApi::new(
            "http://localhost:5000/",
            Duration::from_secs(1),
            token.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let api = api(None);
        assert_eq!(api.url("/tasks/3"), "http://localhost:5000/api/tasks/3");
        assert_eq!(api.url("/ai/motivation"), "http://localhost:5000/api/ai/motivation");
    }

    #[test]
    fn test_authenticated_calls_need_token() {
        let api = api(None);
        assert!(matches!(api.list_tasks(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(api.delete_habit(1), Err(ApiError::NotLoggedIn)));
        assert!(matches!(api.progress(ProgressRange::Week), Err(ApiError::NotLoggedIn)));
    }
}
