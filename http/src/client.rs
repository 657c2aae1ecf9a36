//! `reqwest` implementation of [`TodoApi`]

use crate::config::{ApiConfig, ConfigError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use todo_sections_core::environment::TodoApi;
use todo_sections_core::error::TodoError;
use todo_sections_core::model::{CreatedTodo, NewTodo, OwnerRef, Todo, TodoId, User, UserId};

/// HTTP client for the remote todo store
#[derive(Clone, Debug)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

/// Todo as returned by the write endpoints, optionally with its owner's username
#[derive(Deserialize)]
struct WireTodo {
    #[serde(flatten)]
    todo: Todo,
    #[serde(default)]
    username: Option<String>,
}

/// Response of the write endpoints
///
/// Accepts both the `{success, todo}` envelope and a bare todo.
#[derive(Deserialize)]
#[serde(untagged)]
enum TodoBody {
    Bare(WireTodo),
    Envelope {
        #[serde(default = "success_default")]
        success: bool,
        #[serde(default)]
        todo: Option<WireTodo>,
        #[serde(default)]
        message: Option<String>,
    },
}

const fn success_default() -> bool {
    true
}

impl TodoBody {
    fn into_todo(self) -> Result<WireTodo, TodoError> {
        match self {
            Self::Bare(todo)
            | Self::Envelope {
                success: true,
                todo: Some(todo),
                ..
            } => Ok(todo),
            Self::Envelope { message, .. } => Err(TodoError::Unknown(
                message.unwrap_or_else(|| "Server did not return a todo".to_string()),
            )),
        }
    }
}

#[derive(Serialize)]
struct CompletedPatch {
    completed: bool,
}

#[derive(Serialize)]
struct NewTodoBody<'a> {
    title: &'a str,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
}

impl<'a> From<&'a NewTodo> for NewTodoBody<'a> {
    fn from(todo: &'a NewTodo) -> Self {
        let (username, user_id) = match todo.owner() {
            OwnerRef::Username(name) => (Some(name.as_str()), None),
            OwnerRef::UserId(id) => (None, Some(*id)),
        };
        Self {
            title: todo.title(),
            completed: todo.is_completed(),
            username,
            user_id,
        }
    }
}

impl HttpTodoApi {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from `TODOS_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the environment is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&ApiConfig::from_env()?)
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends the request and maps transport and status failures
    ///
    /// `missing` is the id a 404 refers to, for the per-todo endpoints.
    async fn execute(
        &self,
        request: RequestBuilder,
        missing: Option<TodoId>,
    ) -> Result<Response, TodoError> {
        let response = request
            .send()
            .await
            .map_err(|e| TodoError::transport(e.to_string()))?;

        match (response.status(), missing) {
            (status, _) if status.is_success() => Ok(response),
            (StatusCode::NOT_FOUND, Some(id)) => Err(TodoError::NotFound { id }),
            (status, _) => Err(TodoError::http(
                status.as_u16(),
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown status")
                ),
            )),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TodoError> {
        response
            .json::<T>()
            .await
            .map_err(|e| TodoError::Unknown(format!("Malformed response: {e}")))
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn fetch_users(&self) -> Result<Vec<User>, TodoError> {
        tracing::debug!("GET /users");
        let response = self.execute(self.client.get(self.url("/users")), None).await?;
        Self::decode(response).await
    }

    async fn fetch_todos(&self, owner: Option<UserId>) -> Result<Vec<Todo>, TodoError> {
        tracing::debug!(?owner, "GET /todos");
        let mut request = self.client.get(self.url("/todos"));
        if let Some(owner) = owner {
            request = request.query(&[("userId", owner.get())]);
        }
        let response = self.execute(request, None).await?;
        Self::decode(response).await
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<Todo, TodoError> {
        tracing::debug!(%id, completed, "PATCH /todos/:id");
        let request = self
            .client
            .patch(self.url(&format!("/todos/{id}")))
            .json(&CompletedPatch { completed });
        let response = self.execute(request, Some(id)).await?;
        let body: TodoBody = Self::decode(response).await?;
        Ok(body.into_todo()?.todo)
    }

    async fn delete_todo(&self, id: TodoId) -> Result<(), TodoError> {
        tracing::debug!(%id, "DELETE /todos/:id");
        let request = self.client.delete(self.url(&format!("/todos/{id}")));
        self.execute(request, Some(id)).await?;
        Ok(())
    }

    async fn add_todo(&self, todo: NewTodo) -> Result<CreatedTodo, TodoError> {
        tracing::debug!(owner = %todo.owner(), "POST /todos");
        let request = self
            .client
            .post(self.url("/todos"))
            .json(&NewTodoBody::from(&todo));
        let response = self.execute(request, None).await?;
        let body: TodoBody = Self::decode(response).await?;
        let wire = body.into_todo()?;

        Ok(CreatedTodo {
            todo: wire.todo,
            username: wire.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn api(server: &MockServer) -> Result<HttpTodoApi, ConfigError> {
        HttpTodoApi::new(&ApiConfig::default().with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn fetches_users_ignoring_extra_fields() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Leanne Graham", "username": "Bret", "email": "Sincere@april.biz"},
                {"id": "2", "username": "Antonette"}
            ])))
            .mount(&server)
            .await;

        let users = api(&server).await?.fetch_users().await?;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "Bret");
        assert_eq!(users[1].id, UserId::new(2));
        assert_eq!(users[1].name, "");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_todos_passes_owner_filter() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("userId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "userId": 1, "title": "delectus aut autem", "completed": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let todos = api(&server).await?.fetch_todos(Some(UserId::new(1))).await?;
        assert_eq!(todos, vec![Todo::new(TodoId::new(1), UserId::new(1), "delectus aut autem", false)]);
        Ok(())
    }

    #[tokio::test]
    async fn server_error_maps_to_network() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = api(&server).await?.fetch_users().await.err();
        assert_eq!(
            err,
            Some(TodoError::http(500, "HTTP 500: Internal Server Error"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn set_completed_unwraps_envelope() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/todos/7"))
            .and(body_json(json!({"completed": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "todo": {"id": 7, "userId": 1, "title": "x", "completed": true}
            })))
            .mount(&server)
            .await;

        let todo = api(&server).await?.set_completed(TodoId::new(7), true).await?;
        assert!(todo.completed);
        assert_eq!(todo.id, TodoId::new(7));
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_todo_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let result = api(&server).await?.delete_todo(TodoId::new(9)).await;
        assert_eq!(result, Err(TodoError::NotFound { id: TodoId::new(9) }));
        Ok(())
    }

    #[tokio::test]
    async fn add_sends_username_and_reads_it_back() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(body_json(json!({"title": "write docs", "completed": false, "username": "newbie"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "todo": {"id": 11, "userId": 5, "title": "write docs", "completed": false, "username": "newbie"}
            })))
            .mount(&server)
            .await;

        let new = NewTodo::new(" write docs ", OwnerRef::Username("newbie".into()))?;
        let created = api(&server).await?.add_todo(new).await?;
        assert_eq!(created.todo.owner_id, UserId::new(5));
        assert_eq!(created.username.as_deref(), Some("newbie"));
        Ok(())
    }

    #[tokio::test]
    async fn add_by_user_id_sends_user_id() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(body_json(json!({"title": "t", "completed": false, "userId": 3})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 12, "userId": 3, "title": "t", "completed": false
            })))
            .mount(&server)
            .await;

        let new = NewTodo::new("t", OwnerRef::UserId(UserId::new(3)))?;
        let created = api(&server).await?.add_todo(new).await?;
        assert_eq!(created.todo.id, TodoId::new(12));
        assert_eq!(created.username, None);
        Ok(())
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_unknown_error() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/todos/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false, "message": "locked"
            })))
            .mount(&server)
            .await;

        let result = api(&server).await?.set_completed(TodoId::new(1), false).await;
        assert_eq!(result, Err(TodoError::Unknown("locked".to_string())));
        Ok(())
    }
}
