//! HTTP implementation of the backend interface

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{Backend, ChatReply, ChatRequest, Task, TranslateReply, TranslateRequest};
use crate::{Error, Result};

/// Request timeout for backend calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend reached over HTTP
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend client for the given base URL
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Resolve an endpoint path against the base URL
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("invalid endpoint {path}: {e}")))
    }

    /// Check the response status, mapping non-2xx to `Error::Backend`
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "backend error");
        Err(Error::Backend {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let url = self.endpoint("/api/todos")?;
        let response = self.client.get(url).send().await?;
        let tasks: Vec<Task> = Self::check(response).await?.json().await?;
        tracing::debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint("/api/chat")?;
        tracing::debug!(language = %request.language, "sending chat message");
        let response = self.client.post(url).json(&request).send().await?;
        let reply: ChatReply = Self::check(response).await?.json().await?;
        Ok(reply)
    }

    async fn translate_batch(&self, request: TranslateRequest) -> Result<TranslateReply> {
        let url = self.endpoint("/api/translate-batch")?;
        tracing::debug!(
            count = request.tasks.len(),
            target = %request.target_language,
            "requesting batch translation"
        );
        let response = self.client.post(url).json(&request).send().await?;
        let reply: TranslateReply = Self::check(response).await?.json().await?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let backend = HttpBackend::new(Url::parse("http://localhost:8000").unwrap()).unwrap();
        let url = backend.endpoint("/api/todos").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/todos");
    }

    #[test]
    fn test_wire_shapes() {
        let task: Task = serde_json::from_str(r#"{"id": 3, "title": "Buy milk"}"#).unwrap();
        assert_eq!(task.id, 3);
        assert!(!task.completed);

        let reply: ChatReply = serde_json::from_str(
            r#"{"response": "Done!", "todos": [{"id": 1, "title": "x", "completed": true}], "detected_language": "en"}"#,
        )
        .unwrap();
        assert_eq!(reply.response, "Done!");
        assert_eq!(reply.todos.as_ref().map(Vec::len), Some(1));

        let no_todos: ChatReply = serde_json::from_str(r#"{"response": "Hi"}"#).unwrap();
        assert!(no_todos.todos.is_none());
    }

    #[test]
    fn test_translate_request_serializes_target_language() {
        let request = TranslateRequest::new(vec!["Buy milk".to_string()], crate::Language::Ur);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["target_language"], "ur");
        assert_eq!(json["tasks"][0], "Buy milk");
    }
}
