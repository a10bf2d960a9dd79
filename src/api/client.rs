use futures::future::join_all;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use super::ApiError;
use super::wire::{ConversationPage, Items, MessagesResponse, NewTask, RemoteContact, RemoteTask, StatusUpdate};
use crate::core::contact::Contact;
use crate::core::conversation::ConversationStatus;
use crate::core::message::Message;
use crate::core::task::{Task, TaskStatus};

/// REST client for the CRM backend (conversations, messages, contacts, tasks).
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().build().map_err(ApiError::Client)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path, with or without its leading slash.
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// `path` followed by percent-encoded `segments`.
    fn url_with_segments(&self, path: &str, segments: &[&str]) -> Result<Url, ApiError> {
        let raw = self.api_url(path);
        let mut url = Url::parse(&raw).map_err(|_| ApiError::Url(raw.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(raw.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let resp = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T, ApiError> {
        let resp = self.send(request, url).await?;
        resp.json().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub async fn fetch_conversations(
        &self,
        status: Option<ConversationStatus>,
    ) -> Result<ConversationPage, ApiError> {
        let url = self.api_url("/api/conversations");
        let mut request = self.http.get(&url);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_keyword())]);
        }
        let page: ConversationPage = self.get_json(request, &url).await?;
        log::info!("Loaded {} conversation(s) of {}", page.items.len(), page.total);
        Ok(page)
    }

    pub async fn fetch_messages(&self, conversation_id: &str) -> Result<Vec<Message>, ApiError> {
        let url = self.url_with_segments("/api/conversations", &[conversation_id, "messages"])?;
        let resp: MessagesResponse = self.get_json(self.http.get(url.clone()), url.as_str()).await?;
        Ok(resp
            .items
            .into_iter()
            .map(|m| m.into_message(conversation_id))
            .collect())
    }

    /// Missing or unreachable contacts are `None`; the panel shows a
    /// placeholder instead of an error.
    pub async fn fetch_contact(&self, contact_id: &str) -> Option<Contact> {
        let url = match self.url_with_segments("/api/contacts", &[contact_id]) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("fetch_contact: {}", e);
                return None;
            }
        };
        match self
            .get_json::<RemoteContact>(self.http.get(url.clone()), url.as_str())
            .await
        {
            Ok(remote) => Some(remote.into_contact(contact_id)),
            Err(e) if e.is_not_found() => {
                log::debug!("No contact {}", contact_id);
                None
            }
            Err(e) => {
                log::warn!("fetch_contact: {}", e);
                None
            }
        }
    }

    /// Open tasks of one conversation. An empty id or a failed request yields
    /// no tasks rather than an error.
    pub async fn fetch_tasks(&self, conversation_id: &str) -> Vec<Task> {
        if conversation_id.is_empty() {
            return Vec::new();
        }
        let url = self.api_url("/api/tasks");
        let request = self
            .http
            .get(&url)
            .query(&task_query(conversation_id));
        match self.get_json::<Items<RemoteTask>>(request, &url).await {
            Ok(items) => items.items.into_iter().map(Task::from).collect(),
            Err(e) => {
                log::error!("Failed to load tasks for {}: {}", conversation_id, e);
                Vec::new()
            }
        }
    }

    /// Tasks of several conversations fetched concurrently, concatenated in
    /// the order of `conversation_ids`.
    pub async fn fetch_all_tasks(&self, conversation_ids: &[&str]) -> Vec<Task> {
        let batches = join_all(conversation_ids.iter().map(|id| self.fetch_tasks(id))).await;
        batches.into_iter().flatten().collect()
    }

    pub async fn create_task(&self, input: &NewTask) -> Result<Task, ApiError> {
        let url = self.api_url("/api/tasks");
        let request = self.http.post(&url).json(input);
        let created: RemoteTask = self.get_json(request, &url).await?;
        log::info!("Created task {} on {}", created.id, input.conversation_id);
        Ok(created.into())
    }

    pub async fn complete_task(&self, task_id: &str) -> Result<(), ApiError> {
        let url = self.url_with_segments("/api/tasks", &[task_id])?;
        let body = StatusUpdate {
            status: TaskStatus::Done.as_keyword(),
        };
        let request = self.http.request(Method::PATCH, url.clone()).json(&body);
        self.send(request, url.as_str()).await?;
        Ok(())
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), ApiError> {
        let url = self.url_with_segments("/api/tasks", &[task_id])?;
        self.send(self.http.delete(url.clone()), url.as_str()).await?;
        Ok(())
    }
}

/// `GET /api/tasks` lists every status unless asked; completed tasks stay
/// out of the overlay.
fn task_query(conversation_id: &str) -> [(&str, &str); 2] {
    [("conversationId", conversation_id), ("status", "pending")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_paths() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.api_url("/api/tasks"), "http://localhost:5000/api/tasks");
        assert_eq!(client.api_url("api/tasks"), "http://localhost:5000/api/tasks");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let client = ApiClient::new("http://127.0.0.1:5050").unwrap();
        let url = client
            .url_with_segments("/api/conversations", &["conv 1/x", "messages"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5050/api/conversations/conv%201%2Fx/messages"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let client = ApiClient::new("not a url").unwrap();
        let err = client.url_with_segments("/api/tasks", &["t1"]).unwrap_err();
        assert!(matches!(err, ApiError::Url(_)));
    }

    #[test]
    fn task_listing_asks_for_open_tasks_only() {
        let query = task_query("conv_1");
        assert_eq!(query[0], ("conversationId", "conv_1"));
        assert_eq!(query[1].1, TaskStatus::Pending.as_keyword());
    }

    #[test]
    fn not_found_is_recognized() {
        let missing = ApiError::Status {
            url: "http://127.0.0.1:5050/api/contacts/x".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        let broken = ApiError::Status {
            url: "http://127.0.0.1:5050/api/contacts/x".to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
        assert!(!ApiError::Url("x".to_string()).is_not_found());
    }

    #[tokio::test]
    async fn empty_conversation_id_skips_request() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.fetch_tasks("").await.is_empty());
    }
}
