//! HTTP client for the `synk-api` record host.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::mpsc;

use super::{RemoteChange, RemoteChanges, RemoteRecord, RemoteStore, ROOM_HEADER};
use crate::config::{SyncSettings, ROOM_ID};
use crate::error::{Error, Result};

/// Extra time allowed on top of the server-side long-poll wait
const WATCH_GRACE: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpRemote {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
    watch_timeout: Duration,
    retry_backoff: Duration,
}

impl std::fmt::Debug for HttpRemote {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HttpRemote")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("watch_timeout", &self.watch_timeout)
            .finish_non_exhaustive()
    }
}

impl HttpRemote {
    pub fn new(settings: &SyncSettings) -> Result<Self> {
        let base_url = settings
            .remote_base_url()?
            .ok_or_else(|| Error::InvalidInput("remote URL is not configured".to_string()))?;
        Ok(Self {
            base_url,
            auth_token: settings.auth_token.clone(),
            client: reqwest::Client::builder().build()?,
            watch_timeout: settings.watch_timeout,
            retry_backoff: settings.retry_backoff,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn record_url(&self) -> String {
        format!("{}/v1/record", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ROOM_HEADER, ROOM_ID)
            .header("Accept", "application/json");
        match self.auth_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// One long-poll round: the record once it is newer than `after`, or
    /// `None` when the server's wait elapsed without a change.
    async fn watch_once(&self, after: i64) -> Result<Option<RemoteRecord>> {
        let url = format!(
            "{}/watch?after={after}&timeout_secs={}",
            self.record_url(),
            self.watch_timeout.as_secs()
        );
        let response = self
            .request(Method::GET, &url)
            .timeout(self.watch_timeout + WATCH_GRACE)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<RemoteRecord>().await?)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Remote(parse_api_error(status, &body)))
            }
        }
    }

    async fn watch_loop(self, sender: mpsc::UnboundedSender<RemoteChange>) {
        let mut after = 0_i64;
        while !sender.is_closed() {
            match self.watch_once(after).await {
                Ok(Some(record)) => {
                    if record.updated_at <= after {
                        tokio::time::sleep(self.retry_backoff).await;
                        continue;
                    }
                    after = record.updated_at;
                    if sender.send(Some(record)).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!("Remote watch failed, retrying: {error}");
                    tokio::time::sleep(self.retry_backoff).await;
                }
            }
        }
        tracing::debug!("Remote watch stopped");
    }
}

impl RemoteStore for HttpRemote {
    async fn fetch(&self) -> Result<Option<RemoteRecord>> {
        let response = self
            .request(Method::GET, &self.record_url())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<RemoteRecord>().await?)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Remote(parse_api_error(status, &body)))
            }
        }
    }

    async fn write(&self, record: &RemoteRecord) -> Result<()> {
        let response = self
            .request(Method::PUT, &self.record_url())
            .timeout(REQUEST_TIMEOUT)
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(parse_api_error(status, &body)));
        }
        Ok(())
    }

    fn subscribe(&self) -> Result<RemoteChanges> {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(self.clone().watch_loop(sender));
        Ok(receiver)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim().chars().take(180).collect::<String>();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::HeaderMap;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::models::{ClientId, Document};

    #[derive(Clone, Default)]
    struct RecordHost {
        record: Arc<Mutex<Option<Value>>>,
        rooms: Arc<Mutex<Vec<String>>>,
        cursors: Arc<Mutex<Vec<i64>>>,
    }

    #[derive(Deserialize)]
    struct WatchParams {
        after: i64,
    }

    async fn get_record(State(host): State<RecordHost>) -> Response {
        let current = host.record.lock().unwrap().clone();
        match current {
            Some(record) => Json(record).into_response(),
            None => (
                axum::http::StatusCode::NOT_FOUND,
                Json(json!({ "error": "Not found: No record stored for this room" })),
            )
                .into_response(),
        }
    }

    async fn put_record(
        State(host): State<RecordHost>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> axum::http::StatusCode {
        let room = headers
            .get(ROOM_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        host.rooms.lock().unwrap().push(room);
        *host.record.lock().unwrap() = Some(body);
        axum::http::StatusCode::NO_CONTENT
    }

    async fn watch_record(
        State(host): State<RecordHost>,
        Query(params): Query<WatchParams>,
    ) -> Response {
        host.cursors.lock().unwrap().push(params.after);
        let current = host.record.lock().unwrap().clone();
        if let Some(record) = current.filter(|record| {
            record["updatedAt"].as_i64().is_some_and(|at| at > params.after)
        }) {
            return Json(record).into_response();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        axum::http::StatusCode::NO_CONTENT.into_response()
    }

    async fn serve(host: RecordHost) -> HttpRemote {
        let router = Router::new()
            .route("/v1/record", get(get_record).put(put_record))
            .route("/v1/record/watch", get(watch_record))
            .with_state(host);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let mut settings = SyncSettings::new(format!("http://{addr}"));
        settings.retry_backoff = Duration::from_millis(20);
        HttpRemote::new(&settings).unwrap()
    }

    fn record(updated_at: i64) -> RemoteRecord {
        let client: ClientId = "device-a".into();
        RemoteRecord::new(&Document::default(), updated_at, &client).unwrap()
    }

    async fn next(changes: &mut RemoteChanges) -> RemoteChange {
        tokio::time::timeout(Duration::from_secs(5), changes.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_and_write_against_host() {
        let host = RecordHost::default();
        let remote = serve(host.clone()).await;

        assert_eq!(remote.fetch().await.unwrap(), None);

        remote.write(&record(10)).await.unwrap();
        let stored = host.record.lock().unwrap().clone().unwrap();
        assert_eq!(stored["updatedAt"], 10);
        assert_eq!(stored["updatedBy"], "device-a");
        assert!(stored["data"]["chores"].is_array());
        assert_eq!(host.rooms.lock().unwrap().clone(), vec![ROOM_ID.to_string()]);

        assert_eq!(remote.fetch().await.unwrap(), Some(record(10)));
    }

    #[tokio::test]
    async fn test_watch_delivers_snapshot_then_newer_records() {
        let host = RecordHost::default();
        let remote = serve(host.clone()).await;
        remote.write(&record(10)).await.unwrap();

        let mut changes = remote.subscribe().unwrap();
        assert_eq!(next(&mut changes).await, Some(record(10)));

        // Let at least one empty long-poll round pass.
        tokio::time::sleep(Duration::from_millis(100)).await;
        remote.write(&record(11)).await.unwrap();
        assert_eq!(next(&mut changes).await, Some(record(11)));

        let cursors = host.cursors.lock().unwrap().clone();
        assert_eq!(cursors.first(), Some(&0));
        assert!(cursors.contains(&10));
        assert!(cursors.iter().filter(|after| **after == 10).count() >= 2);
    }

    #[test]
    fn test_new_requires_remote_url() {
        assert!(HttpRemote::new(&SyncSettings::default()).is_err());
        assert!(HttpRemote::new(&SyncSettings::new("localhost:8080")).is_err());
    }

    #[test]
    fn test_record_url_joins_base() {
        let remote = HttpRemote::new(&SyncSettings::new("http://127.0.0.1:8080/")).unwrap();
        assert_eq!(remote.record_url(), "http://127.0.0.1:8080/v1/record");
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = SyncSettings::new("http://127.0.0.1:8080")
            .with_auth_token(Some("top-secret".to_string()));
        let remote = HttpRemote::new(&settings).unwrap();
        assert!(!format!("{remote:?}").contains("top-secret"));
    }

    #[test]
    fn test_parse_api_error_prefers_json_message() {
        assert_eq!(
            parse_api_error(StatusCode::UNAUTHORIZED, r#"{"error":"Unauthorized: bad token"}"#),
            "Unauthorized: bad token (401)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
    }
}
