//! HTTP client for the provider's v1 report API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::{DamageTable, EventPage, FightList, LogProvider, Query};
use crate::config::ProviderConfig;
use crate::error::{Result, TetherError};

/// Longest slice of an unparseable body echoed back in an error.
const BODY_EXCERPT_LEN: usize = 200;

/// Report API endpoints the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Fights,
    Events,
    DamageTable,
}

impl CallKind {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "fights" => Some(Self::Fights),
            "events/summary" => Some(Self::Events),
            "tables/damage-done" => Some(Self::DamageTable),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Fights => "fights",
            Self::Events => "events/summary",
            Self::DamageTable => "tables/damage-done",
        }
    }
}

/// The only network-facing component. Appends the configured credential to
/// every request and normalizes provider failures into [`TetherError`].
#[derive(Debug, Clone)]
pub struct LogClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl LogClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, call: CallKind, report: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            call.path(),
            report
        )
    }

    /// Raw report API call by path name.
    ///
    /// Unknown paths are a no-op and yield an empty object. Event streams
    /// need a time window; they are fully drained and returned as
    /// `{"events": [...]}` with the provider's event objects untouched.
    pub async fn fetch(&self, call: &str, report: &str, query: Option<&Query>) -> Result<Value> {
        let Some(kind) = CallKind::from_path(call) else {
            debug!(call, "ignoring unknown report API call");
            return Ok(Value::Object(Map::new()));
        };

        match (kind, query) {
            (CallKind::Events, Some(query)) => self.drain_raw_events(report, query).await,
            (CallKind::Events, None) => Err(TetherError::MissingTimeWindow { call: kind.path() }),
            (_, query) => {
                let params = query.map(Query::params).unwrap_or_default();
                self.request(kind, report, &params).await
            }
        }
    }

    /// Follow continuation tokens like [`super::drain_events`], keeping each event
    /// as the provider sent it.
    async fn drain_raw_events(&self, report: &str, query: &Query) -> Result<Value> {
        let mut events = Vec::new();
        let mut page_query = query.clone();
        let mut pages = 0usize;

        loop {
            let mut page = self.request(CallKind::Events, report, &page_query.params()).await?;
            pages += 1;

            match page.get_mut("events").map(Value::take) {
                Some(Value::Array(batch)) => events.extend(batch),
                Some(Value::Null) | None => {}
                Some(_) => {
                    return Err(TetherError::provider("events page without an events array"));
                }
            }
            match page.get("nextPageTimestamp").and_then(Value::as_i64) {
                Some(next) => page_query = page_query.resume_at(next),
                None => break,
            }
        }

        debug!(report, pages, events = events.len(), "drained raw event stream");
        let mut data = Map::new();
        data.insert("events".to_string(), Value::Array(events));
        Ok(Value::Object(data))
    }

    async fn fetch_typed<T: DeserializeOwned>(
        &self,
        kind: CallKind,
        report: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let data = self.request(kind, report, params).await?;
        serde_json::from_value(data).map_err(|e| {
            TetherError::provider(format!("unexpected {} response shape: {e}", kind.path()))
        })
    }

    async fn request(
        &self,
        kind: CallKind,
        report: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value> {
        let response = self
            .http
            .get(self.url(kind, report))
            .query(params)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("translate", if self.config.translate { "true" } else { "false" }),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(call = kind.path(), report, %status, bytes = body.len(), "provider response");
        parse_response(status, &body)
    }
}

/// Turn a raw provider response into JSON or a provider error.
fn parse_response(status: StatusCode, body: &str) -> Result<Value> {
    let data: Value = serde_json::from_str(body).map_err(|_| {
        let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
        TetherError::provider(format!("could not parse response: {excerpt}"))
    })?;

    if !status.is_success() {
        return Err(match data.get("error").and_then(Value::as_str) {
            Some(message) => TetherError::provider(message),
            None => TetherError::UnexpectedProvider {
                status: status.as_u16(),
            },
        });
    }

    Ok(data)
}

impl LogProvider for LogClient {
    async fn fights(&self, report: &str) -> Result<FightList> {
        self.fetch_typed(CallKind::Fights, report, &[]).await
    }

    async fn event_page(&self, report: &str, query: &Query) -> Result<EventPage> {
        self.fetch_typed(CallKind::Events, report, &query.params()).await
    }

    async fn damage_table(&self, report: &str, query: &Query) -> Result<DamageTable> {
        self.fetch_typed(CallKind::DamageTable, report, &query.params()).await
    }
}
