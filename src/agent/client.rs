//! RemoteAgent client - connection setup, synchronous send, streaming send
//!
//! One client instance owns one endpoint, one persistent HTTP transport and
//! one call log. Construction and the health probe fail loudly; per-message
//! failures never escape as errors. Instead the client returns sentinel text
//! carrying a recognizable marker, so an ongoing conversation is never aborted
//! by a single failed turn.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Map, Value};

use crate::error::{Result, TetherError};
use crate::tools::ToolRegistry;

use super::dispatch::{ToolCallRequest, dispatch};
use super::endpoint::AgentEndpoint;
use super::log::{CallLog, ToolCallRecord};
use super::streaming::MessageStream;

/// Marker prefix carried by every in-band error sentinel.
pub const ERROR_SENTINEL_PREFIX: &str = "[remote agent error:";

/// Sentinel returned for an HTTP 401 response.
pub const AUTH_FAILED_SENTINEL: &str = "[remote agent error: authentication failed]";

/// Build a generic error sentinel embedding the failure description.
pub(crate) fn error_sentinel(detail: impl fmt::Display) -> String {
    format!("{ERROR_SENTINEL_PREFIX} {detail}]")
}

/// Whether a returned string is an in-band error sentinel rather than content.
///
/// Sentinels are ordinary strings by design; this lets downstream logging or
/// UI layers special-case them.
pub fn is_error_sentinel(text: &str) -> bool {
    text.starts_with(ERROR_SENTINEL_PREFIX)
}

/// Configuration for a RemoteAgent.
#[derive(Clone)]
pub struct RemoteAgentConfig {
    /// Agent identity, recorded as the source of every tool call
    pub name: String,
    /// Human-readable description of the agent's capabilities
    pub description: String,
    /// Base address of the remote service
    pub base_url: String,
    /// Verify TLS certificates (disable only for local development)
    pub verify_ssl: bool,
    /// Bearer token sent as a default `Authorization` header
    pub auth_token: Option<String>,
    /// Optional whole-request timeout; timeout policy belongs to the
    /// transport, so none is applied by default
    pub timeout: Option<Duration>,
    /// Externally owned registry of tools the agent may invoke
    pub registry: Option<Arc<ToolRegistry>>,
}

impl RemoteAgentConfig {
    /// Create a config with the given identity and base address.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            base_url: base_url.into(),
            verify_ssl: true,
            auth_token: None,
            timeout: None,
            registry: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the bearer token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set TLS certificate verification
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set a whole-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach the tool registry
    pub fn with_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }
}

impl fmt::Debug for RemoteAgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAgentConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("verify_ssl", &self.verify_ssl)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// One message to the remote agent: the text, an optional thread id, and any
/// extra payload fields the service understands.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    message: String,
    thread_id: Option<String>,
    extra: Map<String, Value>,
}

impl ChatRequest {
    /// Create a request for the given message text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            thread_id: None,
            extra: Map::new(),
        }
    }

    /// Set the conversation thread id
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Add an extra payload field. Extras are merged last and may override
    /// the standard fields.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Build the wire payload `{"message", "thread_id", ...extra}`.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("message".to_string(), Value::String(self.message.clone()));
        payload.insert(
            "thread_id".to_string(),
            match &self.thread_id {
                Some(thread_id) => Value::String(thread_id.clone()),
                None => Value::Null,
            },
        );
        for (key, value) in &self.extra {
            payload.insert(key.clone(), value.clone());
        }
        Value::Object(payload)
    }
}

/// Client for a remote conversational agent service.
///
/// Owns the transport exclusively; dropping the client (or an in-flight
/// [`MessageStream`]) releases the connection. One logical turn at a time:
/// concurrent use from multiple tasks is unsupported and must be serialized
/// by the embedding application.
pub struct RemoteAgent {
    name: String,
    description: String,
    endpoint: AgentEndpoint,
    http: Client,
    registry: Option<Arc<ToolRegistry>>,
    call_log: CallLog,
}

impl RemoteAgent {
    /// Create a client from configuration.
    ///
    /// Fails with a Config error when the base address is empty or the auth
    /// token cannot be used as a header value.
    pub fn new(config: RemoteAgentConfig) -> Result<Self> {
        let endpoint = AgentEndpoint::new(&config.base_url, config.verify_ssl, config.auth_token)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = endpoint.auth_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                TetherError::Config("auth token contains invalid header characters".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!endpoint.verify_ssl());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            name: config.name,
            description: config.description,
            endpoint,
            http,
            registry: config.registry,
            call_log: CallLog::new(),
        })
    }

    /// Probe `{base}/health` once at setup time.
    ///
    /// Any non-success status or network failure is fatal and propagates to
    /// the embedding application; it is not retried.
    pub async fn health_check(&self) -> Result<()> {
        let url = self.endpoint.url("health");
        let response = self.http.get(&url).send().await.map_err(|err| {
            TetherError::Connection(format!(
                "failed to connect to remote agent at {}: {}",
                self.endpoint.base_url(),
                err
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TetherError::Connection(format!(
                "health probe at {} returned {}",
                url, status
            )));
        }

        log::info!("remote agent at {} is healthy", self.endpoint.base_url());
        Ok(())
    }

    /// Send one message and wait for the complete response.
    ///
    /// Always returns text. Tool calls declared in the response body are
    /// appended to the call log. HTTP 401 yields the authentication-failure
    /// sentinel; any other transport or decode failure yields a generic
    /// sentinel embedding the failure description.
    pub async fn send(&mut self, request: &ChatRequest) -> String {
        let url = self.endpoint.url("chat");
        log::debug!("POST {}", url);

        let response = match self.http.post(&url).json(&request.to_payload()).send().await {
            Ok(response) => response,
            Err(err) => {
                log::warn!("send to {} failed: {}", url, err);
                return error_sentinel(err);
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("authentication failed against {}", url);
            return AUTH_FAILED_SENTINEL.to_string();
        }
        if !status.is_success() {
            return error_sentinel(format!("HTTP {} for {}", status, url));
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => return error_sentinel(err),
        };

        if let Some(calls) = body.get("tool_calls").and_then(Value::as_array) {
            log::debug!("response declared {} tool call(s)", calls.len());
            for entry in calls {
                self.call_log.append(ToolCallRecord::from_wire(&self.name, entry));
            }
        }

        body.get("response")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    }

    /// Send one message and stream the response.
    ///
    /// Opens a fresh transport stream and resets the call log, so only tool
    /// calls discovered during this turn are retained. The returned stream
    /// borrows the client mutably for its lifetime, which serializes the turn
    /// structurally. Streaming never fails past this boundary: failures
    /// surface as a single sentinel fragment.
    pub async fn send_stream(&mut self, request: &ChatRequest) -> MessageStream<'_> {
        let url = self.endpoint.url("chat/stream");
        log::debug!("POST {} (streaming)", url);

        let source = self.name.clone();
        let result = self
            .http
            .post(&url)
            .header(ACCEPT, "text/event-stream")
            .json(&request.to_payload())
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                self.call_log.reset();
                MessageStream::streaming(source, &mut self.call_log, response)
            }
            Ok(response) => {
                let status = response.status();
                log::warn!("stream open against {} returned {}", url, status);
                MessageStream::failed(
                    source,
                    &mut self.call_log,
                    error_sentinel(format!("HTTP {} for {}", status, url)),
                )
            }
            Err(err) => {
                log::warn!("stream open against {} failed: {}", url, err);
                MessageStream::failed(source, &mut self.call_log, error_sentinel(err))
            }
        }
    }

    /// Execute one tool call against the attached registry and record the
    /// outcome. Always succeeds at the interface level; a missing tool yields
    /// a placeholder response.
    pub fn handle_tool_call(&mut self, call: &ToolCallRequest) -> String {
        dispatch(&self.name, self.registry.as_deref(), &mut self.call_log, call)
    }

    /// Agent identity, used as the source of every recorded tool call
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn endpoint(&self) -> &AgentEndpoint {
        &self.endpoint
    }

    /// Tool calls recorded so far this turn
    pub fn call_log(&self) -> &[ToolCallRecord] {
        self.call_log.records()
    }

    /// Read and clear the call log. Call between turns.
    pub fn drain_call_log(&mut self) -> Vec<ToolCallRecord> {
        self.call_log.drain()
    }
}

impl fmt::Debug for RemoteAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAgent")
            .field("name", &self.name)
            .field("base_url", &self.endpoint.base_url())
            .field("tools", &self.registry.as_ref().map(|r| r.len()).unwrap_or(0))
            .finish()
    }
}
