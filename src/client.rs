//! Authenticated request client for the findash SDK
//!
//! Every outbound call goes through [`ApiClient`]: it attaches the bearer
//! credential, normalizes failures into [`AppError`], records them, and owns
//! the 401 refresh protocol. Callers never see a raw transport error.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use findash_protocol::api::RefreshTokenResponse;

use crate::auth::AuthEvents;
use crate::config::ClientConfig;
use crate::error::{AppError, ErrorSeverity, Result};
use crate::logger::ErrorLog;
use crate::refresh::{Acquired, RefreshGate, RefreshOutcome};
use crate::session::SessionStore;
use crate::transport::{HttpTransport, OutboundRequest, Transport, WireResponse};
use crate::ui::Notifier;

pub const REFRESH_ENDPOINT: &str = "/users/refresh-token";

/// Per-call behavior toggles
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    /// Surface success and error messages through the notification channel
    pub notify: bool,
}

impl RequestOptions {
    pub fn notify() -> Self {
        Self { notify: true }
    }
}

/// Single choke point for all FinDash API traffic
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    log: Arc<ErrorLog>,
    notifier: Arc<dyn Notifier>,
    events: Arc<dyn AuthEvents>,
    gate: RefreshGate,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        log: Arc<ErrorLog>,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn AuthEvents>,
    ) -> Result<Self> {
        config.validate()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(
            config, transport, store, log, notifier, events,
        ))
    }

    /// Assemble a client over an explicit transport (test seam)
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        log: Arc<ErrorLog>,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn AuthEvents>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            log,
            notifier,
            events,
            gate: RefreshGate::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn error_log(&self) -> Arc<ErrorLog> {
        self.log.clone()
    }

    pub async fn get<R>(&self, endpoint: &str, opts: RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.get_with_query(endpoint, Vec::new(), opts).await
    }

    pub async fn get_with_query<R>(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
        opts: RequestOptions,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let mut request = OutboundRequest::get(self.config.endpoint_url(endpoint));
        request.query = query;
        self.execute(request, opts).await
    }

    pub async fn post<T, R>(&self, endpoint: &str, payload: &T, opts: RequestOptions) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(err) => {
                // Failed before dispatch
                let err = AppError::from(err);
                self.report(&err, endpoint, &Method::POST, opts);
                return Err(err);
            }
        };
        let request = OutboundRequest::post(self.config.endpoint_url(endpoint), body);
        self.execute(request, opts).await
    }

    /// Dispatch a request, running the refresh protocol on a first 401
    async fn execute<R>(&self, request: OutboundRequest, opts: RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        // The retried marker lives here, next to the immutable request
        let mut retried = false;
        let mut bearer = self.store.access_token();

        loop {
            let request = request.clone().with_bearer(bearer.clone());
            let response = match self.transport.send(&request).await {
                Ok(response) => response,
                Err(err) => {
                    // Sent, but no response arrived
                    self.report(&err, &request.url, &request.method, opts);
                    return Err(err);
                }
            };

            if response.is_success() {
                return self.decode(response, &request, opts);
            }

            let err = self.error_from_response(&response);
            self.report(&err, &request.url, &request.method, opts);

            if response.status == 401 && !retried {
                retried = true;
                // Propagates the refresh call's own error when it fails
                let token = self.refresh_access_token().await?;
                bearer = Some(token);
                continue;
            }

            return Err(err);
        }
    }

    /// Obtain a fresh access token, coordinating concurrent callers
    ///
    /// At most one refresh call is in flight at any time: the first caller
    /// becomes the leader and performs it, everyone else queues on the gate
    /// and shares the leader's outcome. On failure the session is cleared
    /// and the application is sent back to the unauthenticated entry point.
    pub async fn refresh_access_token(&self) -> Result<String> {
        match self.gate.acquire().await {
            Acquired::Follower(rx) => match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(AppError::unknown("Refresh coordinator went away")),
            },
            Acquired::Leader => {
                let outcome = self.perform_refresh().await;
                if let Ok(token) = &outcome {
                    self.store.set_access_token(token.clone());
                }
                // Always settles: the gate never stays in Refreshing
                self.gate.settle(outcome.clone()).await;
                if let Err(err) = outcome {
                    self.store.clear();
                    self.events.session_expired();
                    return Err(err);
                }
                outcome
            }
        }
    }

    /// The refresh call itself: bare POST, no bearer; the HTTP-only cookie
    /// carries the refresh credential
    async fn perform_refresh(&self) -> RefreshOutcome {
        let request = OutboundRequest::post(
            self.config.endpoint_url(REFRESH_ENDPOINT),
            serde_json::json!({}),
        );
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            return Err(self.error_from_response(&response));
        }

        let parsed: RefreshTokenResponse = serde_json::from_str(&response.body)?;
        Ok(parsed.access_token)
    }

    fn decode<R>(&self, response: WireResponse, request: &OutboundRequest, opts: RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let value: serde_json::Value = match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(err) => {
                let err = AppError::from(err);
                self.report(&err, &request.url, &request.method, opts);
                return Err(err);
            }
        };

        if opts.notify && value.get("success").and_then(|s| s.as_bool()) == Some(true) {
            if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
                self.notifier.success(message);
            }
        }

        match serde_json::from_value(value) {
            Ok(decoded) => Ok(decoded),
            Err(err) => {
                let err = AppError::from(err);
                self.report(&err, &request.url, &request.method, opts);
                Err(err)
            }
        }
    }

    fn error_from_response(&self, response: &WireResponse) -> AppError {
        let parsed: Option<serde_json::Value> = serde_json::from_str(&response.body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", response.status));

        let mut err = AppError::from_status(response.status, message);
        if let Some(details) = parsed {
            err = err.with_details(details);
        }
        err
    }

    fn report(&self, err: &AppError, url: &str, method: &Method, opts: RequestOptions) {
        self.log.record_api(err, url, method.as_str());

        if opts.notify {
            let message = err.user_message();
            match err.severity {
                ErrorSeverity::Critical | ErrorSeverity::High => self.notifier.error(&message),
                ErrorSeverity::Medium => self.notifier.warning(&message),
                ErrorSeverity::Low => self.notifier.info(&message),
            }
        }
    }
}
