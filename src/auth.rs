//! Session lifecycle for the findash CLI and SDK
//!
//! [`AuthSession`] owns the authentication state machine: `Unknown` while
//! startup re-hydration runs, then `Authenticated` or `Unauthenticated`,
//! both stable and reachable only through the operations below. The access
//! token itself is managed by the request client; this controller owns the
//! user half of the session.

use std::sync::{Arc, Mutex};

use tracing::warn;
use validator::Validate;

use findash_protocol::api::{LoginData, LoginRequest, RegisterData, RegisterRequest};
use findash_protocol::common::{ApiEnvelope, User};

use crate::client::{ApiClient, RequestOptions};
use crate::error::{AppError, Result};
use crate::session::SessionStore;

pub const LOGIN_ENDPOINT: &str = "/users/login";
pub const REGISTER_ENDPOINT: &str = "/users/register";
pub const LOGOUT_ENDPOINT: &str = "/users/logout";
pub const PROFILE_ENDPOINT: &str = "/users/profile/";

/// Application hooks fired on session transitions
///
/// The CLI installs a terminal implementation; embedders route these into
/// their own navigation. All hooks default to no-ops except
/// [`session_expired`], which falls through to the login entry point.
///
/// [`session_expired`]: AuthEvents::session_expired
pub trait AuthEvents: Send + Sync {
    fn navigate_to_login(&self) {}
    fn navigate_to_dashboard(&self) {}
    /// Forced teardown after an unrecoverable refresh failure
    fn session_expired(&self) {
        self.navigate_to_login();
    }
}

/// Events implementation for embedders without a navigation surface
pub struct NullAuthEvents;

impl AuthEvents for NullAuthEvents {}

/// Authentication state as seen by the application
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Startup re-hydration has not finished yet
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

/// Controller exposing login/register/logout/current-user state
pub struct AuthSession {
    client: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    events: Arc<dyn AuthEvents>,
    state: Mutex<AuthState>,
}

impl AuthSession {
    pub fn new(
        client: Arc<ApiClient>,
        store: Arc<dyn SessionStore>,
        events: Arc<dyn AuthEvents>,
    ) -> Self {
        Self {
            client,
            store,
            events,
            state: Mutex::new(AuthState::Unknown),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.lock().unwrap().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        match self.state() {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated(_))
    }

    fn set_state(&self, state: AuthState) {
        *self.state.lock().unwrap() = state;
    }

    /// Startup re-hydration
    ///
    /// With no persisted session this settles Unauthenticated without a
    /// network call. Otherwise the persisted user is trusted provisionally
    /// and re-validated against the profile endpoint; an invalid or expired
    /// token clears the persisted session entirely.
    pub async fn initialize(&self) -> AuthState {
        let token = self.store.access_token();
        let saved_user = self.store.user();

        match (token, saved_user) {
            (Some(_), Some(saved)) => {
                self.set_state(AuthState::Authenticated(saved));

                match self
                    .client
                    .get::<User>(PROFILE_ENDPOINT, RequestOptions::default())
                    .await
                {
                    Ok(fresh) => {
                        self.store.set_user(fresh.clone());
                        self.set_state(AuthState::Authenticated(fresh));
                    }
                    Err(_) => {
                        self.store.clear();
                        self.set_state(AuthState::Unauthenticated);
                    }
                }
            }
            _ => self.set_state(AuthState::Unauthenticated),
        }

        self.state()
    }

    /// Authenticate and establish a session
    ///
    /// On success the token and user are persisted together. On failure the
    /// session state is untouched and the error propagates for field-level
    /// display.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let response: ApiEnvelope<LoginData> = self
            .client
            .post(LOGIN_ENDPOINT, &request, RequestOptions::notify())
            .await?;

        let data = response
            .data
            .ok_or_else(|| AppError::unknown("No data in login response"))?;

        self.store
            .set_session(data.access_token, data.user.clone());
        self.set_state(AuthState::Authenticated(data.user.clone()));
        self.events.navigate_to_dashboard();

        Ok(data.user)
    }

    /// Create an account; establishes no session
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterData> {
        let request = RegisterRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let response: ApiEnvelope<RegisterData> = self
            .client
            .post(REGISTER_ENDPOINT, &request, RequestOptions::notify())
            .await?;

        let data = response
            .data
            .ok_or_else(|| AppError::unknown("No data in register response"))?;

        self.events.navigate_to_login();
        Ok(data)
    }

    /// End the session
    ///
    /// The backend call is best-effort; local teardown always happens and
    /// this never fails.
    pub async fn logout(&self) {
        let result: Result<ApiEnvelope<serde_json::Value>> = self
            .client
            .post(LOGOUT_ENDPOINT, &serde_json::json!({}), RequestOptions::notify())
            .await;

        if let Err(err) = result {
            // Already in the error log via the client; not surfaced further
            warn!("logout request failed: {}", err);
        }

        self.store.clear();
        self.set_state(AuthState::Unauthenticated);
        self.events.navigate_to_login();
    }

    /// Mint a new access token through the client's refresh protocol
    ///
    /// On failure the session is torn down with logout semantics before the
    /// error propagates.
    pub async fn refresh_token(&self) -> Result<String> {
        match self.client.refresh_access_token().await {
            Ok(token) => Ok(token),
            Err(err) => {
                warn!("token refresh failed: {}", err);
                self.logout().await;
                Err(err)
            }
        }
    }
}
