//! Login, logout and identity refresh.

use std::sync::Arc;

use tradepost_core::Result;
use tradepost_core::http::{ApiRequest, ApiTransport, endpoints};
use tradepost_core::session::{LoginRequest, SessionPayload, TokenResponse, UserIdentity};

use crate::session_store::SessionStore;
use crate::unauthorized::UnauthorizedInterceptor;

pub struct AuthService {
    transport: Arc<dyn ApiTransport>,
    session: Arc<SessionStore>,
    interceptor: Arc<UnauthorizedInterceptor>,
}

impl AuthService {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        session: Arc<SessionStore>,
        interceptor: Arc<UnauthorizedInterceptor>,
    ) -> Self {
        Self {
            transport,
            session,
            interceptor,
        }
    }

    /// Exchanges credentials for a token, fetches the user record with it
    /// and starts the session.
    ///
    /// A 401 here means wrong credentials, so it is reported as an API
    /// error and leaves any existing session alone.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserIdentity> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post(endpoints::AUTH_LOGIN).with_json(&credentials)?;
        let token: TokenResponse = self
            .transport
            .send(request)
            .await?
            .ensure_success()?
            .json()?;

        let identity = self.fetch_identity(&token.access_token).await?;

        tracing::info!("[Auth] Logged in as {}", identity.username);
        if let Err(e) = self
            .session
            .set_session(Some(SessionPayload::new(identity.clone(), token.access_token)))
        {
            tracing::warn!("[Auth] Session is active but was not persisted: {}", e);
        }
        Ok(identity)
    }

    pub fn logout(&self) -> Result<()> {
        tracing::info!("[Auth] Logging out");
        self.session.clear_session()
    }

    /// Re-reads `/auth/me` for the current token and overwrites the stored
    /// identity. An expired token ends the session.
    pub async fn refresh_identity(&self, token: &str) -> Result<UserIdentity> {
        let request = ApiRequest::get(endpoints::AUTH_ME).with_bearer(token);
        let response = self.transport.send(request).await?;
        let identity: UserIdentity = self.interceptor.check(response)?.json()?;

        self.session
            .set_session(Some(SessionPayload::new(identity.clone(), token)))?;
        Ok(identity)
    }

    async fn fetch_identity(&self, token: &str) -> Result<UserIdentity> {
        let request = ApiRequest::get(endpoints::AUTH_ME).with_bearer(token);
        self.transport
            .send(request)
            .await?
            .ensure_success()?
            .json()
    }
}
