//! Response gate for authenticated API calls.

use std::sync::Arc;

use tradepost_core::http::ApiResponse;
use tradepost_core::navigation::{LOGIN_ROUTE, Navigator};
use tradepost_core::{Result, TradepostError};

use crate::session_store::SessionStore;

/// Checks every authenticated response before its body is decoded.
///
/// A 401 tears the session down and sends the user to the login route
/// before the caller sees `AuthExpired`. Other failures become
/// `TradepostError::Api` with the server's message.
pub struct UnauthorizedInterceptor {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl UnauthorizedInterceptor {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn check(&self, response: ApiResponse) -> Result<ApiResponse> {
        if response.status == 401 {
            self.expire_session();
            return Err(TradepostError::AuthExpired);
        }
        response.ensure_success()
    }

    fn expire_session(&self) {
        tracing::warn!("[Auth] Token rejected by server, clearing session");

        if let Err(e) = self.session.clear_session() {
            tracing::warn!("[Auth] Session teardown incomplete: {}", e);
        }
        let token_key = &self.session.keys().token_key;
        if let Err(e) = self.session.storage().remove(token_key) {
            tracing::warn!("[Auth] Failed to remove persisted token: {}", e);
        }

        self.navigator.push(LOGIN_ROUTE);
    }
}
