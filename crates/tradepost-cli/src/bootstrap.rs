//! Composition root: wires config, transport, storage and stores together.

use std::sync::Arc;

use anyhow::{Result, bail};
use tradepost_application::{
    AuthService, ListingStore, MessagingStore, SearchFilterEngine, SessionStore,
    UnauthorizedInterceptor,
};
use tradepost_core::config::ClientConfig;
use tradepost_core::http::ApiTransport;
use tradepost_core::navigation::{LOGIN_ROUTE, Navigator};
use tradepost_infrastructure::{
    HttpTransport, JsonFileKeyValueStore, LoggingNavigator, MemoryAddressBar, TradepostPaths,
};

/// Navigator for a terminal: records the route and tells the user what to do.
#[derive(Debug, Default)]
pub struct CliNavigator {
    inner: LoggingNavigator,
}

impl CliNavigator {
    #[cfg(test)]
    pub fn last_route(&self) -> Option<String> {
        self.inner.last_route()
    }
}

impl Navigator for CliNavigator {
    fn push(&self, route: &str) {
        self.inner.push(route);
        if route == LOGIN_ROUTE {
            eprintln!("🔑 Please log in again: tradepost login <email> --password <password>");
        }
    }
}

pub struct App {
    pub transport: Arc<dyn ApiTransport>,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<CliNavigator>,
    pub interceptor: Arc<UnauthorizedInterceptor>,
}

impl App {
    pub fn bootstrap(config: ClientConfig, paths: &TradepostPaths) -> Result<Self> {
        tracing::info!("[Bootstrap] API base URL: {}", config.api_base_url);
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::from_config(&config)?);

        let session_file = config
            .storage
            .path
            .clone()
            .unwrap_or_else(|| paths.session_file());
        tracing::info!("[Bootstrap] Session file: {}", session_file.display());
        let storage = Arc::new(JsonFileKeyValueStore::new(session_file));

        let session = Arc::new(SessionStore::new(storage, config.storage.keys()));
        let navigator = Arc::new(CliNavigator::default());
        let interceptor = Arc::new(UnauthorizedInterceptor::new(
            session.clone(),
            navigator.clone(),
        ));

        tracing::info!(
            "[Bootstrap] Session restored (authenticated: {})",
            session.is_authenticated()
        );

        Ok(Self {
            transport,
            session,
            navigator,
            interceptor,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.transport.clone(),
            self.session.clone(),
            self.interceptor.clone(),
        )
    }

    pub fn listings(&self) -> ListingStore {
        ListingStore::new(self.transport.clone())
    }

    pub fn messaging(&self) -> MessagingStore {
        MessagingStore::new(
            self.transport.clone(),
            self.session.clone(),
            self.interceptor.clone(),
            self.navigator.clone(),
        )
    }

    /// A search engine whose address bar starts at `initial_query`.
    pub fn search(&self, initial_query: &str) -> (SearchFilterEngine, Arc<MemoryAddressBar>) {
        let address_bar = Arc::new(MemoryAddressBar::new(initial_query));
        let engine = SearchFilterEngine::new(self.transport.clone(), address_bar.clone());
        (engine, address_bar)
    }

    /// The stored bearer token, or a hint to log in.
    pub fn require_token(&self) -> Result<String> {
        match self.session.token() {
            Some(token) => Ok(token),
            None => {
                self.navigator.push(LOGIN_ROUTE);
                bail!("Not logged in.")
            }
        }
    }
}
