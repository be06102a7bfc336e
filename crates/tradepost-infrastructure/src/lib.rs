//! Infrastructure for the Tradepost client: HTTP transport, session
//! persistence, configuration files and host navigation.

pub mod config_service;
pub mod http_transport;
pub mod navigation;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use http_transport::HttpTransport;
pub use navigation::{LoggingNavigator, MemoryAddressBar};
pub use paths::TradepostPaths;
pub use storage::{AtomicTomlFile, InMemoryKeyValueStore, JsonFileKeyValueStore};
