//! itermob API: REST CRUD over users and addresses on PostgreSQL.

pub mod config;
pub mod controller;
pub mod error;
pub mod extractors;
pub mod messages;
pub mod model;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::{build_router, BASE_PATH};
pub use state::AppState;
pub use store::{ensure_database_exists, AddressStore, MemoryStore, PgStore, Store, UserStore};
