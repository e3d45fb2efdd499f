//! Homepanel Core Library
//!
//! Session handling and a typed REST client for the homepanel backend:
//! token storage, authenticated dispatch with serialized refresh, route
//! guards and the resource API used by the command-line client.

// Re-export pure types from homepanel-types
pub use homepanel_types::*;

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod http;
pub mod ports;
pub mod preferences;
pub mod refresh;
pub mod routes;
pub mod session;
pub mod storage;
pub mod token_store;
pub mod validation;

#[cfg(test)]
mod testing;

pub use api::HomeApi;
pub use cache::QueryCache;
pub use config::ClientConfig;
pub use dispatcher::RequestDispatcher;
pub use error::{ApiError, Result};
pub use events::{SessionEvent, SessionEvents};
pub use http::ReqwestTransport;
pub use preferences::Preferences;
pub use refresh::RefreshCoordinator;
pub use routes::{Route, RouteDecision};
pub use session::SessionManager;
pub use storage::{FileStore, MemoryStore};
pub use token_store::TokenStore;
pub use validation::ValidationError;
