//! Port traits (interfaces) for dependency injection

pub mod storage;
pub mod transport;

pub use storage::KeyValueStore;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, AUTHORIZATION};
