pub mod client;
pub mod config;
pub mod device;
pub mod endpoints;
pub mod error;
pub mod health;
pub mod models;
pub mod retry;
pub mod scoring;
pub mod transport;
pub mod validation;

pub use client::ApiClient;
pub use config::{Config, Environment};
pub use endpoints::{Endpoint, Endpoints};
pub use error::ApiError;
pub use health::{HealthProbe, HealthState};
pub use retry::{RetryPolicy, RetryingClient};
pub use transport::{ReqwestTransport, Transport};
