//! FoodHub REST API
//!
//! Axum surface of the marketplace: vendor, customer, delivery, admin,
//! shopping and upload endpoints, with OpenAPI documentation, bearer-token
//! and admin-key guards, login rate limiting and one JSON envelope for every
//! response.
//!
//! ## Modules
//!
//! - **app**: Router assembly and middleware stack
//! - **config**: Command line overrides for the server binary
//! - **routes**: HTTP handlers, one module per audience
//! - **middleware**: Request ids, logging, rate limiting, fallbacks
//! - **extractors**: Authentication, pagination, validated JSON, multipart images
//! - **responses**: Success envelope and document views
//! - **error**: Error envelope and status mapping
//! - **state**: Services shared by every handler
//!
//! ## Usage
//!
//! ```rust,no_run
//! use foodhub_api_rest::{create_app, AppState, Backends};
//! use foodhub_common::AppConfig;
//!
//! # async fn run(backends: Backends) -> anyhow::Result<()> {
//! let config = AppConfig::load()?;
//! let address = config.server_address();
//! let app = create_app(AppState::new(config, backends));
//!
//! let listener = tokio::net::TcpListener::bind(address).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use app::{create_app, ApiDoc};
pub use config::Args;
pub use error::{ApiError, ApiResult};
pub use state::{AppState, Backends};
