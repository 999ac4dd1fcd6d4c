//! RiskOps REST API Server.
//!
//! Serves portfolio VaR/CVaR over HTTP on top of [`riskops_engine::RiskEngine`].
//!
//! ## Endpoints
//!
//! - `GET  /health`
//! - `GET  /portfolios`, `POST /portfolios`, `GET /portfolios/{name}`
//! - `GET  /risk/latest?portfolio=demo`
//! - `POST /risk/calc`
//!
//! ## Usage
//!
//! ```bash
//! # Start with the redb file from the default config
//! riskops-server
//!
//! # Custom config file, host and port
//! riskops-server --config riskops.toml --host 0.0.0.0 --port 3000
//!
//! # Throwaway in-memory store
//! riskops-server --memory
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::create_router;
pub use state::AppState;
