// src/server/mod.rs

//! Server-side components.
//!
//! This module contains:
//! - `store`     → `CustomerStore` trait the handlers depend on
//! - `database`  → SQLite/Postgres implementation of the store
//! - `memory`    → In-process implementation of the store
//! - `handlers`  → Axum HTTP handlers for the customer endpoints
//! - `auth`      → Shared-secret auth gate and pluggable token verifier
//! - `extract`   → Extractors that reject with `ApiError`
//! - `logging`   → Request logging middleware and audit events
//! - `api_error` → JSON error responses
//! - `routes`    → Router builder
//! - `shutdown`  → Ctrl-C / SIGTERM trigger for graceful shutdown

pub mod api_error;
pub mod auth;
pub mod database;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod memory;
pub mod routes;
pub mod shutdown;
pub mod store;

pub use api_error::{ApiError, ErrorCode};
pub use auth::{auth_gate, AuthError, AuthState, StaticTokenVerifier, TokenVerifier};
pub use database::Database;
pub use handlers::{
    create_customer_handler, delete_customer_handler, get_customer_handler,
    list_customers_handler, update_customer_handler, AppState, DeleteCustomerResponse,
};
pub use memory::MemoryStore;
pub use routes::build_router;
pub use shutdown::shutdown_signal;
pub use store::CustomerStore;
