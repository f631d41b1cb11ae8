//! Customers - a small HTTP service for customer records
//!
//! # Features
//!
//! - `server` - HTTP server components (handlers, auth gate, database). Enabled by default.
//! - `sqlite` - SQLite database backend. Enabled by default.
//! - `postgres` - PostgreSQL database backend.
//!
//! # Example
//!
//! ```toml
//! # Use defaults (server + sqlite)
//! customer-service = { path = "../customer-service" }
//!
//! # Server with PostgreSQL
//! customer-service = { path = "../customer-service", features = ["server", "postgres"] }
//! ```

// Core modules (always available)
pub mod config;
pub mod customer;
pub mod errors;

// Server-related modules (requires "server" feature)
#[cfg(feature = "server")]
#[path = "server/mod.rs"]
pub mod server;
