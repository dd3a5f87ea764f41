//! listings-server: hospitality listings and booking administration
//!
//! HTTP/JSON backend for the listings site:
//! - Public catalogue of restaurants, eateries, beaches, gyms, spas,
//!   swimming pools and events, with live opening status
//! - Public bookings and password-gated daily menu uploads
//! - JWT-authenticated admin API for CRUD, media, bookings and audit
//!
//! The binaries (`listings-server`, `listings-admin`) are thin wrappers over
//! this library so integration tests can drive the router directly.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod state;
pub mod storage;
pub mod util;

pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
