//! Shared types for the listings platform
//!
//! Domain models, the unified error system, the opening-hours engine,
//! media path normalization and validation helpers used by the server and
//! its tooling.

pub mod error;
pub mod hours;
pub mod media;
pub mod models;
pub mod time;
pub mod util;
pub mod validation;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use hours::{OpenStatus, WeeklySchedule};
