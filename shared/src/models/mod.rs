//! Data models
//!
//! Shared between the listings server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! venue rows with JSONB sub-fields are decoded server-side and converted
//! into these types. All IDs are `i64` (Snowflake, see [`crate::util`]).

pub mod admin;
pub mod award;
pub mod beach;
pub mod beach_image;
pub mod booking;
pub mod eatery;
pub mod eatery_menu;
pub mod event;
pub mod gym;
pub mod restaurant;
pub mod spa;
pub mod swimming_pool;
pub mod venue;

// Re-exports
pub use admin::*;
pub use award::*;
pub use beach::*;
pub use beach_image::*;
pub use booking::*;
pub use eatery::*;
pub use eatery_menu::*;
pub use event::*;
pub use gym::*;
pub use restaurant::*;
pub use spa::*;
pub use swimming_pool::*;
pub use venue::*;
