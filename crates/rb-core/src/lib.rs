//! rb-core: stable foundation for rideboard.
//!
//! Contains:
//! - ids (record ids and stable sub-item ids)
//! - phone (digits-only storage, display formatting)
//! - time (pickup-time grammar and input normalisation)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod phone;
pub mod time;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use phone::{format_phone, strip_phone};
pub use time::{PickupTime, is_valid_pickup_time, normalize_time_input};
