//! Periodic jobs
//!
//! - [`ExpiryScheduler`] - expires time-boxed approval grants and warns their
//!   holders shortly before they lapse

pub mod expiry;

pub use expiry::{ExpiryScheduler, SweepReport};
