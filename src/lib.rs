//! Decimal digits of π by direct digit extraction.
//!
//! [`nth_digit_block`] computes nine digits at any offset without computing the
//! ones before it. [`compute`] strings blocks together with per-block progress
//! and cooperative cancellation, and [`Calculator`] runs that on a background
//! worker.

pub mod arith;
pub mod config;
pub mod driver;
pub mod error;
pub mod extractor;
pub mod primes;
pub mod progress;
pub mod session;

pub use config::CalcConfig;
pub use driver::{compute, Cancelled};
pub use error::{PiErr, Result};
pub use extractor::nth_digit_block;
pub use progress::{observe, Progress};
pub use session::{Calculator, ProgressEvent, Session};
