//! Framecut Core - Foundation types for timeline editing
//!
//! This crate provides the fundamental types used throughout Framecut:
//! - Error type shared by the infrastructure crates
//! - Time ranges in floating-point seconds
//! - Floor-based frame accounting and timecode formatting

pub mod error;
pub mod time;

pub use error::{FramecutError, Result};
pub use time::{format_timecode, frames_in, TimeRange};
