//! Framecut Media - metadata probing for timeline clips
//!
//! The timeline only needs duration, frame count and frame rate. This crate
//! provides:
//! - The `MediaProbe` collaborator trait
//! - An ffprobe-backed implementation (binary located by ffmpeg-sidecar)
//! - A static in-memory table

pub mod probe;

pub use probe::{parse_ffprobe_json, FfprobeProbe, MediaInfo, MediaProbe, StaticProbe};
