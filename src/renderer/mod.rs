//! Rendering module
//!
//! Produces draw lists only; no drawing surface lives in this crate.

pub mod scene;

pub use scene::{Color, DrawCmd, build_scene, level_scene, palette};
