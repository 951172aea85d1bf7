//! Common utilities for physics visualizations
//!
//! This crate provides shared graphics setup, camera controls, and GPU buffer helpers
//! used by the quantum well visualization.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
