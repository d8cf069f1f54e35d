//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and transforms
//! - Geometric closest-point and separating-axis helpers
//! - Logging utilities

pub mod math;
pub mod geometry;
pub mod logging;
