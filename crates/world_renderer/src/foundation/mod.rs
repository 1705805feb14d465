//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and bounding volumes
//! - Logging setup

pub mod math;
pub mod logging;
