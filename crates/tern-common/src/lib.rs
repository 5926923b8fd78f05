//! Common utilities for the Tern style engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning Log** - de-duplicated, host-owned warnings routed through `log`

pub mod warning;

pub use warning::{Warning, WarningLog};
