//! Backends used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! The layout core lives in the `canvas` crate and performs no I/O. Service
//! modules supply the I/O it is injected with (durable settings) and the
//! outbound detector call, so route handlers stay protocol translation only.

pub mod detector;
pub mod settings;
