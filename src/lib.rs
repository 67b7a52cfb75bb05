//! Sparsefield
//!
//! HTTP service and command-line front end for the `field-engine` crate:
//! PNG and positions persistence, configuration, and the API router.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
