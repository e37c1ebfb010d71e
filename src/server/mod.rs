//! Server core functionality
//!
//! This module contains the HTTP server, its routes and configuration.

pub mod config;
pub mod core;

pub use self::config::ServerConfig;
pub use self::core::{FORM_BODY_LIMIT, Server, router};
