//! The `todo-api` library crate.
//!
//! Contains the domain models, authentication machinery, routing
//! configuration, and error handling for the todo-list backend. The binary
//! (`main.rs`) only wires these pieces into an `HttpServer`; integration
//! tests build the same app from this crate.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
