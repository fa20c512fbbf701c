//! # Makerfolio Shared Library
//!
//! This crate contains the types and business logic shared by the Makerfolio
//! API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD/lifecycle operations
//! - `auth`: Password hashing and session management
//! - `db`: Connection pool and migration utilities

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the makerfolio shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
