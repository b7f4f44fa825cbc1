//! Common library for the clipshelf video metadata service
//!
//! This crate provides shared infrastructure used by the API service:
//! PostgreSQL connectivity, Redis cache connectivity, and error handling.

pub mod cache;
pub mod database;
pub mod error;
