//! services/api/src/lib.rs
//!
//! Adapters, configuration and the HTTP surface shared by the `api`,
//! `openapi` and `generate` binaries.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
