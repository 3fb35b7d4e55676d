//! Persistence layer for the audit trail backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - The append-only audit record repository

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
