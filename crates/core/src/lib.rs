//! Core budget planning logic for Dompet.
//!
//! This crate contains pure logic with ZERO web dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `budget` - Allocation editing, category hierarchy, realization, plan lifecycle
//! - `access` - Workspace roles and permissions
//! - `analytics` - Income-by-category aggregation

pub mod access;
pub mod analytics;
pub mod budget;
