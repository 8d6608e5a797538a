//! core
//!
//! Core domain types and operations for nodetend.
//!
//! # Modules
//!
//! - [`types`] - Strong types: NodeTypeName, ChildName, NodePath, etc.
//! - [`config`] - Configuration schema and loading
//! - [`lock`] - Exclusive maintenance-run lock
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - All validation happens at construction time

pub mod config;
pub mod lock;
pub mod types;
