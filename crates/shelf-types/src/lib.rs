//! Foundation types for Shelf.
//!
//! This crate provides the in-memory record model shared by every other
//! Shelf crate, plus the structural classifier that decides how a record
//! is written back to disk.
//!
//! # Key Types
//!
//! - [`Record`] — insertion-ordered mapping from string keys to values
//! - [`StructureKind`] — serialization strategy (`KeyValue`, `List`, `Json`)
//! - [`classify`] — derive the [`StructureKind`] of a record

pub mod record;
pub mod structure;

pub use record::{list_key, record_from_values, Record, Value};
pub use structure::{classify, StructureKind};
