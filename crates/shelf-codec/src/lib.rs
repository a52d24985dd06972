//! Content codec for Shelf records.
//!
//! The on-disk representation is a permissive, self-describing text format.
//! A document is one of:
//!
//! - whole-document JSON (object, array, or scalar)
//! - `key=value` lines (`#` and `//` comments ignored)
//! - `- value` list lines (same comment rules)
//! - plain lines, one list element per line (fallback, values verbatim)
//!
//! Parsing sniffs the format from the document itself and is total: any
//! input yields a [`Record`](shelf_types::Record), possibly empty.
//! Serialization picks its strategy from a
//! [`StructureKind`](shelf_types::StructureKind) computed by the caller.

pub mod parse;
pub mod scalar;
pub mod serialize;

pub use parse::parse;
pub use scalar::convert_scalar;
pub use serialize::{serialize_record, serialize_value};
