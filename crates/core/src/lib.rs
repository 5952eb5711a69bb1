//! cocoql Core - Core types for cocoql record collections.
//!
//! This crate provides the foundational types the filter engine works on:
//!
//! - `Value`: Runtime values a record field can hold
//! - `DataType`: Value kinds (Boolean, Int, Float, String, List, Json)
//! - `Record` / `Entity`: Named-field access and field-mapping conversion for a record kind
//! - `Collection`: An ordered set of records with id bookkeeping
//! - `Error`: Error types shared by every cocoql crate
//!
//! # Example
//!
//! ```rust
//! use cocoql_core::{Collection, Record, RecordId, Value, ID};
//!
//! #[derive(Clone, Debug)]
//! struct Tag {
//!     id: RecordId,
//!     name: String,
//! }
//!
//! impl Record for Tag {
//!     const KIND: &'static str = "tag";
//!     const FIELDS: &'static [&'static str] = &[ID, "name"];
//!
//!     fn id(&self) -> RecordId {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: RecordId) {
//!         self.id = id;
//!     }
//!
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             ID => Some(self.id.into()),
//!             "name" => Some(self.name.as_str().into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut tags = Collection::from_records(vec![Tag { id: 7, name: "car".into() }]);
//! let id = tags.append(Tag { id: 0, name: "bus".into() }).unwrap();
//!
//! assert_eq!(id, 8);
//! assert_eq!(tags.unique_values("name").unwrap().len(), 2);
//! ```

#![no_std]

extern crate alloc;

mod collection;
mod error;
mod record;
mod types;
mod value;

pub use collection::{Collection, IdPolicy};
pub use error::{Error, Result};
pub use record::{Entity, Fields, Record, RecordId, ID, MAX_RECORD_ID, UNASSIGNED_ID};
pub use types::DataType;
pub use value::{JsonValue, Value};
