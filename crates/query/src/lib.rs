//! cocoql Query - Filter engine for cocoql record collections.
//!
//! This crate provides the query side of cocoql:
//!
//! - `ast`: Operators, filter terms, intersection terms and compiled expressions
//! - `query`: The ordered term/operator sequence and the `FilterBuilder` surface
//! - `compiler`: Query compilation to an OR of AND-groups
//! - `executor`: Collection filtering with a compiled query
//!
//! # Example
//!
//! ```rust
//! use cocoql_core::{Collection, Record, RecordId, Value, ID};
//! use cocoql_query::{ast::RangeTerm, FilterBuilder, Filterable, Query};
//!
//! #[derive(Clone, Debug)]
//! struct Region {
//!     id: RecordId,
//!     area: f64,
//! }
//!
//! impl Record for Region {
//!     const KIND: &'static str = "region";
//!     const FIELDS: &'static [&'static str] = &[ID, "area"];
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
//!             "area" => Some(self.area.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let regions = Collection::from_records(vec![
//!     Region { id: 1, area: 4.0 },
//!     Region { id: 2, area: 12.5 },
//!     Region { id: 3, area: 40.0 },
//! ]);
//!
//! let query = Query::new()
//!     .push(RangeTerm::inclusive("area", 10, 20))
//!     .or()
//!     .ids([3]);
//! let kept = regions.filter_by(&query).unwrap();
//!
//! assert_eq!(kept.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
//! ```

#![no_std]

extern crate alloc;

pub mod ast;
pub mod compiler;
pub mod executor;
pub mod query;

pub use compiler::{compile, CompiledFilter};
pub use executor::{filter, FilterExecutor, Filterable};
pub use query::{FilterBuilder, Query, QueryItem};
