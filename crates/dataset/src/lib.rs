//! cocoql Dataset - COCO datasets on top of the cocoql filter engine.
//!
//! This crate provides:
//!
//! - `models`: The COCO record kinds (Image, Annotation, Category, License, Info)
//! - `filters`: Per-kind filter builders with cross-collection `intersection`
//! - `orchestrator`: Two-pass propagation that keeps filtered collections consistent
//! - `document`: Reading and writing the COCO JSON document
//! - `store`: Image files keyed by file name
//! - `CocoDataset`: The dataset facade tying these together
//!
//! # Example
//!
//! ```rust
//! use cocoql_dataset::filters::{CategoryFilter, LicenseFilter};
//! use cocoql_dataset::models::{Annotation, Category, Image, License};
//! use cocoql_dataset::{CocoDataset, DatasetFilters};
//! use cocoql_query::FilterBuilder;
//!
//! let mut dataset = CocoDataset::new("instances.json");
//! dataset.licenses.append(License::new("Attribution").with_id(5)).unwrap();
//! dataset.licenses.append(License::new("NoDerivs").with_id(9)).unwrap();
//! dataset.images.append(Image::new("1.jpg").with_license(5)).unwrap();
//! dataset.images.append(Image::new("2.jpg").with_license(9)).unwrap();
//! dataset.categories.append(Category::new("person")).unwrap();
//! dataset.annotations.append(Annotation::new(1, 1, [0.0, 0.0, 8.0, 8.0])).unwrap();
//! dataset.annotations.append(Annotation::new(2, 1, [4.0, 4.0, 8.0, 8.0])).unwrap();
//!
//! let filters = DatasetFilters::new()
//!     .with_categories(CategoryFilter::new().name("person"))
//!     .with_licenses(LicenseFilter::new().ids([5]));
//! let filtered = dataset.filter(&filters, false, None).unwrap();
//!
//! assert_eq!(filtered.images.len(), 1);
//! assert_eq!(filtered.images.records()[0].file_name, "1.jpg");
//! assert_eq!(dataset.images.len(), 2);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod filters;
pub mod json;
pub mod lookup;
pub mod models;
pub mod orchestrator;
pub mod store;

mod dataset;

pub use config::DatasetConfig;
pub use dataset::{CocoDataset, CopyReport};
pub use document::Document;
pub use error::{DatasetError, Result};
pub use lookup::{CategoryLookup, ImageLookup, LicenseLookup};
pub use orchestrator::{propagate, DatasetFilters};
pub use store::ImageStore;
