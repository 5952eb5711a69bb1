//! Per-kind filter builders.
//!
//! Each builder wraps a `Query` and adds one fluent method per field of its kind,
//! plus an `intersection` that ties the kind to its peer collections.

mod annotation;
mod category;
mod image;
mod license;

pub use annotation::AnnotationFilter;
pub use category::CategoryFilter;
pub use image::ImageFilter;
pub use license::LicenseFilter;
