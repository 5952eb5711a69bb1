//! Cross-collection consistency.
//!
//! Filtering one collection of a dataset can orphan records in the others. The
//! orchestrator runs a fixed two-pass propagation:
//!
//! 1. Top-down: each collection's own filter runs (images, licenses, categories),
//!    then annotations are filtered by their own filter plus the surviving images
//!    and categories.
//! 2. Bottom-up: categories and images are narrowed to those the surviving
//!    annotations still reference. Licenses are narrowed to those the surviving
//!    images reference, when a license filter was given.
//!
//! The result is not a fixed point of the protocol; it is what two passes produce.

use crate::filters::{AnnotationFilter, CategoryFilter, ImageFilter, LicenseFilter};
use crate::models::{Annotations, Categories, Images, Licenses};
use cocoql_core::{Collection, Record, Result};
use cocoql_query::FilterBuilder;

/// User filters for each collection of a dataset. An absent filter keeps everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetFilters {
    pub images: Option<ImageFilter>,
    pub annotations: Option<AnnotationFilter>,
    pub categories: Option<CategoryFilter>,
    pub licenses: Option<LicenseFilter>,
}

impl DatasetFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(mut self, filter: ImageFilter) -> Self {
        self.images = Some(filter);
        self
    }

    pub fn with_annotations(mut self, filter: AnnotationFilter) -> Self {
        self.annotations = Some(filter);
        self
    }

    pub fn with_categories(mut self, filter: CategoryFilter) -> Self {
        self.categories = Some(filter);
        self
    }

    pub fn with_licenses(mut self, filter: LicenseFilter) -> Self {
        self.licenses = Some(filter);
        self
    }
}

/// Borrowed view of the four correlated collections.
#[derive(Clone, Copy, Debug)]
pub struct Collections<'a> {
    pub images: &'a Images,
    pub annotations: &'a Annotations,
    pub categories: &'a Categories,
    pub licenses: &'a Licenses,
}

/// The collections after propagation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Propagated {
    pub images: Images,
    pub annotations: Annotations,
    pub categories: Categories,
    pub licenses: Licenses,
}

/// Runs the two-pass propagation over `source`.
///
/// Nothing in `source` is modified. Any failure aborts the whole run.
pub fn propagate(source: Collections<'_>, filters: &DatasetFilters) -> Result<Propagated> {
    // pass 1: user filters, then annotations against the survivors
    let images = apply(filters.images.as_ref(), source.images)?;
    let licenses = match &filters.licenses {
        Some(filter) => Some(apply(Some(filter), source.licenses)?),
        None => None,
    };
    let categories = apply(filters.categories.as_ref(), source.categories)?;

    let annotation_filter = filters.annotations.clone().unwrap_or_default().intersection(
        Some(&images),
        Some(&categories),
        licenses.as_ref(),
    )?;
    let annotations = apply(Some(&annotation_filter), source.annotations)?;

    // pass 2: keep only what the surviving annotations reference
    let category_filter = CategoryFilter::new().intersection(&annotations, None, None)?;
    let categories = apply(Some(&category_filter), &categories)?;

    let image_filter = ImageFilter::new().intersection(&annotations, None, licenses.as_ref())?;
    let images = apply(Some(&image_filter), &images)?;

    let licenses = match licenses {
        Some(licenses) => {
            let license_filter = LicenseFilter::new().intersection(&images)?;
            apply(Some(&license_filter), &licenses)?
        }
        None => source.licenses.clone(),
    };

    Ok(Propagated {
        images,
        annotations,
        categories,
        licenses,
    })
}

fn apply<F, R>(filter: Option<&F>, collection: &Collection<R>) -> Result<Collection<R>>
where
    F: FilterBuilder,
    R: Record,
{
    let filtered = match filter {
        Some(filter) => filter.apply(collection)?,
        None => collection.clone(),
    };
    tracing::debug!(
        kind = R::KIND,
        before = collection.len(),
        after = filtered.len(),
        "propagation step"
    );
    Ok(filtered)
}
