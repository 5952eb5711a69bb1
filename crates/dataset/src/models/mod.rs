//! COCO record kinds.

pub mod annotation;
pub mod category;
pub mod image;
pub mod info;
pub mod license;

pub use annotation::{Annotation, BBOX_HEIGHT_IDX, BBOX_WIDTH_IDX, BBOX_X_IDX, BBOX_Y_IDX};
pub use category::Category;
pub use image::Image;
pub use info::Info;
pub use license::License;

use cocoql_core::{Collection, DataType, Error, Fields, RecordId, Result};

pub type Images = Collection<Image>;
pub type Annotations = Collection<Annotation>;
pub type Categories = Collection<Category>;
pub type Licenses = Collection<License>;

/// Reads a required foreign key.
pub(crate) fn require_key(fields: &Fields, kind: &'static str, name: &str) -> Result<RecordId> {
    let key = fields.require_int(kind, name)?;
    to_key(kind, name, key)
}

/// Reads an optional foreign key.
pub(crate) fn optional_key(
    fields: &Fields,
    kind: &'static str,
    name: &str,
) -> Result<Option<RecordId>> {
    fields
        .optional_int(kind, name)?
        .map(|key| to_key(kind, name, key))
        .transpose()
}

fn to_key(kind: &'static str, name: &str, key: i64) -> Result<RecordId> {
    RecordId::try_from(key).map_err(|_| Error::MalformedField {
        kind,
        field: name.to_string(),
        expected: DataType::Int,
        got: Some(DataType::Int),
    })
}
