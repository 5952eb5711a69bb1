use super::optional_key;
use cocoql_core::{Entity, Fields, Record, RecordId, Result, Value, ID, UNASSIGNED_ID};

pub const FILE_NAME: &str = "file_name";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const LICENSE: &str = "license";
pub const FLICKR_URL: &str = "flickr_url";
pub const COCO_URL: &str = "coco_url";
pub const DATE_CAPTURED: &str = "date_captured";

/// A COCO image entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub id: RecordId,
    pub file_name: String,
    /// Width, px.
    pub width: Option<i64>,
    /// Height, px.
    pub height: Option<i64>,
    /// Id of the image's license.
    pub license: Option<RecordId>,
    pub flickr_url: Option<String>,
    pub coco_url: Option<String>,
    pub date_captured: Option<String>,
}

impl Image {
    /// Creates an image with an unassigned id.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            file_name: file_name.into(),
            width: None,
            height: None,
            license: None,
            flickr_url: None,
            coco_url: None,
            date_captured: None,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_license(mut self, license: RecordId) -> Self {
        self.license = Some(license);
        self
    }

    pub fn with_flickr_url(mut self, url: impl Into<String>) -> Self {
        self.flickr_url = Some(url.into());
        self
    }

    pub fn with_coco_url(mut self, url: impl Into<String>) -> Self {
        self.coco_url = Some(url.into());
        self
    }

    pub fn with_date_captured(mut self, date: impl Into<String>) -> Self {
        self.date_captured = Some(date.into());
        self
    }
}

impl Record for Image {
    const KIND: &'static str = "image";
    const FIELDS: &'static [&'static str] = &[
        ID,
        FILE_NAME,
        WIDTH,
        HEIGHT,
        LICENSE,
        FLICKR_URL,
        COCO_URL,
        DATE_CAPTURED,
    ];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            ID => self.id.into(),
            FILE_NAME => self.file_name.as_str().into(),
            WIDTH => self.width.into(),
            HEIGHT => self.height.into(),
            LICENSE => self.license.into(),
            FLICKR_URL => self.flickr_url.clone().into(),
            COCO_URL => self.coco_url.clone().into(),
            DATE_CAPTURED => self.date_captured.clone().into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Entity for Image {
    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            id: fields.record_id(Self::KIND)?,
            file_name: fields.require_string(Self::KIND, FILE_NAME)?,
            width: fields.optional_int(Self::KIND, WIDTH)?,
            height: fields.optional_int(Self::KIND, HEIGHT)?,
            license: optional_key(fields, Self::KIND, LICENSE)?,
            flickr_url: fields.optional_string(Self::KIND, FLICKR_URL)?,
            coco_url: fields.optional_string(Self::KIND, COCO_URL)?,
            date_captured: fields.optional_string(Self::KIND, DATE_CAPTURED)?,
        })
    }

    fn to_fields(&self) -> Fields {
        Self::FIELDS
            .iter()
            .filter_map(|name| self.field(name).map(|value| (*name, value)))
            .collect()
    }
}
