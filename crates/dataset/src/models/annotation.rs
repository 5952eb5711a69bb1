use super::require_key;
use crate::json;
use cocoql_core::{
    DataType, Entity, Error, Fields, Record, RecordId, Result, Value, ID, UNASSIGNED_ID,
};

pub const IMAGE_ID: &str = "image_id";
pub const CATEGORY_ID: &str = "category_id";
pub const SEGMENTATION: &str = "segmentation";
pub const AREA: &str = "area";
pub const BBOX: &str = "bbox";
pub const ISCROWD: &str = "iscrowd";

pub const BBOX_X_IDX: usize = 0;
pub const BBOX_Y_IDX: usize = 1;
pub const BBOX_WIDTH_IDX: usize = 2;
pub const BBOX_HEIGHT_IDX: usize = 3;

/// A COCO object annotation.
///
/// `bbox` is `[x, y, width, height]`. `segmentation` is kept as raw JSON: either a
/// list of polygons or an RLE object.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub id: RecordId,
    pub image_id: RecordId,
    pub category_id: RecordId,
    pub bbox: [f64; 4],
    pub iscrowd: i64,
    pub segmentation: Option<serde_json::Value>,
    pub area: Option<f64>,
}

impl Annotation {
    /// Creates a non-crowd annotation with an unassigned id.
    pub fn new(image_id: RecordId, category_id: RecordId, bbox: [f64; 4]) -> Self {
        Self {
            id: UNASSIGNED_ID,
            image_id,
            category_id,
            bbox,
            iscrowd: 0,
            segmentation: None,
            area: None,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_iscrowd(mut self, iscrowd: i64) -> Self {
        self.iscrowd = iscrowd;
        self
    }

    pub fn with_segmentation(mut self, segmentation: serde_json::Value) -> Self {
        self.segmentation = Some(segmentation);
        self
    }

    pub fn bbox_width(&self) -> f64 {
        self.bbox[BBOX_WIDTH_IDX]
    }

    pub fn bbox_height(&self) -> f64 {
        self.bbox[BBOX_HEIGHT_IDX]
    }
}

impl Record for Annotation {
    const KIND: &'static str = "annotation";
    const FIELDS: &'static [&'static str] =
        &[ID, IMAGE_ID, CATEGORY_ID, SEGMENTATION, AREA, BBOX, ISCROWD];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            ID => self.id.into(),
            IMAGE_ID => self.image_id.into(),
            CATEGORY_ID => self.category_id.into(),
            SEGMENTATION => self
                .segmentation
                .clone()
                .map_or(Value::Null, json::from_json),
            AREA => self.area.into(),
            BBOX => self.bbox.into(),
            ISCROWD => self.iscrowd.into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Entity for Annotation {
    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            id: fields.record_id(Self::KIND)?,
            image_id: require_key(fields, Self::KIND, IMAGE_ID)?,
            category_id: require_key(fields, Self::KIND, CATEGORY_ID)?,
            bbox: read_bbox(fields)?,
            iscrowd: fields.optional_int(Self::KIND, ISCROWD)?.unwrap_or(0),
            segmentation: fields.optional(SEGMENTATION).map(json::to_json),
            area: fields.optional_float(Self::KIND, AREA)?,
        })
    }

    fn to_fields(&self) -> Fields {
        Self::FIELDS
            .iter()
            .filter_map(|name| self.field(name).map(|value| (*name, value)))
            .collect()
    }
}

fn read_bbox(fields: &Fields) -> Result<[f64; 4]> {
    let items = fields.require_list(Annotation::KIND, BBOX)?;
    let malformed = |got| Error::MalformedField {
        kind: Annotation::KIND,
        field: BBOX.to_string(),
        expected: DataType::List,
        got,
    };
    if items.len() != 4 {
        return Err(malformed(Some(DataType::List)));
    }
    let mut bbox = [0.0; 4];
    for (slot, item) in bbox.iter_mut().zip(items) {
        *slot = item.as_number().ok_or_else(|| malformed(item.data_type()))?;
    }
    Ok(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Fields {
        Fields::new()
            .with(ID, 11i64)
            .with(IMAGE_ID, 3i64)
            .with(CATEGORY_ID, 18i64)
            .with(BBOX, [10i64, 20, 30, 40])
            .with(AREA, 1200.5)
    }

    #[test]
    fn test_from_fields() {
        let annotation = Annotation::from_fields(&fields()).unwrap();
        assert_eq!(annotation.bbox, [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(annotation.iscrowd, 0);
        assert_eq!(annotation.area, Some(1200.5));
        assert_eq!(annotation.segmentation, None);
        assert_eq!(annotation.bbox_width(), 30.0);
        assert_eq!(annotation.bbox_height(), 40.0);
    }

    #[test]
    fn test_bbox_must_have_four_numbers() {
        let short = fields().with(BBOX, [1i64, 2, 3]);
        assert!(matches!(
            Annotation::from_fields(&short),
            Err(Error::MalformedField { field, .. }) if field == BBOX
        ));

        let text = fields().with(BBOX, Value::List(vec!["a".into(); 4]));
        assert!(Annotation::from_fields(&text).is_err());
    }

    #[test]
    fn test_missing_category() {
        let mut fields = fields();
        fields.remove(CATEGORY_ID);
        assert!(matches!(
            Annotation::from_fields(&fields),
            Err(Error::MissingField { field, .. }) if field == CATEGORY_ID
        ));
    }

    #[test]
    fn test_segmentation_roundtrip() {
        let polygons = json!([[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]);
        let annotation = Annotation::new(1, 2, [0.0, 0.0, 5.0, 5.0])
            .with_id(4)
            .with_segmentation(polygons.clone());
        let back = Annotation::from_fields(&annotation.to_fields()).unwrap();
        assert_eq!(back.segmentation, Some(polygons));
        assert_eq!(back, annotation);

        let rle = json!({"counts": "abc", "size": [2, 2]});
        let annotation = annotation.with_segmentation(rle.clone());
        assert!(matches!(annotation.field(SEGMENTATION), Some(Value::Json(_))));
        let back = Annotation::from_fields(&annotation.to_fields()).unwrap();
        assert_eq!(back.segmentation, Some(rle));
    }

    #[test]
    fn test_bbox_field_is_indexable_list() {
        let annotation = Annotation::new(1, 2, [1.0, 2.0, 3.0, 4.0]);
        let bbox = annotation.field(BBOX).unwrap();
        assert_eq!(bbox.as_list().unwrap()[BBOX_HEIGHT_IDX], Value::Float(4.0));
    }
}
