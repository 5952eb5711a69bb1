use cocoql_core::{Entity, Fields, Record, RecordId, Result, Value, ID, UNASSIGNED_ID};

pub const NAME: &str = "name";
pub const SUPERCATEGORY: &str = "supercategory";

/// A COCO object category.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub supercategory: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            supercategory: None,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn with_supercategory(mut self, supercategory: impl Into<String>) -> Self {
        self.supercategory = Some(supercategory.into());
        self
    }
}

impl Record for Category {
    const KIND: &'static str = "category";
    const FIELDS: &'static [&'static str] = &[ID, NAME, SUPERCATEGORY];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            ID => Some(self.id.into()),
            NAME => Some(self.name.as_str().into()),
            SUPERCATEGORY => Some(self.supercategory.clone().into()),
            _ => None,
        }
    }
}

impl Entity for Category {
    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            id: fields.record_id(Self::KIND)?,
            name: fields.require_string(Self::KIND, NAME)?,
            supercategory: fields.optional_string(Self::KIND, SUPERCATEGORY)?,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with(ID, self.id)
            .with(NAME, self.name.as_str())
            .with(SUPERCATEGORY, self.supercategory.clone())
    }
}
