use cocoql_core::{Entity, Fields, Record, RecordId, Result, Value, ID, UNASSIGNED_ID};

pub const NAME: &str = "name";
pub const URL: &str = "url";

/// A COCO image license.
#[derive(Clone, Debug, PartialEq)]
pub struct License {
    pub id: RecordId,
    pub name: String,
    pub url: Option<String>,
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            url: None,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Record for License {
    const KIND: &'static str = "license";
    const FIELDS: &'static [&'static str] = &[ID, NAME, URL];

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
            URL => Some(self.url.clone().into()),
            _ => None,
        }
    }
}

impl Entity for License {
    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            id: fields.record_id(Self::KIND)?,
            name: fields.require_string(Self::KIND, NAME)?,
            url: fields.optional_string(Self::KIND, URL)?,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with(ID, self.id)
            .with(NAME, self.name.as_str())
            .with(URL, self.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cocoql_core::Error;

    #[test]
    fn test_from_fields() {
        let fields = Fields::new()
            .with(ID, 4i64)
            .with(NAME, "Attribution License")
            .with(URL, "http://creativecommons.org/licenses/by/2.0/");
        let license = License::from_fields(&fields).unwrap();
        assert_eq!(license.id, 4);
        assert_eq!(license.to_fields(), fields);
    }

    #[test]
    fn test_unassigned_id() {
        let license = License::from_fields(&Fields::new().with(NAME, "CC0")).unwrap();
        assert_eq!(license.id, UNASSIGNED_ID);
        assert_eq!(license.url, None);
    }

    #[test]
    fn test_missing_name() {
        assert!(matches!(
            License::from_fields(&Fields::new().with(URL, "x")),
            Err(Error::MissingField { kind: "license", .. })
        ));
    }
}
