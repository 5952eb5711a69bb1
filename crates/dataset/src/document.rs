//! The COCO JSON document.
//!
//! A document holds the `info`, `images`, `annotations`, `categories` and
//! `licenses` sections. Record sections are kept as raw JSON objects here and
//! turned into typed collections with [`decode`] / [`encode`].

use crate::error::{DatasetError, Result};
use crate::json::{fields_from_object, fields_to_object};
use crate::models::Info;
use cocoql_core::{Collection, Entity, IdPolicy};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const INFO: &str = "info";
pub const IMAGES: &str = "images";
pub const ANNOTATIONS: &str = "annotations";
pub const CATEGORIES: &str = "categories";
pub const LICENSES: &str = "licenses";

/// A COCO document with untyped record sections.
///
/// `images`, `annotations` and `categories` are required when reading; `info`
/// and `licenses` may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub info: Option<Info>,
    pub images: Vec<serde_json::Value>,
    pub annotations: Vec<serde_json::Value>,
    pub categories: Vec<serde_json::Value>,
    #[serde(default)]
    pub licenses: Option<Vec<serde_json::Value>>,
}

impl Document {
    /// Reads a document from a JSON file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::io(path, source))?;
        let document: Self = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            DatasetError::Document {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(
            path = %path.display(),
            images = document.images.len(),
            annotations = document.annotations.len(),
            categories = document.categories.len(),
            "read dataset document"
        );
        Ok(document)
    }

    /// Parses a document from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes the document as pretty JSON indented by `indent` spaces.
    ///
    /// Non-ASCII text is written as is.
    pub fn write(&self, path: impl AsRef<Path>, indent: usize) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| DatasetError::io(path, source))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, indent)
            .map_err(|source| DatasetError::Document {
                path: path.to_path_buf(),
                source,
            })?;
        writer
            .flush()
            .map_err(|source| DatasetError::io(path, source))?;
        tracing::info!(path = %path.display(), "wrote dataset document");
        Ok(())
    }

    /// Renders the document as pretty JSON indented by `indent` spaces.
    pub fn to_string_pretty(&self, indent: usize) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, indent)?;
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn write_to<W: Write>(&self, writer: W, indent: usize) -> serde_json::Result<()> {
        let indent = " ".repeat(indent);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)
    }
}

/// Builds a typed collection from the raw entries of one section.
///
/// Fails on the first entry that is not an object or does not form a valid record,
/// naming the section and the entry's position.
pub fn decode<E: Entity>(
    section: &'static str,
    entries: Vec<serde_json::Value>,
    policy: IdPolicy,
) -> Result<Collection<E>> {
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let serde_json::Value::Object(object) = entry else {
            return Err(DatasetError::NotAnObject { section, index });
        };
        let fields = fields_from_object(object);
        let record = E::from_fields(&fields).map_err(|source| DatasetError::Entry {
            section,
            index,
            source,
        })?;
        records.push(record);
    }
    Ok(Collection::from_records(records).policy_of(policy))
}

/// Turns a typed collection back into raw section entries.
pub fn encode<E: Entity>(collection: &Collection<E>) -> Vec<serde_json::Value> {
    collection
        .iter()
        .map(|record| serde_json::Value::Object(fields_to_object(&record.to_fields())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Image};
    use serde_json::json;

    const SAMPLE: &str = r#"{
        "images": [{"id": 1, "file_name": "1.jpg", "width": 640, "height": 480}],
        "annotations": [],
        "categories": [{"id": 1, "name": "person", "supercategory": "person"}]
    }"#;

    #[test]
    fn test_optional_sections() {
        let document = Document::parse(SAMPLE).unwrap();
        assert!(document.info.is_none());
        assert!(document.licenses.is_none());
        assert_eq!(document.images.len(), 1);
    }

    #[test]
    fn test_required_sections() {
        assert!(Document::parse(r#"{"images": [], "categories": []}"#).is_err());
    }

    #[test]
    fn test_decode_entries() {
        let document = Document::parse(SAMPLE).unwrap();
        let images: Collection<Image> = decode(IMAGES, document.images, IdPolicy::Strict).unwrap();
        assert_eq!(images.policy(), IdPolicy::Strict);
        assert_eq!(images.records()[0].width, Some(640));

        let err = decode::<Category>(CATEGORIES, vec![json!({"id": 1})], IdPolicy::default())
            .unwrap_err();
        assert!(matches!(err, DatasetError::Entry { section: CATEGORIES, index: 0, .. }));

        let err = decode::<Category>(CATEGORIES, vec![json!([1, 2])], IdPolicy::default())
            .unwrap_err();
        assert!(matches!(err, DatasetError::NotAnObject { index: 0, .. }));
    }

    #[test]
    fn test_encode_then_decode() {
        let categories = Collection::from_records(vec![Category::new("ß-Klasse").with_id(4)]);
        let entries = encode(&categories);
        assert_eq!(entries[0]["name"], json!("ß-Klasse"));
        let decoded: Collection<Category> = decode(CATEGORIES, entries, IdPolicy::default()).unwrap();
        assert_eq!(decoded, categories);
    }

    #[test]
    fn test_pretty_output() {
        let document = Document {
            categories: vec![json!({"id": 1, "name": "café"})],
            ..Document::default()
        };
        let text = document.to_string_pretty(4).unwrap();
        assert!(text.contains("\n    \"info\": null"));
        assert!(text.contains("café"));
        let first = text.find("\"info\"").unwrap();
        let last = text.find("\"licenses\"").unwrap();
        assert!(first < last);
    }
}
