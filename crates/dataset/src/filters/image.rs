use crate::models::annotation::{CATEGORY_ID, IMAGE_ID};
use crate::models::image::{DATE_CAPTURED, FILE_NAME, HEIGHT, LICENSE, WIDTH};
use crate::models::{Annotations, Categories, Licenses};
use cocoql_core::{Result, Value, ID};
use cocoql_query::ast::{restrict_to_peer, ComparisonOp, IntersectionTerm, MembershipOp};
use cocoql_query::{FilterBuilder, Query};

/// Filter builder for image collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageFilter {
    query: Query,
}

impl ImageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(self, value: impl Into<Value>) -> Self {
        self.compare(FILE_NAME, value, ComparisonOp::Eq)
    }

    pub fn file_name_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(FILE_NAME, value, op)
    }

    pub fn file_names<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(FILE_NAME, values, MembershipOp::In)
    }

    pub fn file_names_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(FILE_NAME, values, op)
    }

    pub fn width(self, value: impl Into<Value>) -> Self {
        self.compare(WIDTH, value, ComparisonOp::Eq)
    }

    pub fn width_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(WIDTH, value, op)
    }

    pub fn width_range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.range(WIDTH, min, max)
    }

    pub fn width_range_with(
        self,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        self.range_with(WIDTH, min, max, min_op, max_op)
    }

    pub fn height(self, value: impl Into<Value>) -> Self {
        self.compare(HEIGHT, value, ComparisonOp::Eq)
    }

    pub fn height_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(HEIGHT, value, op)
    }

    pub fn height_range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.range(HEIGHT, min, max)
    }

    pub fn height_range_with(
        self,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        self.range_with(HEIGHT, min, max, min_op, max_op)
    }

    pub fn license(self, value: impl Into<Value>) -> Self {
        self.compare(LICENSE, value, ComparisonOp::Eq)
    }

    pub fn license_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(LICENSE, value, op)
    }

    pub fn licenses<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(LICENSE, values, MembershipOp::In)
    }

    pub fn licenses_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(LICENSE, values, op)
    }

    pub fn date_captured(self, value: impl Into<Value>) -> Self {
        self.compare(DATE_CAPTURED, value, ComparisonOp::Eq)
    }

    pub fn date_captured_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(DATE_CAPTURED, value, op)
    }

    /// Dates compare as text, so bounds should share the stored date format.
    pub fn date_captured_range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.range(DATE_CAPTURED, min, max)
    }

    pub fn date_captured_range_with(
        self,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        self.range_with(DATE_CAPTURED, min, max, min_op, max_op)
    }

    /// Keeps images that are still referenced by `annotations`.
    ///
    /// With `categories`, only annotations of those categories count. With
    /// `licenses`, the image's license must also be one of them.
    pub fn intersection(
        self,
        annotations: &Annotations,
        categories: Option<&Categories>,
        licenses: Option<&Licenses>,
    ) -> Result<Self> {
        let mut intersection = IntersectionTerm::new();
        if let Some(licenses) = licenses {
            intersection = intersection.member_of(LICENSE, licenses, ID)?;
        }
        let intersection = match categories {
            Some(categories) => {
                let referenced = restrict_to_peer(annotations, CATEGORY_ID, categories, ID)?;
                intersection.member_of(ID, &referenced, IMAGE_ID)?
            }
            None => intersection.member_of(ID, annotations, IMAGE_ID)?,
        };
        Ok(self.intersect(intersection))
    }
}

impl FilterBuilder for ImageFilter {
    fn query(&self) -> &Query {
        &self.query
    }

    fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    fn into_query(self) -> Query {
        self.query
    }
}

impl From<ImageFilter> for Query {
    fn from(filter: ImageFilter) -> Self {
        filter.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Annotation, Category, Image, Images, License};
    use cocoql_core::{Collection, RecordId};

    fn images() -> Images {
        Collection::from_records(vec![
            Image::new("1.jpg").with_id(1).with_size(640, 480).with_license(5),
            Image::new("2.jpg").with_id(2).with_size(320, 240).with_license(9),
            Image::new("3.jpg").with_id(3).with_size(1024, 768).with_license(5),
        ])
    }

    fn ids(images: &Images) -> Vec<RecordId> {
        images.iter().map(|image| image.id).collect()
    }

    #[test]
    fn test_field_methods() {
        let filter = ImageFilter::new().width_range(300, 700).and().license(5);
        assert_eq!(ids(&filter.apply(&images()).unwrap()), vec![1]);

        let filter = ImageFilter::new()
            .file_names(["2.jpg", "3.jpg"])
            .or()
            .height_with(480, ComparisonOp::Le);
        assert_eq!(ids(&filter.apply(&images()).unwrap()), vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_range_operator() {
        let err = ImageFilter::new()
            .width_range_with(1, 2, ComparisonOp::Le, ComparisonOp::Le)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_intersection_with_annotations() {
        let annotations = Collection::from_records(vec![
            Annotation::new(1, 10, [0.0; 4]).with_id(1),
            Annotation::new(3, 11, [0.0; 4]).with_id(2),
        ]);
        let filter = ImageFilter::new().intersection(&annotations, None, None).unwrap();
        assert_eq!(ids(&filter.apply(&images()).unwrap()), vec![1, 3]);

        let categories = Collection::from_records(vec![Category::new("dog").with_id(11)]);
        let filter = ImageFilter::new()
            .intersection(&annotations, Some(&categories), None)
            .unwrap();
        assert_eq!(ids(&filter.apply(&images()).unwrap()), vec![3]);
    }

    #[test]
    fn test_intersection_with_licenses() {
        let annotations = Collection::from_records(vec![
            Annotation::new(1, 10, [0.0; 4]).with_id(1),
            Annotation::new(2, 10, [0.0; 4]).with_id(2),
        ]);
        let licenses = Collection::from_records(vec![License::new("CC").with_id(9)]);
        let filter = ImageFilter::new()
            .intersection(&annotations, None, Some(&licenses))
            .unwrap();
        assert_eq!(ids(&filter.apply(&images()).unwrap()), vec![2]);
    }

    #[test]
    fn test_empty_peer_constrains() {
        let annotations: Annotations = Collection::new();
        let filter = ImageFilter::new().intersection(&annotations, None, None).unwrap();
        assert!(filter.apply(&images()).unwrap().is_empty());
    }
}
