use crate::models::annotation::{
    AREA, BBOX, BBOX_HEIGHT_IDX, BBOX_WIDTH_IDX, CATEGORY_ID, IMAGE_ID, ISCROWD,
};
use crate::models::image::LICENSE;
use crate::models::{Categories, Images, Licenses};
use cocoql_core::{Result, Value, ID};
use cocoql_query::ast::{restrict_to_peer, ComparisonOp, IntersectionTerm, MembershipOp};
use cocoql_query::{FilterBuilder, Query};

/// Filter builder for annotation collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationFilter {
    query: Query,
}

impl AnnotationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_id(self, value: impl Into<Value>) -> Self {
        self.compare(IMAGE_ID, value, ComparisonOp::Eq)
    }

    pub fn image_id_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(IMAGE_ID, value, op)
    }

    pub fn image_ids<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(IMAGE_ID, values, MembershipOp::In)
    }

    pub fn image_ids_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(IMAGE_ID, values, op)
    }

    pub fn category_id(self, value: impl Into<Value>) -> Self {
        self.compare(CATEGORY_ID, value, ComparisonOp::Eq)
    }

    pub fn category_id_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(CATEGORY_ID, value, op)
    }

    pub fn category_ids<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(CATEGORY_ID, values, MembershipOp::In)
    }

    pub fn category_ids_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(CATEGORY_ID, values, op)
    }

    pub fn area(self, value: impl Into<Value>) -> Self {
        self.compare(AREA, value, ComparisonOp::Eq)
    }

    pub fn area_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(AREA, value, op)
    }

    pub fn area_range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.range(AREA, min, max)
    }

    pub fn area_range_with(
        self,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        self.range_with(AREA, min, max, min_op, max_op)
    }

    pub fn bbox_width(self, value: impl Into<Value>) -> Self {
        self.compare_at(BBOX, BBOX_WIDTH_IDX, value, ComparisonOp::Eq)
    }

    pub fn bbox_width_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare_at(BBOX, BBOX_WIDTH_IDX, value, op)
    }

    pub fn bbox_width_range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.range_at(BBOX, BBOX_WIDTH_IDX, min, max)
    }

    pub fn bbox_width_range_with(
        self,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        self.range_at_with(BBOX, BBOX_WIDTH_IDX, min, max, min_op, max_op)
    }

    pub fn bbox_height(self, value: impl Into<Value>) -> Self {
        self.compare_at(BBOX, BBOX_HEIGHT_IDX, value, ComparisonOp::Eq)
    }

    pub fn bbox_height_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare_at(BBOX, BBOX_HEIGHT_IDX, value, op)
    }

    pub fn bbox_height_range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.range_at(BBOX, BBOX_HEIGHT_IDX, min, max)
    }

    pub fn bbox_height_range_with(
        self,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        self.range_at_with(BBOX, BBOX_HEIGHT_IDX, min, max, min_op, max_op)
    }

    pub fn iscrowd(self, value: impl Into<Value>) -> Self {
        self.compare(ISCROWD, value, ComparisonOp::Eq)
    }

    pub fn iscrowd_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(ISCROWD, value, op)
    }

    /// Keeps annotations whose image and category survive in the given peers.
    ///
    /// `licenses` only narrows `images`; without `images` it has no effect.
    pub fn intersection(
        self,
        images: Option<&Images>,
        categories: Option<&Categories>,
        licenses: Option<&Licenses>,
    ) -> Result<Self> {
        let mut intersection = IntersectionTerm::new();
        if let Some(images) = images {
            intersection = match licenses {
                Some(licenses) => {
                    let licensed = restrict_to_peer(images, LICENSE, licenses, ID)?;
                    intersection.member_of(IMAGE_ID, &licensed, ID)?
                }
                None => intersection.member_of(IMAGE_ID, images, ID)?,
            };
        }
        if let Some(categories) = categories {
            intersection = intersection.member_of(CATEGORY_ID, categories, ID)?;
        }
        Ok(self.intersect(intersection))
    }
}

impl FilterBuilder for AnnotationFilter {
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

impl From<AnnotationFilter> for Query {
    fn from(filter: AnnotationFilter) -> Self {
        filter.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Annotation, Annotations, Category, Image, License};
    use cocoql_core::{Collection, Error, RecordId};

    fn annotations() -> Annotations {
        Collection::from_records(vec![
            Annotation::new(1, 1, [0.0, 0.0, 10.0, 20.0]).with_id(1).with_area(200.0),
            Annotation::new(1, 2, [5.0, 5.0, 50.0, 40.0]).with_id(2).with_area(2000.0),
            Annotation::new(2, 2, [0.0, 0.0, 100.0, 80.0])
                .with_id(3)
                .with_area(8000.0)
                .with_iscrowd(1),
        ])
    }

    fn ids(annotations: &Annotations) -> Vec<RecordId> {
        annotations.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_bbox_terms() {
        let filter = AnnotationFilter::new().bbox_width_range(20, 60);
        assert_eq!(ids(&filter.apply(&annotations()).unwrap()), vec![2]);

        let filter = AnnotationFilter::new().bbox_height_with(40, ComparisonOp::Ge);
        assert_eq!(ids(&filter.apply(&annotations()).unwrap()), vec![2, 3]);

        let query = AnnotationFilter::new().bbox_width(10).into_query();
        assert_eq!(query.compile().unwrap().to_string(), "entity.bbox[2] == 10");
    }

    #[test]
    fn test_area_and_iscrowd() {
        let filter = AnnotationFilter::new()
            .area_range_with(200, 8000, ComparisonOp::Gt, ComparisonOp::Le)
            .unwrap()
            .iscrowd(0);
        assert_eq!(ids(&filter.apply(&annotations()).unwrap()), vec![2]);
    }

    #[test]
    fn test_missing_area_fails_ordering() {
        let collection = Collection::from_records(vec![Annotation::new(1, 1, [0.0; 4]).with_id(8)]);
        let err = AnnotationFilter::new()
            .area_with(10, ComparisonOp::Gt)
            .apply(&collection)
            .unwrap_err();
        assert!(matches!(err, Error::Evaluation { record: 8, .. }));
    }

    #[test]
    fn test_intersection() {
        let images = Collection::from_records(vec![
            Image::new("1.jpg").with_id(1).with_license(5),
            Image::new("2.jpg").with_id(2).with_license(9),
        ]);
        let categories = Collection::from_records(vec![Category::new("car").with_id(2)]);

        let filter = AnnotationFilter::new()
            .intersection(Some(&images), Some(&categories), None)
            .unwrap();
        assert_eq!(ids(&filter.apply(&annotations()).unwrap()), vec![2, 3]);

        let licenses = Collection::from_records(vec![License::new("CC").with_id(5)]);
        let filter = AnnotationFilter::new()
            .intersection(Some(&images), Some(&categories), Some(&licenses))
            .unwrap();
        assert_eq!(ids(&filter.apply(&annotations()).unwrap()), vec![2]);
    }

    #[test]
    fn test_intersection_without_peers() {
        let licenses = Collection::from_records(vec![License::new("CC").with_id(5)]);
        let filter = AnnotationFilter::new()
            .intersection(None, None, Some(&licenses))
            .unwrap();
        assert_eq!(filter.apply(&annotations()).unwrap().len(), 3);
    }
}
