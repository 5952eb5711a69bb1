use crate::models::annotation::{CATEGORY_ID, IMAGE_ID};
use crate::models::category::{NAME, SUPERCATEGORY};
use crate::models::image::LICENSE;
use crate::models::{Annotations, Images, Licenses};
use cocoql_core::{Result, Value, ID};
use cocoql_query::ast::{restrict_to_peer, ComparisonOp, IntersectionTerm, MembershipOp};
use cocoql_query::{FilterBuilder, Query};
use std::borrow::Cow;

/// Filter builder for category collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryFilter {
    query: Query,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(self, value: impl Into<Value>) -> Self {
        self.compare(NAME, value, ComparisonOp::Eq)
    }

    pub fn name_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(NAME, value, op)
    }

    pub fn names<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(NAME, values, MembershipOp::In)
    }

    pub fn names_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(NAME, values, op)
    }

    pub fn supercategory(self, value: impl Into<Value>) -> Self {
        self.compare(SUPERCATEGORY, value, ComparisonOp::Eq)
    }

    pub fn supercategory_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(SUPERCATEGORY, value, op)
    }

    pub fn supercategories<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(SUPERCATEGORY, values, MembershipOp::In)
    }

    pub fn supercategories_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(SUPERCATEGORY, values, op)
    }

    /// Keeps categories still referenced by `annotations`.
    ///
    /// With `images`, only annotations on those images count; `licenses` further
    /// narrows `images` and has no effect on its own.
    pub fn intersection(
        self,
        annotations: &Annotations,
        images: Option<&Images>,
        licenses: Option<&Licenses>,
    ) -> Result<Self> {
        let referenced = match images {
            Some(images) => {
                let images = match licenses {
                    Some(licenses) => Cow::Owned(restrict_to_peer(images, LICENSE, licenses, ID)?),
                    None => Cow::Borrowed(images),
                };
                Cow::Owned(restrict_to_peer(annotations, IMAGE_ID, images.as_ref(), ID)?)
            }
            None => Cow::Borrowed(annotations),
        };
        let intersection = IntersectionTerm::new().member_of(ID, referenced.as_ref(), CATEGORY_ID)?;
        Ok(self.intersect(intersection))
    }
}

impl FilterBuilder for CategoryFilter {
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

impl From<CategoryFilter> for Query {
    fn from(filter: CategoryFilter) -> Self {
        filter.query
    }
}
