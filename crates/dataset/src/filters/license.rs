use crate::models::image::LICENSE;
use crate::models::license::{NAME, URL};
use crate::models::Images;
use cocoql_core::{Result, Value, ID};
use cocoql_query::ast::{ComparisonOp, IntersectionTerm, MembershipOp};
use cocoql_query::{FilterBuilder, Query};

/// Filter builder for license collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LicenseFilter {
    query: Query,
}

impl LicenseFilter {
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

    pub fn url(self, value: impl Into<Value>) -> Self {
        self.compare(URL, value, ComparisonOp::Eq)
    }

    pub fn url_with(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.compare(URL, value, op)
    }

    pub fn urls<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(URL, values, MembershipOp::In)
    }

    pub fn urls_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member(URL, values, op)
    }

    /// Keeps licenses still referenced by `images`.
    pub fn intersection(self, images: &Images) -> Result<Self> {
        let intersection = IntersectionTerm::new().member_of(ID, images, LICENSE)?;
        Ok(self.intersect(intersection))
    }
}

impl FilterBuilder for LicenseFilter {
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

impl From<LicenseFilter> for Query {
    fn from(filter: LicenseFilter) -> Self {
        filter.query
    }
}
