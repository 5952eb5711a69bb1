//! Intersection terms.
//!
//! An intersection constrains a record's foreign-key fields to the keys that
//! survive in peer collections. Its member terms are AND-joined.

use crate::ast::term::ValuesTerm;
use crate::compiler::compile;
use crate::executor::FilterExecutor;
use crate::query::Query;
use alloc::string::String;
use alloc::vec::Vec;
use cocoql_core::{Collection, Record, Result, Value};

/// AND-joined membership terms derived from peer collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntersectionTerm {
    terms: Vec<ValuesTerm>,
}

impl IntersectionTerm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member term, builder style.
    pub fn with(mut self, term: ValuesTerm) -> Self {
        self.terms.push(term);
        self
    }

    pub fn push(&mut self, term: ValuesTerm) {
        self.terms.push(term);
    }

    /// Constrains `field` to the unique values of `key` across `peer`.
    ///
    /// An empty peer yields an empty allowed set, which rejects every record.
    pub fn member_of<P: Record>(
        self,
        field: impl Into<String>,
        peer: &Collection<P>,
        key: &str,
    ) -> Result<Self> {
        let values = peer.unique_values(key)?;
        Ok(self.with(ValuesTerm::is_in(field, values)))
    }

    pub fn terms(&self) -> &[ValuesTerm] {
        &self.terms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// An empty intersection places no constraint.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Returns the records of `collection` whose `field` holds one of `allowed`.
pub fn restrict<R: Record>(
    collection: &Collection<R>,
    field: &str,
    allowed: &[Value],
) -> Result<Collection<R>> {
    let query = Query::from(ValuesTerm::is_in(field, allowed.iter().cloned()));
    FilterExecutor::new(compile(&query)?).execute(collection)
}

/// Returns the records of `collection` whose `field` matches a `key` of `peer`.
pub fn restrict_to_peer<R: Record, P: Record>(
    collection: &Collection<R>,
    field: &str,
    peer: &Collection<P>,
    key: &str,
) -> Result<Collection<R>> {
    restrict(collection, field, &peer.unique_values(key)?)
}
