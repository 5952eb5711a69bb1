//! Ordered record collections with id bookkeeping.
//!
//! A `Collection` owns the records of one kind in insertion order. Ids are unique
//! within the collection and `0` is the unassigned sentinel replaced on append.

use crate::error::{Error, Result};
use crate::record::{Entity, Fields, Record, RecordId, MAX_RECORD_ID, UNASSIGNED_ID};
use crate::value::Value;
use alloc::vec::{self, Vec};
use core::slice;
use hashbrown::HashSet;

/// How `append` treats an explicit, non-zero id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum IdPolicy {
    /// Keep the caller-supplied id verbatim, even if another record already has it.
    #[default]
    Permissive,
    /// Reject an explicit id that is already taken.
    Strict,
}

/// An ordered sequence of records of one kind.
#[derive(Clone, Debug)]
pub struct Collection<R: Record> {
    records: Vec<R>,
    policy: IdPolicy,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Collection<R> {
    /// Creates an empty, permissive collection.
    pub fn new() -> Self {
        Self::with_policy(IdPolicy::default())
    }

    /// Creates an empty collection with the given id policy.
    pub fn with_policy(policy: IdPolicy) -> Self {
        Self {
            records: Vec::new(),
            policy,
        }
    }

    /// Wraps existing records as they are. Ids are not reassigned.
    pub fn from_records(records: Vec<R>) -> Self {
        Self {
            records,
            policy: IdPolicy::default(),
        }
    }

    /// Returns the id policy.
    #[inline]
    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    /// Sets the id policy for subsequent appends.
    pub fn set_policy(&mut self, policy: IdPolicy) {
        self.policy = policy;
    }

    /// Builder-style variant of `set_policy`.
    pub fn policy_of(mut self, policy: IdPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Returns the records as a slice.
    #[inline]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Consumes the collection and returns its records.
    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    /// Returns the highest id in the collection, or 0 when empty.
    pub fn last_id(&self) -> RecordId {
        self.records
            .iter()
            .map(Record::id)
            .max()
            .unwrap_or(UNASSIGNED_ID)
    }

    /// Returns true if some record carries `id`.
    pub fn contains_id(&self, id: RecordId) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    /// Gets the first record with the given id.
    pub fn get_by_id(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Gets a mutable reference to the first record with the given id.
    pub fn get_by_id_mut(&mut self, id: RecordId) -> Option<&mut R> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// Finds the first record matching a closure.
    pub fn find<F>(&self, predicate: F) -> Option<&R>
    where
        F: Fn(&R) -> bool,
    {
        self.records.iter().find(|r| predicate(r))
    }

    /// Finds the first record whose `field` equals `value`.
    pub fn find_by(&self, field: &str, value: &Value) -> Option<&R> {
        self.records
            .iter()
            .find(|r| r.field(field).as_ref() == Some(value))
    }

    /// Appends a record and returns its id.
    ///
    /// A record carrying `UNASSIGNED_ID` gets `last_id() + 1`. An explicit id is
    /// kept verbatim; under `IdPolicy::Strict` a taken id is rejected.
    pub fn append(&mut self, mut record: R) -> Result<RecordId> {
        let id = if record.id() == UNASSIGNED_ID {
            let last = self.last_id();
            let id = last
                .checked_add(1)
                .filter(|id| *id <= MAX_RECORD_ID)
                .ok_or(Error::IdOutOfRange { kind: R::KIND, id: last })?;
            record.set_id(id);
            id
        } else {
            let id = record.id();
            if id > MAX_RECORD_ID {
                return Err(Error::IdOutOfRange { kind: R::KIND, id });
            }
            if self.policy == IdPolicy::Strict && self.contains_id(id) {
                return Err(Error::DuplicateId { kind: R::KIND, id });
            }
            id
        };
        self.records.push(record);
        Ok(id)
    }

    /// Replaces the record with the same id. Returns the id, or None if absent.
    pub fn update(&mut self, record: R) -> Option<RecordId> {
        let id = record.id();
        let slot = self.records.iter_mut().find(|r| r.id() == id)?;
        *slot = record;
        Some(id)
    }

    /// Removes the first record with the given id and returns it.
    pub fn delete(&mut self, id: RecordId) -> Option<R> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(index))
    }

    /// Removes the first record matching a closure and returns it.
    pub fn delete_where<F>(&mut self, predicate: F) -> Option<R>
    where
        F: Fn(&R) -> bool,
    {
        let index = self.records.iter().position(|r| predicate(r))?;
        Some(self.records.remove(index))
    }

    /// Swaps the whole content for `records` in one step and returns the old content.
    pub fn replace(&mut self, records: Vec<R>) -> Vec<R> {
        core::mem::replace(&mut self.records, records)
    }

    /// Returns a collection with the same policy holding `records`.
    pub fn derive(&self, records: Vec<R>) -> Self {
        Self {
            records,
            policy: self.policy,
        }
    }

    /// Returns the distinct values of `field`, in first-seen order.
    pub fn unique_values(&self, field: &str) -> Result<Vec<Value>> {
        if !R::has_field(field) {
            return Err(Error::field_not_found(R::KIND, field));
        }
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for record in &self.records {
            let value = record
                .field(field)
                .ok_or_else(|| Error::field_not_found(R::KIND, field))?;
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Returns the records' ids as values, in collection order.
    pub fn id_values(&self) -> Vec<Value> {
        self.records.iter().map(|r| Value::from(r.id())).collect()
    }
}

impl<R: Entity> Collection<R> {
    /// Builds a collection from field mappings, failing on the first malformed one.
    pub fn from_fields<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = Fields>,
    {
        let records = items
            .into_iter()
            .map(|fields| R::from_fields(&fields))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_records(records))
    }

    /// Returns every record as a field mapping.
    pub fn to_fields(&self) -> Vec<Fields> {
        self.records.iter().map(Entity::to_fields).collect()
    }
}

impl<R: Record + PartialEq> PartialEq for Collection<R> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<R: Record> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl<R: Record> IntoIterator for Collection<R> {
    type Item = R;
    type IntoIter = vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R: Record> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
