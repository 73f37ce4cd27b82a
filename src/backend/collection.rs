//! Typed collection over a keyspace of the embedded engine.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// A named collection of documents of one type.
///
/// Single-document operations are atomic; nothing here spans documents.
pub struct Collection<T> {
    tree: sled::Tree,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(tree: sled::Tree) -> Self {
        Self {
            tree,
            _marker: PhantomData,
        }
    }

    /// Fetch a document by exact key.
    pub fn find(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        match self.tree.get(key)? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a document, returning the previous one if any.
    pub fn upsert(&self, key: &[u8], document: &T) -> Result<Option<T>, StoreError> {
        let previous = self.tree.insert(key, encode(document)?)?;
        previous.map(|raw| decode(&raw)).transpose()
    }

    /// Insert a document only if the key is absent. Returns false when a
    /// document already exists (nothing is overwritten).
    pub fn create(&self, key: &[u8], document: &T) -> Result<bool, StoreError> {
        let outcome = self
            .tree
            .compare_and_swap(key, None::<&[u8]>, Some(encode(document)?))?;
        Ok(outcome.is_ok())
    }

    /// Remove a document, reporting whether one existed.
    pub fn remove(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.tree.remove(key)?.is_some())
    }

    /// Read-modify-write with a compare-and-swap retry loop.
    ///
    /// `f` observes the current document (if any) and returns the
    /// replacement; returning `None` deletes the document. Retries until
    /// the swap lands against an unchanged prior value, which makes each
    /// single-document update atomic under concurrent writers.
    pub fn modify<F>(&self, key: &[u8], mut f: F) -> Result<Option<T>, StoreError>
    where
        F: FnMut(Option<T>) -> Option<T>,
    {
        loop {
            let current = self.tree.get(key)?;
            let decoded = current.as_ref().map(|raw| decode(raw)).transpose()?;
            let next = f(decoded);
            let encoded = next.as_ref().map(encode).transpose()?;
            if self
                .tree
                .compare_and_swap(key, current, encoded)?
                .is_ok()
            {
                return Ok(next);
            }
        }
    }
}

fn encode<T: Serialize>(document: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(document)?)
}

fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, StoreError> {
    Ok(bincode::deserialize(raw)?)
}
