//! Reference in-memory `IndexAccess` implementation.
//!
//! Backed by a `BTreeMap`, which already maintains lexicographic byte-key
//! order, so `iterator()` is just a `range` over it. This is the adapter
//! used by the mini-corpus unit and integration tests in this crate.

use std::collections::BTreeMap;
use std::ops::Bound;

use anyhow::Result;

use crate::config::InMemoryIndexConfig;
use crate::model::PositionList;

use super::{IndexAccess, IndexCursor};

/// An in-memory, single-named index backed by a sorted map.
#[derive(Debug, Default)]
pub struct InMemoryIndexAccess {
    name: String,
    entries: BTreeMap<Vec<u8>, PositionList>,
}

impl InMemoryIndexAccess {
    pub fn new(name: impl Into<String>) -> Self {
        InMemoryIndexAccess {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Construct from a deserialized `InMemoryIndexConfig`. `BTreeMap` has
    /// no capacity to reserve, so `initial_capacity` is accepted for
    /// symmetry with downstream embedders' config files but otherwise
    /// unused.
    pub fn with_config(name: impl Into<String>, _config: &InMemoryIndexConfig) -> Self {
        Self::new(name)
    }

    /// Insert a key, appending to any existing `PositionList` under it.
    pub fn insert(&mut self, key: Vec<u8>, positions: Vec<crate::model::Position>) {
        self.entries
            .entry(key)
            .or_default()
            .0
            .extend(positions);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl IndexAccess for InMemoryIndexAccess {
    fn get(&self, key: &[u8]) -> Result<Option<PositionList>> {
        Ok(self.entries.get(key).cloned())
    }

    fn iterator(&self) -> Result<Box<dyn IndexCursor + '_>> {
        Ok(Box::new(InMemoryCursor {
            entries: &self.entries,
            lower_bound: Bound::Unbounded,
        }))
    }

    fn index_type(&self) -> &str {
        &self.name
    }
}

struct InMemoryCursor<'a> {
    entries: &'a BTreeMap<Vec<u8>, PositionList>,
    lower_bound: Bound<Vec<u8>>,
}

impl<'a> IndexCursor for InMemoryCursor<'a> {
    fn seek(&mut self, key: &[u8]) -> Result<()> {
        self.lower_bound = Bound::Included(key.to_vec());
        Ok(())
    }

    fn seek_to_first(&mut self) -> Result<()> {
        self.lower_bound = Bound::Unbounded;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<(Vec<u8>, PositionList)>> {
        let mut range = self.entries.range((self.lower_bound.clone(), Bound::Unbounded));
        match range.next() {
            Some((key, value)) => {
                self.lower_bound = Bound::Excluded(key.clone());
                Ok(Some((key.clone(), value.clone())))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn build() -> InMemoryIndexAccess {
        let mut idx = InMemoryIndexAccess::new("unigram");
        idx.insert(b"apple".to_vec(), vec![Position::in_sentence(1, 0, 0, 5)]);
        idx.insert(b"applesauce".to_vec(), vec![Position::in_sentence(2, 0, 0, 10)]);
        idx.insert(b"banana".to_vec(), vec![Position::in_sentence(3, 0, 0, 6)]);
        idx
    }

    #[test]
    fn exact_get_finds_key() {
        let idx = build();
        let list = idx.get(b"apple").unwrap().unwrap();
        assert_eq!(list.len(), 1);
        assert!(idx.get(b"missing").unwrap().is_none());
    }

    #[test]
    fn prefix_scan_stops_at_first_non_matching_key() {
        let idx = build();
        let mut cursor = idx.iterator().unwrap();
        cursor.seek(b"apple").unwrap();

        let mut matched = Vec::new();
        while let Some((key, _)) = cursor.next().unwrap() {
            if !key.starts_with(b"apple") {
                break;
            }
            matched.push(key);
        }

        assert_eq!(matched, vec![b"apple".to_vec(), b"applesauce".to_vec()]);
    }
}
