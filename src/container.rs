//! Flat containers — ordered lists and string-keyed maps of fields.
//!
//! A container is not a segment of its own but a protocol: an index segment
//! holding the member count, immediately followed by the members.  The size
//! class (regular u16 count vs. large u64 count) follows the actual number
//! of members at write time.
//!
//! `SegmentMap` keeps insertion order so the same map always encodes to the
//! same bytes.  Re-inserting an existing key replaces its value in place.

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::decode::Decoder;
use crate::encode::{encoded_len, key_len, write_list, write_map};
use crate::errors::Result;
use crate::tag::Tag;
use crate::value::Field;

fn index_tag(count: usize, regular: Tag, large: Tag) -> Tag {
    if u16::try_from(count).is_ok() {
        regular
    } else {
        large
    }
}

/// Ordered sequence of non-container segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentList {
    items: Vec<Field>,
}

impl SegmentList {
    pub fn new() -> Self {
        SegmentList::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SegmentList {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: impl Into<Field>) {
        self.items.push(item.into());
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// `List` up to 65 535 items, `LargeList` beyond.
    pub fn index_tag(&self) -> Tag {
        index_tag(self.items.len(), Tag::List, Tag::LargeList)
    }

    /// Encoded size, index segment included.
    pub fn size(&self) -> u64 {
        let index = encoded_len(self.index_tag(), 0);
        self.items.iter().map(|item| item.size()).sum::<u64>() + index
    }

    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_list(w, &self.items)
    }

    pub fn read<R: Read>(r: R) -> Result<SegmentList> {
        Decoder::new(r).read_list()
    }

    pub fn flatten(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size() as usize);
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn unflatten(bytes: &[u8]) -> Result<SegmentList> {
        SegmentList::read(bytes)
    }
}

impl FromIterator<Field> for SegmentList {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        SegmentList {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SegmentList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for SegmentList {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Insertion-ordered map from string keys to non-container segments.
#[derive(Debug, Clone, Default)]
pub struct SegmentMap {
    entries: Vec<(String, Field)>,
    positions: HashMap<String, usize>,
}

impl PartialEq for SegmentMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl SegmentMap {
    pub fn new() -> Self {
        SegmentMap::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SegmentMap {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace.  Returns the previous value for `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Field>) -> Option<Field> {
        let key = key.into();
        let value = value.into();
        match self.positions.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.positions.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Field> {
        let pos = self.positions.remove(key)?;
        let (_, value) = self.entries.remove(pos);
        for (k, _) in &self.entries[pos..] {
            if let Some(p) = self.positions.get_mut(k) {
                *p -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// `Map` up to 65 535 pairs, `LargeMap` beyond.
    pub fn index_tag(&self) -> Tag {
        index_tag(self.entries.len(), Tag::Map, Tag::LargeMap)
    }

    /// Encoded size, index segment and key segments included.
    pub fn size(&self) -> u64 {
        let index = encoded_len(self.index_tag(), 0);
        self.entries
            .iter()
            .map(|(k, v)| key_len(k) + v.size())
            .sum::<u64>()
            + index
    }

    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_map(w, &self.entries)
    }

    pub fn read<R: Read>(r: R) -> Result<SegmentMap> {
        Decoder::new(r).read_map()
    }

    pub fn flatten(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size() as usize);
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn unflatten(bytes: &[u8]) -> Result<SegmentMap> {
        SegmentMap::read(bytes)
    }
}

impl<K: Into<String>> FromIterator<(K, Field)> for SegmentMap {
    fn from_iter<I: IntoIterator<Item = (K, Field)>>(iter: I) -> Self {
        let mut map = SegmentMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
