use ahash::AHashMap;
use bitflags::bitflags;

use crate::record::{FileRecord, RecordKey};

bitflags! {
    /// The record fields two records must agree on to be considered equal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EqualityKeys: u8 {
        const FILENAME = 1 << 0;
        const CANONICAL_NAME = 1 << 1;
        const SIZE = 1 << 2;
        const CONTENT_ID = 1 << 3;

        /// Byte size plus content identifier; names may drift.
        const STRONG = Self::SIZE.bits() | Self::CONTENT_ID.bits();
    }
}

impl Default for EqualityKeys {
    fn default() -> Self {
        EqualityKeys::STRONG
    }
}

/// A record present on both sides under the active keys.
#[derive(Debug, Clone, Copy)]
pub struct SharedEntry<'a> {
    pub source: &'a FileRecord,
    pub dest: &'a FileRecord,
}

/// Partition of two record sets under one [`EqualityKeys`] selection.
///
/// When several records on the same side share a key, the first one in input
/// order represents the key and the rest are listed in `collapsed`.
#[derive(Debug, Default)]
pub struct Diff<'a> {
    pub source_only: Vec<&'a FileRecord>,
    pub shared: Vec<SharedEntry<'a>>,
    pub dest_only: Vec<&'a FileRecord>,
    pub collapsed: Vec<&'a FileRecord>,
}

impl Diff<'_> {
    pub fn is_in_sync(&self) -> bool {
        self.source_only.is_empty() && self.dest_only.is_empty()
    }
}

type KeyedRecords<'a> = AHashMap<RecordKey<'a>, &'a FileRecord>;

fn key_records<'a>(
    records: &[&'a FileRecord],
    keys: EqualityKeys,
    collapsed: &mut Vec<&'a FileRecord>,
) -> KeyedRecords<'a> {
    let mut keyed: KeyedRecords<'a> = AHashMap::with_capacity(records.len());
    for &record in records {
        match keyed.entry(record.key(keys)) {
            std::collections::hash_map::Entry::Occupied(_) => collapsed.push(record),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }
    keyed
}

/// Compute `source - dest`, `source ∩ dest` and `dest - source` under `keys`.
/// Every output list is ordered by full path.
pub fn diff<'a>(
    source: &[&'a FileRecord],
    dest: &[&'a FileRecord],
    keys: EqualityKeys,
) -> Diff<'a> {
    let mut collapsed = Vec::new();
    let source_keyed = key_records(source, keys, &mut collapsed);
    let dest_keyed = key_records(dest, keys, &mut collapsed);

    let mut source_only = Vec::new();
    let mut shared = Vec::new();
    for (key, &source_record) in &source_keyed {
        match dest_keyed.get(key) {
            Some(&dest_record) => shared.push(SharedEntry {
                source: source_record,
                dest: dest_record,
            }),
            None => source_only.push(source_record),
        }
    }

    let mut dest_only: Vec<&FileRecord> = dest_keyed
        .iter()
        .filter(|(key, _)| !source_keyed.contains_key(*key))
        .map(|(_, &record)| record)
        .collect();

    source_only.sort_by(|a, b| a.full_path().cmp(b.full_path()));
    dest_only.sort_by(|a, b| a.full_path().cmp(b.full_path()));
    shared.sort_by(|a, b| a.source.full_path().cmp(b.source.full_path()));
    collapsed.sort_by(|a, b| a.full_path().cmp(b.full_path()));

    Diff {
        source_only,
        shared,
        dest_only,
        collapsed,
    }
}
