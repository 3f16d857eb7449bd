use ahash::{AHashMap, AHashSet};
use std::collections::BTreeSet;

use crate::record::FileRecord;

/// Which list-valued mapping of a [`FileIndex`] to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Filename,
    CanonicalName,
    ParentFolder,
}

/// Lookup indexes over one snapshot. Built once, never updated.
///
/// Every path held by the list-valued mappings is also a key of the path
/// mapping; duplicate paths in a snapshot keep the last record.
#[derive(Debug, Default)]
pub struct FileIndex {
    records: Vec<FileRecord>,
    by_path: AHashMap<String, usize>,
    by_name: AHashMap<String, Vec<String>>,
    by_canonical_name: AHashMap<String, Vec<String>>,
    by_parent_folder: AHashMap<String, Vec<String>>,
}

impl FileIndex {
    pub fn build(records: Vec<FileRecord>) -> Self {
        let mut by_path = AHashMap::with_capacity(records.len());
        let mut by_name: AHashMap<String, Vec<String>> = AHashMap::new();
        let mut by_canonical_name: AHashMap<String, Vec<String>> = AHashMap::new();
        let mut by_parent_folder: AHashMap<String, Vec<String>> = AHashMap::new();

        for (position, record) in records.iter().enumerate() {
            let path = record.full_path().to_string();
            by_path.insert(path.clone(), position);
            by_name
                .entry(record.filename().to_string())
                .or_default()
                .push(path.clone());
            by_canonical_name
                .entry(record.canonical_name().to_string())
                .or_default()
                .push(path.clone());
            by_parent_folder
                .entry(record.parent_folder_key().to_string())
                .or_default()
                .push(path);
        }

        Self {
            records,
            by_path,
            by_name,
            by_canonical_name,
            by_parent_folder,
        }
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Records in snapshot order, including ones shadowed by a later duplicate path.
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn by_path(&self, path: &str) -> Option<&FileRecord> {
        self.by_path.get(path).map(|&position| &self.records[position])
    }

    /// Resolve `key` in the chosen mapping. Each path is returned once, in
    /// first-seen order; paths missing from the path mapping are skipped.
    pub fn by_key(&self, kind: IndexKind, key: &str) -> Vec<&FileRecord> {
        let index = match kind {
            IndexKind::Filename => &self.by_name,
            IndexKind::CanonicalName => &self.by_canonical_name,
            IndexKind::ParentFolder => &self.by_parent_folder,
        };

        let Some(paths) = index.get(key) else {
            return Vec::new();
        };

        let mut seen = AHashSet::with_capacity(paths.len());
        paths
            .iter()
            .filter(|path| seen.insert(path.as_str()))
            .filter_map(|path| self.by_path(path))
            .collect()
    }

    pub fn by_name(&self, filename: &str) -> Vec<&FileRecord> {
        self.by_key(IndexKind::Filename, filename)
    }

    pub fn by_canonical_name(&self, canonical_name: &str) -> Vec<&FileRecord> {
        self.by_key(IndexKind::CanonicalName, canonical_name)
    }

    pub fn by_parent_folder(&self, folder_key: &str) -> Vec<&FileRecord> {
        self.by_key(IndexKind::ParentFolder, folder_key)
    }

    pub fn all_group_keys(&self) -> BTreeSet<String> {
        self.by_parent_folder.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamingConfig;
    use crate::record::NamingRules;

    fn record(folder: &str, name: &str, size: u64, id: &str, path: &str) -> FileRecord {
        let naming = NamingConfig::default();
        let rules = NamingRules::new(naming.rewrites, naming.collapse_subfolders);
        FileRecord::new(folder, name, size, id, path, &rules)
    }

    fn sample_index() -> FileIndex {
        FileIndex::build(vec![
            record("A", "x_HEVC.MOV", 100, "u1", "/s/A/x_HEVC.MOV"),
            record("A", "y.mov", 50, "u2", "/s/A/y.mov"),
            record("B", "y.mov", 50, "u3", "/s/B/y.mov"),
            record("live", "z.mov", 10, "u4", "/s/B/live/z.mov"),
        ])
    }

    #[test]
    fn test_by_path_exact_match() {
        let index = sample_index();
        assert_eq!(index.by_path("/s/A/y.mov").unwrap().content_id(), "u2");
        assert!(index.by_path("/s/A/Y.mov").is_none());
        assert!(index.by_path("/s/A").is_none());
    }

    #[test]
    fn test_by_key_variants() {
        let index = sample_index();
        assert_eq!(index.by_name("y.mov").len(), 2);
        assert_eq!(index.by_canonical_name("x.MP4").len(), 1);
        assert!(index.by_name("x.MP4").is_empty());
        assert_eq!(index.by_parent_folder("A").len(), 2);
        assert_eq!(index.by_parent_folder("B/live").len(), 1);
        assert!(index.by_key(IndexKind::ParentFolder, "missing").is_empty());
    }

    #[test]
    fn test_all_group_keys() {
        let index = sample_index();
        let keys: Vec<String> = index.all_group_keys().into_iter().collect();
        assert_eq!(keys, vec!["A", "B", "B/live"]);
    }

    #[test]
    fn test_duplicate_path_last_write_wins() {
        let index = FileIndex::build(vec![
            record("A", "x.mov", 1, "old", "/s/A/x.mov"),
            record("A", "x.mov", 2, "new", "/s/A/x.mov"),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.records().len(), 2);
        assert_eq!(index.by_path("/s/A/x.mov").unwrap().content_id(), "new");

        let folder = index.by_parent_folder("A");
        assert_eq!(folder.len(), 1);
        assert_eq!(folder[0].content_id(), "new");
    }

    #[test]
    fn test_list_paths_resolve_through_path_index() {
        let index = sample_index();
        for key in index.all_group_keys() {
            for record in index.by_parent_folder(&key) {
                assert!(index.by_path(record.full_path()).is_some());
            }
        }
    }

    #[test]
    fn test_empty_index() {
        let index = FileIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.all_group_keys().is_empty());
    }
}
