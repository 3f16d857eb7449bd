use std::path::Path;

use crate::config::NameRewrite;
use crate::diff::EqualityKeys;

/// Rules used to derive the canonical name and folder key of a record.
#[derive(Debug, Clone, Default)]
pub struct NamingRules {
    rewrites: Vec<NameRewrite>,
    collapse_subfolders: Vec<String>,
}

impl NamingRules {
    pub fn new(rewrites: Vec<NameRewrite>, collapse_subfolders: Vec<String>) -> Self {
        Self {
            rewrites,
            collapse_subfolders,
        }
    }

    /// Apply every rewrite, in order, to `filename`.
    pub fn canonical_name(&self, filename: &str) -> String {
        self.rewrites
            .iter()
            .fold(filename.to_string(), |name, rewrite| {
                name.replace(&rewrite.from, &rewrite.to)
            })
    }

    /// Folder keys naming a marked subfolder are re-derived from the path as
    /// `<grandparent name>/<parent name>`.
    pub fn folder_key(&self, parent_folder: &str, full_path: &str) -> String {
        if !self.collapse_subfolders.iter().any(|s| s == parent_folder) {
            return parent_folder.to_string();
        }

        let parent = Path::new(full_path).parent().unwrap_or(Path::new(""));
        let grandparent = parent.parent().unwrap_or(Path::new(""));
        let dir_name = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        Path::new(&dir_name(grandparent))
            .join(dir_name(parent))
            .to_string_lossy()
            .into_owned()
    }
}

/// One cataloged file of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    filename: String,
    canonical_name: String,
    parent_folder_key: String,
    full_path: String,
    size_bytes: u64,
    content_id: String,
}

/// The projection of a record onto an [`EqualityKeys`] selection. Unselected
/// fields are `None` so they never influence equality or hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey<'a> {
    filename: Option<&'a str>,
    canonical_name: Option<&'a str>,
    size_bytes: Option<u64>,
    content_id: Option<&'a str>,
}

impl FileRecord {
    pub fn new(
        parent_folder: &str,
        filename: &str,
        size_bytes: u64,
        content_id: &str,
        full_path: &str,
        rules: &NamingRules,
    ) -> Self {
        Self {
            filename: filename.to_string(),
            canonical_name: rules.canonical_name(filename),
            parent_folder_key: rules.folder_key(parent_folder, full_path),
            full_path: full_path.to_string(),
            size_bytes,
            content_id: content_id.to_string(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn parent_folder_key(&self) -> &str {
        &self.parent_folder_key
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// Directory portion of the full path.
    pub fn directory(&self) -> &Path {
        Path::new(&self.full_path).parent().unwrap_or(Path::new(""))
    }

    pub fn key(&self, keys: EqualityKeys) -> RecordKey<'_> {
        RecordKey {
            filename: keys
                .contains(EqualityKeys::FILENAME)
                .then_some(self.filename.as_str()),
            canonical_name: keys
                .contains(EqualityKeys::CANONICAL_NAME)
                .then_some(self.canonical_name.as_str()),
            size_bytes: keys.contains(EqualityKeys::SIZE).then_some(self.size_bytes),
            content_id: keys
                .contains(EqualityKeys::CONTENT_ID)
                .then_some(self.content_id.as_str()),
        }
    }

    pub fn eq_under(&self, other: &FileRecord, keys: EqualityKeys) -> bool {
        self.key(keys) == other.key(keys)
    }
}
