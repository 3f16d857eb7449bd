use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::diff::{diff, EqualityKeys};
use crate::index::{FileIndex, IndexKind};
use crate::progress::PlanReporter;
use crate::record::FileRecord;

/// What to do about one source file missing from the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Copy after the operator confirms.
    CopyWithConfirmation { source: String, destination: String },
    /// The destination already holds a larger file at the target path; leave it.
    SkipLargerExists {
        source: String,
        destination: String,
        source_size: u64,
        dest_size: u64,
    },
}

impl PlannedAction {
    pub fn source(&self) -> &str {
        match self {
            PlannedAction::CopyWithConfirmation { source, .. }
            | PlannedAction::SkipLargerExists { source, .. } => source,
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            PlannedAction::CopyWithConfirmation { destination, .. }
            | PlannedAction::SkipLargerExists { destination, .. } => destination,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlannerOptions {
    /// Keys deciding whether a source file already exists in the destination folder.
    pub compare_keys: EqualityKeys,
    /// Also compare each shared folder by canonical name, for reporting only.
    pub name_report: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            compare_keys: EqualityKeys::STRONG,
            name_report: false,
        }
    }
}

/// Informational comparison of one folder by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameComparison {
    pub source_only: Vec<String>,
    pub shared: usize,
    pub dest_only: Vec<String>,
}

/// Comparison summary of one folder present on both sides.
#[derive(Debug, Clone, Default)]
pub struct FolderReport {
    pub key: String,
    pub source_files: usize,
    pub dest_files: usize,
    pub source_only: Vec<String>,
    pub shared: usize,
    pub dest_only: Vec<String>,
    pub collapsed: usize,
    pub actions: usize,
    pub name_comparison: Option<NameComparison>,
}

impl FolderReport {
    pub fn has_differences(&self) -> bool {
        !self.source_only.is_empty()
            || !self.dest_only.is_empty()
            || self.collapsed > 0
            || self
                .name_comparison
                .as_ref()
                .is_some_and(|n| !n.source_only.is_empty() || !n.dest_only.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconciliationPlan {
    pub source_folders: usize,
    pub dest_folders: usize,
    pub missing_in_dest: Vec<String>,
    pub missing_in_source: Vec<String>,
    pub shared_folders: usize,
    /// Reports of shared folders that differ, in ascending key order.
    pub folders: Vec<FolderReport>,
    pub actions: Vec<PlannedAction>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn copy_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, PlannedAction::CopyWithConfirmation { .. }))
            .count()
    }

    pub fn skip_count(&self) -> usize {
        self.actions.len() - self.copy_count()
    }
}

/// Folder-by-folder reconciliation of a destination index against a source index.
pub struct Planner<'a> {
    source: &'a FileIndex,
    dest: &'a FileIndex,
    options: PlannerOptions,
}

impl<'a> Planner<'a> {
    pub fn new(source: &'a FileIndex, dest: &'a FileIndex) -> Self {
        Self {
            source,
            dest,
            options: PlannerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    /// Walk the folders present on both sides in ascending key order and plan
    /// an action for every source file the destination folder lacks. Folders
    /// present on one side only are reported, never reconciled.
    pub fn plan(&self, reporter: &dyn PlanReporter) -> ReconciliationPlan {
        let source_keys = self.source.all_group_keys();
        let dest_keys = self.dest.all_group_keys();
        reporter.on_folder_totals(source_keys.len(), dest_keys.len());

        let missing_in_dest: Vec<String> = source_keys.difference(&dest_keys).cloned().collect();
        let missing_in_source: Vec<String> = dest_keys.difference(&source_keys).cloned().collect();
        reporter.on_unmatched_folders(&missing_in_dest, &missing_in_source);

        let shared_keys: BTreeSet<&String> = source_keys.intersection(&dest_keys).collect();
        info!("Analyzing {} shared folders", shared_keys.len());
        reporter.on_compare_start(shared_keys.len());

        let mut folders = Vec::new();
        let mut actions = Vec::new();
        for key in &shared_keys {
            let (report, folder_actions) = self.compare_folder(key);
            if report.has_differences() {
                reporter.on_folder_compared(&report);
                folders.push(report);
            }
            actions.extend(folder_actions);
        }

        let plan = ReconciliationPlan {
            source_folders: source_keys.len(),
            dest_folders: dest_keys.len(),
            missing_in_dest,
            missing_in_source,
            shared_folders: shared_keys.len(),
            folders,
            actions,
        };
        reporter.on_compare_complete(&plan);
        plan
    }

    fn compare_folder(&self, key: &str) -> (FolderReport, Vec<PlannedAction>) {
        let source_files = self.source.by_key(IndexKind::ParentFolder, key);
        let dest_files = self.dest.by_key(IndexKind::ParentFolder, key);

        let result = diff(&source_files, &dest_files, self.options.compare_keys);
        for record in &result.collapsed {
            warn!(
                "{} in folder '{}' is identical to another record under {:?} and was collapsed",
                record.full_path(),
                key,
                self.options.compare_keys
            );
        }

        let mut actions = Vec::new();
        if !result.source_only.is_empty() {
            match destination_dir(&dest_files) {
                Some(dest_dir) => {
                    for record in &result.source_only {
                        actions.push(self.plan_missing_file(record, dest_dir));
                    }
                }
                None => debug!("Folder '{}' has no destination directory", key),
            }
        }

        let name_comparison = self.options.name_report.then(|| {
            let by_name = diff(&source_files, &dest_files, EqualityKeys::CANONICAL_NAME);
            NameComparison {
                source_only: sorted_names(&by_name.source_only),
                shared: by_name.shared.len(),
                dest_only: sorted_names(&by_name.dest_only),
            }
        });

        let report = FolderReport {
            key: key.to_string(),
            source_files: source_files.len(),
            dest_files: dest_files.len(),
            source_only: sorted_names(&result.source_only),
            shared: result.shared.len(),
            dest_only: sorted_names(&result.dest_only),
            collapsed: result.collapsed.len(),
            actions: actions.len(),
            name_comparison,
        };

        (report, actions)
    }

    fn plan_missing_file(&self, record: &FileRecord, dest_dir: &Path) -> PlannedAction {
        let destination = dest_dir
            .join(record.canonical_name())
            .to_string_lossy()
            .into_owned();

        match self.dest.by_path(&destination) {
            Some(existing) if existing.size_bytes() > record.size_bytes() => {
                debug!(
                    "Not overwriting larger {} ({} > {} bytes)",
                    destination,
                    existing.size_bytes(),
                    record.size_bytes()
                );
                PlannedAction::SkipLargerExists {
                    source: record.full_path().to_string(),
                    destination,
                    source_size: record.size_bytes(),
                    dest_size: existing.size_bytes(),
                }
            }
            _ => PlannedAction::CopyWithConfirmation {
                source: record.full_path().to_string(),
                destination,
            },
        }
    }
}

/// The directory of the lexicographically first destination file of a folder.
fn destination_dir<'r>(dest_files: &[&'r FileRecord]) -> Option<&'r Path> {
    dest_files
        .iter()
        .copied()
        .min_by_key(|r| r.full_path())
        .map(|r| r.directory())
}

fn sorted_names(records: &[&FileRecord]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.filename().to_string()).collect();
    names.sort();
    names
}
