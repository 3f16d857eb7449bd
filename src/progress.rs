use std::path::Path;

use crate::plan::{FolderReport, ReconciliationPlan};

/// Which snapshot an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Dest,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Dest => write!(f, "dest"),
        }
    }
}

/// Trait for reporting reconciliation progress.
///
/// The CLI implements it with coloured console output. All methods have
/// default no-op implementations.
pub trait PlanReporter {
    fn on_load_start(&self, _side: Side, _path: &Path) {}
    fn on_load_complete(&self, _side: Side, _records: usize, _duration_secs: f64) {}
    fn on_folder_totals(&self, _source_folders: usize, _dest_folders: usize) {}
    fn on_unmatched_folders(&self, _missing_in_dest: &[String], _missing_in_source: &[String]) {}
    fn on_compare_start(&self, _shared_folders: usize) {}
    fn on_folder_compared(&self, _report: &FolderReport) {}
    fn on_compare_complete(&self, _plan: &ReconciliationPlan) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl PlanReporter for SilentReporter {}
