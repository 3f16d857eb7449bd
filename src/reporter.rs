use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use reconcile_lists::plan::{FolderReport, ReconciliationPlan};
use reconcile_lists::progress::{PlanReporter, Side};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Console reporter: a spinner while snapshots load, then the folder
/// comparison summaries on stdout.
pub struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

fn name_list(names: &[String]) -> String {
    names.join("\n")
}

impl PlanReporter for ConsoleReporter {
    fn on_load_start(&self, side: Side, path: &Path) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.set_message(format!("Loading {} snapshot {}...", side, path.display()));
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_load_complete(&self, side: Side, records: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Loaded {} snapshot: {} records in {:.2}s",
            "✓".green(),
            side,
            records,
            duration_secs
        );
    }

    fn on_folder_totals(&self, source_folders: usize, dest_folders: usize) {
        println!("source parent folders: {}", source_folders);
        println!("dest parent folders: {}", dest_folders);
    }

    fn on_unmatched_folders(&self, missing_in_dest: &[String], missing_in_source: &[String]) {
        if !missing_in_dest.is_empty() {
            println!("{} {}", "missing in dest:".yellow(), missing_in_dest.join(", "));
        }
        if !missing_in_source.is_empty() {
            println!("{} {}", "missing in source:".yellow(), missing_in_source.join(", "));
        }
        println!("------------------------------");
    }

    fn on_compare_start(&self, shared_folders: usize) {
        println!("analyzing {} shared folders...", shared_folders);
    }

    fn on_folder_compared(&self, report: &FolderReport) {
        println!(
            "\n-- [ {} | source: {} files | dest: {} files ] --",
            report.key.bold(),
            report.source_files,
            report.dest_files
        );

        if !report.source_only.is_empty() || !report.dest_only.is_empty() {
            println!(
                "comparison by size & content id | source only: {} | shared: {} | dest only: {}",
                report.source_only.len().to_string().red(),
                report.shared,
                report.dest_only.len().to_string().cyan()
            );
            if !report.source_only.is_empty() {
                println!(" -> source only:\n{}", name_list(&report.source_only));
            }
            if !report.dest_only.is_empty() {
                println!(" -> dest only:\n{}", name_list(&report.dest_only));
            }
        }

        if report.collapsed > 0 {
            println!(
                " -> {} records collapsed into an identical record",
                report.collapsed.to_string().yellow()
            );
        }

        if let Some(names) = &report.name_comparison {
            if !names.source_only.is_empty() || !names.dest_only.is_empty() {
                println!(
                    "comparison by name | source only: {} | shared: {} | dest only: {}",
                    names.source_only.len(),
                    names.shared,
                    names.dest_only.len()
                );
                println!(" -> source only:\n{}", name_list(&names.source_only));
                println!(" -> dest only:\n{}", name_list(&names.dest_only));
            }
        }
    }

    fn on_compare_complete(&self, plan: &ReconciliationPlan) {
        println!(
            "\n{} of {} shared folders differ",
            plan.folders.len(),
            plan.shared_folders
        );
    }
}
