use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Error;
use crate::index::FileIndex;
use crate::output;
use crate::parser::SnapshotReader;
use crate::plan::{Planner, PlannerOptions, ReconciliationPlan};
use crate::progress::{PlanReporter, Side};
use crate::render::ShellRenderer;

pub struct ReconcileEngine {
    config: AppConfig,
    options: PlannerOptions,
}

#[derive(Debug)]
pub struct RunResult {
    pub load_duration: Duration,
    pub plan_duration: Duration,
    pub source_records: usize,
    pub dest_records: usize,
    pub plan: ReconciliationPlan,
    pub commands: Vec<String>,
    /// Path of the generated script, absent when no action was needed.
    pub script_path: Option<PathBuf>,
}

impl ReconcileEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            options: PlannerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.config.output_dir = dir.to_path_buf();
        self
    }

    /// Run the reconciliation pipeline:
    /// 1. Load both snapshots (any failure aborts before indexing)
    /// 2. Build the lookup indexes
    /// 3. Plan per shared folder and render the shell commands
    /// 4. Write the script when there is at least one command
    pub fn run(
        &self,
        source_path: &Path,
        dest_path: &Path,
        reporter: &dyn PlanReporter,
    ) -> Result<RunResult, Error> {
        let reader = SnapshotReader::from_config(&self.config)?;

        // Phase 1: Load
        let load_start = Instant::now();
        let source_records = load_snapshot(&reader, Side::Source, source_path, reporter)?;
        let dest_records = load_snapshot(&reader, Side::Dest, dest_path, reporter)?;
        let load_duration = load_start.elapsed();

        // Phase 2: Index
        let source = FileIndex::build(source_records);
        let dest = FileIndex::build(dest_records);
        debug!(
            "Indexed {} source paths and {} dest paths",
            source.len(),
            dest.len()
        );

        // Phase 3: Plan
        let plan_start = Instant::now();
        let plan = Planner::new(&source, &dest)
            .with_options(self.options)
            .plan(reporter);
        let commands = ShellRenderer::new().render_all(&plan.actions);
        let plan_duration = plan_start.elapsed();
        info!(
            "Planned {} copies and {} skips in {:.2}s",
            plan.copy_count(),
            plan.skip_count(),
            plan_duration.as_secs_f64()
        );

        // Phase 4: Write
        let script_path =
            output::write_script(&commands, &self.config.output_dir, &self.config.output_prefix)?;

        Ok(RunResult {
            load_duration,
            plan_duration,
            source_records: source.len(),
            dest_records: dest.len(),
            plan,
            commands,
            script_path,
        })
    }
}

fn load_snapshot(
    reader: &SnapshotReader,
    side: Side,
    path: &Path,
    reporter: &dyn PlanReporter,
) -> Result<Vec<crate::record::FileRecord>, Error> {
    reporter.on_load_start(side, path);
    let start = Instant::now();
    let records = reader.read_path(path)?;
    reporter.on_load_complete(side, records.len(), start.elapsed().as_secs_f64());
    Ok(records)
}
