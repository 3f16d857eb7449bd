pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod index;
pub mod output;
pub mod parser;
pub mod plan;
pub mod progress;
pub mod record;
pub mod render;

pub use config::AppConfig;
pub use diff::{diff, Diff, EqualityKeys};
pub use engine::{ReconcileEngine, RunResult};
pub use error::Error;
pub use index::{FileIndex, IndexKind};
pub use plan::{PlannedAction, Planner, PlannerOptions, ReconciliationPlan};
pub use progress::{PlanReporter, SilentReporter};
pub use record::FileRecord;
