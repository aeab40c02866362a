//! Engine module: turns provider documents into reports.
//!
//! # Architecture
//!
//! - **Provider** (`crate::provider`): network access only. Returns raw JSON
//!   documents and raw log records.
//! - **Hierarchy** (`hierarchy`): validates a raw job document and builds the
//!   typed `BuildStep` → `BuildAction` tree.
//! - **Workflow** (`workflow`): composes the two and hands the tree to
//!   `JobReport`, which resolves action output lazily while flattening.
//!
//! # Boundaries
//!
//! - The hierarchy builder never performs I/O.
//! - Output fetch failures stop at `BuildAction::output`; job fetch failures
//!   always propagate.

pub mod hierarchy;
pub mod workflow;

// Re-export key types for convenience
pub use hierarchy::build_steps;
pub use workflow::{build_report, extract_job};
