//! Persistence
//!
//! A SQLite registry indexes projects and their harvests; records and
//! generated artifacts are plain files in per-project directories.

pub mod project;
pub mod registry;

pub use project::{ArtifactSummary, ProjectDetails, Workspace, write_artifacts};
pub use registry::{HarvestEntry, NewHarvest, ProjectEntry, ProjectSummary, Registry};
