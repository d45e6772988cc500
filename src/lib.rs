//! harvestkit - Design Token Harvesting
//!
//! Samples computed styles from rendered pages, condenses them into a
//! harvest record, maps the record onto a fixed design-token vocabulary and
//! emits CSS, JSON, React components and design-system documentation.
//!
//! ## Pipeline
//!
//! snapshot → sample → aggregate + classify → record → tokens → emit
//!
//! ## Quick Start
//!
//! ```ignore
//! use harvestkit::{Config, Harvester, TokenMapper, PageSnapshot, render_css};
//!
//! let config = Config::default();
//! let page = PageSnapshot::load("page.json")?;
//! let record = Harvester::new(&config).harvest(&page)?;
//! let tokens = TokenMapper::new(&config.tokens).map(&record)?;
//! println!("{}", render_css(&tokens));
//! ```
//!
//! ## Modules
//!
//! - [`snapshot`]: page inspection capability, snapshot files and renderers
//! - [`harvest`]: sampler, aggregator, classifier, semantic guesses, merge
//! - [`tokens`]: token vocabulary, shade derivation, record → token mapping
//! - [`emit`]: CSS/JSON/TSX/Markdown/HTML emitters and generated-source checks
//! - [`storage`]: SQLite project registry and project directories
//! - [`config`]: layered configuration

pub mod cli;
pub mod config;
pub mod constants;
pub mod emit;
pub mod harvest;
pub mod snapshot;
pub mod storage;
pub mod tokens;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{HarvestError, Result, ResultExt};

// Records & Tokens
pub use types::{ComponentKind, HarvestRecord, TokenMap};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use harvest::{Harvester, merge_records};
pub use snapshot::{CommandRenderer, FileSource, PageInspector, PageSnapshot, SnapshotSource};
pub use tokens::TokenMapper;

pub use emit::{
    ComponentGenerator, generate_component, render_css, render_html, render_json,
    render_markdown,
};

// Storage
pub use storage::{Registry, Workspace};
