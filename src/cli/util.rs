//! CLI Common Utilities
//!
//! Shared context loading and file helpers for command handlers.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigLoader};
use crate::storage::Workspace;
use crate::types::{HarvestError, HarvestRecord, Result};

/// Command execution context
pub struct CommandContext {
    /// Workspace root (the current directory)
    pub root: PathBuf,
    /// Loaded configuration
    pub config: Config,
}

impl CommandContext {
    /// Load config for the current directory; initialization is not required
    pub fn load() -> Result<Self> {
        let root = std::env::current_dir()?;
        let config = ConfigLoader::load_in(&root)?;
        Ok(Self { root, config })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(&self.config.workspace.data_dir)
    }

    pub fn is_initialized(&self) -> bool {
        self.data_dir().is_dir()
    }

    /// Open the project workspace, failing when `harvest init` has not run
    pub fn workspace(&self) -> Result<Workspace> {
        Workspace::open(&self.root, self.config.clone())
    }
}

/// Load a harvest record, naming the file on failure
pub fn read_record(path: &Path) -> Result<HarvestRecord> {
    if !path.exists() {
        return Err(HarvestError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("harvest file not found: {}", path.display()),
        )));
    }
    HarvestRecord::load(path)
        .map_err(|e| HarvestError::Snapshot(format!("{}: {}", path.display(), e)))
}

/// Write `content` to `output`, or stdout when no path is given
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => print!("{}", content),
    }
    Ok(())
}
