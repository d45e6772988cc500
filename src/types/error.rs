//! Unified Error Type System
//!
//! Centralized error types for the whole crate.
//!
//! ## Error Classes
//!
//! - **Inspection**: a single element could not be read (never leaves the sampler)
//! - **Render**: the external page renderer failed, nothing was extracted
//! - **NoData**: the page rendered but produced no usable samples
//! - **Codegen**: generated source failed its own syntax checks
//! - **Vocabulary**: a token name outside the fixed naming scheme
//! - **Storage/Config**: workspace and configuration problems

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Element Inspection Error
// =============================================================================

/// Failure to inspect one element through the page capability.
///
/// Swallowed by the sampler and classifier; the element is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    #[error("element {0} is detached from the document")]
    Detached(usize),

    #[error("element {0} does not exist")]
    UnknownElement(usize),

    #[error("style lookup failed for element {index}: {reason}")]
    Style { index: usize, reason: String },
}

// =============================================================================
// Codegen Issue
// =============================================================================

/// A single problem found in generated source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub kind: SyntaxIssueKind,
    /// 1-indexed line, 0 when not attributable
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxIssueKind {
    /// `{`, `(`, `[` without a partner
    UnbalancedDelimiter,
    /// Exported identifier shadows an imported one
    IdentifierCollision,
    /// Parser reported an ERROR or MISSING node
    ParseError,
}

impl std::fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line > 0 {
            write!(f, "line {}: {}", self.line, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum HarvestError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Extraction Errors
    // -------------------------------------------------------------------------
    /// The external renderer failed; no record was produced
    #[error("Render failed for {target}: {reason}")]
    Render { target: String, reason: String },

    /// Rendering timed out
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Extraction ran but nothing could be sampled
    #[error("No data extracted from {0}")]
    NoData(String),

    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    #[error("Unsupported selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    // -------------------------------------------------------------------------
    // Token & Codegen Errors
    // -------------------------------------------------------------------------
    #[error("Token '{0}' is not part of the token vocabulary")]
    UnknownToken(String),

    #[error("{0}")]
    UnknownComponent(String),

    #[error("Generated {component} source is invalid: {}", format_issues(.issues))]
    Codegen {
        component: String,
        issues: Vec<SyntaxIssue>,
    },

    // -------------------------------------------------------------------------
    // Workspace Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Not initialized: run 'harvest init' first")]
    NotInitialized,

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project already exists: {0}")]
    ProjectExists(String),

    #[error("Harvest {fingerprint} was already added to project {project}")]
    DuplicateHarvest {
        project: String,
        fingerprint: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

fn format_issues(issues: &[SyntaxIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, HarvestError>;

impl HarvestError {
    /// Create a render error
    pub fn render(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Render {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// True when the failure means "extraction did not happen" rather than
    /// a problem with local files or configuration.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::Render { .. } | Self::Timeout { .. } | Self::NoData(_)
        )
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| HarvestError::Storage(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_classification() {
        assert!(HarvestError::render("https://a.test", "exit 1").is_no_data());
        assert!(HarvestError::NoData("page".into()).is_no_data());
        assert!(HarvestError::timeout("render", Duration::from_secs(1)).is_no_data());
        assert!(!HarvestError::Config("bad".into()).is_no_data());
    }

    #[test]
    fn test_codegen_error_display() {
        let err = HarvestError::Codegen {
            component: "button".into(),
            issues: vec![
                SyntaxIssue {
                    kind: SyntaxIssueKind::UnbalancedDelimiter,
                    line: 3,
                    message: "unclosed '{'".into(),
                },
                SyntaxIssue {
                    kind: SyntaxIssueKind::IdentifierCollision,
                    line: 0,
                    message: "'Button' is both imported and exported".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Generated button source is invalid: line 3: unclosed '{'; 'Button' is both imported and exported"
        );
    }

    #[test]
    fn test_with_context() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = res.with_context("writing tokens").unwrap_err();
        assert_eq!(err.to_string(), "Storage error: writing tokens: boom");
    }
}
