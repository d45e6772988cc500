//! Snapshot Sources
//!
//! Where page snapshots come from. Rendering itself is delegated to an
//! external command (typically a headless-browser script) that prints a
//! snapshot as JSON on stdout. Any failure means nothing was extracted.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use super::PageSnapshot;
use crate::config::RendererConfig;
use crate::constants::renderer::URL_PLACEHOLDER;
use crate::types::{HarvestError, Result};

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Produce a snapshot for `target`, or fail with nothing extracted
    async fn snapshot(&self, target: &str) -> Result<PageSnapshot>;

    fn name(&self) -> &str;
}

// =============================================================================
// File Source
// =============================================================================

/// Reads snapshots previously captured to disk; `target` is a file path
pub struct FileSource {
    base_dir: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Resolve relative targets against `dir`
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn snapshot(&self, target: &str) -> Result<PageSnapshot> {
        let path = match &self.base_dir {
            Some(dir) => dir.join(target),
            None => PathBuf::from(target),
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| HarvestError::render(target, format!("cannot read snapshot: {}", e)))?;

        let mut snapshot = PageSnapshot::from_json(&content)
            .map_err(|e| HarvestError::render(target, e.to_string()))?;
        if snapshot.url.is_empty() {
            snapshot.url = target.to_string();
        }

        debug!(
            "Loaded snapshot {} ({} elements)",
            path.display(),
            snapshot.len()
        );
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "file"
    }
}

// =============================================================================
// Command Renderer
// =============================================================================

/// Runs the configured renderer command once per URL
pub struct CommandRenderer {
    command: String,
    args: Vec<String>,
    timeout_secs: u64,
}

impl CommandRenderer {
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let command = config.command.clone().ok_or_else(|| {
            HarvestError::Config(
                "renderer.command is not set; pass --snapshot or configure a renderer".to_string(),
            )
        })?;

        Ok(Self {
            command,
            args: config.args.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Arguments with the URL substituted, appended when no placeholder is present
    fn build_args(&self, url: &str) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(URL_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(URL_PLACEHOLDER, url)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(url.to_string());
        }
        args
    }
}

fn validate_target(target: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(target)
        .map_err(|e| HarvestError::render(target, format!("invalid URL: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" | "file" => Ok(parsed),
        other => Err(HarvestError::render(
            target,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

#[async_trait]
impl SnapshotSource for CommandRenderer {
    async fn snapshot(&self, target: &str) -> Result<PageSnapshot> {
        let url = validate_target(target)?;
        let start = Instant::now();

        let mut cmd = Command::new(&self.command);
        cmd.args(self.build_args(url.as_str()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            HarvestError::render(
                target,
                format!("failed to spawn renderer '{}': {}", self.command, e),
            )
        })?;

        let limit = Duration::from_secs(self.timeout_secs);
        let output = timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| HarvestError::timeout(format!("rendering {}", target), limit))?
            .map_err(|e| HarvestError::render(target, format!("renderer failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = if stderr.trim().is_empty() {
                format!("renderer exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(HarvestError::render(target, reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut snapshot = PageSnapshot::from_json(&stdout)
            .map_err(|e| HarvestError::render(target, e.to_string()))?;
        if snapshot.url.is_empty() {
            snapshot.url = url.to_string();
        }

        info!(
            "Rendered {} ({} elements in {:.1}s)",
            target,
            snapshot.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn renderer(args: &[&str]) -> CommandRenderer {
        CommandRenderer::new(&RendererConfig {
            command: Some("render-page".to_string()),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_build_args_substitutes_url() {
        let r = renderer(&["--url={url}", "--json"]);
        assert_eq!(
            r.build_args("https://a.test/"),
            vec!["--url=https://a.test/", "--json"]
        );
    }

    #[test]
    fn test_build_args_appends_url() {
        let r = renderer(&["snapshot.js"]);
        assert_eq!(
            r.build_args("https://a.test/"),
            vec!["snapshot.js", "https://a.test/"]
        );
    }

    #[test]
    fn test_renderer_requires_command() {
        let err = CommandRenderer::new(&RendererConfig::default()).err().unwrap();
        assert!(matches!(err, HarvestError::Config(_)));
    }

    #[test]
    fn test_validate_target() {
        assert!(validate_target("https://example.com").is_ok());
        assert!(validate_target("ftp://example.com").unwrap_err().is_no_data());
        assert!(validate_target("not a url").is_err());
    }

    #[tokio::test]
    async fn test_file_source_loads_snapshot() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("page.json"),
            r#"{"elements": [{"tag": "body"}]}"#,
        )
        .unwrap();

        let source = FileSource::with_base_dir(temp.path());
        let snapshot = source.snapshot("page.json").await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.url, "page.json");
    }

    #[tokio::test]
    async fn test_file_source_missing_is_no_data() {
        let temp = TempDir::new().unwrap();
        let source = FileSource::with_base_dir(temp.path());
        let err = source.snapshot("missing.json").await.unwrap_err();
        assert!(err.is_no_data());
    }

    #[tokio::test]
    async fn test_missing_renderer_binary_is_render_error() {
        let r = CommandRenderer::new(&RendererConfig {
            command: Some("harvest-renderer-that-does-not-exist".to_string()),
            args: vec![],
            timeout_secs: 5,
        })
        .unwrap();
        let err = r.snapshot("https://example.com").await.unwrap_err();
        assert!(matches!(err, HarvestError::Render { .. }));
    }
}
