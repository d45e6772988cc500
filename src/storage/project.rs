//! Project Workspace
//!
//! Layout under the data directory:
//!
//! ```text
//! .harvest/
//! ├── registry.db
//! └── projects/<slug>/
//!     ├── harvests/<id>.json
//!     ├── merged.json
//!     ├── tokens/{tokens.css,tokens.json}
//!     ├── components/{<Name>.tsx,index.ts}
//!     └── docs/{DESIGN.md,preview.html}
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::registry::{HarvestEntry, NewHarvest, ProjectEntry, ProjectSummary, Registry};
use crate::config::Config;
use crate::emit::{ComponentGenerator, render_css, render_html, render_json, render_markdown};
use crate::harvest::merge_records;
use crate::tokens::TokenMapper;
use crate::types::{HarvestError, HarvestRecord, ProjectSlug, Result};

pub const REGISTRY_FILE: &str = "registry.db";
pub const PROJECTS_DIR: &str = "projects";
pub const MERGED_FILE: &str = "merged.json";

const HARVESTS_DIR: &str = "harvests";
const TOKENS_DIR: &str = "tokens";
const COMPONENTS_DIR: &str = "components";
const DOCS_DIR: &str = "docs";

/// Files written for one record
#[derive(Debug, Clone, Default)]
pub struct ArtifactSummary {
    pub token_count: usize,
    pub components: Vec<String>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ProjectDetails {
    pub project: ProjectEntry,
    pub dir: PathBuf,
    pub harvests: Vec<HarvestEntry>,
}

/// Write tokens, components and docs for `record` below `out_dir`
pub fn write_artifacts(record: &HarvestRecord, config: &Config, out_dir: &Path) -> Result<ArtifactSummary> {
    let tokens = TokenMapper::new(&config.tokens).map(record)?;
    let generator = ComponentGenerator::new(&config.codegen);
    let components = generator.generate_for_record(&tokens, record, false)?;

    let mut summary = ArtifactSummary {
        token_count: tokens.len(),
        components: components.iter().map(|c| c.name.clone()).collect(),
        files: Vec::new(),
    };

    let mut files: Vec<(PathBuf, String)> = vec![
        (out_dir.join(TOKENS_DIR).join("tokens.css"), render_css(&tokens)),
        (out_dir.join(TOKENS_DIR).join("tokens.json"), render_json(&tokens)?),
        (out_dir.join(DOCS_DIR).join("DESIGN.md"), render_markdown(record, &tokens)),
        (out_dir.join(DOCS_DIR).join("preview.html"), render_html(record, &tokens)),
    ];
    if !components.is_empty() {
        let dir = out_dir.join(COMPONENTS_DIR);
        files.push((dir.join("index.ts"), generator.render_index(&components)?));
        for component in components {
            files.push((dir.join(&component.file_name), component.source));
        }
    }

    for (path, content) in files {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        debug!("Wrote {}", path.display());
        summary.files.push(path);
    }
    Ok(summary)
}

/// Registry plus the project directories it indexes
pub struct Workspace {
    data_dir: PathBuf,
    registry: Registry,
    config: Config,
}

impl Workspace {
    /// Open the workspace of an initialized project root
    pub fn open(root: &Path, config: Config) -> Result<Self> {
        let data_dir = root.join(&config.workspace.data_dir);
        if !data_dir.is_dir() {
            return Err(HarvestError::NotInitialized);
        }
        std::fs::create_dir_all(data_dir.join(PROJECTS_DIR))?;

        let registry = Registry::open(data_dir.join(REGISTRY_FILE))?;
        registry.initialize()?;
        Ok(Self {
            data_dir,
            registry,
            config,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn project_dir(&self, project: &ProjectEntry) -> PathBuf {
        self.data_dir.join(&project.path)
    }

    pub fn create_project(&self, name: &str) -> Result<ProjectEntry> {
        let slug = ProjectSlug::from_name(name).ok_or_else(|| {
            HarvestError::Config(format!("'{}' does not contain any letters or digits", name))
        })?;
        let relative = format!("{}/{}", PROJECTS_DIR, slug);
        let entry = self.registry.create_project(&slug, name.trim(), &relative)?;

        let dir = self.project_dir(&entry);
        for sub in [HARVESTS_DIR, TOKENS_DIR, COMPONENTS_DIR, DOCS_DIR] {
            std::fs::create_dir_all(dir.join(sub))?;
        }
        info!("Created project {} at {}", entry.slug, dir.display());
        Ok(entry)
    }

    /// Store a harvest in the project and regenerate its artifacts
    pub fn add_harvest(&self, slug: &str, record: &HarvestRecord) -> Result<(HarvestEntry, ArtifactSummary)> {
        let project = self.registry.get_project(slug)?;
        let fingerprint = record.fingerprint()?;
        if self.registry.find_by_fingerprint(slug, &fingerprint)?.is_some() {
            return Err(HarvestError::DuplicateHarvest {
                project: slug.to_string(),
                fingerprint,
            });
        }

        // Stored under a fresh id; the record's own id is not trusted as a file name
        let id = uuid::Uuid::new_v4().to_string();
        let file = format!("{}/{}.json", HARVESTS_DIR, id);
        let path = self.project_dir(&project).join(&file);
        record.save(&path)?;

        let registered = self.registry.add_harvest(
            slug,
            NewHarvest {
                id: &id,
                source: &record.metadata.source,
                file: &file,
                fingerprint: &fingerprint,
                page_type: &record.metadata.page_type,
            },
        );
        let entry = match registered {
            Ok(entry) => entry,
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_file(&path) {
                    warn!("Failed to remove {}: {}", path.display(), cleanup);
                }
                return Err(e);
            }
        };
        let summary = self.regenerate(slug)?;
        Ok((entry, summary))
    }

    /// Re-merge every harvest of the project and rewrite its artifacts
    pub fn regenerate(&self, slug: &str) -> Result<ArtifactSummary> {
        let project = self.registry.get_project(slug)?;
        let dir = self.project_dir(&project);

        let records = self
            .registry
            .harvests(slug)?
            .iter()
            .map(|entry| HarvestRecord::load(dir.join(&entry.file)))
            .collect::<Result<Vec<_>>>()?;
        let merged = match records.as_slice() {
            [single] => single.clone(),
            _ => merge_records(&records, &self.config.aggregate)?,
        };
        merged.save(dir.join(MERGED_FILE))?;

        let summary = write_artifacts(&merged, &self.config, &dir)?;
        info!(
            "Regenerated {} from {} harvest(s): {} tokens, {} components",
            slug,
            records.len(),
            summary.token_count,
            summary.components.len()
        );
        Ok(summary)
    }

    pub fn show(&self, slug: &str) -> Result<ProjectDetails> {
        let project = self.registry.get_project(slug)?;
        Ok(ProjectDetails {
            dir: self.project_dir(&project),
            harvests: self.registry.harvests(slug)?,
            project,
        })
    }

    pub fn list(&self) -> Result<Vec<ProjectSummary>> {
        self.registry.list_projects()
    }

    /// Remove the project from the registry and delete its directory
    pub fn delete(&self, slug: &str) -> Result<()> {
        let project = self.registry.get_project(slug)?;
        self.registry.delete_project(slug)?;
        let dir = self.project_dir(&project);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        info!("Deleted project {}", slug);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::Harvester;
    use crate::harvest::fixtures::{landing_page, single_button_page};
    use tempfile::TempDir;

    fn workspace(temp: &TempDir) -> Workspace {
        std::fs::create_dir_all(temp.path().join(".harvest")).unwrap();
        Workspace::open(temp.path(), Config::default()).unwrap()
    }

    fn landing() -> HarvestRecord {
        Harvester::new(&Config::default()).harvest(&landing_page()).unwrap()
    }

    #[test]
    fn test_open_requires_init() {
        let temp = TempDir::new().unwrap();
        let err = Workspace::open(temp.path(), Config::default()).err().unwrap();
        assert!(matches!(err, HarvestError::NotInitialized));
    }

    #[test]
    fn test_write_artifacts() {
        let temp = TempDir::new().unwrap();
        let summary = write_artifacts(&landing(), &Config::default(), temp.path()).unwrap();

        assert!(summary.token_count > 0);
        assert!(summary.components.contains(&"UiButton".to_string()));
        let css = std::fs::read_to_string(temp.path().join("tokens/tokens.css")).unwrap();
        assert!(css.contains("--semi-color-primary: #0064FA;"));
        assert!(temp.path().join("components/UiButton.tsx").exists());
        let index = std::fs::read_to_string(temp.path().join("components/index.ts")).unwrap();
        assert!(index.contains("export { UiButton } from './UiButton';"));
        assert!(temp.path().join("docs/DESIGN.md").exists());
        assert!(temp.path().join("docs/preview.html").exists());
    }

    #[test]
    fn test_add_harvest_and_regenerate() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        let project = ws.create_project("Acme Site").unwrap();
        assert_eq!(project.slug, "acme-site");
        let dir = ws.project_dir(&project);
        assert!(dir.join("harvests").is_dir());

        let record = landing();
        let (entry, _) = ws.add_harvest("acme-site", &record).unwrap();
        assert_eq!(entry.page_type, "landing");
        assert!(dir.join(&entry.file).exists());
        assert!(dir.join("tokens/tokens.css").exists());

        let err = ws.add_harvest("acme-site", &record).unwrap_err();
        assert!(matches!(err, HarvestError::DuplicateHarvest { .. }));

        let button = Harvester::new(&Config::default())
            .harvest(&single_button_page())
            .unwrap();
        ws.add_harvest("acme-site", &button).unwrap();

        let merged = HarvestRecord::load(dir.join(MERGED_FILE)).unwrap();
        assert_eq!(
            merged.metadata.sampled_elements,
            record.metadata.sampled_elements + button.metadata.sampled_elements
        );

        let details = ws.show("acme-site").unwrap();
        assert_eq!(details.harvests.len(), 2);
        assert_eq!(ws.list().unwrap()[0].harvest_count, 2);
    }

    #[test]
    fn test_stored_file_ignores_record_id() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        let project = ws.create_project("alpha").unwrap();

        let mut record = landing();
        record.metadata.id = "../../../../escaped".into();
        let (entry, _) = ws.add_harvest("alpha", &record).unwrap();

        assert_ne!(entry.id, record.metadata.id);
        let stored = ws.project_dir(&project).join(&entry.file);
        assert!(stored.starts_with(ws.project_dir(&project).join("harvests")));
        assert!(stored.exists());
        assert!(!temp.path().join("escaped.json").exists());
        assert_eq!(std::fs::read_dir(ws.project_dir(&project).join("harvests")).unwrap().count(), 1);
    }

    #[test]
    fn test_same_harvest_in_two_projects() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        ws.create_project("alpha").unwrap();
        let beta = ws.create_project("beta").unwrap();

        let record = landing();
        let (first, _) = ws.add_harvest("alpha", &record).unwrap();
        let (second, _) = ws.add_harvest("beta", &record).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(ws.show("beta").unwrap().harvests.len(), 1);

        // a refused duplicate leaves no file behind
        assert!(ws.add_harvest("beta", &record).is_err());
        let harvests = ws.project_dir(&beta).join("harvests");
        assert_eq!(std::fs::read_dir(harvests).unwrap().count(), 1);
    }

    #[test]
    fn test_delete_project() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        let project = ws.create_project("acme").unwrap();
        let dir = ws.project_dir(&project);

        ws.delete("acme").unwrap();
        assert!(!dir.exists());
        assert!(ws.list().unwrap().is_empty());
        assert!(matches!(
            ws.delete("acme").unwrap_err(),
            HarvestError::ProjectNotFound(_)
        ));
    }

    #[test]
    fn test_unnamed_project_rejected() {
        let temp = TempDir::new().unwrap();
        let err = workspace(&temp).create_project("!!!").unwrap_err();
        assert!(matches!(err, HarvestError::Config(_)));
    }
}
