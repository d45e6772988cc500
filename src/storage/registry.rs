//! Project Registry
//!
//! SQLite index of projects and the harvests added to them. The registry
//! only stores metadata and paths; records and generated artifacts live in
//! the project directories.

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::types::{HarvestError, ProjectSlug, Result, ResultExt};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    slug TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS harvests (
    id TEXT PRIMARY KEY,
    project_slug TEXT NOT NULL REFERENCES projects(slug) ON DELETE CASCADE,
    source TEXT NOT NULL,
    file TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    added_at TEXT NOT NULL,
    page_type TEXT NOT NULL DEFAULT 'unknown',
    UNIQUE (project_slug, fingerprint)
);

CREATE INDEX IF NOT EXISTS idx_harvests_project ON harvests(project_slug, added_at);
"#;

/// Current schema version for migration tracking
const SCHEMA_VERSION: u32 = 2;

struct Migration {
    version: u32,
    description: &'static str,
    up: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    description: "Add page_type column to harvests",
    up: "ALTER TABLE harvests ADD COLUMN page_type TEXT NOT NULL DEFAULT 'unknown'",
}];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub slug: String,
    pub name: String,
    /// Project directory, relative to the data directory
    pub path: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project: ProjectEntry,
    pub harvest_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestEntry {
    pub id: String,
    pub project_slug: String,
    pub source: String,
    /// Record file, relative to the project directory
    pub file: String,
    pub fingerprint: String,
    pub page_type: String,
    pub added_at: String,
}

/// Fields supplied when registering a harvest
#[derive(Debug, Clone)]
pub struct NewHarvest<'a> {
    pub id: &'a str,
    pub source: &'a str,
    pub file: &'a str,
    pub fingerprint: &'a str,
    pub page_type: &'a str,
}

pub struct Registry {
    conn: Connection,
}

impl Registry {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )
        .with_context("Failed to configure registry connection")?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Create the schema, or migrate an existing registry forward
    pub fn initialize(&self) -> Result<()> {
        let current: u32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if current == 0 {
            self.conn
                .execute_batch(SCHEMA)
                .with_context("Failed to initialize registry schema")?;
        } else {
            self.migrate(current)?;
        }

        if current < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)
                .with_context("Failed to set registry schema version")?;
        }
        Ok(())
    }

    fn migrate(&self, current: u32) -> Result<()> {
        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            self.conn.execute_batch(migration.up).with_context(format!(
                "Failed to apply migration {}: {}",
                migration.version, migration.description
            ))?;
            info!(
                "Applied migration {}: {}",
                migration.version, migration.description
            );
        }
        Ok(())
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub fn create_project(&self, slug: &ProjectSlug, name: &str, path: &str) -> Result<ProjectEntry> {
        if self.find_project(slug.as_str())?.is_some() {
            return Err(HarvestError::ProjectExists(slug.to_string()));
        }
        let entry = ProjectEntry {
            slug: slug.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.conn.execute(
            "INSERT INTO projects (slug, name, path, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![entry.slug, entry.name, entry.path, entry.created_at],
        )?;
        Ok(entry)
    }

    pub fn find_project(&self, slug: &str) -> Result<Option<ProjectEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT slug, name, path, created_at FROM projects WHERE slug = ?1",
                params![slug],
                map_project,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn get_project(&self, slug: &str) -> Result<ProjectEntry> {
        self.find_project(slug)?
            .ok_or_else(|| HarvestError::ProjectNotFound(slug.to_string()))
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.slug, p.name, p.path, p.created_at, COUNT(h.id)
             FROM projects p LEFT JOIN harvests h ON h.project_slug = p.slug
             GROUP BY p.slug ORDER BY p.slug",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ProjectSummary {
                project: map_project(row)?,
                harvest_count: row.get::<_, i64>(4)? as usize,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Remove a project and its harvest rows
    pub fn delete_project(&self, slug: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM projects WHERE slug = ?1", params![slug])?;
        if deleted == 0 {
            return Err(HarvestError::ProjectNotFound(slug.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Harvests
    // =========================================================================

    /// Register a harvest; the same fingerprint is refused twice per project
    pub fn add_harvest(&self, slug: &str, harvest: NewHarvest<'_>) -> Result<HarvestEntry> {
        self.get_project(slug)?;
        if self.find_by_fingerprint(slug, harvest.fingerprint)?.is_some() {
            return Err(HarvestError::DuplicateHarvest {
                project: slug.to_string(),
                fingerprint: harvest.fingerprint.to_string(),
            });
        }

        let entry = HarvestEntry {
            id: harvest.id.to_string(),
            project_slug: slug.to_string(),
            source: harvest.source.to_string(),
            file: harvest.file.to_string(),
            fingerprint: harvest.fingerprint.to_string(),
            page_type: harvest.page_type.to_string(),
            added_at: Utc::now().to_rfc3339(),
        };
        self.conn.execute(
            "INSERT INTO harvests (id, project_slug, source, file, fingerprint, page_type, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.project_slug,
                entry.source,
                entry.file,
                entry.fingerprint,
                entry.page_type,
                entry.added_at
            ],
        )?;
        Ok(entry)
    }

    pub fn find_by_fingerprint(&self, slug: &str, fingerprint: &str) -> Result<Option<HarvestEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT id, project_slug, source, file, fingerprint, page_type, added_at
                 FROM harvests WHERE project_slug = ?1 AND fingerprint = ?2",
                params![slug, fingerprint],
                map_harvest,
            )
            .optional()?;
        Ok(entry)
    }

    /// Harvests of a project, oldest first
    pub fn harvests(&self, slug: &str) -> Result<Vec<HarvestEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_slug, source, file, fingerprint, page_type, added_at
             FROM harvests WHERE project_slug = ?1 ORDER BY added_at, id",
        )?;
        let rows = stmt.query_map(params![slug], map_harvest)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn map_project(row: &Row<'_>) -> rusqlite::Result<ProjectEntry> {
    Ok(ProjectEntry {
        slug: row.get(0)?,
        name: row.get(1)?,
        path: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_harvest(row: &Row<'_>) -> rusqlite::Result<HarvestEntry> {
    Ok(HarvestEntry {
        id: row.get(0)?,
        project_slug: row.get(1)?,
        source: row.get(2)?,
        file: row.get(3)?,
        fingerprint: row.get(4)?,
        page_type: row.get(5)?,
        added_at: row.get(6)?,
    })
}
