mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::models::{Course, MAX_COURSE_CREDITS};
use crate::planner::{RoadmapStorage, ROADMAP_RECORD};

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "COURSE_MAPPER_DB";

/// SQLite storage for enrolled courses and the persisted roadmap record.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database named by `COURSE_MAPPER_DB`, or the per-user
    /// default location.
    pub fn open_default() -> Result<Self> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            return Self::open(PathBuf::from(path));
        }
        let dirs = directories::ProjectDirs::from("", "", "course-mapper")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open(dirs.data_dir().join("course-mapper.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Enrolled course operations
    // ============================================================

    pub fn list_enrolled_courses(&self) -> Result<Vec<Course>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT course_id, title, credits, hub_requirements, transfer_source
             FROM enrolled_courses ORDER BY created_at, course_id",
        )?;

        let courses = stmt
            .query_map([], |row| {
                Ok(Course {
                    course_id: row.get(0)?,
                    title: row.get(1)?,
                    credits: row.get(2)?,
                    hub_requirements: parse_hubs(row.get::<_, String>(3)?),
                    transfer_source: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    pub fn get_enrolled_course(&self, course_id: &str) -> Result<Option<Course>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let course = conn
            .query_row(
                "SELECT course_id, title, credits, hub_requirements, transfer_source
                 FROM enrolled_courses WHERE course_id = ?",
                [course_id],
                |row| {
                    Ok(Course {
                        course_id: row.get(0)?,
                        title: row.get(1)?,
                        credits: row.get(2)?,
                        hub_requirements: parse_hubs(row.get::<_, String>(3)?),
                        transfer_source: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(course)
    }

    /// Enroll a course, replacing the metadata of an existing enrollment
    /// with the same code.
    pub fn add_enrolled_course(&self, course: Course) -> Result<Course> {
        if course.course_id.trim().is_empty() {
            anyhow::bail!("Invalid course: course id is required");
        }
        if !(1..=MAX_COURSE_CREDITS).contains(&course.credits) {
            anyhow::bail!(
                "Invalid course: credits must be between 1 and {}",
                MAX_COURSE_CREDITS
            );
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO enrolled_courses (course_id, title, credits, hub_requirements, transfer_source, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(course_id) DO UPDATE SET
                title = excluded.title,
                credits = excluded.credits,
                hub_requirements = excluded.hub_requirements,
                transfer_source = excluded.transfer_source",
            (
                &course.course_id,
                &course.title,
                course.credits,
                serde_json::to_string(&course.hub_requirements)?,
                &course.transfer_source,
                Utc::now().to_rfc3339(),
            ),
        )?;

        Ok(course)
    }

    pub fn remove_enrolled_course(&self, course_id: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM enrolled_courses WHERE course_id = ?",
            [course_id],
        )?;
        Ok(rows > 0)
    }

    // ============================================================
    // Named record operations
    // ============================================================

    pub fn read_record(&self, name: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let body = conn
            .query_row(
                "SELECT body FROM roadmap_records WHERE name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    pub fn write_record(&self, name: &str, body: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO roadmap_records (name, body, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
            (name, body, Utc::now().to_rfc3339()),
        )?;
        Ok(())
    }

    pub fn clear_record(&self, name: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM roadmap_records WHERE name = ?", [name])?;
        Ok(rows > 0)
    }
}

impl RoadmapStorage for Database {
    fn read(&self) -> Result<Option<String>> {
        self.read_record(ROADMAP_RECORD)
    }

    fn write(&self, body: &str) -> Result<()> {
        self.write_record(ROADMAP_RECORD, body)
    }

    fn clear(&self) -> Result<()> {
        self.clear_record(ROADMAP_RECORD).map(|_| ())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn parse_hubs(s: String) -> Vec<String> {
    serde_json::from_str(&s).unwrap_or_default()
}
