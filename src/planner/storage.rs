//! Durable persistence port for the roadmap aggregate.

use std::sync::{Arc, Mutex};

use anyhow::Result;

/// Name of the single record holding the serialized roadmap.
pub const ROADMAP_RECORD: &str = "course-mapper-roadmap";

/// Read/write access to one named record.
///
/// The store always writes the whole serialized aggregate; implementations
/// never merge. Last writer wins.
pub trait RoadmapStorage {
    /// The stored record, or `None` when nothing has been saved yet.
    fn read(&self) -> Result<Option<String>>;

    fn write(&self, body: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// In-memory storage, mainly for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the storage with an existing record.
    pub fn with_record(body: impl Into<String>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(body.into()))),
        }
    }

    /// Current contents, for inspection.
    pub fn record(&self) -> Option<String> {
        self.record.lock().expect("storage lock poisoned").clone()
    }
}

impl RoadmapStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.record())
    }

    fn write(&self, body: &str) -> Result<()> {
        *self.record.lock().expect("storage lock poisoned") = Some(body.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.lock().expect("storage lock poisoned") = None;
        Ok(())
    }
}

impl<S: RoadmapStorage + ?Sized> RoadmapStorage for Arc<S> {
    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, body: &str) -> Result<()> {
        (**self).write(body)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
