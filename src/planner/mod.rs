//! The roadmap planning engine.
//!
//! - [`generator`]: builds and extends the semester sequence
//! - [`validation`]: advisory placement checks and config validation
//! - [`placement`]: pure moves between pool, semesters and transfer bucket
//! - [`store`]: owns the aggregate and persists it on every mutation
//! - [`storage`]: the persistence port and an in-memory implementation

pub mod generator;
pub mod placement;
pub mod storage;
pub mod store;
pub mod validation;

pub use generator::{advance, generate_default_roadmap, generate_semesters, next_semester};
pub use placement::{available_courses, PlacementOutcome};
pub use storage::{MemoryStorage, RoadmapStorage, ROADMAP_RECORD};
pub use store::{LoadIssue, RoadmapStore, SettingsOutcome, StoreError};
pub use validation::{
    validate, validate_config, ConfigError, CreditLoad, CREDIT_OVERLOAD_THRESHOLD,
    MAX_START_YEAR, MAX_TOTAL_YEARS,
};
