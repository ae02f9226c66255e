//! Domain models for Course Mapper.
//!
//! # Core Concepts
//!
//! - [`Course`]: Immutable catalog fact (code, title, credits, hub tags).
//! - [`PlannedCourse`]: A course inside the planning domain, with a status and
//!   exactly one [`Container`].
//! - [`Semester`]: A `{year}-{term}` slot holding planned courses and a cached
//!   credit total.
//! - [`Roadmap`]: The aggregate root owning the semesters and the transfer
//!   bucket, shaped by a [`RoadmapConfig`].
//!
//! A course id appears in at most one container at a time. Courses that are
//! enrolled but not placed form the derived pool.

mod container;
mod course;
mod roadmap;
mod semester;

pub use container::*;
pub use course::*;
pub use roadmap::*;
pub use semester::*;
