//! Course Mapper: a multi-year academic roadmap planner.
//!
//! The planning engine lives in [`planner`]; [`api`] serves it over HTTP,
//! [`db`] persists it, and [`catalog`] talks to the course-data backend.

pub mod api;
pub mod catalog;
pub mod db;
pub mod models;
pub mod planner;
pub mod report;
