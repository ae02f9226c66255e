mod handlers;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use crate::planner::RoadmapStore;

/// Shared state behind every route.
///
/// The store sits behind a single mutex so mutations run one at a time.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub store: Arc<Mutex<RoadmapStore<Database>>>,
}

impl AppState {
    /// Load the persisted roadmap and the enrolled courses from `db`.
    pub fn load(db: Database) -> Result<Self> {
        let mut store = RoadmapStore::load(db.clone());
        if let Some(issue) = store.load_issue() {
            tracing::warn!("Recovered from bad roadmap record: {}", issue);
        }
        store.set_enrolled_courses(db.list_enrolled_courses()?);

        Ok(Self {
            db,
            store: Arc::new(Mutex::new(store)),
        })
    }
}

pub fn create_router(db: Database) -> Result<Router> {
    let state = AppState::load(db)?;

    let api = Router::new()
        // Roadmap
        .route("/roadmap", get(handlers::get_roadmap))
        .route("/roadmap", delete(handlers::reset_roadmap))
        .route("/roadmap/config", put(handlers::update_config))
        .route("/roadmap/semesters", post(handlers::add_semester))
        .route("/roadmap/pool", get(handlers::list_available_courses))
        .route("/roadmap/placements", post(handlers::place_course))
        .route("/roadmap/drag/start", post(handlers::drag_start))
        .route("/roadmap/drag/end", post(handlers::drag_end))
        .route(
            "/roadmap/semesters/{id}/courses/{course_id}",
            delete(handlers::remove_semester_course),
        )
        .route(
            "/roadmap/transfer-credits/{course_id}",
            delete(handlers::remove_transfer_credit),
        )
        .route("/roadmap/validate", post(handlers::validate_placement))
        .route("/roadmap/summary", get(handlers::get_summary))
        .route("/roadmap/export", get(handlers::export_roadmap))
        // Enrolled courses
        .route("/courses", get(handlers::list_courses))
        .route("/courses", post(handlers::add_course))
        .route("/courses/{course_id}", delete(handlers::remove_course))
        // Health
        .route("/health", get(handlers::health));

    Ok(Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}
