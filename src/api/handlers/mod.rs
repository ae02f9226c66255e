use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::db::Database;
use crate::models::*;
use crate::planner::{LoadIssue, PlacementOutcome, RoadmapStore, SettingsOutcome, StoreError};
use crate::report::{self, RoadmapSummary};

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
///
/// Input validation failures from the database layer are prefixed with
/// "Invalid" and are safe to expose as BAD_REQUEST.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();

    if msg.starts_with("Invalid") {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::Config(e) => {
            tracing::warn!("Rejected roadmap config: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        StoreError::Persistence(e) => internal_error(format!("{:#}", e)),
    }
}

// ============================================================
// Request / Response Types
// ============================================================

/// The roadmap plus the derived views a planner screen needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapView {
    #[serde(flatten)]
    pub roadmap: Roadmap,
    pub available_courses: Vec<PlannedCourse>,
    pub active_drag: Option<String>,
    pub load_issue: Option<LoadIssue>,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    pub outcome: T,
    pub roadmap: Roadmap,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub course_id: String,
    /// Semester id, `transfer-credits`, or empty/`pool` for the pool.
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragStartRequest {
    pub course_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEndRequest {
    pub course_id: String,
    /// `None` means the gesture was dropped over nothing.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub course_id: String,
    pub semester_id: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Pair an outcome with the roadmap it produced. Call while still holding
/// the store guard that performed the mutation.
fn mutation<T: Serialize>(
    store: &RoadmapStore<Database>,
    outcome: T,
) -> Json<MutationResponse<T>> {
    Json(MutationResponse {
        outcome,
        roadmap: store.roadmap().clone(),
    })
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Roadmap
// ============================================================

pub async fn get_roadmap(State(state): State<AppState>) -> Json<RoadmapView> {
    let store = state.store.lock().expect("store lock poisoned");
    Json(RoadmapView {
        roadmap: store.roadmap().clone(),
        available_courses: store.available_courses(),
        active_drag: store.active_drag().map(str::to_string),
        load_issue: store.load_issue().cloned(),
    })
}

pub async fn reset_roadmap(State(state): State<AppState>) -> ApiResult<Roadmap> {
    let mut store = state.store.lock().expect("store lock poisoned");
    store.reset().map_err(store_error)?;
    store.take_load_issue();
    Ok(Json(store.roadmap().clone()))
}

pub async fn update_config(
    State(state): State<AppState>,
    Json(config): Json<RoadmapConfig>,
) -> ApiResult<MutationResponse<SettingsOutcome>> {
    let mut store = state.store.lock().expect("store lock poisoned");
    let outcome = store.update_config(config).map_err(store_error)?;
    keep_returned_courses_enrolled(&state, &store, &outcome.returned_to_pool);
    Ok(mutation(&store, outcome))
}

pub async fn add_semester(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Semester>), (StatusCode, String)> {
    let mut store = state.store.lock().expect("store lock poisoned");
    store
        .add_semester()
        .map(|s| (StatusCode::CREATED, Json(s)))
        .map_err(store_error)
}

pub async fn list_available_courses(State(state): State<AppState>) -> Json<Vec<PlannedCourse>> {
    let store = state.store.lock().expect("store lock poisoned");
    Json(store.available_courses())
}

pub async fn place_course(
    State(state): State<AppState>,
    Json(input): Json<PlacementRequest>,
) -> ApiResult<MutationResponse<PlacementOutcome>> {
    let target = Container::parse(&input.target);
    let mut store = state.store.lock().expect("store lock poisoned");
    let outcome = store.place(&input.course_id, &target).map_err(store_error)?;
    Ok(mutation(&store, outcome))
}

pub async fn drag_start(
    State(state): State<AppState>,
    Json(input): Json<DragStartRequest>,
) -> ApiResult<PlannedCourse> {
    let mut store = state.store.lock().expect("store lock poisoned");
    store
        .drag_started(&input.course_id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Course not found".to_string()))
}

pub async fn drag_end(
    State(state): State<AppState>,
    Json(input): Json<DragEndRequest>,
) -> ApiResult<MutationResponse<PlacementOutcome>> {
    let target = input.target.as_deref().map(Container::parse);
    let mut store = state.store.lock().expect("store lock poisoned");
    let outcome = store
        .drag_ended(&input.course_id, target.as_ref())
        .map_err(store_error)?;
    Ok(mutation(&store, outcome))
}

pub async fn remove_semester_course(
    State(state): State<AppState>,
    Path((semester_id, course_id)): Path<(String, String)>,
) -> ApiResult<MutationResponse<PlacementOutcome>> {
    let mut store = state.store.lock().expect("store lock poisoned");
    let outcome = store
        .remove(&Container::Semester(semester_id), &course_id)
        .map_err(store_error)?;
    Ok(mutation(&store, outcome))
}

pub async fn remove_transfer_credit(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult<MutationResponse<PlacementOutcome>> {
    let mut store = state.store.lock().expect("store lock poisoned");
    let outcome = store
        .remove_transfer_credit(&course_id)
        .map_err(store_error)?;
    Ok(mutation(&store, outcome))
}

pub async fn validate_placement(
    State(state): State<AppState>,
    Json(input): Json<ValidateRequest>,
) -> ApiResult<Vec<ValidationWarning>> {
    let store = state.store.lock().expect("store lock poisoned");
    store
        .validate_placement(&input.course_id, &input.semester_id)
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            "Course or semester not found".to_string(),
        ))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<RoadmapSummary> {
    let store = state.store.lock().expect("store lock poisoned");
    Json(report::summarize(store.roadmap()))
}

pub async fn export_roadmap(State(state): State<AppState>) -> String {
    let store = state.store.lock().expect("store lock poisoned");
    report::render_text(store.roadmap())
}

// ============================================================
// Enrolled Courses
// ============================================================

/// Re-enroll courses that a settings update pushed back to the pool after
/// they had been dropped from the enrolled list, so a later refresh does
/// not lose them.
fn keep_returned_courses_enrolled(
    state: &AppState,
    store: &RoadmapStore<Database>,
    returned: &[String],
) {
    for course in store.enrolled() {
        if !returned.iter().any(|id| id == course.id()) {
            continue;
        }
        let result = state
            .db
            .get_enrolled_course(course.id())
            .and_then(|existing| match existing {
                Some(_) => Ok(()),
                None => state.db.add_enrolled_course(course.course.clone()).map(|_| ()),
            });
        if let Err(e) = result {
            tracing::warn!("Could not re-enroll {}: {:#}", course.id(), e);
        }
    }
}

fn refresh_enrolled(state: &AppState) -> Result<(), (StatusCode, String)> {
    let courses = state.db.list_enrolled_courses().map_err(internal_error)?;
    let mut store = state.store.lock().expect("store lock poisoned");
    store.set_enrolled_courses(courses);
    Ok(())
}

pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    state
        .db
        .list_enrolled_courses()
        .map(Json)
        .map_err(internal_error)
}

pub async fn add_course(
    State(state): State<AppState>,
    Json(input): Json<Course>,
) -> Result<(StatusCode, Json<Course>), (StatusCode, String)> {
    let course = state
        .db
        .add_enrolled_course(input)
        .map_err(internal_error)?;
    refresh_enrolled(&state)?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn remove_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !state
        .db
        .remove_enrolled_course(&course_id)
        .map_err(internal_error)?
    {
        return Err((StatusCode::NOT_FOUND, "Course not found".to_string()));
    }
    refresh_enrolled(&state)?;
    Ok(StatusCode::NO_CONTENT)
}
