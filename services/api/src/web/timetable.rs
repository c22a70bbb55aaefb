//! services/api/src/web/timetable.rs
//!
//! Handlers for the weekly timetable, its grid layout and the upcoming-classes list.

use crate::error::{ApiError, ErrorBody};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_dashboard_core::{
    domain::{ClockTime, DayOfWeek, TimetableEvent, TimetableEventDraft},
    timetable::{upcoming_events, GridLayout, TimetableGrid, UpcomingEvent},
};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

const DEFAULT_UPCOMING: usize = 3;

/// The editable fields of a weekly event.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEventRequest {
    /// Leave out for an event with no course; it gets an id of its own.
    #[serde(default)]
    pub course_id: Option<Uuid>,
    pub course_name: String,
    pub course_color: String,
    #[schema(value_type = String, example = "Monday")]
    pub day: DayOfWeek,
    #[schema(value_type = String, example = "09:00")]
    pub start_time: ClockTime,
    #[schema(value_type = String, example = "10:30")]
    pub end_time: ClockTime,
    pub description: String,
}

impl From<TimetableEventRequest> for TimetableEventDraft {
    fn from(request: TimetableEventRequest) -> Self {
        Self {
            course_id: request.course_id,
            course_name: request.course_name,
            course_color: request.course_color,
            day: request.day,
            start_time: request.start_time,
            end_time: request.end_time,
            description: request.description,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingQuery {
    /// How many upcoming classes to return (default 3).
    pub limit: Option<usize>,
}

/// The grid plus the events it references, so a client can draw it in one request.
#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub grid: GridLayout,
    pub events: Vec<TimetableEvent>,
}

#[utoipa::path(
    get,
    path = "/timetable",
    responses((status = 200, description = "Every weekly event"))
)]
pub async fn list_events_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TimetableEvent>>, ApiError> {
    Ok(Json(app_state.repo.list_events().await?))
}

/// Add a weekly event. Times are `HH:MM` and the end must be after the start.
#[utoipa::path(
    post,
    path = "/timetable",
    request_body = TimetableEventRequest,
    responses(
        (status = 201, description = "The stored event"),
        (status = 400, description = "Blank field or end before start", body = ErrorBody)
    )
)]
pub async fn create_event_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<TimetableEventRequest>,
) -> Result<(StatusCode, Json<TimetableEvent>), ApiError> {
    let draft = TimetableEventDraft::from(request);
    draft.validate()?;
    let event = app_state.repo.create_event(draft).await?;
    info!(
        "Added {} {}-{} '{}'",
        event.day, event.start_time, event.end_time, event.description
    );
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/timetable/{id}",
    params(("id" = Uuid, Path, description = "The event id.")),
    request_body = TimetableEventRequest,
    responses(
        (status = 200, description = "The updated event"),
        (status = 400, description = "Blank field or end before start", body = ErrorBody),
        (status = 404, description = "Unknown event", body = ErrorBody)
    )
)]
pub async fn update_event_handler(
    State(app_state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<TimetableEventRequest>,
) -> Result<Json<TimetableEvent>, ApiError> {
    let draft = TimetableEventDraft::from(request);
    draft.validate()?;
    Ok(Json(app_state.repo.update_event(event_id, draft).await?))
}

#[utoipa::path(
    delete,
    path = "/timetable/{id}",
    params(("id" = Uuid, Path, description = "The event id.")),
    responses(
        (status = 200, description = "The removed event"),
        (status = 404, description = "Unknown event", body = ErrorBody)
    )
)]
pub async fn delete_event_handler(
    State(app_state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<TimetableEvent>, ApiError> {
    let event = app_state.repo.delete_event(event_id).await?;
    info!("Removed timetable event {}", event.id);
    Ok(Json(event))
}

/// Lay the week out on the Monday to Sunday, 08:00 to 19:00 grid.
///
/// Events that collide with an earlier one are listed under `grid.conflicts`, and
/// events outside the grid's hours under `grid.unplaced`.
#[utoipa::path(
    get,
    path = "/timetable/grid",
    responses((status = 200, description = "The weekly grid"))
)]
pub async fn grid_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<GridResponse>, ApiError> {
    let events = app_state.repo.list_events().await?;
    let grid = TimetableGrid::default().layout(&events);
    if !grid.conflicts.is_empty() || !grid.unplaced.is_empty() {
        warn!(
            "Timetable grid has {} conflicting and {} off-grid events",
            grid.conflicts.len(),
            grid.unplaced.len()
        );
    }
    Ok(Json(GridResponse { grid, events }))
}

/// The next classes from now, soonest first.
#[utoipa::path(
    get,
    path = "/timetable/upcoming",
    params(UpcomingQuery),
    responses((status = 200, description = "Upcoming classes with their next start time"))
)]
pub async fn upcoming_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Vec<UpcomingEvent>>, ApiError> {
    let events = app_state.repo.list_events().await?;
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING);
    Ok(Json(upcoming_events(
        &events,
        Local::now().naive_local(),
        limit,
    )))
}
