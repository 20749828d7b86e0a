use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Local;
use shared::{paginate, Page, ReservationIndex, RoomAvailability, RoomId};

use crate::client::{BackendClient, ClientError};
use crate::interceptor::ErrorPayload;
use crate::models::{ErrorResponse, RoomQuery, RoomView};

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub client: BackendClient,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/:id/availability", get(room_availability))
        .route("/reservations/export", get(export_reservations))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

pub async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<Page<RoomView>>, ApiError> {
    let (rooms, reservations) = tokio::try_join!(
        state.client.list_rooms(),
        state.client.list_reservations()
    )
    .map_err(backend_error)?;

    let today = Local::now().date_naive();
    let index = ReservationIndex::build(&reservations);
    let filter = query.filter();

    let matching: Vec<_> = if filter.is_empty() {
        rooms
    } else {
        rooms
            .into_iter()
            .filter(|room| filter.matches(room))
            .collect()
    };
    let per_page = query.per_page.unwrap_or(matching.len());
    let page = paginate(matching, query.page.unwrap_or(1), per_page)
        .map(|room| {
            let availability = index.availability(room.id, today);
            RoomView::new(room, availability)
        });

    tracing::debug!(
        "Serving {} of {} matching rooms",
        page.items.len(),
        page.total
    );
    Ok(Json(page))
}

pub async fn room_availability(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<Json<RoomAvailability>, ApiError> {
    let reservations = state
        .client
        .list_reservations()
        .await
        .map_err(backend_error)?;

    let today = Local::now().date_naive();
    Ok(Json(RoomAvailability::compute(room_id, &reservations, today)))
}

pub async fn export_reservations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state
        .client
        .export_reservations()
        .await
        .map_err(backend_error)?;

    tracing::info!("Exported reservations ({} bytes)", bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reservations.xlsx\"",
            ),
        ],
        bytes,
    ))
}

pub async fn health_check() -> &'static str {
    "OK"
}

fn backend_error(e: ClientError) -> ApiError {
    tracing::error!("Backend request failed: {}", e);
    let (status, message) = match &e {
        ClientError::Status { status, body } => (
            *status,
            ErrorPayload::from_slice(body)
                .summary()
                .map(str::to_string),
        ),
        ClientError::Network(_) | ClientError::Decode(_) => (StatusCode::BAD_GATEWAY, None),
    };
    (
        status,
        Json(ErrorResponse {
            error: message.unwrap_or_else(|| e.to_string()),
        }),
    )
}
