use std::{sync::Arc, time::Instant};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use directory::query::{self, BuildingRecord, OrganizationDetails};
use directory::DirectoryError;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{auth, config::AppConfig, logging};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/buildings", get(list_buildings))
        .route("/organizations/by-building/{building_id}", get(by_building))
        .route("/organizations/by-activity/{activity_id}", get(by_activity))
        .route(
            "/organizations/by-activity-tree/{activity_id}",
            get(by_activity_tree),
        )
        .route("/organizations/by-activity-name", get(by_activity_name))
        .route("/organizations/search", get(search))
        .route("/organizations/near", get(near))
        .route("/organizations/within-rect", get(within_rect))
        .route("/organizations/{organization_id}", get(get_organization))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(middleware::from_fn(access_log))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Access log: method, path, sanitized query, status, elapsed time. The
/// query string goes through the redaction pass so keys never leak.
async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let query = request
        .uri()
        .query()
        .map(logging::sanitize_query)
        .unwrap_or_default();
    let started = Instant::now();
    let response = next.run(request).await;
    info!(
        %method,
        path,
        query,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_buildings(State(state): State<AppState>) -> HttpResult<Json<Vec<BuildingRecord>>> {
    Ok(Json(query::list_buildings(state.db.as_ref()).await?))
}

async fn by_building(
    State(state): State<AppState>,
    Path(building_id): Path<i32>,
) -> HttpResult<Json<Vec<OrganizationDetails>>> {
    Ok(Json(
        query::by_building(state.db.as_ref(), building_id).await?,
    ))
}

async fn by_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<i32>,
) -> HttpResult<Json<Vec<OrganizationDetails>>> {
    Ok(Json(
        query::by_activity(state.db.as_ref(), activity_id).await?,
    ))
}

async fn by_activity_tree(
    State(state): State<AppState>,
    Path(activity_id): Path<i32>,
) -> HttpResult<Json<Vec<OrganizationDetails>>> {
    Ok(Json(
        query::by_activity_tree(state.db.as_ref(), activity_id).await?,
    ))
}

#[derive(Deserialize)]
struct ActivityNameParams {
    name: String,
    #[serde(default = "default_include_children")]
    include_children: bool,
}

fn default_include_children() -> bool {
    true
}

async fn by_activity_name(
    State(state): State<AppState>,
    Query(params): Query<ActivityNameParams>,
) -> HttpResult<Json<Vec<OrganizationDetails>>> {
    require_name(&params.name)?;
    Ok(Json(
        query::by_activity_name(state.db.as_ref(), &params.name, params.include_children).await?,
    ))
}

#[derive(Deserialize)]
struct NameParams {
    name: String,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> HttpResult<Json<Vec<OrganizationDetails>>> {
    require_name(&params.name)?;
    Ok(Json(
        query::search_by_name(state.db.as_ref(), &params.name).await?,
    ))
}

#[derive(Deserialize)]
struct NearParams {
    lat: f64,
    lon: f64,
    radius_km: f64,
}

async fn near(
    State(state): State<AppState>,
    Query(params): Query<NearParams>,
) -> HttpResult<Json<Vec<OrganizationDetails>>> {
    Ok(Json(
        query::near(state.db.as_ref(), params.lat, params.lon, params.radius_km).await?,
    ))
}

#[derive(Deserialize)]
struct RectParams {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

async fn within_rect(
    State(state): State<AppState>,
    Query(params): Query<RectParams>,
) -> HttpResult<Json<Vec<OrganizationDetails>>> {
    Ok(Json(
        query::within_rect(
            state.db.as_ref(),
            params.min_lat,
            params.max_lat,
            params.min_lon,
            params.max_lon,
        )
        .await?,
    ))
}

async fn get_organization(
    State(state): State<AppState>,
    Path(organization_id): Path<i32>,
) -> HttpResult<Json<OrganizationDetails>> {
    Ok(Json(
        query::get_by_id(state.db.as_ref(), organization_id).await?,
    ))
}

fn require_name(name: &str) -> Result<(), HttpError> {
    if name.trim().is_empty() {
        return Err(HttpError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "name must not be empty",
        ));
    }
    Ok(())
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_owned(),
        }
    }
}

impl From<DirectoryError> for HttpError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            DirectoryError::InvalidInput(_) | DirectoryError::InvalidHierarchy => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            DirectoryError::Db(db_err) => {
                // Full detail stays server-side, scrubbed of credentials.
                error!(
                    error = %logging::redact_text(&db_err.to_string()),
                    "store query failed"
                );
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal server error".to_owned(),
                }
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.message }))).into_response()
    }
}
