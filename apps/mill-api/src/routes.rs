use axum::{
	Json, Router,
	extract::{Path, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use uuid::Uuid;

use mill_domain::{Permissions, Session};
use mill_service::{
	ClientInput, ClientItem, ClientListResponse, JobInput, JobItem, JobListResponse,
	ReferenceSearchRequest, ReferenceSearchResponse, SalesOrderInput, SalesOrderItem,
	SalesOrderListRequest, SalesOrderListResponse, SalesOrderStatusUpdate, ServiceError,
	ServiceOrderInput, ServiceOrderItem, ServiceOrderListRequest, ServiceOrderListResponse,
	ServiceOrderStatusUpdate,
};

use crate::state::AppState;

/// Role claim forwarded by the front door. Absent means the session has not
/// loaded; an unknown value means a loaded session with no recognized role.
/// Both derive a deny-by-default capability matrix.
const ROLE_HEADER: &str = "x-mill-role";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/permissions", get(permissions))
		.route("/v1/reference/search", post(reference_search))
		.route("/v1/clients", get(list_clients).post(create_client))
		.route("/v1/jobs", get(list_jobs).post(create_job))
		.route("/v1/orders", post(create_order))
		.route("/v1/orders/list", post(list_orders))
		.route("/v1/orders/status", post(update_order_status))
		.route("/v1/orders/{order_id}", get(get_order).delete(delete_order))
		.route("/v1/service_orders", post(create_service_order))
		.route("/v1/service_orders/list", post(list_service_orders))
		.route("/v1/service_orders/status", post(update_service_order_status))
		.route("/v1/service_orders/{service_order_id}", get(get_service_order))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/client_phase", get(client_phase)).with_state(state)
}

fn session_from(headers: &HeaderMap) -> Session {
	match headers.get(ROLE_HEADER).and_then(|value| value.to_str().ok()) {
		Some(raw) => Session::from_claims(&serde_json::json!({ "role": raw })),
		None => Session::loading(),
	}
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn permissions(headers: HeaderMap) -> Json<Permissions> {
	Json(Permissions::derive(&session_from(&headers)))
}

async fn reference_search(
	State(state): State<AppState>,
	Json(payload): Json<ReferenceSearchRequest>,
) -> Result<Json<ReferenceSearchResponse>, ApiError> {
	let response = state.service.reference_options(payload).await?;
	Ok(Json(response))
}

async fn create_client(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<ClientInput>,
) -> Result<Json<ClientItem>, ApiError> {
	let response = state.service.create_client(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn list_clients(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ClientListResponse>, ApiError> {
	let response = state.service.list_clients(&session_from(&headers)).await?;
	Ok(Json(response))
}

async fn create_job(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<JobInput>,
) -> Result<Json<JobItem>, ApiError> {
	let response = state.service.create_job(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn list_jobs(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<JobListResponse>, ApiError> {
	let response = state.service.list_jobs(&session_from(&headers)).await?;
	Ok(Json(response))
}

async fn create_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<SalesOrderInput>,
) -> Result<Json<SalesOrderItem>, ApiError> {
	let response = state.service.create_sales_order(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn list_orders(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<SalesOrderListRequest>,
) -> Result<Json<SalesOrderListResponse>, ApiError> {
	let response = state.service.list_sales_orders(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn update_order_status(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<SalesOrderStatusUpdate>,
) -> Result<Json<SalesOrderItem>, ApiError> {
	let response = state.service.update_sales_order_status(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn get_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(order_id): Path<Uuid>,
) -> Result<Json<SalesOrderItem>, ApiError> {
	let response = state.service.get_sales_order(&session_from(&headers), order_id).await?;
	Ok(Json(response))
}

async fn delete_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(order_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
	state.service.delete_sales_order(&session_from(&headers), order_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn create_service_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<ServiceOrderInput>,
) -> Result<Json<ServiceOrderItem>, ApiError> {
	let response = state.service.create_service_order(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn list_service_orders(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<ServiceOrderListRequest>,
) -> Result<Json<ServiceOrderListResponse>, ApiError> {
	let response = state.service.list_service_orders(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn update_service_order_status(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<ServiceOrderStatusUpdate>,
) -> Result<Json<ServiceOrderItem>, ApiError> {
	let response =
		state.service.update_service_order_status(&session_from(&headers), payload).await?;
	Ok(Json(response))
}

async fn get_service_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(service_order_id): Path<Uuid>,
) -> Result<Json<ServiceOrderItem>, ApiError> {
	let response =
		state.service.get_service_order(&session_from(&headers), service_order_id).await?;
	Ok(Json(response))
}

async fn client_phase(State(state): State<AppState>) -> Json<serde_json::Value> {
	Json(serde_json::json!({ "phase": state.service.gateway.phase_name() }))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: &'static str,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::PermissionDenied { .. } => (StatusCode::FORBIDDEN, "permission_denied"),
			ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
			ServiceError::ClientUnavailable { .. } => {
				(StatusCode::SERVICE_UNAVAILABLE, "client_unavailable")
			},
			ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
		};

		Self { status, error_code, message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };
		(self.status, Json(body)).into_response()
	}
}
