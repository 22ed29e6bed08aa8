use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use sift_domain::record::{NewRecord, Record, RecordPatch};
use sift_service::{
	BackfillReport, BackfillRequest, DeleteRecordResponse, Error, ListRecordsResponse,
	ReloadReport, SearchRequest, SearchResponse, UpdateRecordResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/records", post(create_record).get(list_records))
		.route(
			"/v1/records/{record_id}",
			get(get_record).patch(update_record).delete(delete_record),
		)
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/backfill_vectors", post(backfill_vectors))
		.route("/v1/admin/reload_index", post(reload_index))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn create_record(
	State(state): State<AppState>,
	Json(payload): Json<NewRecord>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
	let record = state.service.create_record(payload).await?;

	Ok((StatusCode::CREATED, Json(record)))
}

async fn list_records(
	State(state): State<AppState>,
) -> Result<Json<ListRecordsResponse>, ApiError> {
	let response = state.service.list_records().await?;

	Ok(Json(response))
}

async fn get_record(
	State(state): State<AppState>,
	Path(record_id): Path<i64>,
) -> Result<Json<Record>, ApiError> {
	let record = state.service.get_record(record_id).await?;

	Ok(Json(record))
}

async fn update_record(
	State(state): State<AppState>,
	Path(record_id): Path<i64>,
	Json(payload): Json<RecordPatch>,
) -> Result<Json<UpdateRecordResponse>, ApiError> {
	let response = state.service.update_record(record_id, payload).await?;

	Ok(Json(response))
}

async fn delete_record(
	State(state): State<AppState>,
	Path(record_id): Path<i64>,
) -> Result<Json<DeleteRecordResponse>, ApiError> {
	let response = state.service.delete_record(record_id).await?;

	Ok(Json(response))
}

async fn backfill_vectors(
	State(state): State<AppState>,
	payload: Option<Json<BackfillRequest>>,
) -> Result<Json<BackfillReport>, ApiError> {
	let req = payload.map(|Json(req)| req).unwrap_or_default();
	let response = state.service.backfill_vectors(req).await?;

	Ok(Json(response))
}

async fn reload_index(State(state): State<AppState>) -> Result<Json<ReloadReport>, ApiError> {
	let response = state.service.reload_lexical_index().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			Error::InvalidField { field, message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, Some(vec![field])),
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::Retrieval { message } => {
				tracing::error!(error = %message, "Similarity store unavailable.");

				ApiError::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"RETRIEVAL_FAILED",
					"Vector retrieval is unavailable.",
					None,
				)
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage error.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
					None,
				)
			},
			Error::Normalizer { message } => {
				tracing::error!(error = %message, "Normalizer error.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
