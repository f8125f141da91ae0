use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::JobPositionId;
use super::repository::{CatalogRepository, RepositoryError, ResultStore};
use super::service::{BulkMatrixRequest, ProfileMatchingService, ServiceError};

/// Router exposing the calculation endpoints consumed by the admin frontend.
pub fn calculation_router<C, S>(service: Arc<ProfileMatchingService<C, S>>) -> Router
where
    C: CatalogRepository + 'static,
    S: ResultStore + 'static,
{
    Router::new()
        .route(
            "/api/perhitungan/form/:pekerjaan_id",
            get(form_handler::<C, S>),
        )
        .route(
            "/api/perhitungan/bulk-input-matrix",
            post(bulk_input_handler::<C, S>),
        )
        .route(
            "/api/perhitungan/ranking/detail/:pekerjaan_id",
            get(ranking_detail_handler::<C, S>),
        )
        .route(
            "/api/pekerjaan/:pekerjaan_id",
            delete(retire_handler::<C, S>),
        )
        .with_state(service)
}

pub(crate) async fn form_handler<C, S>(
    State(service): State<Arc<ProfileMatchingService<C, S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: ResultStore + 'static,
{
    match service.form(&JobPositionId(job_id)) {
        Ok(form) => success(StatusCode::OK, "Form perhitungan berhasil dimuat", form),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn bulk_input_handler<C, S>(
    State(service): State<Arc<ProfileMatchingService<C, S>>>,
    payload: Result<Json<BulkMatrixRequest>, JsonRejection>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: ResultStore + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()),
    };

    // Scoring is CPU-bound and synchronous; keep it off the async workers.
    let calculation = tokio::task::spawn_blocking(move || service.bulk_input_matrix(request));
    match calculation.await {
        Ok(Ok(result)) => success(
            StatusCode::OK,
            "Perhitungan profile matching berhasil",
            result,
        ),
        Ok(Err(error)) => service_failure(error),
        Err(join_error) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("calculation task failed: {join_error}"),
        ),
    }
}

pub(crate) async fn ranking_detail_handler<C, S>(
    State(service): State<Arc<ProfileMatchingService<C, S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: ResultStore + 'static,
{
    match service.ranking_detail(&JobPositionId(job_id)) {
        Ok(result) => success(StatusCode::OK, "Detail ranking berhasil dimuat", result),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn retire_handler<C, S>(
    State(service): State<Arc<ProfileMatchingService<C, S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: ResultStore + 'static,
{
    let id = JobPositionId(job_id);
    match service.retire_job_position(&id) {
        Ok(()) => success(
            StatusCode::OK,
            "Pekerjaan berhasil dihapus",
            json!({ "id": id }),
        ),
        Err(error) => service_failure(error),
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    success: bool,
    message: &'a str,
    data: T,
}

fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    let payload = Envelope {
        success: true,
        message,
        data,
    };
    (status, Json(payload)).into_response()
}

fn failure(status: StatusCode, error: String) -> Response {
    let payload = json!({
        "success": false,
        "error": error,
    });
    (status, Json(payload)).into_response()
}

fn service_failure(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::JobPositionNotFound(_)
        | ServiceError::NoCalculation(_)
        | ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::JobPositionInUse(_) => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    failure(status, error.to_string())
}
