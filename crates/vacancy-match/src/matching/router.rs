use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{CandidatePool, VacancyDirectory};
use super::service::{MatchingError, MatchingErrorKind, MatchingService};

/// Router builder exposing the matching and completeness endpoints.
pub fn matching_router<C, V>(service: Arc<MatchingService<C, V>>) -> Router
where
    C: CandidatePool + 'static,
    V: VacancyDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/vacancies/:vacancy_id/matching",
            get(matching_handler::<C, V>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/completeness",
            get(completeness_handler::<C, V>),
        )
        .with_state(service)
}

/// Raw query parameters; `limit` is parsed by the handler.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MatchingQuery {
    #[serde(default)]
    pub(crate) limit: Option<String>,
}

impl MatchingQuery {
    /// A blank `limit=` reads as absent.
    pub(crate) fn limit(&self) -> Result<Option<i64>, MatchingError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| MatchingError::MalformedLimit(raw.to_string())),
        }
    }
}

pub(crate) async fn matching_handler<C, V>(
    State(service): State<Arc<MatchingService<C, V>>>,
    Path(vacancy_id): Path<String>,
    Query(query): Query<MatchingQuery>,
) -> Response
where
    C: CandidatePool + 'static,
    V: VacancyDirectory + 'static,
{
    let limit = match query.limit() {
        Ok(limit) => limit,
        Err(error) => return error_response(&error),
    };

    match service.match_candidates(&vacancy_id, limit).await {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn completeness_handler<C, V>(
    State(service): State<Arc<MatchingService<C, V>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidatePool + 'static,
    V: VacancyDirectory + 'static,
{
    match service.profile_completeness(&candidate_id) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) fn status_for(kind: MatchingErrorKind) -> StatusCode {
    match kind {
        MatchingErrorKind::InvalidLimit | MatchingErrorKind::InvalidVacancyId => {
            StatusCode::BAD_REQUEST
        }
        MatchingErrorKind::VacancyNotFound | MatchingErrorKind::CandidateNotFound => {
            StatusCode::NOT_FOUND
        }
        MatchingErrorKind::VacancyNotMatchable => StatusCode::CONFLICT,
        MatchingErrorKind::DataSourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        MatchingErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

pub(crate) fn error_response(error: &MatchingError) -> Response {
    let kind = error.kind();
    let payload = json!({
        "error": {
            "kind": kind.as_str(),
            "message": error.to_string(),
            "retryable": kind.is_retryable(),
        }
    });
    (status_for(kind), axum::Json(payload)).into_response()
}
