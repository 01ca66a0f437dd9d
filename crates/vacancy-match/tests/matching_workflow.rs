use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use vacancy_match::matching::{
    matching_router, Candidate, CandidateId, CandidatePool, MatchingConfig, MatchingErrorKind,
    MatchingService, PortalSnapshot, RepositoryError, SnapshotImporter, Tier, Vacancy,
    VacancyDirectory, VacancyId,
};

struct SnapshotStore(PortalSnapshot);

impl CandidatePool for SnapshotStore {
    fn active_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(self
            .0
            .candidates
            .iter()
            .filter(|candidate| candidate.active)
            .cloned()
            .collect())
    }

    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self.0.candidates.iter().find(|c| &c.id == id).cloned())
    }
}

impl VacancyDirectory for SnapshotStore {
    fn vacancy(&self, id: &VacancyId) -> Result<Option<Vacancy>, RepositoryError> {
        Ok(self.0.vacancies.iter().find(|v| &v.id == id).cloned())
    }

    fn applicants(&self, vacancy_id: &VacancyId) -> Result<HashSet<CandidateId>, RepositoryError> {
        Ok(self
            .0
            .applications
            .iter()
            .filter(|application| &application.vacancy_id == vacancy_id)
            .map(|application| application.candidate_id.clone())
            .collect())
    }
}

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/portal")
}

fn service() -> Arc<MatchingService<SnapshotStore, SnapshotStore>> {
    let snapshot = SnapshotImporter::from_dir(fixture_dir()).expect("fixture snapshot imports");
    let store = Arc::new(SnapshotStore(snapshot));
    Arc::new(
        MatchingService::new(store.clone(), store, MatchingConfig::default())
            .expect("default config is valid"),
    )
}

#[test]
fn fixture_snapshot_imports_every_file() {
    let snapshot = SnapshotImporter::from_dir(fixture_dir()).expect("fixture snapshot imports");
    assert_eq!(snapshot.candidates.len(), 5);
    assert_eq!(snapshot.vacancies.len(), 3);
    assert_eq!(snapshot.applications.len(), 2);
    assert_eq!(snapshot.candidates[4].city.as_deref(), Some("campo grande"));
}

#[tokio::test]
async fn driver_vacancy_ranks_the_local_category_b_holder_first() {
    let result = service()
        .match_candidates("vac-100", Some(10))
        .await
        .expect("vacancy is open");

    assert_eq!(result.evaluated, 4);
    let ranked: Vec<(&str, u8, Tier, bool)> = result
        .matches
        .iter()
        .map(|m| (m.candidate_id.0.as_str(), m.score, m.tier, m.already_applied))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("c-001", 100, Tier::Excellent, false),
            ("c-005", 75, Tier::VeryGood, false),
            ("c-003", 67, Tier::Good, true),
            ("c-002", 0, Tier::Low, false),
        ]
    );
}

#[tokio::test]
async fn pcd_reserved_vacancy_prefers_pcd_candidates_without_excluding_others() {
    let result = service()
        .match_candidates("vac-200", None)
        .await
        .expect("vacancy is open");

    let ids: Vec<&str> = result
        .matches
        .iter()
        .map(|m| m.candidate_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["c-002", "c-001", "c-003", "c-005"]);
    assert_eq!(result.matches[0].score, 77);
    assert!(result.matches[0].already_applied);
    assert_eq!(result.matches[1].score, result.matches[2].score);
}

#[tokio::test]
async fn closed_vacancy_is_rejected() {
    let error = service()
        .match_candidates("vac-300", None)
        .await
        .expect_err("vacancy is closed");
    assert_eq!(error.kind(), MatchingErrorKind::VacancyNotMatchable);
}

#[tokio::test]
async fn router_serves_rankings_and_completeness() {
    let router = matching_router(service());

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/vacancies/vac-100/matching?limit=1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["matches"][0]["candidate_id"], "c-001");
    assert_eq!(payload["matches"].as_array().map(Vec::len), Some(1));

    let response = router
        .oneshot(
            Request::get("/api/v1/candidates/c-002/completeness")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["percentage"], 55);
}
