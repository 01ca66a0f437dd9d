use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::matching::domain::{
    Application, Candidate, CandidateId, CandidateProfile, CompanyId, ContactDetails,
    EducationEntry, Vacancy, VacancyId, VacancyStatus, WorkExperience,
};
use crate::matching::evaluation::{CandidateEvaluator, MatchingConfig};
use crate::matching::ranking::RankingEngine;
use crate::matching::repository::{CandidatePool, RepositoryError, VacancyDirectory};
use crate::matching::service::MatchingService;

pub(super) const VACANCY_ID: &str = "vac-001";

pub(super) fn matching_config() -> MatchingConfig {
    MatchingConfig {
        workers: Some(3),
        ..MatchingConfig::default()
    }
}

pub(super) fn evaluator() -> CandidateEvaluator {
    CandidateEvaluator::new(&matching_config())
}

/// Open driver vacancy in Campo Grande requiring a category B licence.
pub(super) fn vacancy() -> Vacancy {
    Vacancy {
        id: VacancyId(VACANCY_ID.to_string()),
        company_id: CompanyId("co-010".to_string()),
        title: "Motorista entregador".to_string(),
        city: Some("Campo Grande".to_string()),
        state: Some("MS".to_string()),
        requires_license: true,
        required_license_category: Some("B".to_string()),
        requires_vehicle: false,
        pcd_reserved: false,
        status: VacancyStatus::Open,
    }
}

pub(super) fn vacancy_with(id: &str, status: VacancyStatus) -> Vacancy {
    Vacancy {
        id: VacancyId(id.to_string()),
        status,
        ..vacancy()
    }
}

/// Fully filled profile: 100% complete, category B, local, owns a car.
pub(super) fn candidate(id: &str) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        full_name: format!("Candidate {id}"),
        city: Some("Campo Grande".to_string()),
        state: Some("MS".to_string()),
        driving_license: Some(true),
        license_category: Some("B".to_string()),
        owns_vehicle: Some(true),
        is_pcd: false,
        active: true,
        profile: CandidateProfile {
            contact: ContactDetails {
                email: Some(format!("{id}@example.com")),
                phone: None,
                mobile: Some("67999990000".to_string()),
            },
            birth_date: NaiveDate::from_ymd_opt(1992, 5, 14),
            about_me: Some("Motorista com experiência em entregas urbanas".to_string()),
            resume_file: Some(format!("resumes/{id}.pdf")),
            experiences: vec![WorkExperience {
                company: "Transportes Pantanal".to_string(),
                role: "Entregador".to_string(),
                started_on: NaiveDate::from_ymd_opt(2019, 2, 1),
                ended_on: None,
            }],
            education: vec![EducationEntry {
                institution: "Escola Estadual Lúcia Martins".to_string(),
                course: "Ensino médio".to_string(),
                level: Some("secondary".to_string()),
            }],
            skills: vec![
                "Direção defensiva".to_string(),
                "Atendimento".to_string(),
                "Roteirização".to_string(),
            ],
        },
    }
}

/// 85% complete: everything but skills.
pub(super) fn strong_candidate(id: &str) -> Candidate {
    let mut candidate = candidate(id);
    candidate.profile.skills.clear();
    candidate
}

/// No licence, lives elsewhere, 23% complete profile.
pub(super) fn weak_candidate(id: &str) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        full_name: format!("Candidate {id}"),
        city: Some("Dourados".to_string()),
        state: None,
        driving_license: Some(false),
        license_category: None,
        owns_vehicle: None,
        is_pcd: false,
        active: true,
        profile: CandidateProfile {
            contact: ContactDetails {
                email: Some(format!("{id}@example.com")),
                phone: Some("6733334444".to_string()),
                mobile: None,
            },
            ..CandidateProfile::default()
        },
    }
}

pub(super) fn application(candidate_id: &str, vacancy_id: &str) -> Application {
    Application {
        candidate_id: CandidateId(candidate_id.to_string()),
        vacancy_id: VacancyId(vacancy_id.to_string()),
        applied_at: Utc
            .with_ymd_and_hms(2025, 6, 2, 14, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[derive(Default)]
pub(super) struct MemoryCandidates {
    pub(super) candidates: Vec<Candidate>,
    pub(super) bulk_reads: AtomicUsize,
}

impl MemoryCandidates {
    pub(super) fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            bulk_reads: AtomicUsize::new(0),
        }
    }
}

impl CandidatePool for MemoryCandidates {
    fn active_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        self.bulk_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .candidates
            .iter()
            .filter(|candidate| candidate.active)
            .cloned()
            .collect())
    }

    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self
            .candidates
            .iter()
            .find(|candidate| &candidate.id == id)
            .cloned())
    }
}

/// Hands back every row, inactive and duplicated ones included.
pub(super) struct RawCandidates(pub(super) Vec<Candidate>);

impl CandidatePool for RawCandidates {
    fn active_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(self.0.clone())
    }

    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self.0.iter().find(|candidate| &candidate.id == id).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryVacancies {
    pub(super) vacancies: HashMap<VacancyId, Vacancy>,
    pub(super) applications: Vec<Application>,
    pub(super) applicant_reads: AtomicUsize,
}

impl MemoryVacancies {
    pub(super) fn new(vacancies: Vec<Vacancy>, applications: Vec<Application>) -> Self {
        Self {
            vacancies: vacancies
                .into_iter()
                .map(|vacancy| (vacancy.id.clone(), vacancy))
                .collect(),
            applications,
            applicant_reads: AtomicUsize::new(0),
        }
    }
}

impl VacancyDirectory for MemoryVacancies {
    fn vacancy(&self, id: &VacancyId) -> Result<Option<Vacancy>, RepositoryError> {
        Ok(self.vacancies.get(id).cloned())
    }

    fn applicants(&self, vacancy_id: &VacancyId) -> Result<HashSet<CandidateId>, RepositoryError> {
        self.applicant_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .applications
            .iter()
            .filter(|application| &application.vacancy_id == vacancy_id)
            .map(|application| application.candidate_id.clone())
            .collect())
    }
}

pub(super) struct UnavailableStore;

impl CandidatePool for UnavailableStore {
    fn active_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn candidate(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Candidate source that stalls long enough to blow any test deadline.
pub(super) struct SlowCandidates {
    pub(super) delay: Duration,
    pub(super) candidates: Vec<Candidate>,
}

impl CandidatePool for SlowCandidates {
    fn active_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        std::thread::sleep(self.delay);
        Ok(self.candidates.clone())
    }

    fn candidate(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(None)
    }
}

pub(super) fn directory(applications: Vec<Application>) -> MemoryVacancies {
    MemoryVacancies::new(
        vec![
            vacancy(),
            vacancy_with("vac-closed", VacancyStatus::Closed),
            vacancy_with("vac-paused", VacancyStatus::Paused),
        ],
        applications,
    )
}

pub(super) fn engine_for(
    candidates: Vec<Candidate>,
    applications: Vec<Application>,
) -> (
    RankingEngine<MemoryCandidates, MemoryVacancies>,
    Arc<MemoryCandidates>,
    Arc<MemoryVacancies>,
) {
    let pool = Arc::new(MemoryCandidates::new(candidates));
    let vacancies = Arc::new(directory(applications));
    let engine = RankingEngine::new(pool.clone(), vacancies.clone(), &matching_config());
    (engine, pool, vacancies)
}

pub(super) fn service_for(
    candidates: Vec<Candidate>,
    applications: Vec<Application>,
) -> MatchingService<MemoryCandidates, MemoryVacancies> {
    MatchingService::new(
        Arc::new(MemoryCandidates::new(candidates)),
        Arc::new(directory(applications)),
        matching_config(),
    )
    .expect("valid matching config")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
