use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use vacancy_match::error::AppError;
use vacancy_match::matching::{
    Candidate, CandidateId, CandidatePool, PortalSnapshot, RepositoryError, SnapshotImporter,
    Vacancy, VacancyDirectory, VacancyId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read-only portal data held in memory, indexed for the matching lookups.
#[derive(Debug, Default)]
pub(crate) struct InMemoryPortalStore {
    candidates: Vec<Candidate>,
    vacancies: HashMap<VacancyId, Vacancy>,
    applicants: HashMap<VacancyId, HashSet<CandidateId>>,
}

impl InMemoryPortalStore {
    pub(crate) fn from_snapshot(snapshot: PortalSnapshot) -> Self {
        let mut applicants: HashMap<VacancyId, HashSet<CandidateId>> = HashMap::new();
        for application in snapshot.applications {
            applicants
                .entry(application.vacancy_id)
                .or_default()
                .insert(application.candidate_id);
        }

        Self {
            candidates: snapshot.candidates,
            vacancies: snapshot
                .vacancies
                .into_iter()
                .map(|vacancy| (vacancy.id.clone(), vacancy))
                .collect(),
            applicants,
        }
    }

    pub(crate) fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub(crate) fn vacancy_count(&self) -> usize {
        self.vacancies.len()
    }

    /// Open vacancies sorted by id, for listings.
    pub(crate) fn open_vacancies(&self) -> Vec<&Vacancy> {
        let mut open: Vec<&Vacancy> = self
            .vacancies
            .values()
            .filter(|vacancy| vacancy.is_matchable())
            .collect();
        open.sort_by(|left, right| left.id.cmp(&right.id));
        open
    }
}

impl CandidatePool for InMemoryPortalStore {
    fn active_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
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

impl VacancyDirectory for InMemoryPortalStore {
    fn vacancy(&self, id: &VacancyId) -> Result<Option<Vacancy>, RepositoryError> {
        Ok(self.vacancies.get(id).cloned())
    }

    fn applicants(&self, vacancy_id: &VacancyId) -> Result<HashSet<CandidateId>, RepositoryError> {
        Ok(self.applicants.get(vacancy_id).cloned().unwrap_or_default())
    }
}

/// Loads the CSV snapshot from `dir`, or an empty store when no directory is configured.
pub(crate) fn load_store(dir: Option<&Path>) -> Result<InMemoryPortalStore, AppError> {
    let Some(dir) = dir else {
        return Ok(InMemoryPortalStore::default());
    };

    let snapshot = SnapshotImporter::from_dir(dir)?;
    let store = InMemoryPortalStore::from_snapshot(snapshot);
    info!(
        data_dir = %dir.display(),
        candidates = store.candidate_count(),
        vacancies = store.vacancy_count(),
        "loaded portal snapshot"
    );
    Ok(store)
}
