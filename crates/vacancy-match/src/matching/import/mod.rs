//! CSV snapshot import for the candidate, vacancy and application exports of the portal.

mod normalizer;
mod parser;

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::domain::{Application, Candidate, Vacancy};

const CANDIDATES_FILE: &str = "candidates.csv";
const VACANCIES_FILE: &str = "vacancies.csv";
const APPLICATIONS_FILE: &str = "applications.csv";

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow {
        file: &'static str,
        line: usize,
        reason: String,
    },
}

impl SnapshotImportError {
    pub(crate) fn invalid_row(file: &'static str, line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            file,
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read snapshot export: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid snapshot CSV data: {}", err),
            SnapshotImportError::InvalidRow { file, line, reason } => {
                write!(f, "{} line {}: {}", file, line, reason)
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Point-in-time copy of the records the matching engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortalSnapshot {
    pub candidates: Vec<Candidate>,
    pub vacancies: Vec<Vacancy>,
    pub applications: Vec<Application>,
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    /// Reads `candidates.csv`, `vacancies.csv` and the optional `applications.csv` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<PortalSnapshot, SnapshotImportError> {
        let dir = dir.as_ref();
        let candidates = Self::candidates_from_reader(std::fs::File::open(dir.join(CANDIDATES_FILE))?)?;
        let vacancies = Self::vacancies_from_reader(std::fs::File::open(dir.join(VACANCIES_FILE))?)?;

        let applications_path = dir.join(APPLICATIONS_FILE);
        let applications = if applications_path.exists() {
            Self::applications_from_reader(std::fs::File::open(applications_path)?)?
        } else {
            Vec::new()
        };

        Ok(PortalSnapshot {
            candidates,
            vacancies,
            applications,
        })
    }

    pub fn candidates_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<Candidate>, SnapshotImportError> {
        parser::parse_candidates(reader)
    }

    pub fn vacancies_from_reader<R: Read>(reader: R) -> Result<Vec<Vacancy>, SnapshotImportError> {
        parser::parse_vacancies(reader)
    }

    pub fn applications_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<Application>, SnapshotImportError> {
        parser::parse_applications(reader)
    }
}
