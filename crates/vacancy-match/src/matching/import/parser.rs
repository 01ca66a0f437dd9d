use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::super::domain::{
    Application, Candidate, CandidateId, CandidateProfile, CompanyId, ContactDetails,
    EducationEntry, Vacancy, VacancyId, VacancyStatus, WorkExperience,
};
use super::normalizer::{clean_cell, parse_date, parse_flag, parse_timestamp, split_list, split_pair};
use super::SnapshotImportError;

pub(crate) fn parse_candidates<R: Read>(reader: R) -> Result<Vec<Candidate>, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut candidates = Vec::new();

    for (index, record) in csv_reader.deserialize::<CandidateRow>().enumerate() {
        let row = record?;
        candidates.push(row.into_candidate(index + 2)?);
    }

    Ok(candidates)
}

pub(crate) fn parse_vacancies<R: Read>(reader: R) -> Result<Vec<Vacancy>, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut vacancies = Vec::new();

    for (index, record) in csv_reader.deserialize::<VacancyRow>().enumerate() {
        let row = record?;
        vacancies.push(row.into_vacancy(index + 2)?);
    }

    Ok(vacancies)
}

pub(crate) fn parse_applications<R: Read>(
    reader: R,
) -> Result<Vec<Application>, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut applications = Vec::new();

    for (index, record) in csv_reader.deserialize::<ApplicationRow>().enumerate() {
        let row = record?;
        let line = index + 2;
        let applied_at = parse_timestamp(&row.applied_at).ok_or_else(|| {
            SnapshotImportError::invalid_row("applications", line, "applied_at is not a date")
        })?;

        applications.push(Application {
            candidate_id: CandidateId(row.candidate_id),
            vacancy_id: VacancyId(row.vacancy_id),
            applied_at,
        });
    }

    Ok(applications)
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    id: String,
    full_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    driving_license: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    license_category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    owns_vehicle: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_pcd: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    active: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mobile: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    birth_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    about_me: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    resume_file: Option<String>,
    #[serde(default)]
    experiences: String,
    #[serde(default)]
    education: String,
    #[serde(default)]
    skills: String,
}

impl CandidateRow {
    fn into_candidate(self, line: usize) -> Result<Candidate, SnapshotImportError> {
        let id = clean_cell(&self.id).ok_or_else(|| {
            SnapshotImportError::invalid_row("candidates", line, "id is required")
        })?;

        let experiences = split_list(&self.experiences)
            .iter()
            .map(|entry| {
                let (company, role) = split_pair(entry);
                WorkExperience {
                    company,
                    role,
                    started_on: None,
                    ended_on: None,
                }
            })
            .collect();
        let education = split_list(&self.education)
            .iter()
            .map(|entry| {
                let (institution, course) = split_pair(entry);
                EducationEntry {
                    institution,
                    course,
                    level: None,
                }
            })
            .collect();

        Ok(Candidate {
            id: CandidateId(id),
            full_name: self.full_name,
            city: self.city,
            state: self.state,
            driving_license: self.driving_license.as_deref().and_then(parse_flag),
            license_category: self.license_category,
            owns_vehicle: self.owns_vehicle.as_deref().and_then(parse_flag),
            is_pcd: self.is_pcd.as_deref().and_then(parse_flag).unwrap_or(false),
            active: self.active.as_deref().and_then(parse_flag).unwrap_or(true),
            profile: CandidateProfile {
                contact: ContactDetails {
                    email: self.email,
                    phone: self.phone,
                    mobile: self.mobile,
                },
                birth_date: self.birth_date.as_deref().and_then(parse_date),
                about_me: self.about_me,
                resume_file: self.resume_file,
                experiences,
                education,
                skills: split_list(&self.skills),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct VacancyRow {
    id: String,
    company_id: String,
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(default)]
    requires_license: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    license_category: Option<String>,
    #[serde(default)]
    requires_vehicle: String,
    #[serde(default)]
    pcd_reserved: String,
    status: String,
}

impl VacancyRow {
    fn into_vacancy(self, line: usize) -> Result<Vacancy, SnapshotImportError> {
        let id = clean_cell(&self.id).ok_or_else(|| {
            SnapshotImportError::invalid_row("vacancies", line, "id is required")
        })?;
        let status = VacancyStatus::parse(&self.status).ok_or_else(|| {
            SnapshotImportError::invalid_row(
                "vacancies",
                line,
                format!("unknown status '{}'", self.status),
            )
        })?;

        Ok(Vacancy {
            id: VacancyId(id),
            company_id: CompanyId(self.company_id),
            title: self.title,
            city: self.city,
            state: self.state,
            requires_license: requirement_flag(line, "requires_license", &self.requires_license)?,
            required_license_category: self.license_category,
            requires_vehicle: requirement_flag(line, "requires_vehicle", &self.requires_vehicle)?,
            pcd_reserved: requirement_flag(line, "pcd_reserved", &self.pcd_reserved)?,
            status,
        })
    }
}

/// A blank cell means the vacancy does not require it; anything unreadable rejects the row.
fn requirement_flag(
    line: usize,
    column: &str,
    value: &str,
) -> Result<bool, SnapshotImportError> {
    let Some(cell) = clean_cell(value) else {
        return Ok(false);
    };
    parse_flag(&cell).ok_or_else(|| {
        SnapshotImportError::invalid_row(
            "vacancies",
            line,
            format!("{} must be yes or no, got '{}'", column, cell),
        )
    })
}

#[derive(Debug, Deserialize)]
struct ApplicationRow {
    candidate_id: String,
    vacancy_id: String,
    applied_at: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(clean_cell))
}
