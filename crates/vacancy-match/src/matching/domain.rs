use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for published vacancies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VacancyId(pub String);

/// Identifier of the company owning a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for VacancyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate record as kept by the registration and profile subsystems.
///
/// Location, licence and vehicle data are optional on purpose: partially filled profiles are
/// the norm and must still be rankable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub full_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub driving_license: Option<bool>,
    pub license_category: Option<String>,
    pub owns_vehicle: Option<bool>,
    pub is_pcd: bool,
    pub active: bool,
    pub profile: CandidateProfile,
}

impl Candidate {
    /// Licence categories the candidate holds, or `None` when they hold no licence.
    ///
    /// An explicit `false` flag wins over a stray category code; an unset flag with a
    /// parseable code counts as holding that licence.
    pub fn held_license(&self) -> Option<LicenseCategories> {
        let parsed = self
            .license_category
            .as_deref()
            .and_then(LicenseCategories::parse);

        match self.driving_license {
            Some(false) => None,
            Some(true) => Some(parsed.unwrap_or_default()),
            None => parsed,
        }
    }

    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            full_name: self.full_name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            email: self.profile.contact.email.clone(),
            phone: self
                .profile
                .contact
                .mobile
                .clone()
                .or_else(|| self.profile.contact.phone.clone()),
        }
    }
}

/// Free-form profile sections, used only to compute completeness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub contact: ContactDetails,
    pub birth_date: Option<NaiveDate>,
    pub about_me: Option<String>,
    pub resume_file: Option<String>,
    pub experiences: Vec<WorkExperience>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub role: String,
    pub started_on: Option<NaiveDate>,
    pub ended_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub course: String,
    pub level: Option<String>,
}

/// Display fields a recruiter needs to act on a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub full_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Vacancy record published by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: VacancyId,
    pub company_id: CompanyId,
    pub title: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub requires_license: bool,
    pub required_license_category: Option<String>,
    pub requires_vehicle: bool,
    pub pcd_reserved: bool,
    pub status: VacancyStatus,
}

impl Vacancy {
    pub fn is_matchable(&self) -> bool {
        self.status == VacancyStatus::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyStatus {
    Open,
    Paused,
    Closed,
    Inactive,
}

impl VacancyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VacancyStatus::Open => "open",
            VacancyStatus::Paused => "paused",
            VacancyStatus::Closed => "closed",
            VacancyStatus::Inactive => "inactive",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" | "aberta" => Some(Self::Open),
            "paused" | "pausada" => Some(Self::Paused),
            "closed" | "fechada" | "encerrada" => Some(Self::Closed),
            "inactive" | "inativa" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Existing application of a candidate to a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub candidate_id: CandidateId,
    pub vacancy_id: VacancyId,
    pub applied_at: DateTime<Utc>,
}

/// CNH category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LicenseCategory {
    A,
    B,
    C,
    D,
    E,
}

impl LicenseCategory {
    fn from_char(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            _ => None,
        }
    }

    pub const fn code(self) -> char {
        match self {
            LicenseCategory::A => 'A',
            LicenseCategory::B => 'B',
            LicenseCategory::C => 'C',
            LicenseCategory::D => 'D',
            LicenseCategory::E => 'E',
        }
    }
}

/// Set of CNH categories, parsed from combined codes such as `"AB"` or `"A/D"`.
///
/// Categories are compared as sets only. There is no implied ordering between them, so a
/// holder of `D` does not satisfy a `B` requirement unless `B` is also held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseCategories(BTreeSet<LicenseCategory>);

impl LicenseCategories {
    /// Returns `None` for blank codes or codes containing anything but categories and separators.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut categories = BTreeSet::new();
        for code in raw.chars() {
            if code.is_whitespace() || matches!(code, '/' | ',' | '+' | '-') {
                continue;
            }
            categories.insert(LicenseCategory::from_char(code)?);
        }

        if categories.is_empty() {
            None
        } else {
            Some(Self(categories))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn satisfies(&self, required: &LicenseCategories) -> bool {
        !self.0.is_empty() && self.0.is_superset(&required.0)
    }

    pub fn code(&self) -> String {
        self.0.iter().map(|category| category.code()).collect()
    }
}
