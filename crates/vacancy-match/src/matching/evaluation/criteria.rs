use serde::{Deserialize, Serialize};

use super::super::domain::{Candidate, LicenseCategories, Vacancy};

/// Matching dimensions. The list is closed; every variant has exactly one evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Location,
    DrivingLicense,
    Vehicle,
    Pcd,
    ProfileCompleteness,
}

impl Criterion {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Location,
            Self::DrivingLicense,
            Self::Vehicle,
            Self::Pcd,
            Self::ProfileCompleteness,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::DrivingLicense => "Driving licence (CNH)",
            Self::Vehicle => "Own vehicle",
            Self::Pcd => "PCD reservation",
            Self::ProfileCompleteness => "Profile completeness",
        }
    }

    pub fn evaluate(self, context: &EvaluationContext<'_>) -> CriterionResult {
        match self {
            Self::Location => evaluate_location(context.candidate, context.vacancy),
            Self::DrivingLicense => evaluate_driving_license(context.candidate, context.vacancy),
            Self::Vehicle => evaluate_vehicle(context.candidate, context.vacancy),
            Self::Pcd => evaluate_pcd(context.candidate, context.vacancy),
            Self::ProfileCompleteness => {
                evaluate_completeness(context.completeness, context.completeness_threshold)
            }
        }
    }
}

/// Inputs shared by every evaluator for one candidate/vacancy pair.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub candidate: &'a Candidate,
    pub vacancy: &'a Vacancy,
    pub completeness: u8,
    pub completeness_threshold: u8,
}

/// Outcome of one criterion. Inapplicable criteria always report `matched == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    pub applicable: bool,
    pub matched: bool,
    pub detail: CriterionDetail,
}

/// Raw values behind a criterion result, kept for recruiter-facing transparency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionDetail {
    Location {
        candidate_city: Option<String>,
        candidate_state: Option<String>,
        vacancy_city: Option<String>,
        vacancy_state: Option<String>,
    },
    DrivingLicense {
        holds_license: bool,
        candidate_category: Option<String>,
        required_category: Option<String>,
    },
    Vehicle {
        owns_vehicle: Option<bool>,
    },
    Pcd {
        candidate_is_pcd: bool,
    },
    ProfileCompleteness {
        percentage: u8,
        threshold: u8,
    },
}

pub fn evaluate_location(candidate: &Candidate, vacancy: &Vacancy) -> CriterionResult {
    let detail = CriterionDetail::Location {
        candidate_city: candidate.city.clone(),
        candidate_state: candidate.state.clone(),
        vacancy_city: vacancy.city.clone(),
        vacancy_state: vacancy.state.clone(),
    };

    match (
        normalize_city(candidate.city.as_deref()),
        normalize_city(vacancy.city.as_deref()),
    ) {
        (Some(candidate_city), Some(vacancy_city)) => CriterionResult {
            criterion: Criterion::Location,
            applicable: true,
            matched: candidate_city == vacancy_city,
            detail,
        },
        _ => inapplicable(Criterion::Location, detail),
    }
}

pub fn evaluate_driving_license(candidate: &Candidate, vacancy: &Vacancy) -> CriterionResult {
    let held = candidate.held_license();
    let detail = CriterionDetail::DrivingLicense {
        holds_license: held.is_some(),
        candidate_category: held
            .as_ref()
            .filter(|categories| !categories.is_empty())
            .map(LicenseCategories::code),
        required_category: vacancy.required_license_category.clone(),
    };

    if !vacancy.requires_license {
        return inapplicable(Criterion::DrivingLicense, detail);
    }

    // An unreadable required code degrades to "any licence will do".
    let required = vacancy
        .required_license_category
        .as_deref()
        .and_then(LicenseCategories::parse);

    let matched = match (&held, &required) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(categories), Some(required)) => categories.satisfies(required),
    };

    CriterionResult {
        criterion: Criterion::DrivingLicense,
        applicable: true,
        matched,
        detail,
    }
}

pub fn evaluate_vehicle(candidate: &Candidate, vacancy: &Vacancy) -> CriterionResult {
    let detail = CriterionDetail::Vehicle {
        owns_vehicle: candidate.owns_vehicle,
    };

    if !vacancy.requires_vehicle {
        return inapplicable(Criterion::Vehicle, detail);
    }

    CriterionResult {
        criterion: Criterion::Vehicle,
        applicable: true,
        matched: candidate.owns_vehicle == Some(true),
        detail,
    }
}

pub fn evaluate_pcd(candidate: &Candidate, vacancy: &Vacancy) -> CriterionResult {
    let detail = CriterionDetail::Pcd {
        candidate_is_pcd: candidate.is_pcd,
    };

    if !vacancy.pcd_reserved {
        return inapplicable(Criterion::Pcd, detail);
    }

    CriterionResult {
        criterion: Criterion::Pcd,
        applicable: true,
        matched: candidate.is_pcd,
        detail,
    }
}

pub fn evaluate_completeness(percentage: u8, threshold: u8) -> CriterionResult {
    CriterionResult {
        criterion: Criterion::ProfileCompleteness,
        applicable: true,
        matched: percentage >= threshold,
        detail: CriterionDetail::ProfileCompleteness {
            percentage,
            threshold,
        },
    }
}

fn inapplicable(criterion: Criterion, detail: CriterionDetail) -> CriterionResult {
    CriterionResult {
        criterion,
        applicable: false,
        matched: false,
        detail,
    }
}

/// Trimmed, whitespace-collapsed, case-folded city name; `None` when blank.
pub(crate) fn normalize_city(raw: Option<&str>) -> Option<String> {
    let collapsed = raw?.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.to_lowercase())
    }
}
