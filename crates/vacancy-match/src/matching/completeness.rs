//! Profile completeness scoring shared by the matching engine and the profile UI.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::Candidate;

const BASIC_FIELDS_POINTS: u32 = 40;
const RESUME_POINTS: u32 = 15;
const EXPERIENCE_POINTS: u32 = 15;
const EDUCATION_POINTS: u32 = 15;
const SKILLS_POINTS: u32 = 15;
const MINIMUM_SKILLS: usize = 3;
const BASIC_FIELD_COUNT: u32 = 7;

/// Profile sections contributing to completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    BasicFields,
    Resume,
    Experience,
    Education,
    Skills,
}

impl ProfileSection {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::BasicFields,
            Self::Resume,
            Self::Experience,
            Self::Education,
            Self::Skills,
        ]
    }

    pub const fn allotment(self) -> u32 {
        match self {
            Self::BasicFields => BASIC_FIELDS_POINTS,
            Self::Resume => RESUME_POINTS,
            Self::Experience => EXPERIENCE_POINTS,
            Self::Education => EDUCATION_POINTS,
            Self::Skills => SKILLS_POINTS,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BasicFields => "Basic & contact details",
            Self::Resume => "Résumé",
            Self::Experience => "Work experience",
            Self::Education => "Education",
            Self::Skills => "Skills",
        }
    }
}

/// Points earned by one profile section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScore {
    pub section: ProfileSection,
    pub label: &'static str,
    pub earned: f32,
    pub allotted: u32,
}

/// Completeness percentage with the per-section trail the profile UI renders as hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    pub percentage: u8,
    pub sections: Vec<SectionScore>,
    pub missing: Vec<ProfileSection>,
}

/// Stateless scorer; the same candidate always yields the same figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessScorer;

impl CompletenessScorer {
    pub fn score(&self, candidate: &Candidate) -> u8 {
        let tenths: u32 = ProfileSection::ordered()
            .into_iter()
            .map(|section| earned_tenths(candidate, section))
            .sum();
        round_tenths(tenths)
    }

    pub fn report(&self, candidate: &Candidate) -> CompletenessReport {
        let mut sections = Vec::with_capacity(5);
        let mut missing = Vec::new();
        let mut tenths = 0;

        for section in ProfileSection::ordered() {
            let earned = earned_tenths(candidate, section);
            if earned < section.allotment() * 10 {
                missing.push(section);
            }
            tenths += earned;
            sections.push(SectionScore {
                section,
                label: section.label(),
                earned: earned as f32 / 10.0,
                allotted: section.allotment(),
            });
        }

        CompletenessReport {
            percentage: round_tenths(tenths),
            sections,
            missing,
        }
    }
}

// Works in tenths of a point so the proportional basic-fields share stays exact enough to
// round once at the end.
fn earned_tenths(candidate: &Candidate, section: ProfileSection) -> u32 {
    let profile = &candidate.profile;
    let full = section.allotment() * 10;

    match section {
        ProfileSection::BasicFields => {
            let filled = filled_basic_fields(candidate);
            (full * filled + BASIC_FIELD_COUNT / 2) / BASIC_FIELD_COUNT
        }
        ProfileSection::Resume => award(full, is_filled(profile.resume_file.as_deref())),
        ProfileSection::Experience => award(full, !profile.experiences.is_empty()),
        ProfileSection::Education => award(full, !profile.education.is_empty()),
        ProfileSection::Skills => {
            let distinct: BTreeSet<String> = profile
                .skills
                .iter()
                .map(|skill| skill.trim().to_lowercase())
                .filter(|skill| !skill.is_empty())
                .collect();
            award(full, distinct.len() >= MINIMUM_SKILLS)
        }
    }
}

fn filled_basic_fields(candidate: &Candidate) -> u32 {
    let profile = &candidate.profile;
    let has_phone = is_filled(profile.contact.phone.as_deref())
        || is_filled(profile.contact.mobile.as_deref());

    [
        is_filled(Some(candidate.full_name.as_str())),
        is_filled(profile.contact.email.as_deref()),
        has_phone,
        is_filled(candidate.city.as_deref()),
        is_filled(candidate.state.as_deref()),
        profile.birth_date.is_some(),
        is_filled(profile.about_me.as_deref()),
    ]
    .into_iter()
    .filter(|filled| *filled)
    .count() as u32
}

fn award(points: u32, earned: bool) -> u32 {
    if earned {
        points
    } else {
        0
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.map(|raw| !raw.trim().is_empty()).unwrap_or(false)
}

fn round_tenths(tenths: u32) -> u8 {
    ((tenths + 5) / 10).min(100) as u8
}
