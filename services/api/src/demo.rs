use crate::infra::{load_store, InMemoryPortalStore};
use chrono::SecondsFormat;
use clap::Args;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use vacancy_match::config::{load_matching_config, AppConfig};
use vacancy_match::error::AppError;
use vacancy_match::matching::{
    MatchingService, PortalSnapshot, RankedResult, SnapshotImporter,
};

const SAMPLE_CANDIDATES: &str =
    include_str!("../../../crates/vacancy-match/fixtures/portal/candidates.csv");
const SAMPLE_VACANCIES: &str =
    include_str!("../../../crates/vacancy-match/fixtures/portal/vacancies.csv");
const SAMPLE_APPLICATIONS: &str =
    include_str!("../../../crates/vacancy-match/fixtures/portal/applications.csv");

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Vacancy identifier to rank candidates for
    pub(crate) vacancy: String,
    /// Maximum number of candidates to return (defaults to the configured default)
    #[arg(long)]
    pub(crate) limit: Option<i64>,
    /// Directory holding the CSV snapshot (defaults to MATCH_DATA_DIR, then the sample data)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print the raw JSON payload instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of candidates shown per vacancy
    #[arg(long, default_value_t = 3)]
    pub(crate) limit: i64,
    /// Print the per-criterion breakdown of every listed candidate
    #[arg(long)]
    pub(crate) explain: bool,
}

/// Sample portal data bundled with the binary.
pub(crate) fn demo_snapshot() -> Result<PortalSnapshot, AppError> {
    Ok(PortalSnapshot {
        candidates: SnapshotImporter::candidates_from_reader(Cursor::new(SAMPLE_CANDIDATES))?,
        vacancies: SnapshotImporter::vacancies_from_reader(Cursor::new(SAMPLE_VACANCIES))?,
        applications: SnapshotImporter::applications_from_reader(Cursor::new(
            SAMPLE_APPLICATIONS,
        ))?,
    })
}

pub(crate) async fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        vacancy,
        limit,
        data_dir,
        json,
    } = args;

    let config = AppConfig::load()?;
    let store = match data_dir.or(config.snapshot_dir) {
        Some(dir) => load_store(Some(&dir))?,
        None => InMemoryPortalStore::from_snapshot(demo_snapshot()?),
    };
    let store = Arc::new(store);
    let service = MatchingService::new(store.clone(), store, config.matching)?;

    let result = service.match_candidates(&vacancy, limit).await?;
    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(payload) => println!("{}", payload),
            Err(err) => println!("Ranking payload unavailable: {}", err),
        }
    } else {
        render_ranking(&result, false);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { limit, explain } = args;

    let store = Arc::new(InMemoryPortalStore::from_snapshot(demo_snapshot()?));
    let vacancies: Vec<(String, String)> = store
        .open_vacancies()
        .into_iter()
        .map(|vacancy| (vacancy.id.0.clone(), vacancy.title.clone()))
        .collect();
    let service = MatchingService::new(store.clone(), store.clone(), load_matching_config()?)?;

    println!("Vacancy matching demo");
    println!(
        "- Sample portal: {} candidates, {} vacancies ({} open)",
        store.candidate_count(),
        store.vacancy_count(),
        vacancies.len()
    );

    for (vacancy_id, title) in &vacancies {
        println!("\n{} ({})", title, vacancy_id);
        match service.match_candidates(vacancy_id, Some(limit)).await {
            Ok(result) => render_ranking(&result, explain),
            Err(err) => println!("  Ranking unavailable: {}", err),
        }
    }

    println!("\nClosed vacancies are refused:");
    match service.match_candidates("vac-300", Some(limit)).await {
        Ok(_) => println!("  vac-300 unexpectedly ranked"),
        Err(err) => println!("  vac-300 -> {} ({})", err.kind().as_str(), err),
    }

    println!("\nProfile completeness hints for c-002:");
    match service.profile_completeness("c-002") {
        Ok(report) => {
            println!("  {}% complete", report.percentage);
            for section in report.sections.iter().filter(|s| report.missing.contains(&s.section)) {
                println!(
                    "    - {}: {:.1} of {} points",
                    section.label, section.earned, section.allotted
                );
            }
        }
        Err(err) => println!("  Completeness unavailable: {}", err),
    }

    Ok(())
}

fn render_ranking(result: &RankedResult, explain: bool) {
    println!(
        "  Evaluated {} active candidates at {}, showing up to {}",
        result.evaluated,
        result.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        result.limit
    );
    if result.matches.is_empty() {
        println!("  No candidates to rank");
        return;
    }

    for (position, entry) in result.matches.iter().enumerate() {
        let applied = if entry.already_applied {
            " [applied]"
        } else {
            ""
        };
        println!(
            "  {:>2}. {:<20} {:>3}  {:<10} profile {:>3}%{}",
            position + 1,
            entry.candidate.full_name,
            entry.score,
            entry.tier.label(),
            entry.completeness,
            applied
        );

        if explain {
            for criterion in &entry.criteria {
                let outcome = match (criterion.applicable, criterion.matched) {
                    (false, _) => "n/a",
                    (true, true) => "match",
                    (true, false) => "miss",
                };
                println!("        {:<24} {}", criterion.criterion.label(), outcome);
            }
        }
    }
}
