use chrono::Local;
use clap::Args;
use profile_matching::config::AppConfig;
use profile_matching::error::AppError;
use profile_matching::matching::domain::{
    Applicant, ApplicantId, Catalog, Criterion, CriterionId, FactorKind, JobPosition,
    JobPositionId, ScoreMatrix, SubCriterion, SubCriterionId,
};
use profile_matching::matching::report::{StageTable, SubCriterionRow};
use profile_matching::matching::{
    load_catalog_path, parse_score_matrix, CalculationResult, EngineConfig,
    ProfileMatchingEngine, ServiceError,
};
use profile_matching::telemetry;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the wire JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// JSON catalog with `pekerjaan` and `pelamar`
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Job position id to score against
    #[arg(long)]
    pub(crate) job: String,
    /// CSV score matrix: `applicant_id,<sub-criterion id>...`
    #[arg(long)]
    pub(crate) scores: PathBuf,
    /// Print the wire JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

/// Same envelope the HTTP API answers with.
#[derive(Serialize)]
struct CliEnvelope<'a> {
    success: bool,
    message: &'a str,
    data: &'a CalculationResult,
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog_path(&args.catalog)?;
    let job_id = JobPositionId(args.job);
    let job = catalog
        .job_position(&job_id)
        .ok_or_else(|| ServiceError::JobPositionNotFound(job_id.clone()))?;
    let matrix = parse_score_matrix(BufReader::new(File::open(&args.scores)?))?;

    let result = ProfileMatchingEngine::new(config.engine)
        .calculate(job, &catalog.applicants, &matrix)
        .map_err(ServiceError::from)?;

    emit(&result, args.json)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = sample_catalog();
    let job = catalog
        .job_positions
        .first()
        .ok_or_else(|| ServiceError::JobPositionNotFound(JobPositionId::from("1")))?;

    let result = ProfileMatchingEngine::new(EngineConfig::default())
        .calculate(job, &catalog.applicants, &sample_matrix())
        .map_err(ServiceError::from)?;

    if !args.json {
        println!("Profile matching demo");
    }
    emit(&result, args.json)
}

fn emit(result: &CalculationResult, json: bool) -> Result<(), AppError> {
    if json {
        let envelope = CliEnvelope {
            success: true,
            message: "Perhitungan profile matching berhasil",
            data: result,
        };
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &envelope).map_err(std::io::Error::from)?;
        writeln!(stdout)?;
    } else {
        render_result(result);
    }
    Ok(())
}

fn render_result(result: &CalculationResult) {
    println!(
        "{} ({}) calculated {}",
        result.job_position.name,
        result.job_position.id,
        result
            .calculated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );

    println!("\nRanking");
    for entry in &result.ranking {
        println!(
            "  {:>2}. {:<24} {:>6.3}  {}{}",
            entry.rank,
            entry.applicant.name,
            entry.final_score,
            entry.tier.label(),
            if entry.is_complete { "" } else { " (incomplete)" }
        );
        println!("      {}", entry.formula());
    }

    let completeness = &result.summary.completeness;
    if !completeness.warnings.is_empty() {
        println!("\nWarnings");
        for warning in &completeness.warnings {
            println!("  - {warning}");
        }
    }

    println!(
        "\n{} applicants, {} criteria, {} detail records, {} aggregates",
        result.summary.total_applicants,
        result.summary.total_criteria,
        result.summary.total_detail_records,
        result.summary.total_aggregate_records
    );

    for (key, table) in result.stages.keyed() {
        println!("\n[{key}] {}", table.title());
        render_stage(table);
    }
}

fn render_stage(table: &StageTable) {
    match table {
        StageTable::InputValues(rows) => {
            render_sub_rows(rows, |cell| format!("{}/{}", cell.raw, cell.scale))
        }
        StageTable::GapCalculation(rows) => render_sub_rows(rows, |gap| format!("{gap:+}")),
        StageTable::WeightValues(rows) => render_sub_rows(rows, |weight| format!("{weight:.1}")),
        StageTable::CfSf { rows, .. } => {
            for row in rows {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .map(|cell| {
                        let weight = cell
                            .weight
                            .map_or_else(|| "-".to_string(), |weight| format!("{weight:.1}"));
                        format!("{}[{}]={weight}", cell.code, cell.factor.code())
                    })
                    .collect();
                println!(
                    "  {:<24} {}  NCF {:.3}  NSF {:.3}  total {:.3}",
                    row.applicant_name,
                    cells.join("  "),
                    row.score.ncf,
                    row.score.nsf,
                    row.score.total
                );
            }
        }
        StageTable::FinalResults(rows) => {
            for row in rows {
                let totals: Vec<String> = row
                    .criterion_totals
                    .iter()
                    .map(|(code, total)| format!("{code}={total:.3}"))
                    .collect();
                println!(
                    "  {:>2}. {:<24} {}  final {:.3}  {}",
                    row.rank,
                    row.applicant_name,
                    totals.join("  "),
                    row.final_score,
                    row.tier.label()
                );
            }
        }
    }
}

fn render_sub_rows<T>(rows: &[SubCriterionRow<T>], format_value: impl Fn(&T) -> String) {
    for row in rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                let value = cell
                    .value
                    .as_ref()
                    .map_or_else(|| "-".to_string(), &format_value);
                format!("{}.{}={value}", cell.criterion_code, cell.code)
            })
            .collect();
        println!("  {:<24} {}", row.applicant_name, cells.join("  "));
    }
}

pub(crate) fn sample_catalog() -> Catalog {
    let sub = |id: &str, name: &str, target: u8, factor: FactorKind| SubCriterion {
        id: SubCriterionId::from(id),
        name: name.to_string(),
        target,
        factor,
    };
    let applicant = |id: &str, name: &str, email: &str| Applicant {
        id: ApplicantId::from(id),
        name: name.to_string(),
        email: Some(email.to_string()),
        phone: None,
        address: None,
    };

    Catalog {
        job_positions: vec![JobPosition {
            id: JobPositionId::from("1"),
            name: "Staff Administrasi".to_string(),
            criteria: vec![
                Criterion {
                    id: CriterionId::from("1"),
                    name: "Kemampuan Teknis".to_string(),
                    bobot: 40.0,
                    sub_criteria: vec![
                        sub("1", "Kecepatan Mengetik", 4, FactorKind::CoreFactor),
                        sub("2", "Microsoft Office", 4, FactorKind::CoreFactor),
                        sub("3", "Pengarsipan", 3, FactorKind::SecondaryFactor),
                    ],
                },
                Criterion {
                    id: CriterionId::from("2"),
                    name: "Komunikasi".to_string(),
                    bobot: 35.0,
                    sub_criteria: vec![
                        sub("4", "Komunikasi Lisan", 3, FactorKind::CoreFactor),
                        sub("5", "Komunikasi Tulisan", 3, FactorKind::SecondaryFactor),
                    ],
                },
                Criterion {
                    id: CriterionId::from("3"),
                    name: "Sikap Kerja".to_string(),
                    bobot: 25.0,
                    sub_criteria: vec![
                        sub("6", "Disiplin", 4, FactorKind::CoreFactor),
                        sub("7", "Kerja Sama", 3, FactorKind::SecondaryFactor),
                        sub("8", "Inisiatif", 3, FactorKind::SecondaryFactor),
                    ],
                },
            ],
        }],
        applicants: vec![
            applicant("101", "Andi Pratama", "andi@example.test"),
            applicant("102", "Bunga Lestari", "bunga@example.test"),
            applicant("103", "Candra Wijaya", "candra@example.test"),
            applicant("104", "Dewi Anggraini", "dewi@example.test"),
            applicant("105", "Eko Saputra", "eko@example.test"),
        ],
    }
}

/// Scores for the sample catalog. Eko has no Inisiatif score so the demo shows an
/// incomplete-matrix warning.
pub(crate) fn sample_matrix() -> ScoreMatrix {
    let rows: [(&str, &[i64]); 5] = [
        ("101", &[82, 85, 70, 68, 60, 88, 72, 66]),
        ("102", &[70, 64, 80, 90, 85, 75, 80, 90]),
        ("103", &[45, 55, 50, 60, 40, 62, 58, 50]),
        ("104", &[90, 92, 66, 70, 72, 95, 68, 70]),
        ("105", &[60, 58, 75, 50, 66, 70, 64]),
    ];

    let mut matrix = ScoreMatrix::new();
    for (applicant, values) in rows {
        matrix.insert_applicant(ApplicantId::from(applicant));
        for (position, value) in values.iter().enumerate() {
            matrix.insert(
                ApplicantId::from(applicant),
                SubCriterionId(format!("{}", position + 1)),
                *value,
            );
        }
    }
    matrix
}
