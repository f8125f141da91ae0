use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::matching::domain::{
    Applicant, ApplicantId, Catalog, Criterion, CriterionId, FactorKind, JobPosition,
    JobPositionId, ScoreMatrix, SubCriterion, SubCriterionId,
};
use crate::matching::engine::{EngineConfig, ProfileMatchingEngine};
use crate::matching::report::CalculationResult;
use crate::matching::repository::{CatalogRepository, RepositoryError, ResultStore};
use crate::matching::service::ProfileMatchingService;

pub(super) fn calculated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn engine() -> ProfileMatchingEngine {
    ProfileMatchingEngine::new(EngineConfig::default())
}

pub(super) fn applicant(id: &str, name: &str) -> Applicant {
    Applicant {
        id: ApplicantId::from(id),
        name: name.to_string(),
        email: Some(format!("{id}@pelamar.test")),
        phone: None,
        address: None,
    }
}

pub(super) fn sub(id: &str, name: &str, target: u8, factor: FactorKind) -> SubCriterion {
    SubCriterion {
        id: SubCriterionId::from(id),
        name: name.to_string(),
        target,
        factor,
    }
}

pub(super) fn criterion(id: &str, name: &str, bobot: f64, subs: Vec<SubCriterion>) -> Criterion {
    Criterion {
        id: CriterionId::from(id),
        name: name.to_string(),
        bobot,
        sub_criteria: subs,
    }
}

/// One criterion, one CF and one SF sub-criterion, both targeting 3.
pub(super) fn single_criterion_job() -> JobPosition {
    JobPosition {
        id: JobPositionId::from("job-1"),
        name: "Staff Administrasi".to_string(),
        criteria: vec![criterion(
            "k-1",
            "Kemampuan Kerja",
            100.0,
            vec![
                sub("s-1", "Ketelitian", 3, FactorKind::CoreFactor),
                sub("s-2", "Komunikasi", 3, FactorKind::SecondaryFactor),
            ],
        )],
    }
}

pub(super) fn pair_of_applicants() -> Vec<Applicant> {
    vec![applicant("a-1", "Ayu"), applicant("a-2", "Bima")]
}

pub(super) fn pair_matrix() -> ScoreMatrix {
    matrix(&[("a-1", &[("s-1", 90), ("s-2", 90)]), ("a-2", &[("s-1", 40), ("s-2", 40)])])
}

pub(super) fn three_criteria_job() -> JobPosition {
    JobPosition {
        id: JobPositionId::from("job-2"),
        name: "Operator Gudang".to_string(),
        criteria: vec![
            criterion(
                "k-1",
                "Kecerdasan",
                40.0,
                vec![
                    sub("s-1", "Logika", 4, FactorKind::CoreFactor),
                    sub("s-2", "Numerik", 3, FactorKind::CoreFactor),
                    sub("s-3", "Verbal", 3, FactorKind::SecondaryFactor),
                ],
            ),
            criterion(
                "k-2",
                "Sikap Kerja",
                35.0,
                vec![
                    sub("s-4", "Disiplin", 3, FactorKind::CoreFactor),
                    sub("s-5", "Kerja Sama", 2, FactorKind::SecondaryFactor),
                ],
            ),
            criterion(
                "k-3",
                "Perilaku",
                25.0,
                vec![
                    sub("s-6", "Kejujuran", 4, FactorKind::CoreFactor),
                    sub("s-7", "Inisiatif", 4, FactorKind::SecondaryFactor),
                ],
            ),
        ],
    }
}

pub(super) fn five_applicants() -> Vec<Applicant> {
    vec![
        applicant("p-1", "Citra"),
        applicant("p-2", "Dedi"),
        applicant("p-3", "Eka"),
        applicant("p-4", "Fajar"),
        applicant("p-5", "Gita"),
    ]
}

pub(super) fn five_applicant_matrix() -> ScoreMatrix {
    matrix(&[
        (
            "p-1",
            &[("s-1", 85), ("s-2", 70), ("s-3", 60), ("s-4", 75), ("s-5", 50), ("s-6", 90), ("s-7", 80)],
        ),
        (
            "p-2",
            &[("s-1", 40), ("s-2", 55), ("s-3", 30), ("s-4", 60), ("s-5", 45), ("s-6", 50), ("s-7", 65)],
        ),
        (
            "p-3",
            &[("s-1", 95), ("s-2", 90), ("s-3", 88), ("s-4", 82), ("s-5", 70), ("s-6", 85), ("s-7", 92)],
        ),
        (
            "p-4",
            &[("s-1", 20), ("s-2", 35), ("s-3", 44), ("s-4", 30), ("s-5", 10), ("s-6", 25), ("s-7", 40)],
        ),
        (
            "p-5",
            &[("s-1", 66), ("s-2", 64), ("s-3", 79), ("s-4", 45), ("s-5", 65), ("s-6", 70), ("s-7", 55)],
        ),
    ])
}

pub(super) fn matrix(rows: &[(&str, &[(&str, i64)])]) -> ScoreMatrix {
    let mut matrix = ScoreMatrix::new();
    for (applicant, cells) in rows {
        matrix.insert_applicant(ApplicantId::from(*applicant));
        for (sub_criterion, value) in cells.iter() {
            matrix.insert(
                ApplicantId::from(*applicant),
                SubCriterionId::from(*sub_criterion),
                *value,
            );
        }
    }
    matrix
}

pub(super) fn catalog() -> Catalog {
    let mut applicants = pair_of_applicants();
    applicants.extend(five_applicants());
    Catalog {
        job_positions: vec![single_criterion_job(), three_criteria_job()],
        applicants,
    }
}

pub(super) type MemoryService = ProfileMatchingService<MemoryCatalog, MemoryResults>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryCatalog>, Arc<MemoryResults>) {
    let catalog = Arc::new(MemoryCatalog::new(catalog()));
    let results = Arc::new(MemoryResults::default());
    let service =
        ProfileMatchingService::new(catalog.clone(), results.clone(), EngineConfig::default());
    (service, catalog, results)
}

#[derive(Clone)]
pub(super) struct MemoryCatalog {
    catalog: Arc<Mutex<Catalog>>,
}

impl MemoryCatalog {
    pub(super) fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    pub(super) fn contains(&self, id: &JobPositionId) -> bool {
        self.catalog
            .lock()
            .expect("catalog mutex poisoned")
            .job_position(id)
            .is_some()
    }

    pub(super) fn rename_criterion(&self, job: &JobPositionId, name: &str) {
        let mut guard = self.catalog.lock().expect("catalog mutex poisoned");
        if let Some(position) = guard.job_positions.iter_mut().find(|item| &item.id == job) {
            position.criteria[0].name = name.to_string();
        }
    }
}

impl CatalogRepository for MemoryCatalog {
    fn job_position(&self, id: &JobPositionId) -> Result<Option<JobPosition>, RepositoryError> {
        let guard = self.catalog.lock().expect("catalog mutex poisoned");
        Ok(guard.job_position(id).cloned())
    }

    fn applicants(&self) -> Result<Vec<Applicant>, RepositoryError> {
        let guard = self.catalog.lock().expect("catalog mutex poisoned");
        Ok(guard.applicants.clone())
    }

    fn remove_job_position(&self, id: &JobPositionId) -> Result<(), RepositoryError> {
        let mut guard = self.catalog.lock().expect("catalog mutex poisoned");
        let before = guard.job_positions.len();
        guard.job_positions.retain(|job| &job.id != id);
        if guard.job_positions.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryResults {
    pub(super) results: Arc<Mutex<HashMap<JobPositionId, CalculationResult>>>,
}

impl ResultStore for MemoryResults {
    fn save(&self, result: CalculationResult) -> Result<(), RepositoryError> {
        let mut guard = self.results.lock().expect("result mutex poisoned");
        guard.insert(result.job_position.id.clone(), result);
        Ok(())
    }

    fn latest(&self, job: &JobPositionId) -> Result<Option<CalculationResult>, RepositoryError> {
        let guard = self.results.lock().expect("result mutex poisoned");
        Ok(guard.get(job).cloned())
    }
}

pub(super) struct UnavailableResults;

impl ResultStore for UnavailableResults {
    fn save(&self, _result: CalculationResult) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest(&self, _job: &JobPositionId) -> Result<Option<CalculationResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
