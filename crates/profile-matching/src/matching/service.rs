use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    criterion_code, sub_criterion_code, Applicant, CriterionId, FactorKind, JobPosition,
    JobPositionId, ScoreMatrix, SubCriterionId,
};
use super::engine::{EngineConfig, ProfileMatchingEngine};
use super::report::CalculationResult;
use super::repository::{CatalogRepository, RepositoryError, ResultStore};
use super::validation::ValidationError;

/// Service composing the catalog, result store and scoring engine.
pub struct ProfileMatchingService<C, S> {
    catalog: Arc<C>,
    results: Arc<S>,
    engine: ProfileMatchingEngine,
}

/// Body of `POST /api/perhitungan/bulk-input-matrix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMatrixRequest {
    pub pekerjaan_id: JobPositionId,
    pub matrix_data: ScoreMatrix,
}

/// Everything the matrix input screen needs to render its grid.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationForm {
    #[serde(rename = "pekerjaan")]
    pub job_position: FormJobPosition,
    #[serde(rename = "kriteria")]
    pub criteria: Vec<FormCriterion>,
    #[serde(rename = "pelamar")]
    pub applicants: Vec<Applicant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormJobPosition {
    pub id: JobPositionId,
    #[serde(rename = "nama")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormCriterion {
    pub id: CriterionId,
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub bobot: f64,
    #[serde(rename = "sub_kriteria")]
    pub sub_criteria: Vec<FormSubCriterion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSubCriterion {
    pub id: SubCriterionId,
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub target: u8,
    #[serde(rename = "status")]
    pub factor: FactorKind,
}

impl CalculationForm {
    fn build(job: &JobPosition, applicants: Vec<Applicant>) -> Self {
        let criteria = job
            .criteria
            .iter()
            .enumerate()
            .map(|(index, criterion)| FormCriterion {
                id: criterion.id.clone(),
                code: criterion_code(index),
                name: criterion.name.clone(),
                bobot: criterion.bobot,
                sub_criteria: criterion
                    .sub_criteria
                    .iter()
                    .enumerate()
                    .map(|(position, sub)| FormSubCriterion {
                        id: sub.id.clone(),
                        code: sub_criterion_code(position),
                        name: sub.name.clone(),
                        target: sub.target,
                        factor: sub.factor,
                    })
                    .collect(),
            })
            .collect();

        Self {
            job_position: FormJobPosition {
                id: job.id.clone(),
                name: job.name.clone(),
            },
            criteria,
            applicants,
        }
    }
}

impl<C, S> ProfileMatchingService<C, S>
where
    C: CatalogRepository + 'static,
    S: ResultStore + 'static,
{
    pub fn new(catalog: Arc<C>, results: Arc<S>, config: EngineConfig) -> Self {
        Self {
            catalog,
            results,
            engine: ProfileMatchingEngine::new(config),
        }
    }

    pub fn form(&self, job_id: &JobPositionId) -> Result<CalculationForm, ServiceError> {
        let job = self.job_position(job_id)?;
        let applicants = self.catalog.applicants()?;
        Ok(CalculationForm::build(&job, applicants))
    }

    /// Score a submitted matrix against the current criteria tree and keep the result.
    ///
    /// The job position is read once; later catalog edits do not affect this run.
    pub fn bulk_input_matrix(
        &self,
        request: BulkMatrixRequest,
    ) -> Result<CalculationResult, ServiceError> {
        let job = self.job_position(&request.pekerjaan_id)?;
        let applicants = self.catalog.applicants()?;

        let result = self
            .engine
            .calculate(&job, &applicants, &request.matrix_data)?;
        self.results.save(result.clone())?;

        info!(
            job_position = %job.id,
            winner = result
                .winner()
                .map(|entry| entry.applicant.id.to_string())
                .unwrap_or_default(),
            "stored profile matching result"
        );

        Ok(result)
    }

    pub fn ranking_detail(&self, job_id: &JobPositionId) -> Result<CalculationResult, ServiceError> {
        self.results
            .latest(job_id)?
            .ok_or_else(|| ServiceError::NoCalculation(job_id.clone()))
    }

    /// Remove a job position unless a stored result still points at it.
    pub fn retire_job_position(&self, job_id: &JobPositionId) -> Result<(), ServiceError> {
        self.job_position(job_id)?;
        if self.results.latest(job_id)?.is_some() {
            return Err(ServiceError::JobPositionInUse(job_id.clone()));
        }
        self.catalog.remove_job_position(job_id)?;
        info!(job_position = %job_id, "job position retired");
        Ok(())
    }

    fn job_position(&self, job_id: &JobPositionId) -> Result<JobPosition, ServiceError> {
        self.catalog
            .job_position(job_id)?
            .ok_or_else(|| ServiceError::JobPositionNotFound(job_id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("job position {0} not found")]
    JobPositionNotFound(JobPositionId),
    #[error("no calculation stored for job position {0}")]
    NoCalculation(JobPositionId),
    #[error("job position {0} is referenced by a stored calculation")]
    JobPositionInUse(JobPositionId),
}
