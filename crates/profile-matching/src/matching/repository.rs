use super::domain::{Applicant, JobPosition, JobPositionId};
use super::report::CalculationResult;

/// Read access to the job positions and applicants owned by the CRUD layer.
pub trait CatalogRepository: Send + Sync {
    fn job_position(&self, id: &JobPositionId) -> Result<Option<JobPosition>, RepositoryError>;
    fn applicants(&self) -> Result<Vec<Applicant>, RepositoryError>;
    fn remove_job_position(&self, id: &JobPositionId) -> Result<(), RepositoryError>;
}

/// Keeps the most recent calculation per job position.
pub trait ResultStore: Send + Sync {
    /// Replace any previous result for the same job position.
    fn save(&self, result: CalculationResult) -> Result<(), RepositoryError>;
    fn latest(&self, job: &JobPositionId) -> Result<Option<CalculationResult>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
