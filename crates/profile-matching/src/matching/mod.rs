//! Profile Matching: gap-based scoring of applicants against a job position's criteria tree.
//!
//! Raw 0..=100 scores are bucketed onto a 1..=4 scale, compared with each sub-criterion's
//! target, mapped to gap weights, split into core/secondary factor means, combined by
//! criterion bobot and finally ranked. Every intermediate table is kept on the result.

pub mod domain;
pub mod engine;
pub mod import;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicantId, Catalog, Criterion, CriterionId, FactorKind, JobPosition,
    JobPositionId, ScoreMatrix, SubCriterion, SubCriterionId,
};
pub use engine::{EngineConfig, ProfileMatchingEngine, RankTier, ScaleLevel};
pub use import::{load_catalog, load_catalog_path, parse_score_matrix, ImportError};
pub use report::{CalculationResult, RankingEntry, StageTable, StageTables};
pub use repository::{CatalogRepository, RepositoryError, ResultStore};
pub use router::calculation_router;
pub use service::{BulkMatrixRequest, CalculationForm, ProfileMatchingService, ServiceError};
pub use validation::{CalculationWarning, ValidationError};
