use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::domain::{
    Applicant, ApplicantId, CriterionId, FactorKind, JobPosition, JobPositionId, ScoreMatrix,
    SubCriterionId,
};
use super::engine::{EngineConfig, RawScore};

/// Lowest sub-criterion target the gap table is defined for.
pub const MIN_TARGET: u8 = 1;
/// Highest sub-criterion target the gap table is defined for.
pub const MAX_TARGET: u8 = 5;

const BOBOT_SUM_TOLERANCE: f64 = 1e-6;

/// Structural problems that stop a calculation before any scoring happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("job position {0} has no criteria")]
    NoCriteria(JobPositionId),
    #[error("criterion {0} has no sub-criteria")]
    EmptyCriterion(CriterionId),
    #[error("criterion {0} is declared more than once")]
    DuplicateCriterion(CriterionId),
    #[error("sub-criterion {0} is declared more than once")]
    DuplicateSubCriterion(SubCriterionId),
    #[error("sub-criterion {sub_criterion} target {target} is outside the scoring scale 1..=5")]
    TargetOutOfRange {
        sub_criterion: SubCriterionId,
        target: u8,
    },
    #[error("criterion {criterion} bobot {bobot} must be within 0..=100")]
    BobotOutOfRange { criterion: CriterionId, bobot: f64 },
    #[error("criteria bobot sum to {total}, expected 100")]
    BobotSum { total: f64 },
    #[error("score matrix has no applicants")]
    EmptyMatrix,
    #[error("score matrix spans {cells} cells, above the limit of {limit}")]
    MatrixTooLarge { cells: usize, limit: usize },
    #[error("applicant {0} is not registered")]
    UnknownApplicant(ApplicantId),
    #[error("sub-criterion {sub_criterion} scored for applicant {applicant} does not belong to job position {job_position}")]
    UnknownSubCriterion {
        applicant: ApplicantId,
        sub_criterion: SubCriterionId,
        job_position: JobPositionId,
    },
    #[error("score {value} for applicant {applicant} on sub-criterion {sub_criterion} is outside 0..=100")]
    InvalidInputRange {
        applicant: ApplicantId,
        sub_criterion: SubCriterionId,
        value: i64,
    },
}

/// Non-fatal findings reported through `completeness.warnings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationWarning {
    IncompleteMatrix {
        applicant_id: ApplicantId,
        applicant_name: String,
        sub_criterion_id: SubCriterionId,
        sub_criterion_name: String,
    },
    EmptyFactorGroup {
        criterion_id: CriterionId,
        criterion_name: String,
        factor: FactorKind,
    },
    UnknownGapMagnitude {
        applicant_id: ApplicantId,
        sub_criterion_id: SubCriterionId,
        gap: i32,
        fallback_weight: f64,
    },
    BobotSumMismatch {
        total: f64,
    },
}

impl CalculationWarning {
    pub fn is_incomplete_matrix(&self) -> bool {
        matches!(self, CalculationWarning::IncompleteMatrix { .. })
    }
}

impl fmt::Display for CalculationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationWarning::IncompleteMatrix {
                applicant_name,
                sub_criterion_name,
                ..
            } => write!(
                f,
                "no score submitted for {applicant_name} on '{sub_criterion_name}'; counted as weight 0"
            ),
            CalculationWarning::EmptyFactorGroup {
                criterion_name,
                factor,
                ..
            } => write!(
                f,
                "criterion '{criterion_name}' has no {} sub-criteria; its mean is taken as 0",
                factor.label()
            ),
            CalculationWarning::UnknownGapMagnitude {
                applicant_id,
                sub_criterion_id,
                gap,
                fallback_weight,
            } => write!(
                f,
                "gap {gap} for applicant {applicant_id} on sub-criterion {sub_criterion_id} is outside the weight table; using {fallback_weight}"
            ),
            CalculationWarning::BobotSumMismatch { total } => {
                write!(f, "criteria bobot sum to {total} instead of 100; used as declared")
            }
        }
    }
}

pub(crate) struct PreparedApplicant {
    pub applicant: Applicant,
    pub scores: HashMap<SubCriterionId, RawScore>,
}

impl PreparedApplicant {
    pub fn score(&self, sub_criterion: &SubCriterionId) -> Option<RawScore> {
        self.scores.get(sub_criterion).copied()
    }
}

/// Validated engine input: applicants in submission order with range-checked scores.
pub(crate) struct PreparedInput {
    pub applicants: Vec<PreparedApplicant>,
    pub warnings: Vec<CalculationWarning>,
}

pub(crate) fn prepare(
    job: &JobPosition,
    applicants: &[Applicant],
    matrix: &ScoreMatrix,
    config: &EngineConfig,
) -> Result<PreparedInput, ValidationError> {
    let mut warnings = check_structure(job, config)?;

    if matrix.is_empty() {
        return Err(ValidationError::EmptyMatrix);
    }

    let cells = matrix.len().saturating_mul(job.sub_criterion_count());
    if cells > config.max_matrix_cells {
        return Err(ValidationError::MatrixTooLarge {
            cells,
            limit: config.max_matrix_cells,
        });
    }

    let known: HashSet<&SubCriterionId> = job
        .criteria
        .iter()
        .flat_map(|criterion| criterion.sub_criteria.iter().map(|sub| &sub.id))
        .collect();

    let mut by_id: HashMap<&ApplicantId, &Applicant> = HashMap::with_capacity(applicants.len());
    for applicant in applicants {
        by_id.entry(&applicant.id).or_insert(applicant);
    }

    let mut prepared = Vec::with_capacity(matrix.len());
    for row in matrix.rows() {
        let applicant = by_id
            .get(&row.applicant_id)
            .copied()
            .ok_or_else(|| ValidationError::UnknownApplicant(row.applicant_id.clone()))?;

        let mut scores = HashMap::with_capacity(row.values.len());
        for (sub_criterion, value) in &row.values {
            if !known.contains(sub_criterion) {
                return Err(ValidationError::UnknownSubCriterion {
                    applicant: row.applicant_id.clone(),
                    sub_criterion: sub_criterion.clone(),
                    job_position: job.id.clone(),
                });
            }
            let score =
                RawScore::new(*value).map_err(|err| ValidationError::InvalidInputRange {
                    applicant: row.applicant_id.clone(),
                    sub_criterion: sub_criterion.clone(),
                    value: err.value,
                })?;
            scores.insert(sub_criterion.clone(), score);
        }

        for criterion in &job.criteria {
            for sub in &criterion.sub_criteria {
                if !scores.contains_key(&sub.id) {
                    warnings.push(CalculationWarning::IncompleteMatrix {
                        applicant_id: applicant.id.clone(),
                        applicant_name: applicant.name.clone(),
                        sub_criterion_id: sub.id.clone(),
                        sub_criterion_name: sub.name.clone(),
                    });
                }
            }
        }

        prepared.push(PreparedApplicant {
            applicant: applicant.clone(),
            scores,
        });
    }

    Ok(PreparedInput {
        applicants: prepared,
        warnings,
    })
}

fn check_structure(
    job: &JobPosition,
    config: &EngineConfig,
) -> Result<Vec<CalculationWarning>, ValidationError> {
    if job.criteria.is_empty() {
        return Err(ValidationError::NoCriteria(job.id.clone()));
    }

    let mut warnings = Vec::new();
    let mut criterion_ids = HashSet::new();
    let mut sub_criterion_ids = HashSet::new();

    for criterion in &job.criteria {
        if !criterion_ids.insert(&criterion.id) {
            return Err(ValidationError::DuplicateCriterion(criterion.id.clone()));
        }
        if !(criterion.bobot.is_finite() && (0.0..=100.0).contains(&criterion.bobot)) {
            return Err(ValidationError::BobotOutOfRange {
                criterion: criterion.id.clone(),
                bobot: criterion.bobot,
            });
        }
        if criterion.sub_criteria.is_empty() {
            return Err(ValidationError::EmptyCriterion(criterion.id.clone()));
        }

        for sub in &criterion.sub_criteria {
            if !sub_criterion_ids.insert(&sub.id) {
                return Err(ValidationError::DuplicateSubCriterion(sub.id.clone()));
            }
            if !(MIN_TARGET..=MAX_TARGET).contains(&sub.target) {
                return Err(ValidationError::TargetOutOfRange {
                    sub_criterion: sub.id.clone(),
                    target: sub.target,
                });
            }
        }

        for factor in FactorKind::ordered() {
            if !criterion.sub_criteria.iter().any(|sub| sub.factor == factor) {
                warnings.push(CalculationWarning::EmptyFactorGroup {
                    criterion_id: criterion.id.clone(),
                    criterion_name: criterion.name.clone(),
                    factor,
                });
            }
        }
    }

    let total = job.bobot_total();
    if (total - 100.0).abs() > BOBOT_SUM_TOLERANCE {
        if config.strict_bobot_sum {
            return Err(ValidationError::BobotSum { total });
        }
        warnings.push(CalculationWarning::BobotSumMismatch { total });
    }

    Ok(warnings)
}
