use chrono::{DateTime, Utc};

use super::stages::StageTables;
use crate::matching::domain::{Applicant, CriterionId, JobPositionId};
use crate::matching::engine::RankTier;
use crate::matching::validation::CalculationWarning;

#[derive(Debug, Clone, PartialEq)]
pub struct JobPositionSummary {
    pub id: JobPositionId,
    pub name: String,
}

/// One criterion's contribution to an applicant's final score.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScore {
    pub criterion_id: CriterionId,
    pub code: String,
    pub name: String,
    pub bobot: f64,
    pub ncf: f64,
    pub nsf: f64,
    pub total: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub rank: usize,
    pub tier: RankTier,
    pub applicant: Applicant,
    pub criterion_scores: Vec<CriterionScore>,
    pub final_score: f64,
    /// Every sub-criterion of the job had a submitted score.
    pub is_complete: bool,
}

impl RankingEntry {
    /// Human-readable weighted sum, e.g. `(4.50 × 60%) + (3.00 × 40%)`.
    pub fn formula(&self) -> String {
        self.criterion_scores
            .iter()
            .map(|score| format!("({:.2} × {}%)", score.total, format_percent(score.bobot)))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completeness {
    pub is_complete: bool,
    pub warnings: Vec<CalculationWarning>,
}

impl Completeness {
    pub fn from_warnings(warnings: Vec<CalculationWarning>) -> Self {
        let is_complete = !warnings.iter().any(CalculationWarning::is_incomplete_matrix);
        Self {
            is_complete,
            warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationSummary {
    pub total_applicants: usize,
    pub total_criteria: usize,
    /// Applicant x sub-criterion records evaluated.
    pub total_detail_records: usize,
    /// Applicant x criterion aggregates produced.
    pub total_aggregate_records: usize,
    pub completeness: Completeness,
}

/// Everything one engine run produces: ranking, summary and the stage-table trace.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub job_position: JobPositionSummary,
    pub calculated_at: DateTime<Utc>,
    /// Entries ordered by rank.
    pub ranking: Vec<RankingEntry>,
    pub summary: CalculationSummary,
    pub stages: StageTables,
}

impl CalculationResult {
    pub fn winner(&self) -> Option<&RankingEntry> {
        self.ranking.first()
    }
}
