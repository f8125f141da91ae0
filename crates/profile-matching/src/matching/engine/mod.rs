mod config;
mod factor;
mod gap;
mod ranking;
mod scale;

pub use config::EngineConfig;
pub use factor::{
    aggregate_factors, final_score, FactorScore, CORE_FACTOR_SHARE, SECONDARY_FACTOR_SHARE,
};
pub use gap::{compute_gap, lookup_gap_weight, weight_for_gap, GapWeight, FALLBACK_GAP_WEIGHT};
pub use ranking::{rank, RankSlot, RankTier};
pub use scale::{RawScore, ScaleLevel, ScoreOutOfRange, MAX_RAW_SCORE};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    criterion_code, sub_criterion_code, Applicant, JobPosition, ScoreMatrix, SubCriterion,
};
use super::report::{
    CalculationResult, CalculationSummary, CfSfCell, CfSfRow, Cell, Completeness,
    CriterionScore, FinalRow, InputCell, JobPositionSummary, RankingEntry, StageTable,
    StageTables, SubCriterionRow,
};
use super::validation::{self, CalculationWarning, PreparedApplicant, ValidationError};

/// Stateless Profile Matching calculator.
///
/// Every run works on the job tree and matrix it is handed; nothing is cached between runs.
#[derive(Debug, Clone, Default)]
pub struct ProfileMatchingEngine {
    config: EngineConfig,
}

/// Everything computed for one applicant before ranking.
struct ApplicantEvaluation {
    applicant: Applicant,
    inputs: Vec<Cell<InputCell>>,
    gaps: Vec<Cell<i32>>,
    weights: Vec<Cell<f64>>,
    factor_rows: Vec<CfSfRow>,
    criterion_scores: Vec<CriterionScore>,
    final_score: f64,
    is_complete: bool,
}

impl ProfileMatchingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculate(
        &self,
        job: &JobPosition,
        applicants: &[Applicant],
        matrix: &ScoreMatrix,
    ) -> Result<CalculationResult, ValidationError> {
        self.calculate_at(job, applicants, matrix, Utc::now())
    }

    /// Same as [`calculate`](Self::calculate) with an explicit timestamp.
    pub fn calculate_at(
        &self,
        job: &JobPosition,
        applicants: &[Applicant],
        matrix: &ScoreMatrix,
        calculated_at: DateTime<Utc>,
    ) -> Result<CalculationResult, ValidationError> {
        let prepared = validation::prepare(job, applicants, matrix, &self.config)?;
        let mut warnings = prepared.warnings;

        let evaluations: Vec<ApplicantEvaluation> = prepared
            .applicants
            .iter()
            .map(|applicant| evaluate_applicant(job, applicant, &mut warnings))
            .collect();

        let scores: Vec<f64> = evaluations.iter().map(|eval| eval.final_score).collect();
        let slots = rank(&scores);

        let result = assemble(job, evaluations, &slots, warnings, calculated_at);

        info!(
            job_position = %job.id,
            applicants = result.summary.total_applicants,
            warnings = result.summary.completeness.warnings.len(),
            complete = result.summary.completeness.is_complete,
            "profile matching calculation finished"
        );

        Ok(result)
    }
}

fn evaluate_applicant(
    job: &JobPosition,
    prepared: &PreparedApplicant,
    warnings: &mut Vec<CalculationWarning>,
) -> ApplicantEvaluation {
    let applicant = &prepared.applicant;
    let mut inputs = Vec::new();
    let mut gaps = Vec::new();
    let mut weights = Vec::new();
    let mut factor_rows = Vec::with_capacity(job.criteria.len());
    let mut criterion_scores = Vec::with_capacity(job.criteria.len());
    let mut is_complete = true;

    for (criterion_index, criterion) in job.criteria.iter().enumerate() {
        let k_code = criterion_code(criterion_index);
        let mut factor_weights = Vec::with_capacity(criterion.sub_criteria.len());
        let mut factor_cells = Vec::with_capacity(criterion.sub_criteria.len());

        for (position, sub) in criterion.sub_criteria.iter().enumerate() {
            let s_code = sub_criterion_code(position);
            let measured = prepared.score(&sub.id).map(|raw| {
                let level = ScaleLevel::from_raw(raw);
                let mapped = map_gap(applicant, sub, compute_gap(level, sub.target), warnings);
                (raw, level, mapped)
            });
            is_complete &= measured.is_some();

            let weight = measured.map(|(_, _, mapped)| mapped.weight);
            inputs.push(cell(
                &k_code,
                &s_code,
                sub,
                measured.map(|(raw, level, _)| InputCell {
                    raw: raw.value(),
                    scale: level.value(),
                }),
            ));
            gaps.push(cell(&k_code, &s_code, sub, measured.map(|(_, _, mapped)| mapped.gap)));
            weights.push(cell(&k_code, &s_code, sub, weight));

            factor_weights.push((sub.factor, weight));
            factor_cells.push(CfSfCell {
                code: s_code,
                sub_criterion_id: sub.id.clone(),
                factor: sub.factor,
                weight,
            });
        }

        let score = aggregate_factors(&factor_weights);
        factor_rows.push(CfSfRow {
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            cells: factor_cells,
            score,
        });
        criterion_scores.push(CriterionScore {
            criterion_id: criterion.id.clone(),
            code: k_code,
            name: criterion.name.clone(),
            bobot: criterion.bobot,
            ncf: score.ncf,
            nsf: score.nsf,
            total: score.total,
            contribution: score.total * criterion.bobot / 100.0,
        });
    }

    let contributions: Vec<(f64, f64)> = criterion_scores
        .iter()
        .map(|score| (score.total, score.bobot))
        .collect();

    ApplicantEvaluation {
        applicant: applicant.clone(),
        inputs,
        gaps,
        weights,
        factor_rows,
        criterion_scores,
        final_score: final_score(&contributions),
        is_complete,
    }
}

/// Weight for a gap, recording a warning when the gap falls back.
///
/// Validated targets keep every gap inside the table, so the fallback is only a guard.
fn map_gap(
    applicant: &Applicant,
    sub: &SubCriterion,
    gap: i32,
    warnings: &mut Vec<CalculationWarning>,
) -> GapWeight {
    let mapped = weight_for_gap(gap);
    if !mapped.in_table {
        warn!(
            applicant = %applicant.id,
            sub_criterion = %sub.id,
            gap = mapped.gap,
            "gap outside weight table, using fallback weight"
        );
        warnings.push(CalculationWarning::UnknownGapMagnitude {
            applicant_id: applicant.id.clone(),
            sub_criterion_id: sub.id.clone(),
            gap: mapped.gap,
            fallback_weight: mapped.weight,
        });
    }
    mapped
}

fn cell<T>(criterion_code: &str, code: &str, sub: &SubCriterion, value: Option<T>) -> Cell<T> {
    Cell {
        criterion_code: criterion_code.to_string(),
        code: code.to_string(),
        sub_criterion_id: sub.id.clone(),
        value,
    }
}

fn assemble(
    job: &JobPosition,
    evaluations: Vec<ApplicantEvaluation>,
    slots: &[RankSlot],
    warnings: Vec<CalculationWarning>,
    calculated_at: DateTime<Utc>,
) -> CalculationResult {
    let applicant_count = evaluations.len();
    let mut input_rows = Vec::with_capacity(applicant_count);
    let mut gap_rows = Vec::with_capacity(applicant_count);
    let mut weight_rows = Vec::with_capacity(applicant_count);
    let mut factor_tables: Vec<Vec<CfSfRow>> = vec![Vec::new(); job.criteria.len()];
    let mut ranked: Vec<Option<RankingEntry>> = vec![None; applicant_count];
    let mut final_rows: Vec<Option<FinalRow>> = vec![None; applicant_count];

    // Ranked position of each applicant, indexed by evaluation order.
    let mut placement: Vec<Option<(usize, RankSlot)>> = vec![None; applicant_count];
    for (order, slot) in slots.iter().enumerate() {
        if let Some(entry) = placement.get_mut(slot.index) {
            *entry = Some((order, *slot));
        }
    }

    for (evaluation, placed) in evaluations.into_iter().zip(placement) {
        let Some((order, slot)) = placed else {
            continue;
        };

        let ApplicantEvaluation {
            applicant,
            inputs,
            gaps,
            weights,
            factor_rows,
            criterion_scores,
            final_score,
            is_complete,
        } = evaluation;

        input_rows.push(SubCriterionRow {
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            cells: inputs,
        });
        gap_rows.push(SubCriterionRow {
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            cells: gaps,
        });
        weight_rows.push(SubCriterionRow {
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            cells: weights,
        });
        for (criterion_index, row) in factor_rows.into_iter().enumerate() {
            factor_tables[criterion_index].push(row);
        }

        final_rows[order] = Some(FinalRow {
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            criterion_totals: criterion_scores
                .iter()
                .map(|score| (score.code.clone(), score.total))
                .collect(),
            final_score,
            rank: slot.rank,
            tier: slot.tier,
        });
        ranked[order] = Some(RankingEntry {
            rank: slot.rank,
            tier: slot.tier,
            applicant,
            criterion_scores,
            final_score,
            is_complete,
        });
    }

    let mut tables = vec![
        StageTable::InputValues(input_rows),
        StageTable::GapCalculation(gap_rows),
        StageTable::WeightValues(weight_rows),
    ];
    for (criterion_index, (criterion, rows)) in
        job.criteria.iter().zip(factor_tables).enumerate()
    {
        tables.push(StageTable::CfSf {
            criterion_index,
            criterion_id: criterion.id.clone(),
            criterion_name: criterion.name.clone(),
            rows,
        });
    }
    tables.push(StageTable::FinalResults(
        final_rows.into_iter().flatten().collect(),
    ));

    CalculationResult {
        job_position: JobPositionSummary {
            id: job.id.clone(),
            name: job.name.clone(),
        },
        calculated_at,
        ranking: ranked.into_iter().flatten().collect(),
        summary: CalculationSummary {
            total_applicants: applicant_count,
            total_criteria: job.criteria.len(),
            total_detail_records: applicant_count * job.sub_criterion_count(),
            total_aggregate_records: applicant_count * job.criteria.len(),
            completeness: Completeness::from_warnings(warnings),
        },
        stages: StageTables::new(tables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::FactorKind;

    fn fixture() -> (Applicant, SubCriterion) {
        let applicant = Applicant {
            id: "a-1".into(),
            name: "Ayu".to_string(),
            email: None,
            phone: None,
            address: None,
        };
        let sub = SubCriterion {
            id: "s-1".into(),
            name: "Ketelitian".to_string(),
            target: 3,
            factor: FactorKind::CoreFactor,
        };
        (applicant, sub)
    }

    #[test]
    fn gap_outside_table_falls_back_with_warning() {
        let (applicant, sub) = fixture();
        let mut warnings = Vec::new();

        let mapped = map_gap(&applicant, &sub, 5, &mut warnings);

        assert!(!mapped.in_table);
        assert_eq!(mapped.weight, FALLBACK_GAP_WEIGHT);
        assert_eq!(
            warnings,
            vec![CalculationWarning::UnknownGapMagnitude {
                applicant_id: applicant.id.clone(),
                sub_criterion_id: sub.id.clone(),
                gap: 5,
                fallback_weight: FALLBACK_GAP_WEIGHT,
            }]
        );
    }

    #[test]
    fn gap_inside_table_adds_no_warning() {
        let (applicant, sub) = fixture();
        let mut warnings = Vec::new();

        let mapped = map_gap(&applicant, &sub, -2, &mut warnings);

        assert!(mapped.in_table);
        assert_eq!(mapped.weight, 3.0);
        assert!(warnings.is_empty());
    }
}
