use serde::Serialize;

use crate::matching::domain::{ApplicantId, CriterionId, FactorKind, SubCriterionId};
use crate::matching::engine::{FactorScore, RankTier};

/// One sub-criterion cell of a per-applicant row. `value` is `None` when the applicant has no
/// submitted score for that sub-criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<T> {
    pub criterion_code: String,
    pub code: String,
    pub sub_criterion_id: SubCriterionId,
    pub value: Option<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputCell {
    #[serde(rename = "nilai")]
    pub raw: u8,
    #[serde(rename = "skala")]
    pub scale: u8,
}

/// Row spanning every sub-criterion of the job, grouped by criterion code.
#[derive(Debug, Clone, PartialEq)]
pub struct SubCriterionRow<T> {
    pub applicant_id: ApplicantId,
    pub applicant_name: String,
    pub cells: Vec<Cell<T>>,
}

impl<T> SubCriterionRow<T> {
    pub fn cell(&self, criterion_code: &str, code: &str) -> Option<&Cell<T>> {
        self.cells
            .iter()
            .find(|cell| cell.criterion_code == criterion_code && cell.code == code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CfSfCell {
    pub code: String,
    pub sub_criterion_id: SubCriterionId,
    pub factor: FactorKind,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CfSfRow {
    pub applicant_id: ApplicantId,
    pub applicant_name: String,
    pub cells: Vec<CfSfCell>,
    pub score: FactorScore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalRow {
    pub applicant_id: ApplicantId,
    pub applicant_name: String,
    /// `(criterion code, criterion total)` in criterion order.
    pub criterion_totals: Vec<(String, f64)>,
    pub final_score: f64,
    pub rank: usize,
    pub tier: RankTier,
}

/// Intermediate calculation table kept for audit and UI replay.
#[derive(Debug, Clone, PartialEq)]
pub enum StageTable {
    InputValues(Vec<SubCriterionRow<InputCell>>),
    GapCalculation(Vec<SubCriterionRow<i32>>),
    WeightValues(Vec<SubCriterionRow<f64>>),
    CfSf {
        /// Zero-based position of the criterion in the job.
        criterion_index: usize,
        criterion_id: CriterionId,
        criterion_name: String,
        rows: Vec<CfSfRow>,
    },
    FinalResults(Vec<FinalRow>),
}

impl StageTable {
    pub fn wire_name(&self) -> String {
        match self {
            StageTable::InputValues(_) => "input_values".to_string(),
            StageTable::GapCalculation(_) => "gap_calculation".to_string(),
            StageTable::WeightValues(_) => "bobot_nilai".to_string(),
            StageTable::CfSf {
                criterion_index, ..
            } => format!("cf_sf_kriteria_{}", criterion_index + 1),
            StageTable::FinalResults(_) => "hasil_akhir".to_string(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            StageTable::InputValues(_) => "Input values".to_string(),
            StageTable::GapCalculation(_) => "Gap calculation".to_string(),
            StageTable::WeightValues(_) => "Gap weights".to_string(),
            StageTable::CfSf { criterion_name, .. } => {
                format!("Core/secondary factor: {criterion_name}")
            }
            StageTable::FinalResults(_) => "Final results".to_string(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            StageTable::InputValues(rows) => rows.len(),
            StageTable::GapCalculation(rows) => rows.len(),
            StageTable::WeightValues(rows) => rows.len(),
            StageTable::CfSf { rows, .. } => rows.len(),
            StageTable::FinalResults(rows) => rows.len(),
        }
    }
}

/// Ordered stage tables. Wire keys are `tabel_{position}_{name}` with 1-based positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageTables {
    tables: Vec<StageTable>,
}

impl StageTables {
    pub fn new(tables: Vec<StageTable>) -> Self {
        Self { tables }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables paired with their wire keys, in emission order.
    pub fn keyed(&self) -> impl Iterator<Item = (String, &StageTable)> {
        self.tables
            .iter()
            .enumerate()
            .map(|(position, table)| (format!("tabel_{}_{}", position + 1, table.wire_name()), table))
    }

    pub fn input_values(&self) -> Option<&[SubCriterionRow<InputCell>]> {
        self.tables.iter().find_map(|table| match table {
            StageTable::InputValues(rows) => Some(rows.as_slice()),
            _ => None,
        })
    }

    pub fn gap_calculation(&self) -> Option<&[SubCriterionRow<i32>]> {
        self.tables.iter().find_map(|table| match table {
            StageTable::GapCalculation(rows) => Some(rows.as_slice()),
            _ => None,
        })
    }

    pub fn weight_values(&self) -> Option<&[SubCriterionRow<f64>]> {
        self.tables.iter().find_map(|table| match table {
            StageTable::WeightValues(rows) => Some(rows.as_slice()),
            _ => None,
        })
    }

    pub fn cf_sf(&self, criterion_index: usize) -> Option<&[CfSfRow]> {
        self.tables.iter().find_map(|table| match table {
            StageTable::CfSf {
                criterion_index: index,
                rows,
                ..
            } if *index == criterion_index => Some(rows.as_slice()),
            _ => None,
        })
    }

    pub fn final_results(&self) -> Option<&[FinalRow]> {
        self.tables.iter().find_map(|table| match table {
            StageTable::FinalResults(rows) => Some(rows.as_slice()),
            _ => None,
        })
    }
}
