mod result;
mod stages;
mod wire;

pub use result::{
    CalculationResult, CalculationSummary, Completeness, CriterionScore, JobPositionSummary,
    RankingEntry,
};
pub use stages::{
    CfSfCell, CfSfRow, Cell, FinalRow, InputCell, StageTable, StageTables, SubCriterionRow,
};
