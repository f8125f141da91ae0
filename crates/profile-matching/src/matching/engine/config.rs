use serde::{Deserialize, Serialize};

/// Engine policy knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reject job positions whose criteria bobot do not sum to 100 instead of warning.
    pub strict_bobot_sum: bool,
    /// Upper bound on applicants x sub-criteria evaluated in one run.
    pub max_matrix_cells: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_bobot_sum: false,
            max_matrix_cells: 100_000,
        }
    }
}
