use serde::{Deserialize, Serialize};

/// Outcome tier derived from an applicant's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankTier {
    #[serde(rename = "Terpilih")]
    Selected,
    #[serde(rename = "Kandidat")]
    Candidate,
    #[serde(rename = "Tidak Lolos")]
    Rejected,
}

impl RankTier {
    /// Rank 1 is selected, ranks 2 and 3 are candidates, everyone else is rejected.
    pub const fn for_rank(rank: usize) -> Self {
        match rank {
            0 | 1 => Self::Selected,
            2 | 3 => Self::Candidate,
            _ => Self::Rejected,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Selected => "Terpilih",
            Self::Candidate => "Kandidat",
            Self::Rejected => "Tidak Lolos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSlot {
    /// Position of the ranked item in the input slice.
    pub index: usize,
    pub rank: usize,
    pub tier: RankTier,
}

/// Order scores descending and hand out ranks `1..=N`.
///
/// Equal scores keep their input order and still receive distinct ranks.
pub fn rank(scores: &[f64]) -> Vec<RankSlot> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

    order
        .into_iter()
        .enumerate()
        .map(|(position, index)| {
            let rank = position + 1;
            RankSlot {
                index,
                rank,
                tier: RankTier::for_rank(rank),
            }
        })
        .collect()
}
