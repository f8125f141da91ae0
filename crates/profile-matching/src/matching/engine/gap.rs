use super::scale::ScaleLevel;

/// Weight assigned to any gap the lookup table does not cover.
pub const FALLBACK_GAP_WEIGHT: f64 = 1.0;

/// Profile Matching gap table. Overqualification (positive gap) outweighs an
/// underqualification of the same magnitude.
const GAP_WEIGHTS: [(i32, f64); 9] = [
    (0, 5.0),
    (1, 4.5),
    (-1, 4.0),
    (2, 3.5),
    (-2, 3.0),
    (3, 2.5),
    (-3, 2.0),
    (4, 1.5),
    (-4, 1.0),
];

/// Signed distance between the applicant's converted level and the sub-criterion target.
pub fn compute_gap(level: ScaleLevel, target: u8) -> i32 {
    i32::from(level.value()) - i32::from(target)
}

pub fn lookup_gap_weight(gap: i32) -> Option<f64> {
    GAP_WEIGHTS
        .iter()
        .find(|(candidate, _)| *candidate == gap)
        .map(|(_, weight)| *weight)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapWeight {
    pub gap: i32,
    pub weight: f64,
    pub in_table: bool,
}

/// Map a gap to its weight, falling back to [`FALLBACK_GAP_WEIGHT`] outside the table.
pub fn weight_for_gap(gap: i32) -> GapWeight {
    match lookup_gap_weight(gap) {
        Some(weight) => GapWeight {
            gap,
            weight,
            in_table: true,
        },
        None => GapWeight {
            gap,
            weight: FALLBACK_GAP_WEIGHT,
            in_table: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_yields_maximum_weight() {
        assert_eq!(weight_for_gap(0).weight, 5.0);
        assert!(GAP_WEIGHTS.iter().all(|(_, weight)| *weight <= 5.0));
    }

    #[test]
    fn overqualification_beats_underqualification() {
        for gap in 1..=4 {
            assert!(
                weight_for_gap(gap).weight > weight_for_gap(-gap).weight,
                "gap {gap}"
            );
        }
    }

    #[test]
    fn out_of_table_gaps_fall_back_to_minimum() {
        for gap in [5, -5, 9, -9] {
            let mapped = weight_for_gap(gap);
            assert!(!mapped.in_table);
            assert_eq!(mapped.weight, FALLBACK_GAP_WEIGHT);
        }
        assert!(weight_for_gap(-4).in_table);
        assert_eq!(weight_for_gap(-4).weight, FALLBACK_GAP_WEIGHT);
    }

    #[test]
    fn gap_is_level_minus_target() {
        assert_eq!(compute_gap(ScaleLevel::SangatBaik, 3), 1);
        assert_eq!(compute_gap(ScaleLevel::KurangBaik, 3), -2);
        assert_eq!(compute_gap(ScaleLevel::Baik, 3), 0);
    }
}
