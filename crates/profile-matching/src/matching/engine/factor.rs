use crate::matching::domain::FactorKind;
use serde::Serialize;

/// Share of the core-factor mean in a criterion total, in percent.
pub const CORE_FACTOR_SHARE: f64 = 60.0;
/// Share of the secondary-factor mean in a criterion total, in percent.
pub const SECONDARY_FACTOR_SHARE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorScore {
    pub ncf: f64,
    pub nsf: f64,
    pub total: f64,
}

/// Combine one criterion's sub-criterion weights into NCF, NSF and the 60/40 total.
///
/// A `None` weight is a cell the applicant never received a score for: it counts toward its
/// group's size with weight 0. An empty group has mean 0; the other group is not promoted
/// to 100%.
pub fn aggregate_factors(weights: &[(FactorKind, Option<f64>)]) -> FactorScore {
    let ncf = group_mean(weights, FactorKind::CoreFactor);
    let nsf = group_mean(weights, FactorKind::SecondaryFactor);
    let total = (ncf * CORE_FACTOR_SHARE + nsf * SECONDARY_FACTOR_SHARE) / 100.0;

    FactorScore { ncf, nsf, total }
}

fn group_mean(weights: &[(FactorKind, Option<f64>)], kind: FactorKind) -> f64 {
    let (sum, count) = weights
        .iter()
        .filter(|(factor, _)| *factor == kind)
        .fold((0.0, 0usize), |(sum, count), (_, weight)| {
            (sum + weight.unwrap_or(0.0), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `Σ(total × bobot) / 100` over every criterion. Bobot values are used as declared.
pub fn final_score(contributions: &[(f64, f64)]) -> f64 {
    contributions
        .iter()
        .map(|(total, bobot)| total * bobot)
        .sum::<f64>()
        / 100.0
}
