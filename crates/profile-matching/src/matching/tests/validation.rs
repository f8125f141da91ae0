use super::common::*;

use crate::matching::domain::{ApplicantId, FactorKind, SubCriterionId};
use crate::matching::engine::{EngineConfig, ProfileMatchingEngine};
use crate::matching::validation::ValidationError;

#[test]
fn job_without_criteria_is_rejected() {
    let mut job = single_criterion_job();
    job.criteria.clear();

    let err = engine()
        .calculate(&job, &pair_of_applicants(), &pair_matrix())
        .expect_err("no criteria");
    assert!(matches!(err, ValidationError::NoCriteria(_)));
}

#[test]
fn criterion_without_sub_criteria_is_rejected() {
    let mut job = three_criteria_job();
    job.criteria[1].sub_criteria.clear();

    let err = engine()
        .calculate(&job, &five_applicants(), &five_applicant_matrix())
        .expect_err("empty criterion");
    assert_eq!(err, ValidationError::EmptyCriterion("k-2".into()));
}

#[test]
fn targets_outside_engine_scale_are_rejected() {
    for target in [0, 6, 10] {
        let mut job = single_criterion_job();
        job.criteria[0].sub_criteria[0].target = target;

        let err = engine()
            .calculate(&job, &pair_of_applicants(), &pair_matrix())
            .expect_err("target out of range");
        assert_eq!(
            err,
            ValidationError::TargetOutOfRange {
                sub_criterion: "s-1".into(),
                target,
            }
        );
    }
}

#[test]
fn duplicate_sub_criteria_are_rejected() {
    let mut job = three_criteria_job();
    job.criteria[2]
        .sub_criteria
        .push(sub("s-1", "Logika Ulang", 3, FactorKind::CoreFactor));

    let err = engine()
        .calculate(&job, &five_applicants(), &five_applicant_matrix())
        .expect_err("duplicate sub-criterion");
    assert_eq!(err, ValidationError::DuplicateSubCriterion("s-1".into()));
}

#[test]
fn negative_bobot_is_rejected() {
    let mut job = single_criterion_job();
    job.criteria[0].bobot = -5.0;

    let err = engine()
        .calculate(&job, &pair_of_applicants(), &pair_matrix())
        .expect_err("negative bobot");
    assert!(matches!(err, ValidationError::BobotOutOfRange { .. }));
}

#[test]
fn strict_mode_requires_bobot_to_sum_to_hundred() {
    let mut job = three_criteria_job();
    job.criteria[0].bobot = 30.0;

    let strict = ProfileMatchingEngine::new(EngineConfig {
        strict_bobot_sum: true,
        ..EngineConfig::default()
    });
    let err = strict
        .calculate(&job, &five_applicants(), &five_applicant_matrix())
        .expect_err("bobot sum 90");
    assert_eq!(err, ValidationError::BobotSum { total: 90.0 });

    assert!(engine()
        .calculate(&job, &five_applicants(), &five_applicant_matrix())
        .is_ok());
}

#[test]
fn scores_outside_raw_range_are_rejected_not_clamped() {
    for value in [-1, 101, 250] {
        let matrix = matrix(&[("a-1", &[("s-1", value), ("s-2", 50)])]);
        let err = engine()
            .calculate(&single_criterion_job(), &pair_of_applicants(), &matrix)
            .expect_err("score out of range");
        assert_eq!(
            err,
            ValidationError::InvalidInputRange {
                applicant: ApplicantId::from("a-1"),
                sub_criterion: SubCriterionId::from("s-1"),
                value,
            }
        );
    }
}

#[test]
fn boundary_scores_are_accepted() {
    let matrix = matrix(&[("a-1", &[("s-1", 0), ("s-2", 100)])]);
    let result = engine()
        .calculate(&single_criterion_job(), &pair_of_applicants(), &matrix)
        .expect("0 and 100 are valid");
    assert_eq!(result.ranking.len(), 1);
}

#[test]
fn empty_matrix_is_rejected() {
    let err = engine()
        .calculate(&single_criterion_job(), &pair_of_applicants(), &matrix(&[]))
        .expect_err("empty matrix");
    assert_eq!(err, ValidationError::EmptyMatrix);
}

#[test]
fn unregistered_applicant_is_rejected() {
    let matrix = matrix(&[("ghost", &[("s-1", 50), ("s-2", 50)])]);
    let err = engine()
        .calculate(&single_criterion_job(), &pair_of_applicants(), &matrix)
        .expect_err("unknown applicant");
    assert_eq!(err, ValidationError::UnknownApplicant("ghost".into()));
}

#[test]
fn cells_for_other_jobs_are_rejected() {
    let matrix = matrix(&[("a-1", &[("s-1", 50), ("s-9", 50)])]);
    let err = engine()
        .calculate(&single_criterion_job(), &pair_of_applicants(), &matrix)
        .expect_err("foreign sub-criterion");
    assert!(matches!(
        err,
        ValidationError::UnknownSubCriterion { ref sub_criterion, .. } if sub_criterion.0 == "s-9"
    ));
}

#[test]
fn oversized_matrix_is_rejected() {
    let limited = ProfileMatchingEngine::new(EngineConfig {
        max_matrix_cells: 3,
        ..EngineConfig::default()
    });
    let err = limited
        .calculate(&single_criterion_job(), &pair_of_applicants(), &pair_matrix())
        .expect_err("four cells over a limit of three");
    assert_eq!(err, ValidationError::MatrixTooLarge { cells: 4, limit: 3 });
}
