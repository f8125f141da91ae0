//! Maps the typed result onto the loosely shaped JSON the admin frontend renders.
//!
//! Stage tables become `tahapan_perhitungan.tabel_{n}_{name}` arrays whose rows are keyed by
//! criterion (`K1`) and sub-criterion (`S1`) codes, so the shape varies with the job tree.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::result::{CalculationResult, CriterionScore, RankingEntry};
use super::stages::{CfSfRow, Cell, FinalRow, StageTable, StageTables, SubCriterionRow};
use crate::matching::domain::{Applicant, ApplicantId, CriterionId, JobPositionId};
use crate::matching::validation::CalculationWarning;

impl Serialize for CalculationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CalculationPayload::from_result(self).serialize(serializer)
    }
}

#[derive(Serialize)]
struct CalculationPayload<'a> {
    pekerjaan: JobPositionRef<'a>,
    dihitung_pada: String,
    ranking_summary: Vec<RankingSummaryRow<'a>>,
    ranking_details: Vec<RankingDetail<'a>>,
    perhitungan_summary: SummaryPayload<'a>,
    tahapan_perhitungan: &'a StageTables,
}

impl<'a> CalculationPayload<'a> {
    fn from_result(result: &'a CalculationResult) -> Self {
        let summary = &result.summary;
        Self {
            pekerjaan: JobPositionRef {
                id: &result.job_position.id,
                nama: &result.job_position.name,
            },
            dihitung_pada: timestamp(&result.calculated_at),
            ranking_summary: result.ranking.iter().map(RankingSummaryRow::from).collect(),
            ranking_details: result.ranking.iter().map(RankingDetail::from).collect(),
            perhitungan_summary: SummaryPayload {
                total_pelamar: summary.total_applicants,
                total_kriteria: summary.total_criteria,
                total_detail_records: summary.total_detail_records,
                total_agregat_records: summary.total_aggregate_records,
                completeness: CompletenessPayload {
                    is_complete: summary.completeness.is_complete,
                    warnings: summary
                        .completeness
                        .warnings
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    issues: &summary.completeness.warnings,
                },
            },
            tahapan_perhitungan: &result.stages,
        }
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Serialize)]
struct JobPositionRef<'a> {
    id: &'a JobPositionId,
    nama: &'a str,
}

#[derive(Serialize)]
struct RankingSummaryRow<'a> {
    peringkat: usize,
    pelamar_id: &'a ApplicantId,
    namapelamar: &'a str,
    hasil_akhir: f64,
    keterangan: &'static str,
}

impl<'a> From<&'a RankingEntry> for RankingSummaryRow<'a> {
    fn from(entry: &'a RankingEntry) -> Self {
        Self {
            peringkat: entry.rank,
            pelamar_id: &entry.applicant.id,
            namapelamar: &entry.applicant.name,
            hasil_akhir: entry.final_score,
            keterangan: entry.tier.label(),
        }
    }
}

#[derive(Serialize)]
struct RankingDetail<'a> {
    peringkat: usize,
    keterangan: &'static str,
    pelamar: &'a Applicant,
    lengkap: bool,
    kriteria_scores: Vec<KriteriaScore<'a>>,
    final_calculation: FinalCalculation<'a>,
}

impl<'a> From<&'a RankingEntry> for RankingDetail<'a> {
    fn from(entry: &'a RankingEntry) -> Self {
        Self {
            peringkat: entry.rank,
            keterangan: entry.tier.label(),
            pelamar: &entry.applicant,
            lengkap: entry.is_complete,
            kriteria_scores: entry
                .criterion_scores
                .iter()
                .map(KriteriaScore::from)
                .collect(),
            final_calculation: FinalCalculation {
                score: entry.final_score,
                formula: entry.formula(),
                details: entry
                    .criterion_scores
                    .iter()
                    .map(|score| FinalDetail {
                        kriteria: &score.name,
                        kode: &score.code,
                        nilai_total: score.total,
                        bobot: score.bobot,
                        kontribusi: score.contribution,
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Serialize)]
struct KriteriaScore<'a> {
    kriteria_id: &'a CriterionId,
    kode: &'a str,
    nama_kriteria: &'a str,
    bobot: f64,
    ncf: f64,
    nsf: f64,
    nilai_total: f64,
}

impl<'a> From<&'a CriterionScore> for KriteriaScore<'a> {
    fn from(score: &'a CriterionScore) -> Self {
        Self {
            kriteria_id: &score.criterion_id,
            kode: &score.code,
            nama_kriteria: &score.name,
            bobot: score.bobot,
            ncf: score.ncf,
            nsf: score.nsf,
            nilai_total: score.total,
        }
    }
}

#[derive(Serialize)]
struct FinalCalculation<'a> {
    score: f64,
    formula: String,
    details: Vec<FinalDetail<'a>>,
}

#[derive(Serialize)]
struct FinalDetail<'a> {
    kriteria: &'a str,
    kode: &'a str,
    nilai_total: f64,
    bobot: f64,
    kontribusi: f64,
}

#[derive(Serialize)]
struct SummaryPayload<'a> {
    total_pelamar: usize,
    total_kriteria: usize,
    total_detail_records: usize,
    total_agregat_records: usize,
    completeness: CompletenessPayload<'a>,
}

#[derive(Serialize)]
struct CompletenessPayload<'a> {
    is_complete: bool,
    warnings: Vec<String>,
    issues: &'a [CalculationWarning],
}

impl Serialize for StageTables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, table) in self.keyed() {
            map.serialize_entry(&key, table)?;
        }
        map.end()
    }
}

impl Serialize for StageTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StageTable::InputValues(rows) => serializer.collect_seq(rows),
            StageTable::GapCalculation(rows) => serializer.collect_seq(rows),
            StageTable::WeightValues(rows) => serializer.collect_seq(rows),
            StageTable::CfSf { rows, .. } => serializer.collect_seq(rows),
            StageTable::FinalResults(rows) => serializer.collect_seq(rows),
        }
    }
}

impl<T: Serialize> Serialize for SubCriterionRow<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("pelamar_id", &self.applicant_id)?;
        map.serialize_entry("nama_pelamar", &self.applicant_name)?;

        let mut start = 0;
        while start < self.cells.len() {
            let code = &self.cells[start].criterion_code;
            let end = self.cells[start..]
                .iter()
                .position(|cell| &cell.criterion_code != code)
                .map_or(self.cells.len(), |offset| start + offset);
            map.serialize_entry(code, &CriterionCells(&self.cells[start..end]))?;
            start = end;
        }

        map.end()
    }
}

struct CriterionCells<'a, T>(&'a [Cell<T>]);

impl<T: Serialize> Serialize for CriterionCells<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for cell in self.0 {
            map.serialize_entry(&cell.code, &cell.value)?;
        }
        map.end()
    }
}

impl Serialize for CfSfRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 5))?;
        map.serialize_entry("pelamar_id", &self.applicant_id)?;
        map.serialize_entry("nama_pelamar", &self.applicant_name)?;
        for cell in &self.cells {
            map.serialize_entry(&cell.code, &cell.weight)?;
        }
        map.serialize_entry("ncf", &self.score.ncf)?;
        map.serialize_entry("nsf", &self.score.nsf)?;
        map.serialize_entry("nilai_total", &self.score.total)?;
        map.end()
    }
}

impl Serialize for FinalRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.criterion_totals.len() + 5))?;
        map.serialize_entry("pelamar_id", &self.applicant_id)?;
        map.serialize_entry("nama_pelamar", &self.applicant_name)?;
        for (code, total) in &self.criterion_totals {
            map.serialize_entry(code, total)?;
        }
        map.serialize_entry("hasil_akhir", &self.final_score)?;
        map.serialize_entry("peringkat", &self.rank)?;
        map.serialize_entry("keterangan", self.tier.label())?;
        map.end()
    }
}
