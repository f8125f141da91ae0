use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a job position (`pekerjaan`).
    JobPositionId
);
string_id!(
    /// Identifier of a criterion (`kriteria`).
    CriterionId
);
string_id!(
    /// Identifier of a sub-criterion (`sub_kriteria`).
    SubCriterionId
);
string_id!(
    /// Identifier of an applicant (`pelamar`).
    ApplicantId
);

/// Status flag splitting a criterion's sub-criteria into the 60/40 groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorKind {
    #[serde(rename = "core_factor", alias = "Core Factor", alias = "CF")]
    CoreFactor,
    #[serde(rename = "secondary_factor", alias = "Secondary Factor", alias = "SF")]
    SecondaryFactor,
}

impl FactorKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::CoreFactor, Self::SecondaryFactor]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CoreFactor => "Core Factor",
            Self::SecondaryFactor => "Secondary Factor",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::CoreFactor => "CF",
            Self::SecondaryFactor => "SF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCriterion {
    pub id: SubCriterionId,
    #[serde(rename = "nama")]
    pub name: String,
    pub target: u8,
    #[serde(rename = "status")]
    pub factor: FactorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    #[serde(rename = "nama")]
    pub name: String,
    /// Weight percentage of this criterion in the final score.
    pub bobot: f64,
    #[serde(rename = "sub_kriteria", default)]
    pub sub_criteria: Vec<SubCriterion>,
}

/// Job position together with the criteria tree the engine scores against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosition {
    pub id: JobPositionId,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "kriteria", default)]
    pub criteria: Vec<Criterion>,
}

impl JobPosition {
    pub fn sub_criterion_count(&self) -> usize {
        self.criteria
            .iter()
            .map(|criterion| criterion.sub_criteria.len())
            .sum()
    }

    pub fn bobot_total(&self) -> f64 {
        self.criteria.iter().map(|criterion| criterion.bobot).sum()
    }

    /// Sub-criteria in tree order, paired with their criterion position and positional code.
    pub fn coded_sub_criteria(&self) -> impl Iterator<Item = (usize, String, &SubCriterion)> {
        self.criteria
            .iter()
            .enumerate()
            .flat_map(|(criterion_index, criterion)| {
                criterion
                    .sub_criteria
                    .iter()
                    .enumerate()
                    .map(move |(position, sub)| (criterion_index, sub_criterion_code(position), sub))
            })
    }
}

/// Positional code of a criterion: `K1`, `K2`, ...
pub fn criterion_code(index: usize) -> String {
    format!("K{}", index + 1)
}

/// Positional code of a sub-criterion within its criterion: `S1`, `S2`, ...
pub fn sub_criterion_code(position: usize) -> String {
    format!("S{}", position + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telepon", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "alamat", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Snapshot of the job positions and applicants maintained by the CRUD layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "pekerjaan", default)]
    pub job_positions: Vec<JobPosition>,
    #[serde(rename = "pelamar", default)]
    pub applicants: Vec<Applicant>,
}

impl Catalog {
    pub fn job_position(&self, id: &JobPositionId) -> Option<&JobPosition> {
        self.job_positions.iter().find(|job| &job.id == id)
    }
}

/// Raw scores submitted for one applicant, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantScores {
    pub applicant_id: ApplicantId,
    pub values: Vec<(SubCriterionId, i64)>,
}

impl ApplicantScores {
    pub fn get(&self, sub_criterion: &SubCriterionId) -> Option<i64> {
        self.values
            .iter()
            .find(|(id, _)| id == sub_criterion)
            .map(|(_, value)| *value)
    }
}

/// Applicant x sub-criterion input matrix.
///
/// On the wire this is `{ applicantId: { subCriteriaId: number } }`. Document order is kept
/// because it is the applicant submission order the ranker falls back on for ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreMatrix {
    rows: Vec<ApplicantScores>,
    /// Row position per applicant.
    index: HashMap<ApplicantId, usize>,
}

impl ScoreMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, appending the applicant row on first use.
    pub fn insert(&mut self, applicant: ApplicantId, sub_criterion: SubCriterionId, value: i64) {
        let position = self.row_position(applicant);
        let row = &mut self.rows[position];

        match row.values.iter_mut().find(|(id, _)| *id == sub_criterion) {
            Some(cell) => cell.1 = value,
            None => row.values.push((sub_criterion, value)),
        }
    }

    /// Append a complete applicant row, handing it back if the applicant already has one.
    pub(crate) fn push_row(&mut self, row: ApplicantScores) -> Result<(), ApplicantScores> {
        if self.index.contains_key(&row.applicant_id) {
            return Err(row);
        }
        self.index.insert(row.applicant_id.clone(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    /// Ensure an applicant row exists even when no cell was submitted for it.
    pub fn insert_applicant(&mut self, applicant: ApplicantId) {
        self.row_position(applicant);
    }

    fn row_position(&mut self, applicant: ApplicantId) -> usize {
        if let Some(position) = self.index.get(&applicant) {
            return *position;
        }
        let position = self.rows.len();
        self.index.insert(applicant.clone(), position);
        self.rows.push(ApplicantScores {
            applicant_id: applicant,
            values: Vec::new(),
        });
        position
    }

    pub fn get(&self, applicant: &ApplicantId, sub_criterion: &SubCriterionId) -> Option<i64> {
        self.row(applicant).and_then(|row| row.get(sub_criterion))
    }

    pub fn row(&self, applicant: &ApplicantId) -> Option<&ApplicantScores> {
        self.index.get(applicant).map(|position| &self.rows[*position])
    }

    pub fn rows(&self) -> &[ApplicantScores] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for ScoreMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.applicant_id, &OrderedCells(&row.values))?;
        }
        map.end()
    }
}

struct OrderedCells<'a>(&'a [(SubCriterionId, i64)]);

impl Serialize for OrderedCells<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, value) in self.0 {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MatrixVisitor)
    }
}

struct MatrixVisitor;

impl<'de> Visitor<'de> for MatrixVisitor {
    type Value = ScoreMatrix;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of applicant ids to sub-criterion score maps")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut matrix = ScoreMatrix::new();

        while let Some(applicant_id) = access.next_key::<ApplicantId>()? {
            let CellsSeed(values) = access.next_value::<CellsSeed>()?;
            matrix
                .push_row(ApplicantScores {
                    applicant_id,
                    values,
                })
                .map_err(|row| {
                    de::Error::custom(format!(
                        "duplicate applicant {} in matrix_data",
                        row.applicant_id
                    ))
                })?;
        }

        Ok(matrix)
    }
}

struct CellsSeed(Vec<(SubCriterionId, i64)>);

impl<'de> Deserialize<'de> for CellsSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CellsVisitor)
    }
}

struct CellsVisitor;

impl<'de> Visitor<'de> for CellsVisitor {
    type Value = CellsSeed;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of sub-criterion ids to integer scores")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut values: Vec<(SubCriterionId, i64)> = Vec::new();
        let mut seen = HashSet::new();
        while let Some((id, value)) = access.next_entry::<SubCriterionId, i64>()? {
            if !seen.insert(id.clone()) {
                return Err(de::Error::custom(format!(
                    "duplicate sub-criterion {id} in one applicant's scores"
                )));
            }
            values.push((id, value));
        }
        Ok(CellsSeed(values))
    }
}
