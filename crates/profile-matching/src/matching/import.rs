use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{ApplicantId, ApplicantScores, Catalog, ScoreMatrix, SubCriterionId};

const APPLICANT_COLUMN: &str = "applicant_id";

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingApplicantColumn,
    DuplicateColumn(String),
    DuplicateApplicant {
        line: u64,
        applicant: String,
    },
    InvalidScore {
        line: u64,
        column: String,
        value: String,
    },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read import file: {}", err),
            ImportError::Csv(err) => write!(f, "invalid score CSV data: {}", err),
            ImportError::Json(err) => write!(f, "invalid catalog JSON: {}", err),
            ImportError::MissingApplicantColumn => {
                write!(f, "score CSV must start with an `{APPLICANT_COLUMN}` column")
            }
            ImportError::DuplicateColumn(column) => {
                write!(f, "score CSV repeats the `{column}` column")
            }
            ImportError::DuplicateApplicant { line, applicant } => {
                write!(f, "line {line}: applicant `{applicant}` already has a row")
            }
            ImportError::InvalidScore {
                line,
                column,
                value,
            } => write!(
                f,
                "line {line}, column `{column}`: `{value}` is not an integer score"
            ),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Json(err) => Some(err),
            ImportError::MissingApplicantColumn
            | ImportError::DuplicateColumn(_)
            | ImportError::DuplicateApplicant { .. }
            | ImportError::InvalidScore { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub fn load_catalog<R: Read>(reader: R) -> Result<Catalog, ImportError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_catalog_path<P: AsRef<Path>>(path: P) -> Result<Catalog, ImportError> {
    let file = std::fs::File::open(path)?;
    load_catalog(std::io::BufReader::new(file))
}

/// Read a score matrix from CSV: `applicant_id,<sub-criterion id>...`, one applicant per row.
///
/// Blank cells are left out of the matrix so the engine reports them as missing. A repeated
/// column or applicant row is an error rather than a silent overwrite.
pub fn parse_score_matrix<R: Read>(reader: R) -> Result<ScoreMatrix, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.get(0) != Some(APPLICANT_COLUMN) {
        return Err(ImportError::MissingApplicantColumn);
    }
    let sub_criteria: Vec<SubCriterionId> =
        headers.iter().skip(1).map(SubCriterionId::from).collect();
    let mut columns = HashSet::with_capacity(sub_criteria.len());
    if let Some(repeated) = sub_criteria.iter().find(|id| !columns.insert(*id)) {
        return Err(ImportError::DuplicateColumn(repeated.to_string()));
    }

    let mut matrix = ScoreMatrix::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let Some(applicant) = record.get(0).filter(|id| !id.is_empty()) else {
            continue;
        };
        let applicant_id = ApplicantId::from(applicant);

        let mut values = Vec::with_capacity(sub_criteria.len());
        for (sub_criterion, raw) in sub_criteria.iter().zip(record.iter().skip(1)) {
            if raw.is_empty() {
                continue;
            }
            let value = raw.parse::<i64>().map_err(|_| ImportError::InvalidScore {
                line,
                column: sub_criterion.to_string(),
                value: raw.to_string(),
            })?;
            values.push((sub_criterion.clone(), value));
        }
        matrix
            .push_row(ApplicantScores {
                applicant_id,
                values,
            })
            .map_err(|row| ImportError::DuplicateApplicant {
                line,
                applicant: row.applicant_id.to_string(),
            })?;
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_cells_stay_missing() {
        let csv = "applicant_id, s1, s2\n a-1, 80, \na-2,45,90\n";
        let matrix = parse_score_matrix(Cursor::new(csv)).expect("csv parses");

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.get(&"a-1".into(), &"s1".into()), Some(80));
        assert_eq!(matrix.get(&"a-1".into(), &"s2".into()), None);
        assert_eq!(matrix.get(&"a-2".into(), &"s2".into()), Some(90));
    }

    #[test]
    fn rows_keep_file_order() {
        let csv = "applicant_id,s1\nz,1\na,2\nm,3\n";
        let matrix = parse_score_matrix(Cursor::new(csv)).expect("csv parses");
        let order: Vec<&str> = matrix
            .rows()
            .iter()
            .map(|row| row.applicant_id.0.as_str())
            .collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn non_integer_cell_reports_position() {
        let csv = "applicant_id,s1,s2\na-1,80,good\n";
        let err = parse_score_matrix(Cursor::new(csv)).expect_err("invalid score");
        match err {
            ImportError::InvalidScore {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, "s2");
                assert_eq!(value, "good");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_applicant_row_is_rejected() {
        let csv = "applicant_id,s1,s2\n1,90,80\n1,10,\n";
        let err = parse_score_matrix(Cursor::new(csv)).expect_err("repeated applicant");
        match err {
            ImportError::DuplicateApplicant { line, applicant } => {
                assert_eq!(line, 3);
                assert_eq!(applicant, "1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_column_is_rejected() {
        let csv = "applicant_id,s1,s1\n1,90,10\n";
        let err = parse_score_matrix(Cursor::new(csv)).expect_err("repeated column");
        assert!(matches!(err, ImportError::DuplicateColumn(column) if column == "s1"));
    }

    #[test]
    fn header_must_name_applicant_column() {
        let err = parse_score_matrix(Cursor::new("id,s1\na,1\n")).expect_err("bad header");
        assert!(matches!(err, ImportError::MissingApplicantColumn));
    }

    #[test]
    fn catalog_reads_frontend_field_names() {
        let json = r#"{
            "pekerjaan": [{
                "id": "job-1",
                "nama": "Staff Gudang",
                "kriteria": [{
                    "id": "k-1",
                    "nama": "Fisik",
                    "bobot": 100,
                    "sub_kriteria": [
                        { "id": "s-1", "nama": "Stamina", "target": 4, "status": "Core Factor" }
                    ]
                }]
            }],
            "pelamar": [{ "id": "a-1", "nama": "Budi", "telepon": "0812" }]
        }"#;

        let catalog = load_catalog(Cursor::new(json)).expect("catalog parses");
        let job = catalog.job_position(&"job-1".into()).expect("job present");
        assert_eq!(job.criteria[0].sub_criteria[0].target, 4);
        assert_eq!(catalog.applicants[0].phone.as_deref(), Some("0812"));
    }
}
