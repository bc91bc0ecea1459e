use std::path::Path;

use tracing::debug;

use crate::error::AnalysisError;
use crate::metrics;
use crate::models::{AssessmentRecord, AssessmentRow, AssessmentTable, Subject};

pub const ASSESSMENT_SUFFIX: &str = "all_semester.csv";
pub const CSV_SUFFIX: &str = ".csv";

/// Existence first, then the literal file-name suffix.
pub fn check_source(path: &Path, expected: &'static str) -> Result<(), AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::MissingFile(path.to_path_buf()));
    }
    if !path.to_string_lossy().ends_with(expected) {
        return Err(AnalysisError::WrongSuffix {
            path: path.to_path_buf(),
            expected,
        });
    }
    Ok(())
}

fn has_column(headers: &csv::StringRecord, names: &[&str]) -> bool {
    headers.iter().any(|h| names.iter().any(|name| *name == h))
}

pub fn load_assessments(path: &Path) -> Result<AssessmentTable, AnalysisError> {
    check_source(path, ASSESSMENT_SUFFIX)?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    for column in ["Name", "Semester"] {
        if !has_column(&headers, &[column]) {
            return Err(AnalysisError::MissingColumn(column.to_string()));
        }
    }
    for subject in Subject::ALL {
        if !has_column(&headers, &subject.headers()) {
            return Err(AnalysisError::MissingColumn(subject.label().to_string()));
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<AssessmentRecord>() {
        rows.push(AssessmentRow::from(result?));
    }

    debug!(path = %path.display(), rows = rows.len(), "loaded assessment table");
    Ok(AssessmentTable { rows })
}

impl From<AssessmentRecord> for AssessmentRow {
    fn from(record: AssessmentRecord) -> Self {
        let scores = [
            record.inf_652,
            record.csc_241,
            record.itm_101,
            record.itm_371,
            record.cosc_201,
        ];
        AssessmentRow {
            name: record.name,
            semester: record.semester,
            average: metrics::mean(scores),
            scores,
        }
    }
}
