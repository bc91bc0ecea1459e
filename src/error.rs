use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFile,
    Format,
    NoData,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("The file {} does not exist.", .0.display())]
    MissingFile(PathBuf),
    #[error("Wrong file format: {} does not end with {expected}.", .path.display())]
    WrongSuffix {
        path: PathBuf,
        expected: &'static str,
    },
    #[error("The column {0} does not exist in the file.")]
    MissingColumn(String),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("No data to analyze.")]
    NotLoaded,
    #[error("No data to analyze: the assessment table is empty.")]
    EmptyTable,
    #[error("No data found for student: {0}")]
    StudentNotFound(String),
    #[error("No subject scores recorded for student: {0}")]
    NoScores(String),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::MissingFile(_) => ErrorKind::MissingFile,
            AnalysisError::WrongSuffix { .. }
            | AnalysisError::MissingColumn(_)
            | AnalysisError::Csv(_) => ErrorKind::Format,
            AnalysisError::NotLoaded
            | AnalysisError::EmptyTable
            | AnalysisError::StudentNotFound(_)
            | AnalysisError::NoScores(_) => ErrorKind::NoData,
        }
    }
}
