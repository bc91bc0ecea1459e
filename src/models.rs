use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Subject {
    #[serde(rename = "INF 652")]
    Inf652,
    #[serde(rename = "CSC 241")]
    Csc241,
    #[serde(rename = "ITM 101")]
    Itm101,
    #[serde(rename = "ITM 371")]
    Itm371,
    #[serde(rename = "COSC 201")]
    Cosc201,
}

impl Subject {
    /// Fixed subject order; ties between equal scores resolve to the earlier entry.
    pub const ALL: [Subject; 5] = [
        Subject::Inf652,
        Subject::Csc241,
        Subject::Itm101,
        Subject::Itm371,
        Subject::Cosc201,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Subject::Inf652 => "INF 652",
            Subject::Csc241 => "CSC 241",
            Subject::Itm101 => "ITM 101",
            Subject::Itm371 => "ITM 371",
            Subject::Cosc201 => "COSC 201",
        }
    }

    /// Header spellings accepted for this subject's column.
    pub fn headers(self) -> [&'static str; 2] {
        match self {
            Subject::Inf652 => ["INF 652", "INF652"],
            Subject::Csc241 => ["CSC 241", "CSC241"],
            Subject::Itm101 => ["ITM 101", "ITM101"],
            Subject::Itm371 => ["ITM 371", "ITM371"],
            Subject::Cosc201 => ["COSC 201", "COSC201"],
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cell values read as missing scores, alongside the empty cell.
pub const NA_TOKENS: [&str; 7] = ["NA", "N/A", "n/a", "null", "NULL", "nan", "#N/A"];

fn score_cell<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(token) if NA_TOKENS.contains(&token) => Ok(None),
        Some(token) => token
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid score {token:?}"))),
    }
}

/// One line of the assessment CSV as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Semester")]
    pub semester: String,
    #[serde(
        rename = "INF 652",
        alias = "INF652",
        default,
        deserialize_with = "score_cell"
    )]
    pub inf_652: Option<f64>,
    #[serde(
        rename = "CSC 241",
        alias = "CSC241",
        default,
        deserialize_with = "score_cell"
    )]
    pub csc_241: Option<f64>,
    #[serde(
        rename = "ITM 101",
        alias = "ITM101",
        default,
        deserialize_with = "score_cell"
    )]
    pub itm_101: Option<f64>,
    #[serde(
        rename = "ITM 371",
        alias = "ITM371",
        default,
        deserialize_with = "score_cell"
    )]
    pub itm_371: Option<f64>,
    #[serde(
        rename = "COSC 201",
        alias = "COSC201",
        default,
        deserialize_with = "score_cell"
    )]
    pub cosc_201: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRow {
    pub name: String,
    pub semester: String,
    /// Indexed in `Subject::ALL` order.
    pub scores: [Option<f64>; 5],
    pub average: Option<f64>,
}

impl AssessmentRow {
    pub fn score(&self, subject: Subject) -> Option<f64> {
        Subject::ALL
            .iter()
            .position(|s| *s == subject)
            .and_then(|idx| self.scores[idx])
    }

    pub fn subject_scores(&self) -> impl Iterator<Item = (Subject, Option<f64>)> + '_ {
        Subject::ALL.into_iter().zip(self.scores.iter().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentTable {
    pub rows: Vec<AssessmentRow>,
}

impl AssessmentTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// First row for the student; names match exactly.
    pub fn find_student(&self, name: &str) -> Option<&AssessmentRow> {
        self.rows.iter().find(|row| row.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngagementRow {
    pub name: String,
    pub time_spent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngagementTable {
    pub has_time_spent: bool,
    pub rows: Vec<EngagementRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum EngagementInsight {
    TimeSpent(String),
    #[default]
    NoData,
}

impl fmt::Display for EngagementInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngagementInsight::TimeSpent(value) => f.write_str(value),
            EngagementInsight::NoData => f.write_str("No web data available"),
        }
    }
}

impl From<EngagementInsight> for String {
    fn from(insight: EngagementInsight) -> Self {
        insight.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentPerformance {
    pub average_score: f64,
    pub grade: Grade,
    pub top_semester: Option<String>,
    pub best_subject: Subject,
    pub lowest_subject: Subject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectScore {
    pub subject: Subject,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub student_count: usize,
    pub average_score: Option<f64>,
    pub top_semester: Option<String>,
    pub high_achievers: Vec<String>,
    pub at_risk: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReport {
    pub student_name: String,
    pub performance: StudentPerformance,
    pub subjects: Vec<SubjectScore>,
    pub engagement: EngagementInsight,
    pub cohort: CohortSummary,
    pub notable_observations: String,
    pub recommendations: String,
}
