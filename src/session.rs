use std::path::Path;

use tracing::{debug, info};

use crate::engagement;
use crate::error::AnalysisError;
use crate::loader;
use crate::metrics;
use crate::models::{AssessmentTable, CohortSummary, EngagementInsight, StudentReport};
use crate::report;

/// State for one analysis run: the loaded assessment table and the most recent
/// engagement lookup.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    assessments: Option<AssessmentTable>,
    engagement: EngagementInsight,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the assessment table, replacing the current one only on success.
    pub fn process_file(&mut self, path: &Path) -> Result<usize, AnalysisError> {
        let table = loader::load_assessments(path)?;
        let rows = table.len();
        info!(path = %path.display(), rows, "assessment table loaded");
        self.assessments = Some(table);
        Ok(rows)
    }

    /// Succeeds whenever the file and its `Name` column are valid, even if the
    /// student has no row; the insight then stays at "no data".
    pub fn fetch_web_data(&mut self, path: &Path, student_name: &str) -> Result<(), AnalysisError> {
        self.engagement = EngagementInsight::NoData;
        let table = engagement::load_engagement(path)?;
        self.engagement = table.time_spent_for(student_name);
        debug!(rows = table.rows.len(), "engagement lookup finished");
        Ok(())
    }

    pub fn engagement(&self) -> &EngagementInsight {
        &self.engagement
    }

    pub fn assessments(&self) -> Result<&AssessmentTable, AnalysisError> {
        self.assessments.as_ref().ok_or(AnalysisError::NotLoaded)
    }

    /// `Ok(None)` for a loaded but empty table.
    pub fn cohort_summary(&self) -> Result<Option<CohortSummary>, AnalysisError> {
        Ok(metrics::cohort_summary(self.assessments()?))
    }

    pub fn analyze_student(&self, student_name: &str) -> Result<StudentReport, AnalysisError> {
        let table = self.assessments()?;
        if table.is_empty() {
            return Err(AnalysisError::EmptyTable);
        }
        let student = table
            .find_student(student_name)
            .ok_or_else(|| AnalysisError::StudentNotFound(student_name.to_string()))?;
        report::build_report(table, student, &self.engagement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Grade;
    use tempfile::TempDir;

    const ASSESSMENTS: &str = "Name,Semester,INF 652,CSC 241,ITM 101,ITM 371,COSC 201\n\
Alice,Fall,95,88,91,85,90\n\
Bob,Spring,70,75,80,65,60\n\
Cara,Spring,99,97,95,98,96\n";

    fn write(dir: &TempDir, file_name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(file_name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn loaded(dir: &TempDir) -> AnalysisSession {
        let mut session = AnalysisSession::new();
        let path = write(dir, "all_semester.csv", ASSESSMENTS);
        assert_eq!(session.process_file(&path).unwrap(), 3);
        session
    }

    #[test]
    fn analyze_before_load_is_no_data() {
        let session = AnalysisSession::new();
        let err = session.analyze_student("Alice").unwrap_err();
        assert!(matches!(err, AnalysisError::NotLoaded));
        assert!(matches!(session.cohort_summary(), Err(AnalysisError::NotLoaded)));
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded(&dir);

        let wrong = write(&dir, "grades.csv", ASSESSMENTS);
        assert!(session.process_file(&wrong).is_err());
        let missing = dir.path().join("spring_all_semester.csv");
        assert!(session.process_file(&missing).is_err());

        assert_eq!(session.assessments().unwrap().len(), 3);
    }

    #[test]
    fn unknown_student_yields_no_report() {
        let dir = TempDir::new().unwrap();
        let session = loaded(&dir);
        let err = session.analyze_student("Zed").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoData);
        assert!(matches!(err, AnalysisError::StudentNotFound(name) if name == "Zed"));
    }

    #[test]
    fn empty_table_is_distinct_from_not_loaded() {
        let dir = TempDir::new().unwrap();
        let mut session = AnalysisSession::new();
        let path = write(
            &dir,
            "all_semester.csv",
            "Name,Semester,INF 652,CSC 241,ITM 101,ITM 371,COSC 201\n",
        );
        session.process_file(&path).unwrap();

        assert_eq!(session.cohort_summary().unwrap(), None);
        assert!(matches!(
            session.analyze_student("Alice"),
            Err(AnalysisError::EmptyTable)
        ));
    }

    #[test]
    fn engagement_lookup_feeds_report() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded(&dir);
        let web = write(&dir, "web.csv", "Name,Time Spent\nAlice,45\n");

        session.fetch_web_data(&web, "Alice").unwrap();
        let report = session.analyze_student("Alice").unwrap();
        assert_eq!(report.engagement, EngagementInsight::TimeSpent("45".to_string()));
        assert_eq!(report.performance.grade, Grade::A);
        assert_eq!(report.cohort.at_risk, vec!["Bob"]);
    }

    #[test]
    fn lookup_without_time_column_still_succeeds() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded(&dir);
        let web = write(&dir, "web.csv", "Name,Visits\nAlice,3\n");

        session.fetch_web_data(&web, "Alice").unwrap();
        assert_eq!(session.engagement().to_string(), "No web data available");
    }

    #[test]
    fn failed_lookup_resets_insight() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded(&dir);
        let web = write(&dir, "web.csv", "Name,Time Spent\nAlice,45\n");
        session.fetch_web_data(&web, "Alice").unwrap();

        let bad = write(&dir, "bad.csv", "Student,Time Spent\nAlice,45\n");
        let err = session.fetch_web_data(&bad, "Alice").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(session.engagement(), &EngagementInsight::NoData);
    }
}
