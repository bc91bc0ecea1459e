use std::fmt::Write;

use chrono::NaiveDate;

use crate::error::AnalysisError;
use crate::metrics;
use crate::models::{
    AssessmentRow, AssessmentTable, CohortSummary, EngagementInsight, StudentReport,
};

const RULE: &str =
    "-------------------------------------------------------------------------------";

/// Averages always carry a fractional digit (`90.0`, `89.8`).
pub fn format_average(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) if !value.is_nan() => format!("{value}"),
        _ => "nan".to_string(),
    }
}

pub fn build_report(
    table: &AssessmentTable,
    student: &AssessmentRow,
    engagement: &EngagementInsight,
) -> Result<StudentReport, AnalysisError> {
    let performance = metrics::student_performance(table, student)
        .ok_or_else(|| AnalysisError::NoScores(student.name.clone()))?;
    let cohort = metrics::cohort_summary(table).ok_or(AnalysisError::EmptyTable)?;

    Ok(StudentReport {
        student_name: student.name.clone(),
        subjects: metrics::subject_breakdown(student),
        engagement: engagement.clone(),
        notable_observations: metrics::notable_observation(&cohort.high_achievers),
        recommendations: metrics::recommendation(&cohort.at_risk),
        performance,
        cohort,
    })
}

pub fn render_summary(report: &StudentReport, generated_on: NaiveDate) -> String {
    let performance = &report.performance;
    let mut output = String::new();

    let _ = writeln!(output);
    let _ = writeln!(output);
    let _ = writeln!(output, "{RULE}");
    let _ = writeln!(output);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "School Assessment Summary Report for {}:",
        report.student_name
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "1. Overall Performance:");
    let _ = writeln!(
        output,
        "   - Average score: {}",
        format_average(performance.average_score)
    );
    let _ = writeln!(output, "   - Grade: {}", performance.grade);
    let _ = writeln!(
        output,
        "   - Top-performing semester: {}",
        performance.top_semester.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "2. Subject-wise Analysis:");
    for entry in &report.subjects {
        let _ = writeln!(
            output,
            "   - {}: Score: {}",
            entry.subject,
            format_score(entry.score)
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Best-performing class: {}", performance.best_subject);
    let _ = writeln!(output);
    let _ = writeln!(output, "3. Notable Observations:");
    let _ = writeln!(
        output,
        "   -{} shows a significant potential.",
        performance.best_subject
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "4. Web Data Insights:");
    let _ = writeln!(output, "   -Time spent: {}", report.engagement);
    let _ = writeln!(output);
    let _ = writeln!(output, "5. Recommendations:");
    let _ = writeln!(
        output,
        "   -The lowest performing class is {}, you should focus on this class. ",
        performance.lowest_subject
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "Report generated on: {}", generated_on.format("%Y-%m-%d"));

    output
}

pub fn render_cohort(summary: &CohortSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Cohort Assessment Overview");
    let _ = writeln!(output, "   - Students: {}", summary.student_count);
    let _ = writeln!(
        output,
        "   - Average score: {}",
        summary
            .average_score
            .map(|avg| format_average(metrics::round2(avg)))
            .unwrap_or_else(|| "N/A".to_string())
    );
    let _ = writeln!(
        output,
        "   - Top-performing semester: {}",
        summary.top_semester.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "Notable Observations:");
    let _ = writeln!(
        output,
        "   -{}",
        metrics::notable_observation(&summary.high_achievers)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "Recommendations:");
    let _ = writeln!(output, "   -{}", metrics::recommendation(&summary.at_risk));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, semester: &str, scores: [f64; 5]) -> AssessmentRow {
        let scores = scores.map(Some);
        AssessmentRow {
            name: name.to_string(),
            semester: semester.to_string(),
            average: metrics::mean(scores),
            scores,
        }
    }

    fn sample_table() -> AssessmentTable {
        AssessmentTable {
            rows: vec![
                row("Alice", "Fall", [95.0, 88.0, 91.0, 85.0, 90.0]),
                row("Bob", "Spring", [70.0, 75.0, 80.0, 65.0, 60.0]),
                row("Cara", "Spring", [99.0, 97.0, 95.0, 98.0, 96.0]),
            ],
        }
    }

    #[test]
    fn formats_numbers_like_console_output() {
        assert_eq!(format_average(90.0), "90.0");
        assert_eq!(format_average(89.8), "89.8");
        assert_eq!(format_average(72.35), "72.35");
        assert_eq!(format_score(Some(95.0)), "95");
        assert_eq!(format_score(Some(88.5)), "88.5");
        assert_eq!(format_score(None), "nan");
        assert_eq!(format_score(Some(f64::NAN)), "nan");
    }

    #[test]
    fn builds_report_with_cohort_context() {
        let table = sample_table();
        let report = build_report(
            &table,
            &table.rows[0],
            &EngagementInsight::TimeSpent("45".to_string()),
        )
        .unwrap();

        assert_eq!(report.student_name, "Alice");
        assert_eq!(report.subjects.len(), 5);
        assert_eq!(report.cohort.high_achievers, vec!["Cara"]);
        assert_eq!(report.cohort.at_risk, vec!["Bob"]);
        assert_eq!(
            report.recommendations,
            "Consider additional support for students: Bob"
        );
        assert_eq!(
            report.notable_observations,
            "Students with average more than 90% of total scores: Cara"
        );
    }

    #[test]
    fn report_serializes_with_display_labels() {
        let table = sample_table();
        let report = build_report(
            &table,
            &table.rows[0],
            &EngagementInsight::TimeSpent("45".to_string()),
        )
        .unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["student_name"], "Alice");
        assert_eq!(value["performance"]["grade"], "A");
        assert_eq!(value["performance"]["best_subject"], "INF 652");
        assert_eq!(value["performance"]["lowest_subject"], "ITM 371");
        assert_eq!(value["subjects"][3]["subject"], "ITM 371");
        assert_eq!(value["subjects"][3]["score"], 85.0);
        assert_eq!(value["engagement"], "45");
        assert_eq!(value["cohort"]["at_risk"][0], "Bob");

        let no_data = build_report(&table, &table.rows[0], &EngagementInsight::NoData).unwrap();
        let value = serde_json::to_value(&no_data).unwrap();
        assert_eq!(value["engagement"], "No web data available");
    }

    #[test]
    fn renders_fixed_layout() {
        let table = sample_table();
        let report = build_report(&table, &table.rows[0], &EngagementInsight::NoData).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();

        let expected = format!(
            "\n\n{RULE}\n\n\n\
School Assessment Summary Report for Alice:\n\
\n\
1. Overall Performance:\n\
\x20  - Average score: 89.8\n\
\x20  - Grade: A\n\
\x20  - Top-performing semester: Fall\n\
\n\
2. Subject-wise Analysis:\n\
\x20  - INF 652: Score: 95\n\
\x20  - CSC 241: Score: 88\n\
\x20  - ITM 101: Score: 91\n\
\x20  - ITM 371: Score: 85\n\
\x20  - COSC 201: Score: 90\n\
\n\
Best-performing class: INF 652\n\
\n\
3. Notable Observations:\n\
\x20  -INF 652 shows a significant potential.\n\
\n\
4. Web Data Insights:\n\
\x20  -Time spent: No web data available\n\
\n\
5. Recommendations:\n\
\x20  -The lowest performing class is ITM 371, you should focus on this class. \n\
\n\
Report generated on: 2026-02-02\n"
        );

        assert_eq!(render_summary(&report, date), expected);
    }

    #[test]
    fn renders_cohort_overview() {
        let summary = metrics::cohort_summary(&sample_table()).unwrap();
        let text = render_cohort(&summary);
        assert!(text.contains("   - Students: 3\n"));
        assert!(text.contains("   - Top-performing semester: Fall\n"));
        assert!(text.contains("   -Consider additional support for students: Bob\n"));
    }
}
