use crate::models::{
    AssessmentRow, AssessmentTable, CohortSummary, Grade, StudentPerformance, Subject,
    SubjectScore,
};

pub const HIGH_ACHIEVER_THRESHOLD: f64 = 90.0;
pub const AT_RISK_THRESHOLD: f64 = 80.0;

/// Mean of the present values. Missing and NaN entries are skipped.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Two decimals, halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Maps an average score onto a letter grade.
///
/// | Average   | Grade |
/// |-----------|-------|
/// | > 89      | A     |
/// | > 79      | B     |
/// | > 69      | C     |
/// | > 59      | D     |
/// | otherwise | F     |
pub fn grade(average: f64) -> Grade {
    match average {
        a if a > 89.0 => Grade::A,
        a if a > 79.0 => Grade::B,
        a if a > 69.0 => Grade::C,
        a if a > 59.0 => Grade::D,
        _ => Grade::F,
    }
}

fn pick_subject<F>(row: &AssessmentRow, better: F) -> Option<Subject>
where
    F: Fn(f64, f64) -> bool,
{
    let mut picked: Option<(Subject, f64)> = None;
    for (subject, score) in row.subject_scores() {
        let Some(score) = score.filter(|s| !s.is_nan()) else {
            continue;
        };
        match picked {
            Some((_, current)) if !better(score, current) => {}
            _ => picked = Some((subject, score)),
        }
    }
    picked.map(|(subject, _)| subject)
}

pub fn best_subject(row: &AssessmentRow) -> Option<Subject> {
    pick_subject(row, |candidate, current| candidate > current)
}

pub fn lowest_subject(row: &AssessmentRow) -> Option<Subject> {
    pick_subject(row, |candidate, current| candidate < current)
}

/// Semester with the greatest mean Average. Ties go to the semester seen first.
pub fn top_semester(rows: &[AssessmentRow]) -> Option<String> {
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();
    for row in rows {
        let idx = match groups.iter().position(|(name, _, _)| *name == row.semester) {
            Some(idx) => idx,
            None => {
                groups.push((row.semester.as_str(), 0.0, 0));
                groups.len() - 1
            }
        };
        if let Some(average) = row.average.filter(|a| !a.is_nan()) {
            groups[idx].1 += average;
            groups[idx].2 += 1;
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (semester, sum, count) in groups {
        if count == 0 {
            continue;
        }
        let group_mean = sum / count as f64;
        match best {
            Some((_, current)) if group_mean <= current => {}
            _ => best = Some((semester, group_mean)),
        }
    }
    best.map(|(semester, _)| semester.to_string())
}

pub fn cohort_average(rows: &[AssessmentRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    mean(rows.iter().map(|row| row.average))
}

fn names_where<F>(rows: &[AssessmentRow], keep: F) -> Vec<String>
where
    F: Fn(f64) -> bool,
{
    rows.iter()
        .filter(|row| row.average.is_some_and(&keep))
        .map(|row| row.name.clone())
        .collect()
}

pub fn high_achievers(rows: &[AssessmentRow]) -> Vec<String> {
    names_where(rows, |average| average > HIGH_ACHIEVER_THRESHOLD)
}

pub fn at_risk(rows: &[AssessmentRow]) -> Vec<String> {
    names_where(rows, |average| average < AT_RISK_THRESHOLD)
}

pub fn notable_observation(high_achievers: &[String]) -> String {
    format!(
        "Students with average more than 90% of total scores: {}",
        high_achievers.join(", ")
    )
}

pub fn recommendation(at_risk: &[String]) -> String {
    if at_risk.is_empty() {
        "No underperforming students.".to_string()
    } else {
        format!(
            "Consider additional support for students: {}",
            at_risk.join(", ")
        )
    }
}

/// `None` when the table is empty.
pub fn cohort_summary(table: &AssessmentTable) -> Option<CohortSummary> {
    if table.is_empty() {
        return None;
    }
    Some(CohortSummary {
        student_count: table.len(),
        average_score: cohort_average(&table.rows),
        top_semester: top_semester(&table.rows),
        high_achievers: high_achievers(&table.rows),
        at_risk: at_risk(&table.rows),
    })
}

/// `None` when the row carries no usable score.
pub fn student_performance(
    table: &AssessmentTable,
    row: &AssessmentRow,
) -> Option<StudentPerformance> {
    let average = mean(row.scores)?;
    Some(StudentPerformance {
        average_score: round2(average),
        grade: grade(average),
        top_semester: top_semester(&table.rows),
        best_subject: best_subject(row)?,
        lowest_subject: lowest_subject(row)?,
    })
}

pub fn subject_breakdown(row: &AssessmentRow) -> Vec<SubjectScore> {
    Subject::ALL
        .into_iter()
        .map(|subject| SubjectScore {
            subject,
            score: row.score(subject),
        })
        .collect()
}
