use std::path::Path;

use tracing::debug;

use crate::error::AnalysisError;
use crate::loader::{check_source, CSV_SUFFIX};
use crate::models::{EngagementInsight, EngagementRow, EngagementTable};

pub const NAME_COLUMN: &str = "Name";
pub const TIME_SPENT_COLUMN: &str = "Time Spent";

pub fn load_engagement(path: &Path) -> Result<EngagementTable, AnalysisError> {
    check_source(path, CSV_SUFFIX)?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let name_idx = headers
        .iter()
        .position(|h| h == NAME_COLUMN)
        .ok_or_else(|| AnalysisError::MissingColumn(NAME_COLUMN.to_string()))?;
    let time_idx = headers.iter().position(|h| h == TIME_SPENT_COLUMN);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(EngagementRow {
            name: record.get(name_idx).unwrap_or_default().to_string(),
            time_spent: time_idx
                .and_then(|idx| record.get(idx))
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        });
    }

    debug!(path = %path.display(), rows = rows.len(), "loaded engagement table");
    Ok(EngagementTable {
        has_time_spent: time_idx.is_some(),
        rows,
    })
}

impl EngagementTable {
    /// Looks at the first row whose name matches exactly; later duplicates are ignored.
    pub fn time_spent_for(&self, student_name: &str) -> EngagementInsight {
        if !self.has_time_spent {
            return EngagementInsight::NoData;
        }
        self.rows
            .iter()
            .find(|row| row.name == student_name)
            .and_then(|row| row.time_spent.clone())
            .map(EngagementInsight::TimeSpent)
            .unwrap_or_default()
    }
}
