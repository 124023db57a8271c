use log::info;

use crate::data_structs::MergedRow;

/// Row counts around the missing-data filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterReport {
    pub before: usize,
    pub after:  usize,
}

impl FilterReport {
    pub fn dropped(&self) -> usize {
        self.before - self.after
    }
}

/// Drops rows without a `Value` or without a `Label`. No other field is
/// required at this stage.
pub fn filter_missing(rows: Vec<MergedRow>) -> (Vec<MergedRow>, FilterReport) {
    let before = rows.len();
    let kept: Vec<MergedRow> = rows
        .into_iter()
        .filter(|row| row.value.is_some() && row.label.is_some())
        .collect();
    let report = FilterReport {
        before,
        after: kept.len(),
    };
    info!(
        "Dropped {} of {} merged rows with missing value or label",
        report.dropped(),
        report.before
    );
    (kept, report)
}
