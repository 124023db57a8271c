//! Derives the binary `Label` column of a sample metadata table from the
//! free-text sample titles.

use std::path::Path;

use log::info;
use polars::prelude::*;

use crate::data_structs::Label;
use crate::error::{
    PrepError,
    PrepResult,
};
use crate::io::{
    read_table,
    write_table,
};
use crate::with_field_fn;

pub const CLEANED_TITLE_COL: &str = "Cleaned Title";

#[derive(Debug, Clone)]
pub struct TitleLabeler {
    title_col:      String,
    label_col:      String,
    healthy_marker: String,
    separator:      u8,
}

impl Default for TitleLabeler {
    fn default() -> Self {
        Self {
            title_col:      "title".into(),
            label_col:      "Label".into(),
            healthy_marker: "Healthy".into(),
            separator:      b',',
        }
    }
}

impl TitleLabeler {
    with_field_fn!(title_col, String);
    with_field_fn!(label_col, String);
    with_field_fn!(healthy_marker, String);
    with_field_fn!(separator, u8);

    /// Strips list brackets and quotes left over from the archive parser:
    /// `"['Healthy control 1']"` becomes `"Healthy control 1"`.
    pub fn clean_title(raw: &str) -> String {
        raw.trim_matches(|c: char| c == '[' || c == ']').replace('\'', "")
    }

    /// `0` when the cleaned title mentions the healthy marker, else `1`.
    pub fn label_for(
        &self,
        cleaned: &str,
    ) -> Label {
        if cleaned.contains(self.healthy_marker.as_str()) {
            0
        }
        else {
            1
        }
    }

    /// Appends the cleaned title and label columns to `df`. Rows without a
    /// title get neither.
    pub fn label_frame(
        &self,
        df: &mut DataFrame,
    ) -> PrepResult<()> {
        if df.get_column_index(&self.title_col).is_none() {
            return Err(PrepError::missing_column(&self.title_col, "metadata"));
        }
        let titles = df.column(&self.title_col)?.cast(&DataType::String)?;
        let cleaned: Vec<Option<String>> = titles
            .str()?
            .into_iter()
            .map(|t| t.map(Self::clean_title))
            .collect();
        let labels: Vec<Option<i32>> = cleaned
            .iter()
            .map(|t| t.as_deref().map(|t| self.label_for(t) as i32))
            .collect();

        let cleaned: StringChunked = cleaned.into_iter().collect();
        df.with_column(cleaned.with_name(CLEANED_TITLE_COL.into()).into_column())?;
        df.with_column(Column::new(self.label_col.as_str().into(), labels))?;
        Ok(())
    }

    /// Reads `input`, labels it and writes the result to `output`. Returns
    /// the number of rows per label, `[healthy, other]`.
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
    ) -> PrepResult<[usize; 2]> {
        let mut df = read_table(input, self.separator)?;
        self.label_frame(&mut df)?;

        let mut counts = [0usize; 2];
        for label in df.column(&self.label_col)?.i32()?.into_iter().flatten() {
            counts[label as usize] += 1;
        }
        info!(
            "Labeled {} samples: {} healthy, {} other",
            df.height(),
            counts[0],
            counts[1]
        );
        write_table(&mut df, output, self.separator)?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("['Healthy control 12']", "Healthy control 12", 0)]
    #[case("['SLE patient 3, visit 2']", "SLE patient 3, visit 2", 1)]
    #[case("Healthy", "Healthy", 0)]
    #[case("['healthy lowercase']", "healthy lowercase", 1)]
    fn cleans_and_labels_titles(
        #[case] raw: &str,
        #[case] cleaned: &str,
        #[case] label: Label,
    ) {
        let labeler = TitleLabeler::default();
        let got = TitleLabeler::clean_title(raw);
        assert_eq!(got, cleaned);
        assert_eq!(labeler.label_for(&got), label);
    }

    #[test]
    fn label_frame_adds_columns() -> anyhow::Result<()> {
        let mut df = df!(
            "geo_accession" => &["GSM1", "GSM2", "GSM3"],
            "title" => &[Some("['Healthy 1']"), Some("['SLE 1']"), None],
        )?;
        TitleLabeler::default().label_frame(&mut df)?;

        let labels: Vec<Option<i32>> = df.column("Label")?.i32()?.into_iter().collect();
        assert_eq!(labels, vec![Some(0), Some(1), None]);
        assert_eq!(
            df.column(CLEANED_TITLE_COL)?.str()?.get(0),
            Some("Healthy 1")
        );
        Ok(())
    }

    #[test]
    fn missing_title_column_is_a_schema_error() {
        let mut df = df!("geo_accession" => &["GSM1"]).unwrap();
        let err = TitleLabeler::default().label_frame(&mut df).unwrap_err();
        assert!(matches!(
            err,
            PrepError::MissingColumn { ref column, .. } if column == "title"
        ));
    }
}
