use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::{
    debug,
    warn,
};
use polars::prelude::*;

use crate::error::PrepResult;

/// Writes `df` with a header row to `path`, replacing any existing file.
pub fn write_table(
    df: &mut DataFrame,
    path: &Path,
    separator: u8,
) -> PrepResult<()> {
    debug!("Writing {} rows to {}", df.height(), path.display());
    let sink = BufWriter::new(File::create(path)?);
    CsvWriter::new(sink)
        .include_header(true)
        .with_separator(separator)
        .finish(df)
        .map_err(|e| {
            warn!("Failed to write {}: {}", path.display(), e);
            e
        })?;
    Ok(())
}
