use polars::prelude::*;

use crate::error::PrepResult;

/// Canonical form of a sample accession: surrounding whitespace removed and
/// every character that is not a letter, digit or underscore stripped.
///
/// Idempotent: `canonical_key(&canonical_key(s)) == canonical_key(s)`.
pub fn canonical_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// [`canonical_key`] lifted over missing values.
pub fn canonicalize_opt(raw: Option<&str>) -> Option<String> {
    raw.map(canonical_key)
}

/// Replaces `column` of `df` with its canonical keys. Non-string columns are
/// cast to strings first, nulls stay null.
pub fn canonicalize_column(
    df: &mut DataFrame,
    column: &str,
) -> PrepResult<()> {
    let raw = df.column(column)?.cast(&DataType::String)?;
    let canonical: StringChunked = raw.str()?.into_iter().map(canonicalize_opt).collect();
    df.with_column(canonical.with_name(column.into()).into_column())?;
    Ok(())
}
