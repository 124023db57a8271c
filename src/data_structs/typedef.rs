use crate::error::{
    PrepError,
    PrepResult,
};

/// Binary class label. Only `0` and `1` are ever constructed.
pub type Label = u8;

/// Parses a raw label cell. Accepts integer (`"1"`) and float (`"1.0"`)
/// spellings of 0 and 1, surrounding whitespace ignored. Blank cells are
/// missing values.
pub fn parse_label(raw: &str) -> PrepResult<Option<Label>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed {
        "0" => return Ok(Some(0)),
        "1" => return Ok(Some(1)),
        _ => {},
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(Some(0)),
        Ok(v) if v == 1.0 => Ok(Some(1)),
        Ok(v) if v.is_nan() => Ok(None),
        _ => {
            Err(PrepError::InvalidLabel {
                value: raw.to_string(),
            })
        },
    }
}
