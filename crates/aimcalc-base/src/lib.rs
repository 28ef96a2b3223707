use thiserror::Error;

/// Magnitude below which a vector or distance is treated as zero.
pub const DEGENERATE_EPS: f64 = 1.0e-12;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses a numeric cell, accepting a comma as decimal separator.
/// Returns `None` for blank, non-numeric or non-finite text.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replacen(',', ".", 1);
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_is_a_decimal_separator() {
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number(" -3.25 "), Some(-3.25));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }
}
