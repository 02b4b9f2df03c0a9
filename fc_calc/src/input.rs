use crate::CalcError;
use crate::Result;

/// Parse a user-typed number that must be positive and finite.
///
/// Spaces and underscores are ignored. A comma is read as the decimal
/// separator when the text has no dot (`"0,5"`), otherwise as a thousands
/// separator (`"64,250.5"`).
pub fn parse_positive(field: &'static str, text: &str) -> Result<f64> {
    let cleaned: String = text.trim().chars().filter(|c| !c.is_whitespace() && *c != '_').collect();

    let normalized = if cleaned.contains('.') { cleaned.replace(',', "") } else { cleaned.replace(',', ".") };

    let value = normalized.parse::<f64>().map_err(|_| CalcError::NotANumber { input: text.trim().to_string() })?;

    ensure_positive(field, value)
}

/// Longest accepted instrument symbol
pub const MAX_PAIR_LEN: usize = 20;

/// Normalise a trading pair symbol: trimmed and upper-cased.
///
/// Only ASCII letters, digits and `/ - _ .` are accepted.
pub fn parse_pair(text: &str) -> Result<String> {
    let pair = text.trim().to_ascii_uppercase();

    let valid_chars = pair.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'));
    let has_letter = pair.chars().any(|c| c.is_ascii_alphabetic());

    if pair.len() < 2 || pair.len() > MAX_PAIR_LEN || !valid_chars || !has_letter {
        return Err(CalcError::InvalidPair { input: text.trim().to_string() });
    }
    Ok(pair)
}

/// Reject NaN, infinities, zero and negatives
pub fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::NonPositive { field });
    }
    Ok(value)
}
