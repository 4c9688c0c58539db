//! Human-readable byte sizes (`500`, `11K`, `5M`, `2G`).

use tracing::trace;

use super::error::ParseError;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Converts a size string into a byte count.
///
/// A trailing `k`, `m` or `g` (either case) multiplies the number by
/// 1024, 1024² or 1024³. Without a suffix the whole string is a raw byte
/// count.
///
/// # Errors
///
/// Returns [`ParseError::EmptySize`] for an empty string,
/// [`ParseError::InvalidSize`] when the numeric part is not a base-10
/// unsigned integer, and [`ParseError::SizeOverflow`] when the result does
/// not fit in a `u64`.
///
/// # Examples
///
/// ```
/// use hfetch_core::parser::parse_size;
///
/// assert_eq!(parse_size("11K").unwrap(), 11_264);
/// assert_eq!(parse_size("100").unwrap(), 100);
/// assert!(parse_size("").is_err());
/// ```
pub fn parse_size(value: &str) -> Result<u64, ParseError> {
    let Some(last) = value.chars().next_back() else {
        return Err(ParseError::EmptySize);
    };

    let (digits, multiplier) = match last {
        'k' | 'K' => (&value[..value.len() - 1], KIB),
        'm' | 'M' => (&value[..value.len() - 1], MIB),
        'g' | 'G' => (&value[..value.len() - 1], GIB),
        _ => (value, 1),
    };

    let number = digits
        .parse::<u64>()
        .map_err(|e| ParseError::invalid_size(value, e.to_string()))?;
    let bytes = number
        .checked_mul(multiplier)
        .ok_or_else(|| ParseError::size_overflow(value))?;

    trace!(value, bytes, "parsed size");
    Ok(bytes)
}
