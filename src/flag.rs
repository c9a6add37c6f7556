//! Country flag glyphs
//!
//! A flag emoji is two Unicode regional indicator symbols, one per letter of
//! the ISO 3166-1 alpha-2 country code.

use crate::constants::flag::REGIONAL_INDICATOR_OFFSET;
use crate::error::{Error, Result};

/// Check that a code has the shape of an alpha-2 country code
///
/// Only the shape is checked (two ASCII letters, any case), not whether the
/// code is actually assigned.
pub fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Encode a two-letter country code as a flag glyph sequence
///
/// Case-insensitive: `"fr"` and `"FR"` both give 🇫🇷. Anything that is not
/// exactly two ASCII letters is rejected.
pub fn encode_flag(country_code: &str) -> Result<String> {
    if !is_country_code(country_code) {
        return Err(Error::InvalidCountryCode(country_code.to_string()));
    }

    country_code
        .chars()
        .map(|c| {
            char::from_u32(c.to_ascii_uppercase() as u32 + REGIONAL_INDICATOR_OFFSET)
                .ok_or_else(|| Error::InvalidCountryCode(country_code.to_string()))
        })
        .collect()
}
