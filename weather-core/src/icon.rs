//! WMO weather code to display glyph.
//!
//! The table is evaluated top to bottom and the first set containing the code
//! wins, so order matters if sets ever overlap.

/// Returned for codes outside every set.
pub const UNKNOWN_ICON: &str = "NOT FOUND";

const ICON_TABLE: &[(&[i32], &str)] = &[
    (&[0], "☀️"),
    (&[1], "🌤"),
    (&[2], "⛅️"),
    (&[3], "☁️"),
    (&[45, 48], "🌫"),
    (&[51, 56, 61, 66, 80], "🌦"),
    (&[53, 55, 63, 65, 57, 67, 81, 82], "🌧"),
    (&[71, 73, 75, 77, 85, 86], "🌨"),
    (&[95], "🌩"),
    (&[96, 99], "⛈"),
];

pub fn icon_for(code: i32) -> &'static str {
    ICON_TABLE
        .iter()
        .find(|(codes, _)| codes.contains(&code))
        .map(|(_, glyph)| *glyph)
        .unwrap_or(UNKNOWN_ICON)
}

/// Country flag from a two-letter ISO code, using regional indicator symbols.
///
/// Returns `None` for anything that isn't exactly two ASCII letters.
pub fn flag_emoji(country_code: &str) -> Option<String> {
    const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    country_code
        .chars()
        .map(|c| char::from_u32(REGIONAL_INDICATOR_A + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
        .collect()
}
