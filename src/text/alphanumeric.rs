//! Alphanumeric classification.
//!
//! # Design Decisions
//! - Classification is per `char` (Unicode scalar value), never per byte
//! - Letters are the `L*` general categories, digits are `Nd` only.
//!   Combining marks, superscripts, fractions and letter-like numerals
//!   (`Nl`) are rejected.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Returns true if `s` is composed of letters and digits only.
///
/// The empty string is alphanumeric. Scanning stops at the first
/// character that is neither a letter nor a decimal digit.
pub fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| is_letter(c) || is_digit(c))
}

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

fn is_digit(c: char) -> bool {
    matches!(get_general_category(c), GeneralCategory::DecimalNumber)
}
