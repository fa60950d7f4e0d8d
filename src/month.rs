/// The twelve English month abbreviations, in calendar order.
pub(crate) const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Regex alternation over [`MONTH_ABBREVIATIONS`]. Callers compile it case-insensitively.
pub(crate) const MONTH_PATTERN: &str = "JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC";

/// Maps a three-letter English month abbreviation (`JAN` through `DEC`, any case) to its month
/// number.
///
/// Only exact abbreviations are recognized: full month names, other languages, and near misses
/// return `None`.
///
/// ```
/// use shelfdate::month_from_abbreviation;
///
/// assert_eq!(Some(5), month_from_abbreviation("may"));
/// assert_eq!(None, month_from_abbreviation("MAYO"));
/// ```
pub fn month_from_abbreviation(token: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| abbr.eq_ignore_ascii_case(token))
        .and_then(|index| u32::try_from(index + 1).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_all_abbreviations_in_order() {
        for (index, abbr) in MONTH_ABBREVIATIONS.iter().enumerate() {
            assert_eq!(Some(index as u32 + 1), month_from_abbreviation(abbr));
        }
    }

    #[rstest]
    #[case("jan", Some(1))]
    #[case("Dec", Some(12))]
    #[case("sEp", Some(9))]
    #[case("JUNE", None)]
    #[case("SEPT", None)]
    #[case("JA", None)]
    #[case("", None)]
    #[case("ENE", None)]
    fn test_resolve(#[case] token: &str, #[case] expected: Option<u32>) {
        assert_eq!(expected, month_from_abbreviation(token));
    }

    #[test]
    fn test_pattern_matches_table() {
        assert_eq!(MONTH_ABBREVIATIONS.join("|"), MONTH_PATTERN);
    }
}
