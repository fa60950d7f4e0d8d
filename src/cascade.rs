use crate::{
    date::{DateTriple, ReferenceDate},
    rule::{FormatRule, RuleOutcome, RULES},
};
use tracing::{debug, trace};

/// Reads a single date out of a line of OCR text by trying each known date shape in a fixed
/// priority order.
///
/// The first rule whose shape is found decides the outcome when its date is valid. When it is not,
/// most rules step aside for the next one, but the strict ones (three-digit Minguo years, the
/// generic `YYYY-MM-DD`/`DD-MM-YYYY` form, and bare digit runs) end the search with no date: a
/// looser reading of the same digits would be wrong.
///
/// | # | Shape | Must be whole text | Invalid date ends search |
/// |---|---|---|---|
/// | 1 | `DD MMM YY`, `DD MMM YYYY`, `YYYY MMM DD` | no | no |
/// | 2 | `MMM YY`, `MMM YYYY` (day 1) | yes | no |
/// | 3 | `MMM DD YY`, `MMM DD YYYY` | yes | no |
/// | 4 | `YYYY MM` (day 1) | yes | no |
/// | 5 | `MM YYYY` (day 1) | yes | no |
/// | 6 | `MM DD` (year of the reference date) | yes | no |
/// | 7 | `YYY MM DD`, Minguo year 1 to 200 | yes | **yes** |
/// | 8 | `YYYY MM DD`, `DD MM YYYY`, `YY MM DD` within longer text | no | **yes** |
/// | 9 | `YYYYMMDD`, `DDMMYYYY`, `YYYMMDD` (Minguo) | no | **yes** |
/// | 10 | `YY MM DD` | yes | no |
///
/// Fields may be separated by `.`, `-`, `/`, or whitespace. Two-digit years are read as `20YY`.
///
/// ```
/// use shelfdate::{DateTriple, FormatCascade};
///
/// let expected = DateTriple::new(2026, 5, 2).ok();
/// assert_eq!(expected, FormatCascade::match_text("115.05.02"));
/// assert_eq!(expected, FormatCascade::match_text("02 MAY 26"));
/// assert_eq!(expected, FormatCascade::match_text("20260502"));
/// assert_eq!(None, FormatCascade::match_text("2026-02-30"));
/// ```
pub struct FormatCascade;

impl FormatCascade {
    /// The rules, highest priority first.
    pub fn rules() -> &'static [&'static FormatRule] {
        &RULES
    }

    /// Reads a date out of `text`, using today's local date for shapes that omit the year.
    pub fn match_text(text: &str) -> Option<DateTriple> {
        Self::match_text_at(text, &ReferenceDate::local_now())
    }

    /// Reads a date out of `text`, using `today` for shapes that omit the year.
    pub fn match_text_at(text: &str, today: &ReferenceDate) -> Option<DateTriple> {
        let text = text.trim();

        for rule in RULES {
            match rule.evaluate(text, today) {
                RuleOutcome::NoMatch => continue,
                RuleOutcome::Valid(date) => {
                    debug!(rule = %rule, %date, "date matched");
                    return Some(date);
                }
                RuleOutcome::Invalid(candidate) => {
                    if rule.stop_on_invalid() {
                        debug!(rule = %rule, %candidate, "strict format gave an invalid date");
                        return None;
                    }
                    trace!(rule = %rule, %candidate, "invalid date, trying next rule");
                }
            }
        }

        trace!(text = %text, "no date shape matched");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rstest::*;

    #[fixture]
    fn today() -> ReferenceDate {
        ReferenceDate::explicit(2026, 10, 18).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> Option<DateTriple> {
        Some(DateTriple::new(year, month, day).unwrap())
    }

    /// Every shape the cascade reads, written for 2026-05-02 with `{}` standing in for the
    /// separator.
    #[fixture]
    fn shapes_for_may_second() -> Vec<&'static str> {
        vec![
            "2026{}05{}02",
            "02{}05{}2026",
            "115{}05{}02",
            "02{}MAY{}26",
            "02{}MAY{}2026",
            "2026{}MAY{}02",
            "MAY{}02{}26",
            "MAY{}02{}2026",
            "26{}05{}02",
        ]
    }

    #[rstest]
    fn test_every_shape_every_separator(
        today: ReferenceDate,
        shapes_for_may_second: Vec<&'static str>,
    ) {
        let separators = ["-", ".", "/", " "];
        for (shape, sep) in shapes_for_may_second.iter().cartesian_product(separators) {
            let text = shape.replace("{}", sep);
            assert_eq!(
                date(2026, 5, 2),
                FormatCascade::match_text_at(&text, &today),
                "{text}"
            );
        }
    }

    #[rstest]
    #[case("20260502", date(2026, 5, 2))]
    #[case("02052026", date(2026, 5, 2))]
    #[case("1150502", date(2026, 5, 2))]
    #[case("MAY 2026", date(2026, 5, 1))]
    #[case("MAY 26", date(2026, 5, 1))]
    #[case("2026-05", date(2026, 5, 1))]
    #[case("05/2026", date(2026, 5, 1))]
    #[case("05 02", date(2026, 5, 2))]
    #[case("  2026/05/02\n", date(2026, 5, 2))]
    #[case("EXP 2026.05.02 L2", date(2026, 5, 2))]
    #[case("BB 26.05.02 LOT", date(2026, 5, 2))]
    #[case("25/08/99", date(2099, 8, 25))]
    #[case("26/05/02 2026/05/03", date(2026, 5, 2))]
    fn test_match(today: ReferenceDate, #[case] text: &str, #[case] expected: Option<DateTriple>) {
        assert_eq!(expected, FormatCascade::match_text_at(text, &today));
    }

    #[rstest]
    #[case("2026-13-01")]
    #[case("2026-02-30")]
    #[case("2026-02-29")]
    #[case("hello world")]
    #[case("")]
    #[case("13/2026")]
    fn test_no_match(today: ReferenceDate, #[case] text: &str) {
        assert_eq!(None, FormatCascade::match_text_at(text, &today));
    }

    #[rstest]
    fn test_leap_day(today: ReferenceDate) {
        assert_eq!(date(2028, 2, 29), FormatCascade::match_text_at("2028-02-29", &today));
        assert_eq!(date(2000, 2, 29), FormatCascade::match_text_at("29.02.2000", &today));
        assert_eq!(None, FormatCascade::match_text_at("2100/02/29", &today));
    }

    #[rstest]
    fn test_minguo_invalid_stops_cascade(today: ReferenceDate) {
        // Minguo 112 is 2023, not a leap year. Rule 8 would have read year 112, which is.
        assert_eq!(None, FormatCascade::match_text_at("112/02/29", &today));
        assert_eq!(date(2024, 2, 29), FormatCascade::match_text_at("113/02/29", &today));
    }

    #[rstest]
    fn test_generic_invalid_does_not_fall_to_digit_run(today: ReferenceDate) {
        // rule 9 would read the trailing run, but rule 8 fires first and stops
        assert_eq!(
            None,
            FormatCascade::match_text_at("2026/02/30 20260502", &today)
        );
    }

    #[rstest]
    fn test_english_invalid_falls_through(today: ReferenceDate) {
        // rule 1 reads 30 FEB 2026 (invalid) and lets the digit run decide
        assert_eq!(
            date(2026, 5, 2),
            FormatCascade::match_text_at("30 FEB 2026 20260502", &today)
        );
    }

    #[rstest]
    fn test_month_day_invalid_falls_through(today: ReferenceDate) {
        // `13 05` is not a month-day, and nothing else reads it
        assert_eq!(None, FormatCascade::match_text_at("13 05", &today));
    }

    #[test]
    fn test_rules_are_exposed_in_order() {
        let priorities = FormatCascade::rules()
            .iter()
            .map(|rule| rule.priority())
            .collect_vec();
        assert_eq!((1..=10).collect_vec(), priorities);
    }

    #[rstest]
    fn test_every_valid_result_revalidates(today: ReferenceDate) {
        let texts = [
            "2024-02-29",
            "31 DEC 99",
            "JAN 2030",
            "12/31",
            "200.12.31",
            "12122030",
            "99-12-31",
        ];
        for text in texts {
            let found = FormatCascade::match_text_at(text, &today).unwrap();
            assert!(crate::calendar::is_valid(
                found.year(),
                found.month(),
                found.day()
            ));
        }
    }
}
