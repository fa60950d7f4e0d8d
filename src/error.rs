/// Errors from building a [`DateTriple`](crate::DateTriple) or a
/// [`ReferenceDate`](crate::ReferenceDate) out of caller-supplied values.
///
/// Extraction itself never returns these: text that holds no usable date simply yields an empty
/// [`ExtractionResult`](crate::ExtractionResult).
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DateError {
    /// The values fail the Gregorian month/day limits (including the leap-year rule).
    #[error("Year ({year}), month ({month}), and day ({day}) do not form a valid calendar date")]
    InvalidDate {
        /// Gregorian year.
        year: i32,
        /// Month, 1 to 12 when valid.
        month: u32,
        /// Day of the month.
        day: u32,
    },

    /// A `YYYY-MM-DD` string could not be parsed.
    #[error("Date should be formatted as `YYYY-MM-DD`: {0}")]
    Unparseable(#[from] chrono::ParseError),
}
