use crate::{calendar, error::DateError};
use chrono::{Datelike, Local, NaiveDate, Utc};
use core::{
    fmt::{self, Display},
    ops::Deref,
    str::FromStr,
};
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// A calendar-valid `(year, month, day)`.
///
/// A `DateTriple` can only be built through [`DateTriple::new`], which checks it against the
/// Gregorian calendar, so holding one means the day exists.
///
/// Triples order chronologically: year first, then month, then day.
///
/// ```
/// use shelfdate::DateTriple;
///
/// let production = DateTriple::new(2025, 8, 14).unwrap();
/// let expiration = DateTriple::new(2026, 8, 14).unwrap();
/// assert!(production < expiration);
/// assert!(DateTriple::new(2026, 2, 29).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DateTriple {
    // field order matters: the derived Ord compares year, then month, then day
    year: i32,
    month: u32,
    day: u32,
}

impl DateTriple {
    /// Returns a new [`DateTriple`], or [`DateError::InvalidDate`] if the values do not name a
    /// real day.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        if calendar::is_valid(year, month, day) {
            Ok(Self { year, month, day })
        } else {
            Err(DateError::InvalidDate { year, month, day })
        }
    }

    /// The Gregorian year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The day of the month, starting at 1.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Converts to a [`NaiveDate`]. Returns `None` only for years outside chrono's range.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Returns true if this date falls strictly before `today`. A product expiring today is not
    /// expired yet.
    ///
    /// Extraction never calls this; it is here for callers that want to flag stale stock.
    pub fn is_expired_on(&self, today: &ReferenceDate) -> bool {
        (self.year, self.month, self.day) < (today.year(), today.month(), today.day())
    }
}

impl Display for DateTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for DateTriple {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// The outcome of an extraction: up to one production date and up to one expiration date.
///
/// The count of found dates is always derived from the populated slots.
///
/// Serializes to the shape the OCR service returns to its clients:
///
/// ```
/// use shelfdate::extract_dual;
///
/// let result = extract_dual(".PD: 14/08/2025 .BB: 14/08/2026");
/// assert_eq!(
///     r#"{"count":2,"production":{"year":2025,"month":8,"day":14},"expiration":{"year":2026,"month":8,"day":14}}"#,
///     serde_json::to_string(&result).unwrap(),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    production: Option<DateTriple>,
    expiration: Option<DateTriple>,
}

impl ExtractionResult {
    /// Returns a result with both roles absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a result with the given roles.
    pub fn new(production: Option<DateTriple>, expiration: Option<DateTriple>) -> Self {
        Self {
            production,
            expiration,
        }
    }

    /// Returns a result holding only an expiration date.
    pub fn expiring(expiration: DateTriple) -> Self {
        Self::new(None, Some(expiration))
    }

    /// The production (manufacturing) date, if one was found.
    pub fn production(&self) -> Option<DateTriple> {
        self.production
    }

    /// The expiration (best-before) date, if one was found.
    pub fn expiration(&self) -> Option<DateTriple> {
        self.expiration
    }

    /// The number of populated roles: 0, 1, or 2.
    pub fn count(&self) -> usize {
        usize::from(self.production.is_some()) + usize::from(self.expiration.is_some())
    }

    /// Returns true if no date was found.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ExtractionResult", 3)?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("production", &self.production)?;
        state.serialize_field("expiration", &self.expiration)?;
        state.end()
    }
}

/// The day extraction treats as "today".
///
/// Only the month-day rule (`05/02`, year omitted) and [`DateTriple::is_expired_on`] look at it.
/// The entry points without an `_at` suffix use [`ReferenceDate::local_now`] at call time.
///
/// ```
/// use shelfdate::ReferenceDate;
///
/// let explicit = ReferenceDate::explicit(2026, 2, 3).unwrap();
/// let parsed: ReferenceDate = "2026-02-03".parse().unwrap();
/// assert_eq!(explicit, parsed);
/// let local_now = ReferenceDate::local_now();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceDate(NaiveDate);

impl ReferenceDate {
    /// Returns a new [`ReferenceDate`] representing the current date in UTC at the time of this
    /// call.
    pub fn utc_now() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Returns a new [`ReferenceDate`] representing the current date in the system's local
    /// timezone at the time of this call.
    pub fn local_now() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns result of a new [`ReferenceDate`] representing the given date, or
    /// [`DateError::InvalidDate`].
    pub fn explicit(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDate { year, month, day })
    }
}

impl FromStr for ReferenceDate {
    type Err = DateError;

    /// Parses a `YYYY-MM-DD` string. See [`NaiveDate::from_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(NaiveDate::from_str(s)?))
    }
}

impl From<NaiveDate> for ReferenceDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Deref for ReferenceDate {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn triple(year: i32, month: u32, day: u32) -> DateTriple {
        DateTriple::new(year, month, day).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid() {
        assert_eq!(
            Err(DateError::InvalidDate {
                year: 2026,
                month: 13,
                day: 1
            }),
            DateTriple::new(2026, 13, 1)
        );
    }

    #[test]
    fn test_order_is_chronological() {
        let mut dates = vec![
            triple(2026, 8, 14),
            triple(2025, 12, 31),
            triple(2026, 1, 31),
            triple(2026, 8, 1),
        ];
        dates.sort();
        assert_eq!(
            vec![
                triple(2025, 12, 31),
                triple(2026, 1, 31),
                triple(2026, 8, 1),
                triple(2026, 8, 14),
            ],
            dates
        );
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!("2026-05-02", triple(2026, 5, 2).to_string());
    }

    #[test]
    fn test_naive_date_conversion() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Some(date), DateTriple::from(date).to_naive_date());
    }

    #[rstest]
    #[case("2026-05-01", true)]
    #[case("2026-05-02", false)]
    #[case("2026-05-03", false)]
    #[case("2027-01-01", false)]
    fn test_is_expired_on(#[case] expiry: &str, #[case] expired: bool) {
        let today: ReferenceDate = "2026-05-02".parse().unwrap();
        let expiry = DateTriple::from(NaiveDate::from_str(expiry).unwrap());
        assert_eq!(expired, expiry.is_expired_on(&today));
    }

    #[test]
    fn test_count_follows_slots() {
        let date = triple(2026, 8, 14);
        assert_eq!(0, ExtractionResult::empty().count());
        assert_eq!(1, ExtractionResult::expiring(date).count());
        assert_eq!(1, ExtractionResult::new(Some(date), None).count());
        assert_eq!(2, ExtractionResult::new(Some(date), Some(date)).count());
    }

    #[test]
    fn test_serialize_empty() {
        assert_eq!(
            json!({"count": 0, "production": null, "expiration": null}),
            serde_json::to_value(ExtractionResult::empty()).unwrap()
        );
    }

    #[test]
    fn test_serialize_expiring() {
        assert_eq!(
            json!({
                "count": 1,
                "production": null,
                "expiration": {"year": 2026, "month": 5, "day": 2},
            }),
            serde_json::to_value(ExtractionResult::expiring(triple(2026, 5, 2))).unwrap()
        );
    }

    #[test]
    fn test_reference_date_parse() {
        assert_eq!(
            ReferenceDate::explicit(2026, 10, 18),
            "2026-10-18".parse::<ReferenceDate>()
        );
        assert!(matches!(
            "18/10/2026".parse::<ReferenceDate>(),
            Err(DateError::Unparseable(_))
        ));
        assert!(ReferenceDate::explicit(2026, 2, 30).is_err());
    }
}
